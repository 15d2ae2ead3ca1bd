//! Converting raw engine values into typed fields.
//!
//! Each conversion looks at one field only. A field that is `Undefined`, of
//! the wrong kind, or out of range becomes `None`; the other fields of the
//! same match are unaffected.

use crate::Instant;
use crate::engine::RawValue;
use chrono::DateTime;
use log::debug;

/// Character offset of the phrase within `input`.
pub(crate) fn offset(value: &RawValue, input: &str) -> Option<usize> {
    match value {
        RawValue::Undefined => None,
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            let len = input.chars().count();
            if *n <= len as f64 {
                Some(*n as usize)
            } else {
                debug!("[normalize] offset {} past end of input ({} chars)", n, len);
                None
            }
        }
        other => {
            debug!("[normalize] unusable offset {:?}", other);
            None
        }
    }
}

/// The matched phrase. An empty string is a present value.
pub(crate) fn phrase(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Undefined => None,
        RawValue::Text(text) => Some(text.clone()),
        other => {
            debug!("[normalize] unusable phrase {:?}", other);
            None
        }
    }
}

/// An instant, either native or as RFC 3339 text.
pub(crate) fn instant(value: &RawValue) -> Option<Instant> {
    match value {
        RawValue::Undefined => None,
        RawValue::Instant(instant) => Some(*instant),
        RawValue::Text(text) => match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(instant) => Some(instant),
            Err(err) => {
                debug!("[normalize] unusable instant {:?}: {}", text, err);
                None
            }
        },
        other => {
            debug!("[normalize] unusable instant {:?}", other);
            None
        }
    }
}

/// Byte position of character `offset` in `input` (`input.len()` for the
/// position just past the last character).
pub(crate) fn char_to_byte(input: &str, offset: usize) -> Option<usize> {
    input
        .char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .or_else(|| (offset == input.chars().count()).then_some(input.len()))
}

/// Whether `phrase` occurs in `input` starting at character `offset`.
pub(crate) fn phrase_at(input: &str, phrase: &str, offset: usize) -> bool {
    char_to_byte(input, offset).is_some_and(|byte| input[byte..].starts_with(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offsets() {
        let input = "héllo friday";
        assert_eq!(offset(&RawValue::Number(6.0), input), Some(6));
        assert_eq!(offset(&RawValue::Number(0.0), input), Some(0));
        assert_eq!(offset(&RawValue::Number(12.0), input), Some(12));
        assert_eq!(offset(&RawValue::Number(13.0), input), None);
        assert_eq!(offset(&RawValue::Number(-1.0), input), None);
        assert_eq!(offset(&RawValue::Number(2.5), input), None);
        assert_eq!(offset(&RawValue::Number(f64::NAN), input), None);
        assert_eq!(offset(&RawValue::Text("6".into()), input), None);
        assert_eq!(offset(&RawValue::Undefined, input), None);
    }

    #[test]
    fn empty_phrase_is_present() {
        assert_eq!(phrase(&RawValue::Text(String::new())), Some(String::new()));
        assert_eq!(phrase(&RawValue::Undefined), None);
        assert_eq!(phrase(&RawValue::Number(3.0)), None);
        assert_eq!(phrase(&RawValue::Opaque("{}".into())), None);
    }

    #[test]
    fn instants() {
        let cst = chrono::FixedOffset::west_opt(6 * 3600).unwrap();
        let expected = cst.with_ymd_and_hms(2016, 11, 21, 15, 0, 0).unwrap();

        assert_eq!(instant(&RawValue::Instant(expected)), Some(expected));
        assert_eq!(instant(&RawValue::Text("2016-11-21T15:00:00-06:00".into())), Some(expected));
        assert_eq!(instant(&RawValue::Text("next tuesday-ish".into())), None);
        assert_eq!(instant(&RawValue::Number(1479762000000.0)), None);
        assert_eq!(instant(&RawValue::Undefined), None);
    }

    #[test]
    fn char_positions() {
        let input = "héllo friday";
        assert_eq!(char_to_byte(input, 0), Some(0));
        assert_eq!(char_to_byte(input, 2), Some(3));
        assert_eq!(char_to_byte(input, 12), Some(input.len()));
        assert_eq!(char_to_byte(input, 13), None);

        assert!(phrase_at(input, "friday", 6));
        assert!(!phrase_at(input, "friday", 5));
        assert!(phrase_at(input, "", 12));
    }
}
