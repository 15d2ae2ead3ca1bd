//! Word classification for window scanning.
//!
//! The English engine only understands whole expressions, so the recognizer
//! has to decide which spans of the input are worth submitting. This module
//! splits the input into words and tags each with coarse classes; a span is
//! only tried when it starts on a [`WordClass::STARTS`] word and ends on a
//! [`WordClass::ENDS`] word.
//!
//! The scan is a heuristic. False positives are fine because the engine still
//! has to accept the span; false negatives lose matches, so keep the lists
//! generous.

const WEEKDAYS: &[&str] = &["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const RELATIVE_DAYS: &[&str] = &["today", "tomorrow", "yesterday", "tonight", "now"];

const MODIFIERS: &[&str] = &["next", "last", "this"];

bitflags::bitflags! {
    /// Coarse classes a single word can belong to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WordClass: u16 {
        const DIGITS       = 1 << 0;
        const WEEKDAYISH   = 1 << 1;
        const MONTHISH     = 1 << 2;
        const RELATIVE_DAY = 1 << 3;
        const MODIFIER     = 1 << 4;
        const UNIT         = 1 << 5;
        const AGO          = 1 << 6;
        const MERIDIEM     = 1 << 7;

        /// Words a time phrase may begin with.
        const STARTS = Self::DIGITS.bits()
            | Self::WEEKDAYISH.bits()
            | Self::MONTHISH.bits()
            | Self::RELATIVE_DAY.bits()
            | Self::MODIFIER.bits();

        /// Words a time phrase may end with.
        const ENDS = Self::DIGITS.bits()
            | Self::WEEKDAYISH.bits()
            | Self::MONTHISH.bits()
            | Self::RELATIVE_DAY.bits()
            | Self::UNIT.bits()
            | Self::AGO.bits()
            | Self::MERIDIEM.bits();
    }
}

/// A whitespace-delimited word with surrounding punctuation trimmed off.
///
/// `start`/`end` are byte offsets into the input, `char_start` is the
/// character offset of `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub end: usize,
    pub char_start: usize,
    pub class: WordClass,
}

impl Word {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `input` into classified words.
pub fn words(input: &str) -> Vec<Word> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().enumerate().peekable();

    while let Some((char_idx, (byte_idx, c))) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let mut end = byte_idx + c.len_utf8();
        while let Some(&(_, (b, next))) = chars.peek() {
            if next.is_whitespace() {
                break;
            }
            end = b + next.len_utf8();
            chars.next();
        }

        out.push(trimmed_word(input, byte_idx, end, char_idx));
    }

    out
}

fn trimmed_word(input: &str, start: usize, end: usize, char_start: usize) -> Word {
    let raw = &input[start..end];

    let lead: &str = raw.trim_start_matches(is_edge_punct);
    let skipped = raw.len() - lead.len();
    let core = lead.trim_end_matches(is_edge_punct);

    let start = start + skipped;
    let end = start + core.len();
    let char_start = char_start + raw[..skipped].chars().count();

    Word { start, end, char_start, class: classify(core) }
}

// Signs survive so that "-3h" keeps its meaning.
fn is_edge_punct(c: char) -> bool {
    (c.is_ascii_punctuation() && c != '-' && c != '+') || c == '\u{201c}' || c == '\u{201d}' || c == '\u{2019}'
}

/// Classify a single (already trimmed) word.
pub fn classify(word: &str) -> WordClass {
    let mut class = WordClass::empty();
    if word.is_empty() {
        return class;
    }

    if word.bytes().any(|b| b.is_ascii_digit()) {
        class |= WordClass::DIGITS;
    }

    let lower = word.to_ascii_lowercase();

    if is_name_prefix(&lower, WEEKDAYS) {
        class |= WordClass::WEEKDAYISH;
    }
    if lower == "may" || is_name_prefix(&lower, MONTHS) {
        class |= WordClass::MONTHISH;
    }
    if RELATIVE_DAYS.contains(&lower.as_str()) {
        class |= WordClass::RELATIVE_DAY;
    }
    if MODIFIERS.contains(&lower.as_str()) {
        class |= WordClass::MODIFIER;
    }
    if regex!(r"^(?:s|secs?|seconds?|m|mins?|minutes?|h|hrs?|hours?|d|days?|w|wks?|weeks?|months?|y|yrs?|years?)$")
        .is_match(&lower)
    {
        class |= WordClass::UNIT;
    }
    if lower == "ago" {
        class |= WordClass::AGO;
    }
    if regex!(r"^[ap]\.?m\.?$").is_match(&lower) {
        class |= WordClass::MERIDIEM;
    }

    class
}

// "fri", "tues" and "friday" all count; "frigate" does not.
fn is_name_prefix(lower: &str, names: &[&str]) -> bool {
    lower.len() >= 3 && lower.chars().all(|c| c.is_ascii_alphabetic()) && names.iter().any(|n| n.starts_with(lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_track_byte_and_char_offsets() {
        let input = "café (friday), 8pm";
        let ws = words(input);

        assert_eq!(ws.len(), 3);
        assert_eq!(&input[ws[1].start..ws[1].end], "friday");
        assert_eq!(ws[1].char_start, 6);
        assert_eq!(&input[ws[2].start..ws[2].end], "8pm");
        assert_eq!(ws[2].char_start, 15);
    }

    #[test]
    fn punctuation_only_words_are_empty() {
        let ws = words("meet -- later");
        assert_eq!(ws.len(), 3);
        assert!(!ws[1].is_empty());
        assert_eq!(ws[1].class, WordClass::empty());

        let ws = words("meet ... later");
        assert!(ws[1].is_empty());
    }

    #[test]
    fn signs_are_kept() {
        let input = "-3h";
        let ws = words(input);
        assert_eq!(&input[ws[0].start..ws[0].end], "-3h");
        assert!(ws[0].class.contains(WordClass::DIGITS));
    }

    #[test]
    fn classify_examples() {
        let cases: Vec<(&str, WordClass)> = vec![
            ("Friday", WordClass::WEEKDAYISH),
            ("tues", WordClass::WEEKDAYISH),
            ("sept", WordClass::MONTHISH),
            ("May", WordClass::MONTHISH),
            ("tomorrow", WordClass::RELATIVE_DAY),
            ("next", WordClass::MODIFIER),
            ("days", WordClass::UNIT),
            ("ago", WordClass::AGO),
            ("pm", WordClass::MERIDIEM),
            ("p.m", WordClass::MERIDIEM),
            ("8pm", WordClass::DIGITS),
            ("sunny", WordClass::empty()),
            ("monitor", WordClass::empty()),
            ("the", WordClass::empty()),
        ];

        for (word, expected) in cases {
            assert_eq!(classify(word), expected, "word {word:?}");
        }
    }

    #[test]
    fn starts_and_ends_masks() {
        assert!(classify("next").intersects(WordClass::STARTS));
        assert!(!classify("next").intersects(WordClass::ENDS));
        assert!(classify("ago").intersects(WordClass::ENDS));
        assert!(!classify("ago").intersects(WordClass::STARTS));
    }
}
