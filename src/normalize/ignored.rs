//! Computing the text left over once the time phrase is removed.
//!
//! Engines report only the literal phrase span. A connective ("on", "in")
//! and an article ("the") right in front of it read as part of the time
//! expression, so they go too:
//!
//! ```text
//! "Let's meet on the 5th, ok"     phrase "5th"
//!            └────┬─────┘
//!   \s* (on|in)? \s* (the)? \s* 5th [\s punct]*   (case-insensitive)
//!                 ▼
//! "Let's meet ok"
//! ```
//!
//! At most one connective and one article are stripped, and only when they
//! sit directly before the phrase. Words after the phrase are kept.

use super::fields::char_to_byte;
use log::debug;
use regex::{Regex, RegexBuilder};

/// Words stripped when they immediately precede the phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub connectives: Vec<String>,
    pub articles: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary { connectives: vec!["on".into(), "in".into()], articles: vec!["the".into()] }
    }
}

/// Remove `phrase` (plus a leading connective/article and trailing
/// whitespace/punctuation) from `original` and trim the rest.
///
/// When `offset` (a character offset) is given, the occurrence of the phrase
/// starting there is the one removed, even if the same words appear earlier
/// in the sentence. Without an offset, or when no occurrence starts at it,
/// the first occurrence is removed.
///
/// ```
/// use tempophrase::{Vocabulary, ignored_text};
///
/// let rest = ignored_text("Dinner on the 5th, downtown", "5th", Some(14), &Vocabulary::default());
/// assert_eq!(rest, "Dinner downtown");
/// ```
pub fn ignored_text(original: &str, phrase: &str, offset: Option<usize>, vocabulary: &Vocabulary) -> String {
    let pattern = phrase_pattern(phrase, vocabulary);

    let replaced = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => replace_phrase(&re, original, offset),
        Err(err) => {
            debug!("[ignored] pattern for {:?} did not compile ({}), removing literally", phrase, err);
            original.replacen(phrase, " ", 1)
        }
    };

    replaced.trim().to_string()
}

fn phrase_pattern(phrase: &str, vocabulary: &Vocabulary) -> String {
    let mut pattern = String::from(r"\s*");
    if let Some(words) = alternation(&vocabulary.connectives) {
        pattern.push_str(&format!(r"(?:\b(?:{words})\b\s*)?"));
    }
    if let Some(words) = alternation(&vocabulary.articles) {
        pattern.push_str(&format!(r"(?:\b(?:{words})\b\s*)?"));
    }
    pattern.push_str(&format!(r"(?P<phrase>{})[\s[:punct:]]*", regex::escape(phrase)));
    pattern
}

fn alternation(words: &[String]) -> Option<String> {
    let escaped: Vec<String> =
        words.iter().map(|w| w.trim()).filter(|w| !w.is_empty()).map(regex::escape).collect();

    if escaped.is_empty() { None } else { Some(escaped.join("|")) }
}

/// Replace one match of `re` with a single space.
fn replace_phrase(re: &Regex, original: &str, offset: Option<usize>) -> String {
    let target = offset.and_then(|o| char_to_byte(original, o));

    let mut first = None;
    let mut at_offset = None;
    for caps in re.captures_iter(original) {
        let (Some(whole), Some(phrase)) = (caps.get(0), caps.name("phrase")) else {
            continue;
        };
        let span = whole.range();
        if first.is_none() {
            first = Some(span.clone());
        }
        if target.is_none() || target == Some(phrase.start()) {
            at_offset = Some(span);
            break;
        }
    }

    match at_offset.or(first) {
        Some(span) => format!("{} {}", &original[..span.start], &original[span.end..]),
        None => original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strip(original: &str, phrase: &str, offset: Option<usize>) -> String {
        ignored_text(original, phrase, offset, &Vocabulary::default())
    }

    #[test]
    fn ignored_text_examples() {
        // (original, phrase, offset, expected)
        let cases: Vec<(&str, &str, Option<usize>, &str)> = vec![
            ("Let's meet tomorrow at 3pm", "tomorrow at 3pm", Some(11), "Let's meet"),
            ("Lunch tomorrow at 3pm, with Sam", "tomorrow at 3pm", Some(6), "Lunch with Sam"),
            ("on the 5th of next month", "5th of next month", Some(7), ""),
            ("on the 5th of next month", "the 5th of next month", Some(3), ""),
            ("Let's meet on the 5th", "5th", Some(18), "Let's meet"),
            ("Meet ON THE Friday", "friday", None, "Meet"),
            ("Party in December!", "December", Some(9), "Party"),
            ("Begin friday", "friday", Some(6), "Begin"),
            ("meet in on friday", "friday", Some(11), "meet in"),
            ("see you friday in the morning", "friday", Some(8), "see you in the morning"),
            ("meet 10:30 a.m. today", "10:30 a.m.", Some(5), "meet today"),
            ("friday", "friday", Some(0), ""),
            ("  friday  ", "friday", Some(2), ""),
            ("no dates here", "friday", None, "no dates here"),
        ];

        for (original, phrase, offset, expected) in cases {
            assert_eq!(strip(original, phrase, offset), expected, "original {original:?} phrase {phrase:?}");
        }
    }

    #[test]
    fn offset_picks_the_occurrence() {
        assert_eq!(strip("friday or friday", "friday", Some(10)), "friday or");
        assert_eq!(strip("friday or friday", "friday", Some(0)), "or friday");
        assert_eq!(strip("friday or friday", "friday", None), "or friday");
        // An offset pointing nowhere useful falls back to the first match.
        assert_eq!(strip("friday or friday", "friday", Some(3)), "or friday");
    }

    #[test]
    fn vocabulary_is_configurable() {
        let by_only = Vocabulary { connectives: vec!["by".into()], articles: vec![] };
        assert_eq!(ignored_text("done by friday", "friday", None, &by_only), "done");
        assert_eq!(ignored_text("done by the friday", "friday", None, &by_only), "done by the");
        assert_eq!(ignored_text("meet on friday", "friday", None, &by_only), "meet on");

        let nothing = Vocabulary { connectives: vec![], articles: vec![" ".into()] };
        assert_eq!(ignored_text("meet on the friday", "friday", None, &nothing), "meet on the");
    }

    #[test]
    fn phrase_is_matched_literally() {
        assert_eq!(strip("tickets 3+4 (maybe) thanks", "3+4 (maybe)", None), "tickets thanks");
        assert_eq!(strip("price 3x4 maybe", "3+4", None), "price 3x4 maybe");
    }

    proptest! {
        #[test]
        fn removed_phrase_does_not_remain(
            before in proptest::collection::vec("[a-z]{1,6}", 0..5),
            after in proptest::collection::vec("[a-z]{1,6}", 0..5),
        ) {
            let phrase = "Next Friday 8pm";
            let prefix = before.join(" ");
            let original = format!("{prefix} {phrase}, {}", after.join(" "));
            let offset = prefix.chars().count() + 1;

            let rest = strip(&original, phrase, Some(offset));
            prop_assert!(!rest.to_lowercase().contains(&phrase.to_lowercase()));
            prop_assert_eq!(rest.trim(), rest.as_str());
        }

        #[test]
        fn text_without_the_phrase_is_only_trimmed(original in "[a-z ]{0,40}") {
            let rest = strip(&original, "8pm", None);
            prop_assert_eq!(rest, original.trim());
        }
    }
}
