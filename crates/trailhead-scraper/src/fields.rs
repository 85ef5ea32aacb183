//! Field extractors: pure pattern matchers that pull one typed detail out
//! of arbitrary page text.
//!
//! Each extractor returns the first matching substring with its original
//! casing and spacing, or `None`. No match is a normal outcome, not a
//! failure.

use regex::Regex;

/// Difficulty vocabulary in priority order. The order is load-bearing: a
/// page mentioning both "easy" and "strenuous" is classified by the first
/// vocabulary entry found, not by text position.
const DIFFICULTY_LEVELS: &[&str] = &[
    "easy",
    "moderate",
    "strenuous",
    "difficult",
    "hard",
    "challenging",
];

/// Trail-type vocabulary in priority order.
const TRAIL_TYPES: &[&str] = &[
    "loop",
    "out-and-back",
    "out and back",
    "point-to-point",
    "lollipop",
];

/// Extract a distance such as `"3.5 mile"`, `"12 km"`, or `"1/2 mile"`.
#[must_use]
pub fn extract_distance(text: &str) -> Option<String> {
    let patterns = [
        r"(?i)\d+\.?\d*\s*(?:miles?|mi\.?)",
        r"(?i)\d+\.?\d*\s*(?:kilometers?|km)",
        r"(?i)\d+/\d+\s*(?:miles?|mi\.?)",
    ];
    first_match(text, &patterns)
}

/// Extract a duration such as `"2-3 hours"` or `"45 minutes"`.
#[must_use]
pub fn extract_duration(text: &str) -> Option<String> {
    let patterns = [
        r"(?i)\d+\.?\d*\s*-?\s*\d*\.?\d*\s*(?:hours?|hrs?)",
        r"(?i)\d+\s*(?:minutes?|mins?)",
    ];
    first_match(text, &patterns)
}

/// Extract a difficulty level as a capitalized word (`"Easy"`, `"Strenuous"`).
#[must_use]
pub fn extract_difficulty(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    DIFFICULTY_LEVELS
        .iter()
        .find(|level| lower.contains(*level))
        .map(|level| capitalize(level))
}

/// Extract an elevation gain such as `"1,200 feet elevation"` or
/// `"gain: 500 ft"`.
#[must_use]
pub fn extract_elevation(text: &str) -> Option<String> {
    let patterns = [
        r"(?i)\d+,?\d*\s*(?:feet|ft\.?)\s*(?:elevation|gain)",
        r"(?i)(?:elevation|gain):\s*\d+,?\d*\s*(?:feet|ft\.?)",
    ];
    first_match(text, &patterns)
}

/// Extract a trail type as a title-cased phrase (`"Loop"`, `"Out-And-Back"`).
#[must_use]
pub fn extract_trail_type(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    TRAIL_TYPES
        .iter()
        .find(|trail_type| lower.contains(*trail_type))
        .map(|trail_type| title_case(trail_type))
}

/// Return the whole text of the first pattern that matches anywhere.
/// Pattern order is the tie-break: a later pattern is only consulted when
/// every earlier one missed.
fn first_match(text: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(m) = re.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

/// Uppercase the first character, leaving the rest unchanged.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first letter of every word, where a word starts after any
/// non-alphabetic character (`"out-and-back"` → `"Out-And-Back"`).
fn title_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut at_word_start = true;
    for ch in phrase.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matches_decimal_miles() {
        assert_eq!(
            extract_distance("A 3.5 mile round trip").as_deref(),
            Some("3.5 mile")
        );
    }

    #[test]
    fn distance_matches_kilometers() {
        assert_eq!(extract_distance("about 12 km total").as_deref(), Some("12 km"));
    }

    #[test]
    fn distance_matches_abbreviated_miles() {
        assert_eq!(extract_distance("Length: 4 mi.").as_deref(), Some("4 mi."));
    }

    #[test]
    fn distance_absent_when_no_number_unit_pair() {
        assert_eq!(extract_distance("no distance info"), None);
    }

    #[test]
    fn duration_matches_hour_range() {
        assert_eq!(
            extract_duration("plan for 2-3 hours on the rim").as_deref(),
            Some("2-3 hours")
        );
    }

    #[test]
    fn duration_matches_minutes() {
        assert_eq!(
            extract_duration("an easy 45 minutes stroll").as_deref(),
            Some("45 minutes")
        );
    }

    #[test]
    fn difficulty_prefers_vocabulary_order_over_text_position() {
        // "strenuous" appears first in the text, but "easy" is earlier in
        // the vocabulary and must win.
        assert_eq!(
            extract_difficulty("A strenuous climb with an easy return").as_deref(),
            Some("Easy")
        );
    }

    #[test]
    fn difficulty_is_capitalized() {
        assert_eq!(
            extract_difficulty("rated STRENUOUS by rangers").as_deref(),
            Some("Strenuous")
        );
    }

    #[test]
    fn difficulty_absent_when_vocabulary_missing() {
        assert_eq!(extract_difficulty("a pleasant stroll"), None);
    }

    #[test]
    fn elevation_matches_feet_before_gain() {
        assert_eq!(
            extract_elevation("climbs 1,200 feet elevation overall").as_deref(),
            Some("1,200 feet elevation")
        );
    }

    #[test]
    fn elevation_matches_labelled_form() {
        assert_eq!(
            extract_elevation("Elevation: 500 ft on switchbacks").as_deref(),
            Some("Elevation: 500 ft")
        );
    }

    #[test]
    fn elevation_absent_without_label() {
        // A bare feet value with no elevation/gain context is not enough.
        assert_eq!(extract_elevation("the canyon is 800 feet wide"), None);
    }

    #[test]
    fn trail_type_title_cases_hyphenated_phrase() {
        assert_eq!(
            extract_trail_type("an out-and-back route to the falls").as_deref(),
            Some("Out-And-Back")
        );
    }

    #[test]
    fn trail_type_prefers_loop_over_later_vocabulary() {
        assert_eq!(
            extract_trail_type("a lollipop loop via the spur").as_deref(),
            Some("Loop")
        );
    }

    #[test]
    fn extractors_are_deterministic() {
        let text = "Moderate 5.2 miles loop, 3 hours, gain: 900 feet";
        for _ in 0..3 {
            assert_eq!(extract_distance(text).as_deref(), Some("5.2 miles"));
            assert_eq!(extract_duration(text).as_deref(), Some("3 hours"));
            assert_eq!(extract_difficulty(text).as_deref(), Some("Moderate"));
            assert_eq!(extract_elevation(text).as_deref(), Some("gain: 900 feet"));
            assert_eq!(extract_trail_type(text).as_deref(), Some("Loop"));
        }
    }
}
