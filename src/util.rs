//! Text and time helpers shared across the pipeline.

use std::time::{SystemTime, UNIX_EPOCH};

/// Escape XML/XHTML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Whether every alphabetic character in `text` is uppercase.
///
/// Returns `false` when there are no alphabetic characters at all, and for
/// scripts without case distinction (alphabetic but never uppercase).
pub(crate) fn is_all_caps(text: &str) -> bool {
    let mut has_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            has_alpha = true;
            if !ch.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// Words kept lowercase by [`title_case`] unless they start the string.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "so", "the", "to",
    "up", "yet",
];

/// Convert a string to title case, keeping minor words lowercase.
pub(crate) fn title_case(text: &str) -> String {
    let words: Vec<String> = text
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i != 0 && MINOR_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect();
    words.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a packed `0xRRGGBB` integer as a `#RRGGBB` CSS color.
pub(crate) fn hex_color(value: u32) -> String {
    format!("#{value:06X}")
}

/// Format a pixel dimension without a trailing `.0` for whole values.
pub(crate) fn fmt_px(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Current UTC date as `YYYY-MM-DD`.
pub(crate) fn current_date() -> String {
    let (y, mo, d, _, _, _) = utc_now();
    format!("{y:04}-{mo:02}-{d:02}")
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ` (for `dcterms:modified`).
pub(crate) fn current_timestamp() -> String {
    let (y, mo, d, h, mi, s) = utc_now();
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z")
}

fn utc_now() -> (i64, u32, u32, u32, u32, u32) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let days = secs.div_euclid(86_400);
    let rem = secs.rem_euclid(86_400);
    let (y, mo, d) = civil_from_days(days);
    (
        y,
        mo,
        d,
        (rem / 3600) as u32,
        ((rem % 3600) / 60) as u32,
        (rem % 60) as u32,
    )
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("HELLO WORLD"));
        assert!(is_all_caps("A"));
        assert!(is_all_caps("ABC-123!"));
        assert!(!is_all_caps("Hello"));
        assert!(!is_all_caps("HELLo"));
        assert!(!is_all_caps(""));
        assert!(!is_all_caps("123 !?"));
        // Uncased scripts never classify as all caps
        assert!(!is_all_caps("漢字"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("HELLO WORLD"), "Hello World");
        assert_eq!(title_case("THE LORD OF THE RINGS"), "The Lord of the Rings");
        assert_eq!(title_case("a tale"), "A Tale");
        // "as" is not a minor word
        assert_eq!(title_case("QUIET AS STONE"), "Quiet As Stone");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xFF0000), "#FF0000");
        assert_eq!(hex_color(0x00FF00), "#00FF00");
        assert_eq!(hex_color(0x00000F), "#00000F");
        assert_eq!(hex_color(1), "#000001");
    }

    #[test]
    fn test_fmt_px() {
        assert_eq!(fmt_px(612.0), "612");
        assert_eq!(fmt_px(612.5), "612.5");
    }

    #[test]
    fn test_civil_from_days() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
        // Leap day
        assert_eq!(civil_from_days(19_782), (2024, 2, 29));
    }

    proptest! {
        #[test]
        fn no_letters_never_all_caps(s in "[0-9 ,.!?]*") {
            prop_assert!(!is_all_caps(&s));
        }

        #[test]
        fn uppercase_strings_classify(s in "[A-Z]{1,12}( [A-Z0-9]{1,12}){0,3}") {
            prop_assert!(is_all_caps(&s));
        }

        #[test]
        fn one_lowercase_letter_defeats(a in "[A-Z]{0,6}", b in "[a-z]", c in "[A-Z]{0,6}") {
            let s = format!("{a}{b}{c}");
            prop_assert!(!is_all_caps(&s));
        }

        #[test]
        fn hex_color_roundtrips(v in 1u32..=0x00FF_FFFF) {
            let c = hex_color(v);
            prop_assert_eq!(c.len(), 7);
            prop_assert!(c.starts_with('#'));
            prop_assert_eq!(u32::from_str_radix(&c[1..], 16).unwrap(), v);
        }
    }
}
