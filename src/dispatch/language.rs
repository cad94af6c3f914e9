use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEVANAGARI_END, DEVANAGARI_START, HINDI_RATIO_THRESHOLD};

/// Response language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hi,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hi => "hi",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Script-ratio heuristic, not a language identifier: Hindi when the
/// Devanagari code points exceed 30% of the letters. Text with no letters
/// is English.
pub fn detect_language(text: &str) -> Language {
    let devanagari = text
        .chars()
        .filter(|c| (DEVANAGARI_START..=DEVANAGARI_END).contains(c))
        .count();
    let alphabetic = text.chars().filter(|&c| is_letter(c)).count();

    if alphabetic == 0 {
        return Language::En;
    }

    let ratio = devanagari as f64 / alphabetic as f64;
    if ratio > HINDI_RATIO_THRESHOLD {
        Language::Hi
    } else {
        Language::En
    }
}

/// Alphabetic, minus the Devanagari vowel signs and other dependent marks.
/// Those carry the Alphabetic property but are combining marks, not letters.
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !is_devanagari_mark(c)
}

fn is_devanagari_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{093C}'
            | '\u{093E}'..='\u{094F}'
            | '\u{0951}'..='\u{0957}'
            | '\u{0962}'..='\u{0963}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_hindi() {
        assert_eq!(detect_language("नमस्ते, कैसे हैं आप"), Language::Hi);
    }

    #[test]
    fn test_detects_english() {
        assert_eq!(detect_language("Hello, how are you"), Language::En);
    }

    #[test]
    fn test_empty_and_non_alphabetic_default_to_english() {
        assert_eq!(detect_language(""), Language::En);
        assert_eq!(detect_language("1234 !?"), Language::En);
    }

    #[test]
    fn test_mixed_text_uses_ratio() {
        // mostly Latin with one Hindi word stays English
        assert_eq!(
            detect_language("Please tell me the weather for tomorrow in Delhi, धन्यवाद"),
            Language::En
        );
        // Hinglish with a Devanagari majority is Hindi
        assert_eq!(detect_language("मुझे CAD model बनाना है"), Language::Hi);
    }

    #[test]
    fn test_vowel_signs_are_not_counted_as_letters() {
        // 2 Devanagari code points over 6 letters (the matra is a mark)
        assert_eq!(detect_language("abcde की"), Language::Hi);
        assert!(is_letter('क'));
        assert!(!is_letter('\u{0940}'));
        assert!(!is_letter('\u{0902}'));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Language::Hi.to_string(), "hi");
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }
}
