//! Document normalization.
//!
//! Cleaning removes every character that is not expected in the script family of the target language,
//! collapses whitespace runs into single spaces and rejects what is left if it is too short.
//!
//! Example (Hindi):
//! ```text
//! यह   एक ★ वाक्य है।
//! दूसरी   पंक्ति ✓
//! ```
//!
//! will be transformed into
//!
//! ```text
//! यह एक वाक्य है। दूसरी पंक्ति
//! ```
use lazy_static::lazy_static;
use regex::Regex;

use crate::filtering::{Filter, Length, WordCount};
use crate::lang::{Language, ScriptFamily};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref LATIN_DISALLOWED: Regex = Regex::new(r#"[^\w\s.,!?;:\-'"()&@#%]+"#).unwrap();
    static ref DEVANAGARI_DISALLOWED: Regex =
        Regex::new(r#"[^\x{0900}-\x{097F}\w\s.,!?;:\-'"()।॥]+"#).unwrap();
}

pub struct TextCleaner {
    disallowed: &'static Regex,
    length: Length,
    words: WordCount,
}

impl TextCleaner {
    pub fn new(language: Language, min_chars: usize, min_words: usize) -> Self {
        let disallowed: &'static Regex = match language.script_family() {
            ScriptFamily::Latin => &*LATIN_DISALLOWED,
            ScriptFamily::Devanagari => &*DEVANAGARI_DISALLOWED,
        };
        Self {
            disallowed,
            length: Length::with_min_size(min_chars),
            words: WordCount::with_min_words(min_words),
        }
    }

    /// Cleaner with default thresholds (10 chars, 3 words).
    pub fn for_language(language: Language) -> Self {
        Self::new(
            language,
            *Length::default().min_size(),
            *WordCount::default().min_words(),
        )
    }

    /// Returns the normalized text, or `None` if the document is too short
    /// (before or after cleaning).
    pub fn clean(&self, raw: &str) -> Option<String> {
        if !self.length.detect(raw) {
            return None;
        }

        let stripped = self.disallowed.replace_all(raw, "");
        let collapsed = WHITESPACE.replace_all(&stripped, " ");
        let cleaned = collapsed.trim();

        if self.length.detect(cleaned) && self.words.detect(cleaned) {
            Some(cleaned.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        let c = TextCleaner::for_language(Language::English);
        assert_eq!(
            c.clean("  This   is\n\nsome\ttext  ").as_deref(),
            Some("This is some text")
        );
    }

    #[test]
    fn strips_symbols() {
        let c = TextCleaner::for_language(Language::English);
        assert_eq!(
            c.clean("Hello ★ world, this is (fine) & 100% ok!").as_deref(),
            Some("Hello world, this is (fine) & 100% ok!")
        );
    }

    #[test]
    fn keeps_devanagari_punctuation() {
        let c = TextCleaner::for_language(Language::Hindi);
        assert_eq!(
            c.clean("यह   एक ★ वाक्य है।\nदूसरी   पंक्ति ✓").as_deref(),
            Some("यह एक वाक्य है। दूसरी पंक्ति")
        );
    }

    #[test]
    fn devanagari_marks_survive() {
        let c = TextCleaner::for_language(Language::Sanskrit);
        let text = "धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः॥";
        assert_eq!(c.clean(text).as_deref(), Some(text));
    }

    #[test]
    fn rejects_short() {
        let c = TextCleaner::for_language(Language::English);
        // too few chars
        assert_eq!(c.clean("a b c"), None);
        // too few words
        assert_eq!(c.clean("supercalifragilistic word"), None);
        // long enough only because of stripped characters
        assert_eq!(c.clean("★★★★★★★★ a b"), None);
    }

    #[test]
    fn idempotent() {
        let samples = [
            "  This   is ★ English\ttext, with (some) symbols™ and   spaces ",
            "अमेरिकी   राष्ट्रपति चुनाव (US Presidential Election) ✓",
            "tabs\tand\nnewlines\r\nand\u{a0}nbsp and ★ stars ★ between ★ words",
            "ॐ भूर्भुवः स्वः ।\n तत्सवितुर्वरेण्यं ॥",
        ];
        for lang in Language::ALL {
            let c = TextCleaner::for_language(lang);
            for sample in samples {
                if let Some(once) = c.clean(sample) {
                    assert_eq!(c.clean(&once).as_deref(), Some(once.as_str()), "{lang}");
                }
            }
        }
    }
}
