//! Approximate token counting.
//!
//! Running a subword tokenizer on every document is too slow for collection,
//! so token counts are estimated from whitespace-delimited word counts and
//! a per-language expansion ratio (see [Language::token_multiplier]).
//! Expect a few percents of error compared to a real tokenizer.
use crate::lang::Language;

#[derive(Debug, Default, Clone, Copy)]
pub struct TokenEstimator;

impl TokenEstimator {
    pub fn estimate(&self, text: &str, language: Language) -> u64 {
        Self::from_word_count(text.split_whitespace().count(), language)
    }

    pub fn from_word_count(words: usize, language: Language) -> u64 {
        (words as f64 * language.token_multiplier()).floor() as u64
    }
}
