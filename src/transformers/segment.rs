//! Sentence segmentation.
//!
//! Splits a document after runs of sentence terminators (`. ! ?`, plus the danda `।` and double danda `॥`
//! for Devanagari languages) and drops sentences that have too few words.
use lazy_static::lazy_static;
use regex::Regex;

use crate::filtering::{Filter, WordCount};
use crate::lang::{Language, ScriptFamily};

lazy_static! {
    static ref LATIN_SENTENCE_END: Regex = Regex::new(r"[.!?]+(\s+|$)").unwrap();
    static ref DEVANAGARI_SENTENCE_END: Regex = Regex::new(r"[।॥.!?]+(\s+|$)").unwrap();
}

pub struct SentenceSegmenter {
    sentence_end: &'static Regex,
    words: WordCount,
}

impl SentenceSegmenter {
    pub fn new(language: Language, min_words: usize) -> Self {
        let sentence_end: &'static Regex = match language.script_family() {
            ScriptFamily::Latin => &*LATIN_SENTENCE_END,
            ScriptFamily::Devanagari => &*DEVANAGARI_SENTENCE_END,
        };
        Self {
            sentence_end,
            words: WordCount::with_min_words(min_words),
        }
    }

    /// Segmenter keeping sentences of at least 3 words.
    pub fn for_language(language: Language) -> Self {
        Self::new(language, *WordCount::default().min_words())
    }

    pub fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for end in self.sentence_end.find_iter(text) {
            sentences.push(&text[start..end.end()]);
            start = end.end();
        }
        sentences.push(&text[start..]);

        sentences
            .into_iter()
            .map(str::trim)
            .filter(|sentence| self.words.detect(sentence))
            .collect()
    }
}
