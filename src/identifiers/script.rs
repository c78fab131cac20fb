//! Character-script classification.
use std::fmt;
use std::hash::Hasher;
use std::ops::RangeInclusive;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use super::BoundedCache;

const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097F}';

const DEVANAGARI_THRESHOLD: f64 = 0.7;
const MIXED_DEVANAGARI_THRESHOLD: f64 = 0.3;
const LATIN_THRESHOLD: f64 = 0.9;
const LATIN_DOMINANT_THRESHOLD: f64 = 0.6;

lazy_static! {
    // letters only: vowel signs, virama and anusvara are marks
    static ref LETTERS: Regex = Regex::new(r"\p{L}+").unwrap();
}

/// Script composition category of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptClass {
    /// more than 70% of letters are Devanagari
    Devanagari,
    /// between 30% and 70% of letters are Devanagari (code-switched text)
    MixedDevanagari,
    /// more than 90% of letters are ASCII Latin
    Latin,
    /// more than 60% of letters are ASCII Latin
    LatinDominant,
    Mixed,
    /// no alphabetic character at all
    Unknown,
}

impl ScriptClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptClass::Devanagari => "devanagari",
            ScriptClass::MixedDevanagari => "mixed_devanagari",
            ScriptClass::Latin => "latin",
            ScriptClass::LatinDominant => "latin_dominant",
            ScriptClass::Mixed => "mixed",
            ScriptClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ScriptClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter (`\p{L}`) counts of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    pub alphabetic: usize,
    pub devanagari: usize,
    pub latin: usize,
}

impl ScriptCounts {
    /// Single pass over `text`.
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        let letters = LETTERS.find_iter(text).flat_map(|m| m.as_str().chars());
        for c in letters {
            counts.alphabetic += 1;
            if DEVANAGARI.contains(&c) {
                counts.devanagari += 1;
            } else if c.is_ascii() {
                counts.latin += 1;
            }
        }
        counts
    }

    pub fn devanagari_ratio(&self) -> f64 {
        ratio(self.devanagari, self.alphabetic)
    }

    pub fn latin_ratio(&self) -> f64 {
        ratio(self.latin, self.alphabetic)
    }

    pub fn classify(&self) -> ScriptClass {
        if self.alphabetic == 0 {
            return ScriptClass::Unknown;
        }

        let devanagari = self.devanagari_ratio();
        let latin = self.latin_ratio();
        if devanagari > DEVANAGARI_THRESHOLD {
            ScriptClass::Devanagari
        } else if devanagari > MIXED_DEVANAGARI_THRESHOLD {
            ScriptClass::MixedDevanagari
        } else if latin > LATIN_THRESHOLD {
            ScriptClass::Latin
        } else if latin > LATIN_DOMINANT_THRESHOLD {
            ScriptClass::LatinDominant
        } else {
            ScriptClass::Mixed
        }
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Classifies texts by looking at a bounded prefix of them.
///
/// Results are memoized by a hash of the sampled prefix.
pub struct ScriptDetector {
    sample_chars: usize,
    cache: BoundedCache<u64, ScriptClass>,
}

impl ScriptDetector {
    pub fn new(sample_chars: usize, cache_capacity: usize) -> Self {
        Self {
            sample_chars,
            cache: BoundedCache::with_capacity(cache_capacity),
        }
    }

    /// First `sample_chars` characters of `text`.
    fn sample<'t>(&self, text: &'t str) -> &'t str {
        match text.char_indices().nth(self.sample_chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    fn key(sample: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(sample.as_bytes());
        hasher.finish()
    }

    pub fn detect(&mut self, text: &str) -> ScriptClass {
        let sample = self.sample(text);
        let key = Self::key(sample);

        if let Some(class) = self.cache.get(&key) {
            return class;
        }

        let class = ScriptCounts::of(sample).classify();
        self.cache.insert(key, class);
        class
    }

    pub fn cache(&self) -> &BoundedCache<u64, ScriptClass> {
        &self.cache
    }

    pub fn log_cache_usage(&self) {
        debug!(
            "script cache: {}/{} entries, {} hits, {} misses",
            self.cache.len(),
            self.cache.capacity(),
            self.cache.hits(),
            self.cache.misses()
        );
    }
}

impl Default for ScriptDetector {
    /// 500 characters sampled, up to 10 000 cached results.
    fn default() -> Self {
        Self::new(500, 10_000)
    }
}
