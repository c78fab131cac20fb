//! Per-document filtering.
//!
//! Each streamed document goes through, in order:
//! 1. script detection and language acceptance,
//! 2. cleaning (which may reject it as too short),
//! 3. duplicate detection on the cleaned text,
//! 4. token estimation (rejecting documents under the minimum token count).
//!
//! Stateful parts (detector cache, seen fingerprints) live in a [RunContext] that is created
//! for each run and shared by all the languages of that run.
use log::debug;

use crate::config::FilterSettings;
use crate::estimate::TokenEstimator;
use crate::filtering::{FilterMut, SeenHashes};
use crate::identifiers::ScriptDetector;
use crate::lang::Language;
use crate::transformers::TextCleaner;

use super::stats::RejectReason;

/// A streamed text, along with the source it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    source: String,
}

impl Document {
    pub fn new(text: String, source: String) -> Self {
        Self { text, source }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { text: String, tokens: u64 },
    Rejected(RejectReason),
}

/// Mutable filtering state of a run.
pub struct RunContext {
    detector: ScriptDetector,
    seen: SeenHashes,
}

impl RunContext {
    pub fn new(settings: &FilterSettings) -> Self {
        Self {
            detector: ScriptDetector::new(
                settings.detection_sample_chars,
                settings.detector_cache_capacity,
            ),
            seen: SeenHashes::new(
                settings.fingerprint_full_threshold,
                settings.fingerprint_sample_chars,
            ),
        }
    }

    pub fn detector(&self) -> &ScriptDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut ScriptDetector {
        &mut self.detector
    }

    pub fn seen(&self) -> &SeenHashes {
        &self.seen
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(&FilterSettings::default())
    }
}

/// Stateless filtering settings of a language.
pub struct DocumentFilter {
    language: Language,
    cleaner: TextCleaner,
    estimator: TokenEstimator,
    min_tokens: u64,
}

impl DocumentFilter {
    pub fn new(language: Language, settings: &FilterSettings) -> Self {
        Self {
            language,
            cleaner: TextCleaner::new(language, settings.min_chars, settings.min_words),
            estimator: TokenEstimator,
            min_tokens: settings.min_tokens,
        }
    }

    pub fn examine(&self, ctx: &mut RunContext, document: &Document) -> Verdict {
        let class = ctx.detector.detect(document.text());
        if !self.language.accepts(class) {
            debug!(
                "[{}] {}: rejected script {}",
                self.language,
                document.source(),
                class
            );
            return Verdict::Rejected(RejectReason::LanguageMismatch);
        }

        let cleaned = match self.cleaner.clean(document.text()) {
            Some(cleaned) => cleaned,
            None => return Verdict::Rejected(RejectReason::TooShort),
        };

        if !ctx.seen.detect_mut(cleaned.as_str()) {
            return Verdict::Rejected(RejectReason::Duplicate);
        }

        let tokens = self.estimator.estimate(&cleaned, self.language);
        if tokens < self.min_tokens {
            return Verdict::Rejected(RejectReason::TooShort);
        }

        Verdict::Accepted {
            text: cleaned,
            tokens,
        }
    }
}
