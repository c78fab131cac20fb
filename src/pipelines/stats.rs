//! Collection statistics and accumulators.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lang::Language;

/// Why a document was not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// script composition not accepted by the target language
    LanguageMismatch,
    /// too few characters, words or estimated tokens
    TooShort,
    Duplicate,
    /// record without a usable text field
    Malformed,
}

impl RejectReason {
    pub const ALL: [RejectReason; 4] = [
        RejectReason::LanguageMismatch,
        RejectReason::TooShort,
        RejectReason::Duplicate,
        RejectReason::Malformed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::LanguageMismatch => "language_mismatch",
            RejectReason::TooShort => "too_short",
            RejectReason::Duplicate => "duplicate",
            RejectReason::Malformed => "malformed",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected documents, by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub language_mismatch: u64,
    pub too_short: u64,
    pub duplicate: u64,
    pub malformed: u64,
}

impl RejectionCounts {
    fn slot(&mut self, reason: RejectReason) -> &mut u64 {
        match reason {
            RejectReason::LanguageMismatch => &mut self.language_mismatch,
            RejectReason::TooShort => &mut self.too_short,
            RejectReason::Duplicate => &mut self.duplicate,
            RejectReason::Malformed => &mut self.malformed,
        }
    }

    pub fn increment(&mut self, reason: RejectReason) {
        *self.slot(reason) += 1;
    }

    pub fn get(&self, reason: RejectReason) -> u64 {
        match reason {
            RejectReason::LanguageMismatch => self.language_mismatch,
            RejectReason::TooShort => self.too_short,
            RejectReason::Duplicate => self.duplicate,
            RejectReason::Malformed => self.malformed,
        }
    }

    pub fn total(&self) -> u64 {
        self.language_mismatch + self.too_short + self.duplicate + self.malformed
    }

    pub fn merge(&mut self, other: &RejectionCounts) {
        for reason in RejectReason::ALL {
            *self.slot(reason) += other.get(reason);
        }
    }
}

/// Per-language collection state.
///
/// ```text
/// COLLECTING -> BUDGET_MET
///            -> SOURCES_EXHAUSTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Collecting,
    BudgetMet,
    SourcesExhausted,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollectionStatus::Collecting => "COLLECTING",
            CollectionStatus::BudgetMet => "BUDGET_MET",
            CollectionStatus::SourcesExhausted => "SOURCES_EXHAUSTED",
        };
        f.write_str(s)
    }
}

/// How pulling from a source ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    /// every record was pulled
    Exhausted,
    /// the language budget was reached while pulling
    BudgetMet,
    /// the source could not be opened
    Unavailable,
    /// the stream broke and was abandoned
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub source: String,
    pub outcome: SourceOutcome,
    pub records: u64,
    pub accepted: u64,
    pub estimated_tokens: u64,
    pub rejected: RejectionCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceStats {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: SourceOutcome::Exhausted,
            records: 0,
            accepted: 0,
            estimated_tokens: 0,
            rejected: RejectionCounts::default(),
            error: None,
        }
    }

    pub fn failed(source: impl Into<String>, outcome: SourceOutcome, error: String) -> Self {
        let mut stats = Self::new(source);
        stats.outcome = outcome;
        stats.error = Some(error);
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language: Language,
    pub status: CollectionStatus,
    pub documents_accepted: u64,
    pub rejected: RejectionCounts,
    pub estimated_tokens: u64,
    pub budget: u64,
    /// `false` if `budget` is only advisory
    pub enforces_budget: bool,
    /// tokens missing to reach the budget
    pub shortfall: u64,
    pub sources: Vec<SourceStats>,
}

impl LanguageStats {
    pub fn new(language: Language, budget: u64) -> Self {
        Self {
            language,
            status: CollectionStatus::Collecting,
            documents_accepted: 0,
            rejected: RejectionCounts::default(),
            estimated_tokens: 0,
            budget,
            enforces_budget: language.enforces_budget(),
            shortfall: budget,
            sources: Vec::new(),
        }
    }

    /// Fold the statistics of a finished source.
    pub fn add_source(&mut self, source: SourceStats) {
        self.documents_accepted += source.accepted;
        self.estimated_tokens += source.estimated_tokens;
        self.rejected.merge(&source.rejected);
        self.shortfall = self.budget.saturating_sub(self.estimated_tokens);
        self.sources.push(source);
    }

    pub fn budget_met(&self) -> bool {
        self.estimated_tokens >= self.budget
    }

    /// Collected fraction of the budget.
    pub fn completion(&self) -> f64 {
        if self.budget == 0 {
            1.0
        } else {
            self.estimated_tokens as f64 / self.budget as f64
        }
    }
}

/// Accepted texts of a language, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusAccumulator {
    texts: Vec<String>,
    tokens: u64,
}

impl CorpusAccumulator {
    pub fn push(&mut self, text: String, tokens: u64) {
        self.texts.push(text);
        self.tokens += tokens;
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Collected texts and statistics of a language.
#[derive(Debug, Clone)]
pub struct LanguageCorpus {
    pub stats: LanguageStats,
    pub corpus: CorpusAccumulator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub target_tokens: u64,
    pub total_tokens: u64,
    /// actual share of the collected tokens, per language
    pub shares: BTreeMap<Language, f64>,
    pub languages: Vec<LanguageStats>,
}

impl CollectionReport {
    pub fn new(target_tokens: u64, languages: Vec<LanguageStats>) -> Self {
        let total_tokens = languages.iter().map(|l| l.estimated_tokens).sum();
        let shares = languages
            .iter()
            .map(|l| {
                let share = if total_tokens == 0 {
                    0.0
                } else {
                    l.estimated_tokens as f64 / total_tokens as f64
                };
                (l.language, share)
            })
            .collect();

        Self {
            target_tokens,
            total_tokens,
            shares,
            languages,
        }
    }

    pub fn language(&self, language: Language) -> Option<&LanguageStats> {
        self.languages.iter().find(|l| l.language == language)
    }
}

/// Output of a collection run.
#[derive(Debug, Clone)]
pub struct CollectionResult {
    pub report: CollectionReport,
    pub corpora: Vec<LanguageCorpus>,
}
