//! Pipelines.
//!
//! [Collector] builds token-budgeted corpora, [Explorer] samples sources.
//! Both implement the light [pipeline::Pipeline] trait.
pub mod collector;
pub mod document;
pub mod explore;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod stats;

pub use collector::{AuthPolicy, Collector};
pub use document::{Document, DocumentFilter, RunContext, Verdict};
pub use explore::{Explorer, SourceSample};
pub use pipeline::Pipeline;
pub use stats::{
    CollectionReport, CollectionResult, CollectionStatus, CorpusAccumulator, LanguageCorpus,
    LanguageStats, RejectReason, RejectionCounts, SourceOutcome, SourceStats,
};
