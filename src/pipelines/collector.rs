//! Token-budgeted corpus collection.
//!
//! Languages are collected one after the other. For each language, sources are pulled
//! in priority order, and every record goes through a [DocumentFilter].
//!
//! # Budgets
//!
//! Languages that enforce their budget stop pulling as soon as the collected estimated tokens
//! reach it (the document that crosses the budget is kept). Others (Sanskrit) collect everything
//! their sources have, and report the collected amount against the budget.
//!
//! A language that runs out of sources before meeting its budget ends with a shortfall,
//! which is reported but never compensated by other languages.
//!
//! # Failures
//!
//! A source that can't be opened is skipped, and a source whose stream breaks is abandoned
//! (what has been accepted from it is kept). Authentication failures are either handled the
//! same way or abort the run, depending on the [AuthPolicy].
use log::{debug, info, warn};

use crate::config::{CollectionConfig, DatasetSource, FilterSettings, LanguageTarget};
use crate::error::Error;
use crate::sources::{RecordStream, SourceClient};

use super::document::{Document, DocumentFilter, RunContext, Verdict};
use super::stats::{
    CollectionReport, CollectionResult, CollectionStatus, CorpusAccumulator, LanguageCorpus,
    LanguageStats, RejectReason, SourceOutcome, SourceStats,
};
use super::Pipeline;

/// What to do when a source requires (valid) credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// skip the source, like any unavailable one
    #[default]
    Skip,
    /// stop the whole run
    Abort,
}

pub struct Collector<C> {
    client: C,
    target_tokens: u64,
    targets: Vec<LanguageTarget>,
    settings: FilterSettings,
    auth_policy: AuthPolicy,
}

impl<C: SourceClient> Collector<C> {
    pub fn new(
        client: C,
        target_tokens: u64,
        targets: Vec<LanguageTarget>,
        settings: FilterSettings,
    ) -> Self {
        Self {
            client,
            target_tokens,
            targets,
            settings,
            auth_policy: AuthPolicy::default(),
        }
    }

    pub fn from_config(client: C, config: &CollectionConfig) -> Result<Self, Error> {
        Ok(Self::new(
            client,
            config.target_tokens,
            config.targets()?,
            config.filters.clone(),
        ))
    }

    pub fn with_auth_policy(mut self, auth_policy: AuthPolicy) -> Self {
        self.auth_policy = auth_policy;
        self
    }

    pub fn targets(&self) -> &[LanguageTarget] {
        &self.targets
    }

    /// Fails with `error` if it has to stop the run, gives it back otherwise.
    fn fatal(&self, error: Error) -> Result<Error, Error> {
        match (self.auth_policy, error) {
            (AuthPolicy::Abort, e @ Error::AuthenticationRequired(_)) => Err(e),
            (_, e) => Ok(e),
        }
    }

    fn collect_language(
        &self,
        ctx: &mut RunContext,
        target: &LanguageTarget,
    ) -> Result<LanguageCorpus, Error> {
        let language = target.language;
        info!(
            "[{}] collecting {} estimated tokens from {} sources{}",
            language,
            target.budget,
            target.sources.len(),
            if language.enforces_budget() {
                ""
            } else {
                " (advisory budget)"
            }
        );

        let filter = DocumentFilter::new(language, &self.settings);
        let mut stats = LanguageStats::new(language, target.budget);
        let mut corpus = CorpusAccumulator::default();

        for source in &target.sources {
            if language.enforces_budget() && corpus.tokens() >= target.budget {
                debug!("[{}] budget met, not opening {}", language, source);
                break;
            }

            info!("[{}] opening {}", language, source);
            let source_stats = match self.client.open(source) {
                Ok(stream) => self.pull(ctx, &filter, target, source, stream, &mut corpus)?,
                Err(e) => {
                    let e = self.fatal(e)?;
                    warn!("[{}] skipping {}: {}", language, source, e);
                    SourceStats::failed(source.id(), SourceOutcome::Unavailable, e.to_string())
                }
            };

            info!(
                "[{}] {}: {} records, {} accepted, {} tokens ({:?})",
                language,
                source,
                source_stats.records,
                source_stats.accepted,
                source_stats.estimated_tokens,
                source_stats.outcome
            );
            stats.add_source(source_stats);
        }

        stats.status = if language.enforces_budget() && stats.budget_met() {
            CollectionStatus::BudgetMet
        } else {
            CollectionStatus::SourcesExhausted
        };

        if stats.shortfall > 0 {
            warn!(
                "[{}] {}: {}/{} tokens ({:.1}%)",
                language,
                stats.status,
                stats.estimated_tokens,
                stats.budget,
                stats.completion() * 100.0
            );
        } else {
            info!(
                "[{}] {}: {}/{} tokens",
                language, stats.status, stats.estimated_tokens, stats.budget
            );
        }

        Ok(LanguageCorpus { stats, corpus })
    }

    /// Pull records from an opened source until it is exhausted, breaks,
    /// or the language budget is met.
    fn pull(
        &self,
        ctx: &mut RunContext,
        filter: &DocumentFilter,
        target: &LanguageTarget,
        source: &DatasetSource,
        stream: RecordStream,
        corpus: &mut CorpusAccumulator,
    ) -> Result<SourceStats, Error> {
        let language = target.language;
        let source_id = source.id();
        let mut stats = SourceStats::new(source_id.clone());

        for record in stream {
            let record = match record {
                Ok(record) => record,
                Err(Error::MalformedRecord(reason)) => {
                    debug!("[{}] {}: {}", language, source, reason);
                    stats.records += 1;
                    stats.rejected.increment(RejectReason::Malformed);
                    continue;
                }
                Err(e) => {
                    let e = self.fatal(e)?;
                    warn!(
                        "[{}] {} interrupted after {} records: {}",
                        language, source, stats.records, e
                    );
                    stats.outcome = SourceOutcome::Interrupted;
                    stats.error = Some(e.to_string());
                    return Ok(stats);
                }
            };
            stats.records += 1;

            let text = match record.text(&source.text_field) {
                Ok(text) => text,
                Err(e) => {
                    debug!("[{}] {}: {}", language, source, e);
                    stats.rejected.increment(RejectReason::Malformed);
                    continue;
                }
            };

            let document = Document::new(text.to_string(), source_id.clone());
            match filter.examine(ctx, &document) {
                Verdict::Accepted { text, tokens } => {
                    corpus.push(text, tokens);
                    stats.accepted += 1;
                    stats.estimated_tokens += tokens;

                    if language.enforces_budget() && corpus.tokens() >= target.budget {
                        info!("[{}] budget of {} tokens met", language, target.budget);
                        stats.outcome = SourceOutcome::BudgetMet;
                        return Ok(stats);
                    }
                }
                Verdict::Rejected(reason) => stats.rejected.increment(reason),
            }

            if stats.records % 10_000 == 0 {
                debug!(
                    "[{}] {}: {} records, {} accepted, {} tokens collected",
                    language,
                    source,
                    stats.records,
                    stats.accepted,
                    corpus.tokens()
                );
            }
        }

        Ok(stats)
    }
}

impl<C: SourceClient> Pipeline<CollectionResult> for Collector<C> {
    fn run(&self) -> Result<CollectionResult, Error> {
        let mut ctx = RunContext::new(&self.settings);
        let mut corpora = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            corpora.push(self.collect_language(&mut ctx, target)?);
        }

        ctx.detector().log_cache_usage();
        debug!("{} distinct documents seen", ctx.seen().len());

        let report = CollectionReport::new(
            self.target_tokens,
            corpora.iter().map(|c| c.stats.clone()).collect(),
        );
        info!(
            "collected {} estimated tokens (target: {})",
            report.total_tokens, report.target_tokens
        );

        Ok(CollectionResult { report, corpora })
    }
}
