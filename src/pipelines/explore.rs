//! Source exploration.
//!
//! Samples the first records of every configured source and reports what they look like,
//! which helps picking sources and thresholds before a long collection run.
use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{CollectionConfig, DatasetSource, FilterSettings, LanguageTarget};
use crate::error::Error;
use crate::estimate::TokenEstimator;
use crate::identifiers::ScriptClass;
use crate::lang::Language;
use crate::sources::SourceClient;

use super::document::RunContext;
use super::Pipeline;

pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Summary of a sampled source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSample {
    pub language: Language,
    pub source: String,
    pub records: u64,
    pub malformed: u64,
    pub avg_chars: f64,
    pub avg_tokens: f64,
    pub scripts: BTreeMap<ScriptClass, u64>,
    /// share of well-formed records whose script is accepted by the language
    pub accepted_share: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceSample {
    fn new(language: Language, source: &DatasetSource) -> Self {
        Self {
            language,
            source: source.id(),
            records: 0,
            malformed: 0,
            avg_chars: 0.0,
            avg_tokens: 0.0,
            scripts: BTreeMap::new(),
            accepted_share: 0.0,
            error: None,
        }
    }
}

pub struct Explorer<C> {
    client: C,
    targets: Vec<LanguageTarget>,
    settings: FilterSettings,
    sample_size: usize,
}

impl<C: SourceClient> Explorer<C> {
    pub fn new(client: C, targets: Vec<LanguageTarget>, settings: FilterSettings) -> Self {
        Self {
            client,
            targets,
            settings,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn from_config(client: C, config: &CollectionConfig) -> Result<Self, Error> {
        Ok(Self::new(client, config.targets()?, config.filters.clone()))
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    fn sample(
        &self,
        ctx: &mut RunContext,
        language: Language,
        source: &DatasetSource,
    ) -> SourceSample {
        let mut sample = SourceSample::new(language, source);
        let stream = match self.client.open(source) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("[{}] {}: {}", language, source, e);
                sample.error = Some(e.to_string());
                return sample;
            }
        };

        let mut chars = 0;
        let mut tokens = 0;
        let mut accepted = 0;
        for record in stream.take(self.sample_size) {
            let record = match record {
                Ok(record) => record,
                Err(Error::MalformedRecord(_)) => {
                    sample.records += 1;
                    sample.malformed += 1;
                    continue;
                }
                Err(e) => {
                    warn!("[{}] {} interrupted: {}", language, source, e);
                    sample.error = Some(e.to_string());
                    break;
                }
            };
            sample.records += 1;

            let text = match record.text(&source.text_field) {
                Ok(text) => text,
                Err(_) => {
                    sample.malformed += 1;
                    continue;
                }
            };

            chars += text.chars().count();
            tokens += TokenEstimator.estimate(text, language);
            let class = ctx.detector_mut().detect(text);
            *sample.scripts.entry(class).or_insert(0) += 1;
            if language.accepts(class) {
                accepted += 1;
            }
        }

        let well_formed = sample.records - sample.malformed;
        if well_formed > 0 {
            sample.avg_chars = chars as f64 / well_formed as f64;
            sample.avg_tokens = tokens as f64 / well_formed as f64;
            sample.accepted_share = accepted as f64 / well_formed as f64;
        }

        info!(
            "[{}] {}: {} records, {:.0} chars/doc, {:.0} tokens/doc, {:.1}% accepted",
            language,
            source,
            sample.records,
            sample.avg_chars,
            sample.avg_tokens,
            sample.accepted_share * 100.0
        );
        sample
    }
}

impl<C: SourceClient> Pipeline<Vec<SourceSample>> for Explorer<C> {
    fn run(&self) -> Result<Vec<SourceSample>, Error> {
        let mut ctx = RunContext::new(&self.settings);
        let samples = self
            .targets
            .iter()
            .flat_map(|target| {
                target
                    .sources
                    .iter()
                    .map(move |source| (target.language, source))
            })
            .map(|(language, source)| self.sample(&mut ctx, language, source))
            .collect();
        Ok(samples)
    }
}
