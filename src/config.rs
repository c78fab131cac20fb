/*! Collection configuration.

A [CollectionConfig] lists, for each language, the datasets to pull from (in priority order)
and optionally its share of the overall token target. It also holds the [FilterSettings].

Configurations are JSON files:

```json
{
  "target_tokens": 3000000000,
  "languages": [
    {
      "language": "hindi",
      "share": 0.35,
      "sources": [
        { "dataset": "wikimedia/wikipedia", "config": "20231101.hi" },
        { "dataset": "ai4bharat/sangraha", "config": "verified", "split": "hin" }
      ]
    }
  ]
}
```

When no file is provided, [CollectionConfig::with_target] gives the built-in one.
!*/
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::lang::Language;

pub const DEFAULT_TARGET_TOKENS: u64 = 3_000_000_000;
pub const DEFAULT_SPLIT: &str = "train";
pub const DEFAULT_TEXT_FIELD: &str = "text";

fn default_text_field() -> String {
    DEFAULT_TEXT_FIELD.to_string()
}

/// Reference to a (streamable) dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// hub identifier (`owner/name`), or a glob pattern for local sources.
    pub dataset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
    #[serde(default = "default_text_field")]
    pub text_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DatasetSource {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            config: None,
            split: None,
            text_field: default_text_field(),
            description: None,
        }
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn with_split(mut self, split: impl Into<String>) -> Self {
        self.split = Some(split.into());
        self
    }

    pub fn with_text_field(mut self, text_field: impl Into<String>) -> Self {
        self.text_field = text_field.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn split_or_default(&self) -> &str {
        self.split.as_deref().unwrap_or(DEFAULT_SPLIT)
    }

    /// `dataset[/config][:split]`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dataset)?;
        if let Some(config) = &self.config {
            write!(f, "/{config}")?;
        }
        if let Some(split) = &self.split {
            write!(f, ":{split}")?;
        }
        Ok(())
    }
}

/// Per-language entry of a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub language: Language,
    /// fraction of the overall target. Defaults to [Language::default_share].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<f64>,
    /// explicit token budget, takes precedence over `share`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    pub sources: Vec<DatasetSource>,
}

/// Thresholds used by the document filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// minimum number of characters, before and after cleaning.
    pub min_chars: usize,
    /// minimum number of whitespace-delimited words after cleaning.
    pub min_words: usize,
    /// documents estimated under this number of tokens are rejected.
    pub min_tokens: u64,
    /// length of the prefix used for script detection.
    pub detection_sample_chars: usize,
    /// maximum number of memoized script detections.
    pub detector_cache_capacity: usize,
    /// texts longer than this are fingerprinted on samples.
    pub fingerprint_full_threshold: usize,
    /// size of the head and tail samples of long texts.
    pub fingerprint_sample_chars: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_chars: 10,
            min_words: 3,
            min_tokens: 10,
            detection_sample_chars: 500,
            detector_cache_capacity: 10_000,
            fingerprint_full_threshold: 5000,
            fingerprint_sample_chars: 1000,
        }
    }
}

/// Resolved, immutable collection target for a language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageTarget {
    pub language: Language,
    /// estimated tokens to collect. Advisory for languages that do not enforce budgets.
    pub budget: u64,
    pub sources: Vec<DatasetSource>,
}

impl LanguageTarget {
    pub fn new(language: Language, budget: u64, sources: Vec<DatasetSource>) -> Self {
        Self {
            language,
            budget,
            sources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub target_tokens: u64,
    pub languages: Vec<LanguageSettings>,
    #[serde(default)]
    pub filters: FilterSettings,
}

impl CollectionConfig {
    /// Built-in sources for every language.
    pub fn with_target(target_tokens: u64) -> Self {
        let languages = Language::ALL
            .iter()
            .map(|&language| LanguageSettings {
                language,
                share: None,
                budget: None,
                sources: default_sources(language),
            })
            .collect();

        Self {
            target_tokens,
            languages,
            filters: FilterSettings::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        debug!("loading configuration from {:?}", path);
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Only keep the provided languages (in configuration order).
    pub fn retain_languages(&mut self, languages: &[Language]) {
        self.languages
            .retain(|settings| languages.contains(&settings.language));
    }

    /// Compute budgets and check configuration consistency.
    pub fn targets(&self) -> Result<Vec<LanguageTarget>, Error> {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(self.languages.len());

        for settings in &self.languages {
            if !seen.insert(settings.language) {
                return Err(Error::Custom(format!(
                    "language {} is configured more than once",
                    settings.language
                )));
            }

            let budget = match (settings.budget, settings.share) {
                (Some(budget), _) => budget,
                (None, share) => {
                    let share = share.unwrap_or_else(|| settings.language.default_share());
                    if !(0.0..=1.0).contains(&share) {
                        return Err(Error::Custom(format!(
                            "share of {} must be within [0, 1] (got {})",
                            settings.language, share
                        )));
                    }
                    (self.target_tokens as f64 * share).round() as u64
                }
            };

            targets.push(LanguageTarget::new(
                settings.language,
                budget,
                settings.sources.clone(),
            ));
        }

        Ok(targets)
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::with_target(DEFAULT_TARGET_TOKENS)
    }
}

/// Built-in dataset list, in priority order.
pub fn default_sources(language: Language) -> Vec<DatasetSource> {
    match language {
        Language::English => vec![DatasetSource::new("HuggingFaceFW/fineweb")
            .with_config("sample-10BT")
            .with_description("High-quality web text corpus (FineWeb English)")],
        Language::Hindi => vec![
            DatasetSource::new("wikimedia/wikipedia")
                .with_config("20231101.hi")
                .with_description("Hindi Wikipedia dump"),
            DatasetSource::new("ai4bharat/sangraha")
                .with_config("verified")
                .with_split("hin")
                .with_description("Sangraha verified (Hindi)"),
            DatasetSource::new("ai4bharat/sangraha")
                .with_config("synthetic")
                .with_split("hin_Deva")
                .with_description("Sangraha synthetic (Hindi, Devanagari)"),
        ],
        Language::Sanskrit => vec![
            DatasetSource::new("wikimedia/wikipedia")
                .with_config("20231101.sa")
                .with_description("Sanskrit Wikipedia dump"),
            DatasetSource::new("ai4bharat/sangraha")
                .with_config("verified")
                .with_split("san")
                .with_description("Sangraha verified (Sanskrit)"),
            DatasetSource::new("ai4bharat/sangraha")
                .with_config("synthetic")
                .with_split("san_Deva")
                .with_description("Sangraha synthetic (Sanskrit, Devanagari)"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budgets() {
        let targets = CollectionConfig::default().targets().unwrap();
        let budgets: Vec<(Language, u64)> =
            targets.iter().map(|t| (t.language, t.budget)).collect();
        assert_eq!(
            budgets,
            vec![
                (Language::English, 1_500_000_000),
                (Language::Hindi, 1_050_000_000),
                (Language::Sanskrit, 450_000_000),
            ]
        );
        assert_eq!(targets[1].sources.len(), 3);
    }

    #[test]
    fn source_id() {
        let s = DatasetSource::new("ai4bharat/sangraha")
            .with_config("verified")
            .with_split("hin");
        assert_eq!(s.id(), "ai4bharat/sangraha/verified:hin");
        assert_eq!(DatasetSource::new("local/*.jsonl").id(), "local/*.jsonl");
        assert_eq!(DatasetSource::new("x").split_or_default(), "train");
    }

    #[test]
    fn parse_minimal() {
        let json = r#"{
            "target_tokens": 1000,
            "languages": [
                {"language": "hindi", "share": 0.5, "sources": [{"dataset": "a/b"}]},
                {"language": "sanskrit", "budget": 42, "sources": []}
            ],
            "filters": {"min_tokens": 1}
        }"#;
        let config: CollectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.filters.min_tokens, 1);
        assert_eq!(config.filters.min_words, 3);
        assert_eq!(config.languages[0].sources[0].text_field, "text");

        let targets = config.targets().unwrap();
        assert_eq!(targets[0].budget, 500);
        assert_eq!(targets[1].budget, 42);
    }

    #[test]
    fn roundtrip_default() {
        let config = CollectionConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: CollectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn retain() {
        let mut config = CollectionConfig::default();
        config.retain_languages(&[Language::Sanskrit, Language::English]);
        let langs: Vec<Language> = config.languages.iter().map(|l| l.language).collect();
        assert_eq!(langs, vec![Language::English, Language::Sanskrit]);
    }

    #[test]
    fn invalid_configurations() {
        let mut config = CollectionConfig::default();
        config.languages[0].share = Some(1.5);
        assert!(config.targets().is_err());

        let mut config = CollectionConfig::default();
        let duplicate = config.languages[0].clone();
        config.languages.push(duplicate);
        assert!(config.targets().is_err());
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            serde_json::to_string(&CollectionConfig::with_target(10)).unwrap(),
        )
        .unwrap();
        let config = CollectionConfig::from_path(&path).unwrap();
        assert_eq!(config.target_tokens, 10);

        assert!(CollectionConfig::from_path(&dir.path().join("missing.json")).is_err());
    }
}
