//! # Bhasha
//!
//! Bhasha streams English, Hindi and Sanskrit text from dataset hubs, filters it by script,
//! cleans and deduplicates it, and writes per-language corpora toward an estimated token target.
//!
//! ## Getting started
//!
//! ```sh
//! bhasha 0.1.0
//! English, Hindi and Sanskrit corpus collection tool.
//!
//! USAGE:
//!     bhasha <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     collect    Collect corpora toward a token target
//!     explore    Sample configured sources and report on their content
//!     help       Prints this message or the help of the given subcommand(s)
//!     sources    Print the built-in configuration (JSON)
//! ```
//!
//! Logging is configured with `RUST_LOG` (e.g. `RUST_LOG=bhasha=info`).
use structopt::StructOpt;

#[macro_use]
extern crate log;

use bhasha::cli::{Bhasha, SourceOptions};
use bhasha::config::CollectionConfig;
use bhasha::error::Error;
use bhasha::io::CorpusWriter;
use bhasha::pipelines::{AuthPolicy, Collector, Explorer, Pipeline};
use bhasha::sources::{HubClient, LocalClient, SourceClient};

const MBYTES: u64 = 1_000_000;

/// Load the configuration file (or the built-in one) and apply command line overrides.
fn load_config(
    opts: &SourceOptions,
    target_tokens: Option<u64>,
) -> Result<CollectionConfig, Error> {
    let mut config = match &opts.config {
        Some(path) => CollectionConfig::from_path(path)?,
        None => CollectionConfig::default(),
    };

    if let Some(target_tokens) = target_tokens {
        config.target_tokens = target_tokens;
    }
    if !opts.languages.is_empty() {
        config.retain_languages(&opts.languages);
    }
    if config.languages.is_empty() {
        return Err(Error::Custom(
            "no language left to process: check --languages and the configuration".to_string(),
        ));
    }

    Ok(config)
}

/// Build the source client, checking hub credentials if asked to.
fn source_client(
    opts: &SourceOptions,
    limit: Option<usize>,
    check_auth: bool,
    auth_policy: AuthPolicy,
) -> Result<Box<dyn SourceClient>, Error> {
    if let Some(root) = &opts.local {
        info!("reading sources from {:?}", root);
        return Ok(Box::new(LocalClient::new(root).with_limit(limit)));
    }

    let hub = HubClient::from_env(opts.token.clone())?.with_limit(limit);
    if check_auth {
        match hub.verify() {
            Ok(Some(_)) => (),
            Ok(None) => warn!("no hub token provided: gated datasets will be unavailable"),
            Err(e) if auth_policy == AuthPolicy::Abort => return Err(e),
            Err(e) => warn!("could not verify hub credentials: {}", e),
        }
    }
    Ok(Box::new(hub))
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = Bhasha::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        Bhasha::Collect(c) => {
            let config = load_config(&c.sources, c.target_tokens)?;
            let auth_policy = if c.abort_on_auth_failure {
                AuthPolicy::Abort
            } else {
                AuthPolicy::Skip
            };

            if !c.dst.exists() {
                warn!("Destination does not exist. Creating {:?}", c.dst);
                std::fs::create_dir_all(&c.dst)?;
            }
            if !c.dst.is_dir() {
                return Err(Error::Custom(format!(
                    "Destination has to be a directory: {:?}",
                    c.dst
                )));
            }

            let client = source_client(&c.sources, None, !c.skip_auth_check, auth_policy)?;
            let collector = Collector::from_config(client, &config)?.with_auth_policy(auth_policy);
            for target in collector.targets() {
                info!(
                    "[{}] budget: {} estimated tokens from {} sources",
                    target.language,
                    target.budget,
                    target.sources.len()
                );
            }
            let result = collector.run()?;

            CorpusWriter::new(&c.dst)
                .with_part_size(c.part_size.map(|size| size * MBYTES))
                .with_sentence_segmentation(c.segment_sentences)
                .write(&result)?;

            for stats in &result.report.languages {
                info!(
                    "[{}] {}: {} documents, {}/{} estimated tokens, {} rejected",
                    stats.language,
                    stats.status,
                    stats.documents_accepted,
                    stats.estimated_tokens,
                    stats.budget,
                    stats.rejected.total()
                );
            }
            info!(
                "total: {}/{} estimated tokens",
                result.report.total_tokens, result.report.target_tokens
            );
        }

        Bhasha::Explore(e) => {
            let config = load_config(&e.sources, None)?;
            let client = source_client(&e.sources, Some(e.samples), false, AuthPolicy::Skip)?;
            let samples = Explorer::from_config(client, &config)?
                .with_sample_size(e.samples)
                .run()?;
            println!("{}", serde_json::to_string_pretty(&samples)?);
        }

        Bhasha::Sources(s) => {
            let config = CollectionConfig::with_target(s.target_tokens);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    };
    Ok(())
}
