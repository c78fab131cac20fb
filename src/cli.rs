//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use crate::lang::Language;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bhasha",
    about = "English, Hindi and Sanskrit corpus collection tool."
)]
/// Holds every command that is callable by the `bhasha` command.
pub enum Bhasha {
    #[structopt(about = "Collect corpora toward a token target")]
    Collect(Collect),
    #[structopt(about = "Sample configured sources and report on their content")]
    Explore(Explore),
    #[structopt(about = "Print the built-in configuration (JSON)")]
    Sources(Sources),
}

/// Options shared by commands that pull from sources.
#[derive(Debug, StructOpt)]
pub struct SourceOptions {
    #[structopt(
        short = "l",
        long = "languages",
        help = "languages to process (name or code). Defaults to all of them."
    )]
    pub languages: Vec<Language>,
    #[structopt(
        short = "c",
        long = "config",
        parse(from_os_str),
        help = "configuration file (see `bhasha sources`)"
    )]
    pub config: Option<PathBuf>,
    #[structopt(
        long = "local",
        parse(from_os_str),
        help = "read sources from JSON lines files in this directory instead of the hub. Dataset names are glob patterns."
    )]
    pub local: Option<PathBuf>,
    #[structopt(
        long = "token",
        help = "hub token. Defaults to HF_TOKEN or HUGGING_FACE_HUB_TOKEN."
    )]
    pub token: Option<String>,
}

#[derive(Debug, StructOpt)]
/// Collect command and parameters.
pub struct Collect {
    #[structopt(parse(from_os_str), help = "destination corpus location")]
    pub dst: PathBuf,
    #[structopt(
        short = "t",
        long = "target-tokens",
        help = "aggregate estimated token target. Overrides the configuration."
    )]
    pub target_tokens: Option<u64>,
    #[structopt(flatten)]
    pub sources: SourceOptions,
    #[structopt(long = "skip-auth-check", help = "do not check hub credentials before starting")]
    pub skip_auth_check: bool,
    #[structopt(
        long = "abort-on-auth-failure",
        help = "stop the run when a source requires authentication (default: skip the source)"
    )]
    pub abort_on_auth_failure: bool,
    #[structopt(long = "part-size", help = "size of each text file part (in MBytes)")]
    pub part_size: Option<u64>,
    #[structopt(
        long = "segment-sentences",
        help = "write one sentence per line, removing duplicate sentences"
    )]
    pub segment_sentences: bool,
}

#[derive(Debug, StructOpt)]
/// Explore command and parameters.
pub struct Explore {
    #[structopt(flatten)]
    pub sources: SourceOptions,
    #[structopt(
        short = "n",
        long = "samples",
        default_value = "100",
        help = "number of records sampled per source"
    )]
    pub samples: usize,
}

#[derive(Debug, StructOpt)]
/// Sources command and parameters.
pub struct Sources {
    #[structopt(
        short = "t",
        long = "target-tokens",
        default_value = "3000000000",
        help = "aggregate estimated token target"
    )]
    pub target_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect() {
        let opt = Bhasha::from_iter_safe(&[
            "bhasha",
            "collect",
            "out/",
            "-l",
            "hi",
            "sanskrit",
            "--target-tokens",
            "1000",
            "--part-size",
            "500",
        ])
        .unwrap();

        match opt {
            Bhasha::Collect(c) => {
                assert_eq!(c.dst, PathBuf::from("out/"));
                assert_eq!(c.sources.languages, vec![Language::Hindi, Language::Sanskrit]);
                assert_eq!(c.target_tokens, Some(1000));
                assert_eq!(c.part_size, Some(500));
                assert!(!c.segment_sentences);
                assert!(!c.abort_on_auth_failure);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn explore_defaults() {
        match Bhasha::from_iter_safe(&["bhasha", "explore"]).unwrap() {
            Bhasha::Explore(e) => {
                assert_eq!(e.samples, 100);
                assert!(e.sources.languages.is_empty());
                assert!(e.sources.local.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_language() {
        assert!(Bhasha::from_iter_safe(&["bhasha", "explore", "-l", "klingon"]).is_err());
    }
}
