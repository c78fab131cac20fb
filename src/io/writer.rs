/*! Corpus and statistics writer.

Output layout:

```text
dst/
├── collection_report.json
├── english/
│   ├── english.txt
│   └── english_stats.json
└── hindi/
    ├── hindi_part_1.txt
    ├── hindi_part_2.txt
    └── hindi_stats.json
```

Documents are separated by a blank line. When sentence segmentation is enabled,
each document is written one sentence per line, and sentences already written for that language are skipped.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::error::Error;
use crate::filtering::SeenHashes;
use crate::pipelines::{CollectionReport, CollectionResult, LanguageCorpus};
use crate::transformers::SentenceSegmenter;

use super::TextWriter;

pub const REPORT_FILENAME: &str = "collection_report.json";

pub struct CorpusWriter {
    dst: PathBuf,
    part_size: Option<u64>,
    segment_sentences: bool,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

impl CorpusWriter {
    pub fn new(dst: &Path) -> Self {
        Self {
            dst: dst.to_path_buf(),
            part_size: None,
            segment_sentences: false,
        }
    }

    /// Rotate text files once they reach `part_size` bytes.
    pub fn with_part_size(mut self, part_size: Option<u64>) -> Self {
        self.part_size = part_size;
        self
    }

    pub fn with_sentence_segmentation(mut self, segment_sentences: bool) -> Self {
        self.segment_sentences = segment_sentences;
        self
    }

    /// Write texts and statistics of a language, returning the created text files.
    pub fn write_language(&self, corpus: &LanguageCorpus) -> Result<Vec<PathBuf>, Error> {
        let language = corpus.stats.language;
        let dir = self.dst.join(language.name());
        std::fs::create_dir_all(&dir)?;

        let mut text_writer = TextWriter::new(&dir, language.name(), self.part_size);
        let stale = text_writer.remove_existing()?;
        if stale > 0 {
            debug!("[{}] removed {} text files from a previous run", language, stale);
        }
        if self.segment_sentences {
            let segmenter = SentenceSegmenter::for_language(language);
            let mut seen = SeenHashes::default();
            let mut dropped = 0;
            for text in corpus.corpus.texts() {
                let (kept, duplicates): (Vec<&str>, Vec<&str>) = segmenter
                    .segment(text)
                    .into_iter()
                    .partition(|sentence| seen.check_and_insert(sentence));
                dropped += duplicates.len();
                if !kept.is_empty() {
                    text_writer.write_all(kept.join("\n").as_bytes())?;
                }
            }
            debug!("[{}] {} duplicate sentences dropped", language, dropped);
        } else {
            for text in corpus.corpus.texts() {
                text_writer.write_all(text.as_bytes())?;
            }
        }
        text_writer.flush()?;

        write_json(
            &dir.join(format!("{}_stats.json", language.name())),
            &corpus.stats,
        )?;

        info!(
            "[{}] wrote {} documents in {} files",
            language,
            corpus.corpus.len(),
            text_writer.nb_files()
        );
        Ok(text_writer.paths())
    }

    pub fn write_report(&self, report: &CollectionReport) -> Result<PathBuf, Error> {
        std::fs::create_dir_all(&self.dst)?;
        let path = self.dst.join(REPORT_FILENAME);
        write_json(&path, report)?;
        info!("report written to {:?}", path);
        Ok(path)
    }

    /// Write every language and the report.
    pub fn write(&self, result: &CollectionResult) -> Result<(), Error> {
        for corpus in &result.corpora {
            self.write_language(corpus)?;
        }
        self.write_report(&result.report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::lang::Language;
    use crate::pipelines::{CorpusAccumulator, LanguageStats};

    use super::*;

    fn corpus(language: Language, texts: &[&str]) -> LanguageCorpus {
        let mut corpus = CorpusAccumulator::default();
        for text in texts {
            corpus.push(text.to_string(), 10);
        }
        let mut stats = LanguageStats::new(language, 100);
        stats.documents_accepted = texts.len() as u64;
        stats.estimated_tokens = corpus.tokens();
        LanguageCorpus { stats, corpus }
    }

    #[test]
    fn layout() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CorpusWriter::new(dir.path());
        let hindi = corpus(Language::Hindi, &["पहला दस्तावेज़ यहाँ है", "दूसरा दस्तावेज़ यहाँ है"]);
        let paths = writer.write_language(&hindi).unwrap();

        assert_eq!(paths, vec![dir.path().join("hindi/hindi.txt")]);
        assert_eq!(
            std::fs::read_to_string(&paths[0]).unwrap(),
            "पहला दस्तावेज़ यहाँ है\n\nदूसरा दस्तावेज़ यहाँ है\n\n"
        );

        let stats: LanguageStats = serde_json::from_reader(
            File::open(dir.path().join("hindi/hindi_stats.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(stats, hindi.stats);

        let report = CollectionReport::new(1000, vec![hindi.stats.clone()]);
        let path = writer.write_report(&report).unwrap();
        let back: CollectionReport = serde_json::from_reader(File::open(path).unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn rotation() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CorpusWriter::new(dir.path()).with_part_size(Some(20));
        let english = corpus(
            Language::English,
            &["a first document here", "a second document here"],
        );
        let paths = writer.write_language(&english).unwrap();
        assert_eq!(
            paths,
            vec![
                dir.path().join("english/english_part_1.txt"),
                dir.path().join("english/english_part_2.txt"),
            ]
        );
    }

    #[test]
    fn rewrite_removes_previous_parts() {
        let dir = tempfile::tempdir().unwrap();
        let english = corpus(
            Language::English,
            &["a first document here", "a second document here", "a third one"],
        );
        let parts = CorpusWriter::new(dir.path())
            .with_part_size(Some(20))
            .write_language(&english)
            .unwrap();
        assert_eq!(parts.len(), 3);

        let smaller = corpus(Language::English, &["a single document"]);
        let paths = CorpusWriter::new(dir.path())
            .write_language(&smaller)
            .unwrap();
        assert_eq!(paths, vec![dir.path().join("english/english.txt")]);

        let mut files: Vec<String> = std::fs::read_dir(dir.path().join("english"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, vec!["english.txt", "english_stats.json"]);
    }

    #[test]
    fn segmentation() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CorpusWriter::new(dir.path()).with_sentence_segmentation(true);
        let english = corpus(
            Language::English,
            &[
                "The first sentence is here. Short one. The second sentence is here.",
                "The first sentence is here. A brand new sentence appears!",
                "The second sentence is here.",
            ],
        );
        let paths = writer.write_language(&english).unwrap();
        assert_eq!(
            std::fs::read_to_string(&paths[0]).unwrap(),
            "The first sentence is here.\nThe second sentence is here.\n\nA brand new sentence appears!\n\n"
        );
    }
}
