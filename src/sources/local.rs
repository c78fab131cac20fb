//! JSON lines files on disk.
//!
//! The dataset identifier of a source is a glob pattern relative to the client root,
//! e.g. `hindi/*.jsonl.gz`. Matching files are read in lexicographic order,
//! gzipped files (`.gz`) are decompressed on the fly.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::config::DatasetSource;
use crate::error::Error;

use super::{Record, RecordStream, SourceClient};

pub struct LocalClient {
    root: PathBuf,
    limit: Option<usize>,
}

impl LocalClient {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            limit: None,
        }
    }

    /// Stop every stream after `limit` records.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn paths(&self, source: &DatasetSource) -> Result<Vec<PathBuf>, Error> {
        let pattern = self.root.join(&source.dataset);
        let pattern = pattern.to_str().ok_or_else(|| {
            Error::source_unavailable(source.id(), format!("invalid path {:?}", pattern))
        })?;

        let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
        paths.retain(|path| path.is_file());
        paths.sort();

        if paths.is_empty() {
            return Err(Error::source_unavailable(
                source.id(),
                format!("no file matches {pattern}"),
            ));
        }
        debug!("{}: {} files", source, paths.len());
        Ok(paths)
    }
}

fn open_lines(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)?;
    let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Records of a single file. Blank lines are skipped, unparsable lines are
/// yielded as [Error::MalformedRecord] without ending the stream.
fn file_records(path: PathBuf) -> Box<dyn Iterator<Item = Result<Record, Error>>> {
    let reader = match open_lines(&path) {
        Ok(reader) => reader,
        Err(e) => return Box::new(std::iter::once(Err(e))),
    };

    let records = reader
        .lines()
        .enumerate()
        .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(move |(idx, line)| {
            let line = line?;
            serde_json::from_str(&line)
                .map(Record::new)
                .map_err(|e| {
                    Error::MalformedRecord(format!("{}:{}: {e}", path.display(), idx + 1))
                })
        });
    Box::new(records)
}

impl SourceClient for LocalClient {
    fn open<'a>(&'a self, source: &DatasetSource) -> Result<RecordStream<'a>, Error> {
        let paths = self.paths(source)?;
        let records = paths.into_iter().flat_map(file_records);

        match self.limit {
            Some(limit) => Ok(Box::new(records.take(limit))),
            None => Ok(Box::new(records)),
        }
    }
}
