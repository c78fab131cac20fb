//! Rotating text file writer.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Error;

/// Rotating file writer.
///
/// Each call to [Write::write] writes a whole document followed by a blank line.
/// When a part size (in bytes) is set, a new file is started once the next document would not fit in the current one.
///
/// Files are named `<stem>.txt`, or `<stem>_part_<n>.txt` when there are several of them
/// (the first file is renamed when the second one is created).
///
/// Note: a document that is larger than the part size is written in its own file, exceeding the limit.
/// Existing files are truncated, and stale parts are only removed through [TextWriter::remove_existing].
pub struct TextWriter {
    stem: &'static str,
    dst: PathBuf,
    file: Option<BufWriter<File>>,
    size: u64,
    part_size: Option<u64>,
    nb_files: u64,
}

impl TextWriter {
    /// Create a new [TextWriter].
    /// Nothing is created unless a write is performed.
    pub fn new(dst: &Path, stem: &'static str, part_size: Option<u64>) -> Self {
        Self {
            stem,
            dst: dst.to_path_buf(),
            file: None,
            size: 0,
            part_size,
            nb_files: 0,
        }
    }

    fn path(&self, part: Option<u64>) -> PathBuf {
        let filename = match part {
            None => format!("{}.txt", self.stem),
            Some(n) => format!("{}_part_{}.txt", self.stem, n),
        };
        self.dst.join(filename)
    }

    /// Rotate file.
    fn create_next_file(&mut self) -> std::io::Result<()> {
        if let Some(mut previous) = self.file.take() {
            previous.flush()?;
        }

        let path = if self.nb_files == 0 {
            self.path(None)
        } else {
            self.path(Some(self.nb_files + 1))
        };

        if self.nb_files == 1 {
            let from = self.path(None);
            let to = self.path(Some(1));
            debug!("renaming {:?} to {:?}", from, to);
            std::fs::rename(from, to)?;
        }

        info!("creating {:?}", path);
        self.file = Some(BufWriter::new(File::create(path)?));
        self.size = 0;
        self.nb_files += 1;
        Ok(())
    }

    /// `<stem>.txt` or `<stem>_part_<n>.txt`.
    fn is_own_file(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => return false,
        };
        match name
            .strip_prefix(self.stem)
            .and_then(|rest| rest.strip_suffix(".txt"))
        {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix("_part_")
                .map_or(false, |n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
            None => false,
        }
    }

    /// Delete the text files a previous run left in the destination,
    /// returning how many were removed.
    pub fn remove_existing(&self) -> Result<usize, Error> {
        let dst = self
            .dst
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid path {:?}", self.dst)))?;
        let pattern = Path::new(&glob::Pattern::escape(dst)).join(format!("{}*.txt", self.stem));
        let pattern = pattern
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid path {:?}", pattern)))?
            .to_string();

        let mut removed = 0;
        for path in glob::glob(&pattern)? {
            let path = path?;
            if self.is_own_file(&path) {
                debug!("removing {:?}", path);
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Number of files created so far.
    pub fn nb_files(&self) -> u64 {
        self.nb_files
    }

    /// Paths of the files created so far.
    pub fn paths(&self) -> Vec<PathBuf> {
        match self.nb_files {
            0 => Vec::new(),
            1 => vec![self.path(None)],
            n => (1..=n).map(|part| self.path(Some(part))).collect(),
        }
    }
}

impl Write for TextWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let len = buf.len() as u64;
        let overflows = self
            .part_size
            .map_or(false, |limit| self.size > 0 && self.size + len > limit);

        if self.file.is_none() || overflows {
            self.create_next_file()?;
        }

        match &mut self.file {
            Some(file) => {
                file.write_all(buf)?;
                file.write_all(b"\n\n")?;
                self.size += len;
                Ok(buf.len())
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("no open file for {}", self.stem),
            )),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}
