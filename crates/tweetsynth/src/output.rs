use crate::tweetlog::TweetRecord;
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `referenceUser \t id \t date \t userId \t username \t text`, no newline.
pub fn format_line(record: &TweetRecord, generated: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.reference_user,
        record.adjusted_id(),
        record.date,
        record.user_id,
        record.username,
        generated
    )
}

/// Appends generated lines to a file, creating it if needed.
pub struct OutputWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    written: usize,
}

impl OutputWriter {
    pub fn append(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening output {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.inner, "{line}")
            .with_context(|| format!("writing to {}", self.path.display()))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines. Returns the number written.
    pub fn finish(mut self) -> anyhow::Result<usize> {
        self.inner
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        Ok(self.written)
    }
}
