//! Append-only feedback ledger: one JSON object per line.
//!
//! Appends are serialized by an in-process mutex and synced before
//! returning. Readers scan a snapshot lazily and tolerate damage: a line
//! that fails to decode (including a torn trailing write) is skipped and
//! counted instead of failing the whole scan.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spendcat_core::errors::FeedbackStoreError;
use spendcat_core::{CategorySlug, FeedbackEntry};
use tracing::{debug, warn};

/// Handle to the ledger file. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct FeedbackLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Creates the file (and parent directories) if needed.
    pub fn append(&self, text: &str, label: CategorySlug) -> Result<(), FeedbackStoreError> {
        let entry = FeedbackEntry {
            text: text.to_string(),
            label: label.as_str().to_string(),
        };
        let mut line = serde_json::to_string(&entry).map_err(|e| FeedbackStoreError::Encode {
            message: e.to_string(),
        })?;
        line.push('\n');

        // Poisoning leaves the file line-delimited; keep appending.
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.sync_data().map_err(|e| self.write_error(e))?;

        debug!(path = %self.path.display(), label = %label, "feedback appended");
        Ok(())
    }

    /// Open a lazy reader over the current contents. A missing file reads
    /// as empty.
    pub fn read_all(&self) -> Result<FeedbackReader, FeedbackStoreError> {
        let path = self.path.display().to_string();
        match File::open(&self.path) {
            Ok(file) => Ok(FeedbackReader {
                reader: Some(BufReader::new(file)),
                path,
                line_no: 0,
                skipped: 0,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FeedbackReader {
                reader: None,
                path,
                line_no: 0,
                skipped: 0,
            }),
            Err(e) => Err(FeedbackStoreError::Read {
                path,
                message: e.to_string(),
            }),
        }
    }

    fn write_error(&self, e: io::Error) -> FeedbackStoreError {
        FeedbackStoreError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

/// Iterator over ledger entries in file order.
///
/// Blank lines are ignored. Undecodable lines are skipped with a warning and
/// counted in [`skipped`](Self::skipped). An I/O error is yielded once and
/// ends the iteration.
#[derive(Debug)]
pub struct FeedbackReader {
    reader: Option<BufReader<File>>,
    path: String,
    line_no: usize,
    skipped: usize,
}

impl FeedbackReader {
    /// Number of malformed lines passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for FeedbackReader {
    type Item = Result<FeedbackEntry, FeedbackStoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        loop {
            let reader = self.reader.as_mut()?;
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(FeedbackStoreError::Read {
                        path: self.path.clone(),
                        message: e.to_string(),
                    }));
                }
            }
            self.line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    self.skip(format!("invalid utf-8: {e}"));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<FeedbackEntry>(line) {
                Ok(entry) => return Some(Ok(entry)),
                Err(e) => self.skip(e.to_string()),
            }
        }
    }
}

impl FeedbackReader {
    fn skip(&mut self, reason: String) {
        self.skipped += 1;
        warn!(
            path = %self.path,
            line = self.line_no,
            reason = %reason,
            "skipping malformed feedback line"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FeedbackLedger::new(dir.path().join("feedback.jsonl"));
        let mut reader = ledger.read_all().unwrap();
        assert!(reader.next().is_none());
        assert_eq!(reader.skipped(), 0);
    }

    #[test]
    fn append_writes_one_json_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.jsonl");
        let ledger = FeedbackLedger::new(&path);
        ledger.append("Uber trip", CategorySlug::Transport).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\"text\":\"Uber trip\",\"label\":\"transport\"}\n");
    }

    #[test]
    fn append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FeedbackLedger::new(dir.path().join("nested/deeper/feedback.jsonl"));
        ledger.append("rent", CategorySlug::RentHousing).unwrap();
        assert_eq!(ledger.read_all().unwrap().count(), 1);
    }
}
