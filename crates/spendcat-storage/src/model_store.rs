//! Model persistence.
//!
//! File layout:
//! - line 1: JSON header `{format, version, checksum, body_len}`
//! - rest: JSON-serialized [`Model`]
//!
//! `checksum` is the xxh3-64 of the body bytes in lowercase hex. Writes go
//! through a temp file in the target directory that is synced and then
//! renamed over the target, so readers never see a half-written model.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendcat_core::errors::ModelStoreError;
use spendcat_core::CategorySlug;
use spendcat_model::Model;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

/// Value of the header's `format` field.
pub const MODEL_FORMAT: &str = "spendcat-model";
/// Current on-disk layout version.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ModelHeader {
    format: String,
    version: u32,
    checksum: String,
    body_len: usize,
}

/// Short description of a persisted or active model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub labels: Vec<CategorySlug>,
    pub feature_count: usize,
    pub training_sample_count: usize,
    pub trained_at: DateTime<Utc>,
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        Self {
            labels: model.labels().to_vec(),
            feature_count: model.feature_count(),
            training_sample_count: model.training_sample_count(),
            trained_at: model.trained_at(),
        }
    }
}

/// Reads and writes one model file.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a file exists at the model path. Says nothing about validity.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Persist `model`, atomically replacing any previous file.
    pub fn save(&self, model: &Model) -> Result<(), ModelStoreError> {
        let body = serde_json::to_vec(model).map_err(|e| ModelStoreError::Serialization {
            message: e.to_string(),
        })?;
        let header = ModelHeader {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_FORMAT_VERSION,
            checksum: checksum(&body),
            body_len: body.len(),
        };
        let header = serde_json::to_vec(&header).map_err(|e| ModelStoreError::Serialization {
            message: e.to_string(),
        })?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;

        let temp = NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            writer.write_all(&header).map_err(|e| self.io_error(e))?;
            writer.write_all(b"\n").map_err(|e| self.io_error(e))?;
            writer.write_all(&body).map_err(|e| self.io_error(e))?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        info!(
            path = %self.path.display(),
            bytes = body.len(),
            labels = model.labels().len(),
            features = model.feature_count(),
            "model persisted"
        );
        Ok(())
    }

    /// Load and fully validate the persisted model.
    pub fn load(&self) -> Result<Model, ModelStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ModelStoreError::NotFound {
                    path: self.display_path(),
                })
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let split = bytes
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| self.corrupt("missing header line"))?;
        let (header, body) = (&bytes[..split], &bytes[split + 1..]);

        let header: ModelHeader = serde_json::from_slice(header)
            .map_err(|e| self.corrupt(format!("unreadable header: {e}")))?;
        if header.format != MODEL_FORMAT {
            return Err(self.corrupt(format!("unexpected format {:?}", header.format)));
        }
        if header.version != MODEL_FORMAT_VERSION {
            return Err(self.corrupt(format!(
                "unsupported version {} (expected {MODEL_FORMAT_VERSION})",
                header.version
            )));
        }
        if header.body_len != body.len() {
            return Err(self.corrupt(format!(
                "body is {} bytes, header says {}",
                body.len(),
                header.body_len
            )));
        }
        let actual = checksum(body);
        if header.checksum != actual {
            return Err(self.corrupt(format!(
                "checksum mismatch: header {}, body {actual}",
                header.checksum
            )));
        }

        let model: Model = serde_json::from_slice(body)
            .map_err(|e| self.corrupt(format!("invalid model body: {e}")))?;
        debug!(
            path = %self.path.display(),
            labels = model.labels().len(),
            features = model.feature_count(),
            "model loaded"
        );
        Ok(model)
    }

    /// Load the persisted model and summarize it.
    pub fn describe(&self) -> Result<ModelSummary, ModelStoreError> {
        self.load().map(|model| ModelSummary::from(&model))
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn corrupt(&self, reason: impl Into<String>) -> ModelStoreError {
        ModelStoreError::Corrupt {
            path: self.display_path(),
            reason: reason.into(),
        }
    }

    fn io_error(&self, e: io::Error) -> ModelStoreError {
        ModelStoreError::Io {
            path: self.display_path(),
            message: e.to_string(),
        }
    }
}

/// xxh3-64 of `body`, lowercase hex.
fn checksum(body: &[u8]) -> String {
    format!("{:016x}", xxh3_64(body))
}
