//! Flat on-disk attachment storage.
//!
//! Files live directly under the configured base directory, keyed by their
//! stored name. Store writes the bytes, runs the content gate, and returns a
//! descriptor; load and delete look files up by stored name.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::config::{GateConfig, StorageConfig};
use crate::{AttikaError, Result};

use super::detect::ContentGate;
use super::name::decide_name;
use super::MAX_FILENAME_LENGTH;

/// Descriptor of a successfully stored attachment.
///
/// Returned only when the bytes exist on disk at `path` with size `size`
/// and (if gating is enabled) passed the content gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File name as declared by the uploader, unvalidated beyond emptiness.
    pub original_name: String,
    /// On-disk file name produced by the name policy.
    pub stored_name: String,
    /// Absolute path where the bytes reside.
    pub path: PathBuf,
    /// Number of bytes written.
    pub size: u64,
}

/// Attachment store rooted at a single base directory.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    base_dir: PathBuf,
    config: StorageConfig,
    gate: ContentGate,
}

impl AttachmentStore {
    /// Create a store rooted at `storage.base_dir`.
    ///
    /// The base directory is created if it doesn't exist and resolved to an
    /// absolute path.
    pub fn new(storage: StorageConfig, gate: &GateConfig) -> Result<Self> {
        fs::create_dir_all(&storage.base_dir)?;
        let base_dir = fs::canonicalize(&storage.base_dir)?;

        Ok(Self {
            base_dir,
            config: storage,
            gate: ContentGate::new(gate),
        })
    }

    /// Get the base directory of this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store an uploaded payload.
    ///
    /// # Validation
    /// - Original name: non-empty, max 255 characters
    /// - Payload: max configured upload size
    ///
    /// # Returns
    /// A [`StoredFile`] descriptor. On gate rejection the just-written file
    /// is removed before the error is returned; rejected bytes never remain
    /// on disk.
    pub fn store(&self, content: &[u8], original_name: &str) -> Result<StoredFile> {
        if original_name.chars().count() > MAX_FILENAME_LENGTH {
            return Err(AttikaError::Validation(format!(
                "file name exceeds {MAX_FILENAME_LENGTH} characters"
            )));
        }

        let max_bytes = self.config.max_upload_size_mb.saturating_mul(1024 * 1024);
        if content.len() as u64 > max_bytes {
            return Err(AttikaError::Validation(format!(
                "upload of {} bytes exceeds the {} MB limit",
                content.len(),
                self.config.max_upload_size_mb
            )));
        }

        let stored_name = decide_name(original_name, &self.config)?;
        let path = self.stored_path(&stored_name)?;

        if let Err(e) = fs::write(&path, content) {
            // Don't leave a partial file behind on a failed write.
            self.remove_quietly(&path);
            return Err(match e.kind() {
                io::ErrorKind::StorageFull => AttikaError::InsufficientStorage(e.to_string()),
                _ => AttikaError::Io(e),
            });
        }

        match self.gate.check(&path) {
            Ok(Some(detected)) => {
                info!("stored {original_name} as {stored_name} ({detected})");
            }
            Ok(None) => {
                info!("stored {original_name} as {stored_name}");
            }
            Err(e) => {
                self.remove_quietly(&path);
                return Err(e);
            }
        }

        Ok(StoredFile {
            original_name: original_name.to_string(),
            stored_name,
            path,
            size: content.len() as u64,
        })
    }

    /// Load a stored file's bytes.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let path = self.stored_path(stored_name)?;

        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AttikaError::NotFound(format!("file {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Open a stored file for streaming reads (large downloads).
    pub fn open(&self, stored_name: &str) -> Result<fs::File> {
        let path = self.stored_path(stored_name)?;

        match fs::File::open(&path) {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AttikaError::NotFound(format!("file {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file.
    ///
    /// Idempotent: deleting a nonexistent file returns `Ok(false)`. Only
    /// regular files are removed, never directories.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        let path = self.stored_path(stored_name)?;

        match fs::symlink_metadata(&path) {
            Ok(m) if m.is_file() => {
                fs::remove_file(&path)?;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a stored file exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.stored_path(stored_name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Get the size of a stored file in bytes.
    pub fn file_size(&self, stored_name: &str) -> Result<u64> {
        let path = self.stored_path(stored_name)?;

        match fs::metadata(&path) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AttikaError::NotFound(format!("file {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Guess a `Content-Type` header value from a file name, for the
    /// enclosing download handler. Falls back to `application/octet-stream`.
    pub fn content_type_hint(name: &str) -> String {
        mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string()
    }

    /// Resolve a stored name to its path under the base directory.
    ///
    /// The name must be a single normal path component: no separators, no
    /// `..`, not empty. Keeps every lookup inside the base directory.
    fn stored_path(&self, stored_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(stored_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_dir.join(stored_name)),
            _ => Err(AttikaError::InvalidName(format!(
                "stored name must be a bare file name: {stored_name:?}"
            ))),
        }
    }

    /// Best-effort removal. Failures are logged, never propagated, so they
    /// can't mask the primary error.
    fn remove_quietly(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove {}: {e}", path.display());
            }
        }
    }
}
