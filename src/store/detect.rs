//! Content-type detection and the allow-list gate.
//!
//! Two detector strategies are available, both answering the same question:
//! given stored bytes on disk, what is their best-guess MIME type?
//! - `Sniffer`: general-purpose content recognition via `file_format`
//! - `MagicBytes`: magic-number signature matching via `infer`
//!
//! Detection failures are never fatal; they yield [`UNKNOWN_TYPE`].

use std::path::Path;

use file_format::FileFormat;
use tracing::{debug, warn};

use crate::config::{DetectorKind, GateConfig};
use crate::{AttikaError, Result};

/// MIME type reported when detection fails or recognizes nothing.
pub const UNKNOWN_TYPE: &str = "application/octet-stream";

/// Detect the MIME type of the file at `path` from its bytes.
///
/// Deterministic for identical bytes. Returns [`UNKNOWN_TYPE`] when the
/// detector cannot read the file or does not recognize its signature.
pub fn detect_type(path: &Path, detector: DetectorKind) -> String {
    match detector {
        DetectorKind::Sniffer => match FileFormat::from_file(path) {
            Ok(format) => format.media_type().to_string(),
            Err(e) => {
                debug!("content sniffing failed for {}: {e}", path.display());
                UNKNOWN_TYPE.to_string()
            }
        },
        DetectorKind::MagicBytes => match infer::get_from_path(path) {
            Ok(Some(kind)) => kind.mime_type().to_string(),
            Ok(None) => UNKNOWN_TYPE.to_string(),
            Err(e) => {
                debug!("magic-byte detection failed for {}: {e}", path.display());
                UNKNOWN_TYPE.to_string()
            }
        },
    }
}

/// Allow-list gate over detected content types.
#[derive(Debug, Clone)]
pub struct ContentGate {
    enabled: bool,
    detector: DetectorKind,
    allowed_types: Vec<String>,
}

impl ContentGate {
    /// Create a gate from the configuration.
    pub fn new(config: &GateConfig) -> Self {
        Self {
            enabled: config.enabled,
            detector: config.detector,
            allowed_types: config.allowed_types.clone(),
        }
    }

    /// Whether the gate is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a MIME type is on the allow-list.
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
    }

    /// Check the file at `path` against the allow-list.
    ///
    /// Returns `Ok(None)` when the gate is disabled, `Ok(Some(detected))`
    /// when the detected type is allowed, and
    /// [`AttikaError::UnsupportedContentType`] otherwise. The caller is
    /// responsible for removing the rejected file.
    pub fn check(&self, path: &Path) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let detected = detect_type(path, self.detector);
        if self.is_allowed(&detected) {
            Ok(Some(detected))
        } else {
            warn!("{detected} is not an allowed content type");
            Err(AttikaError::UnsupportedContentType { detected })
        }
    }
}
