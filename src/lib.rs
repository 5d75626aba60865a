//! Attika - attachment storage core for a small web forum.
//!
//! Stores uploaded files under a configured base directory with a
//! configurable name-obfuscation policy, optionally gates stored files on
//! their detected MIME type against an allow-list, and supports retrieval
//! and idempotent deletion by stored name. Invoked as a library by an
//! enclosing request-handling layer.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;

pub use config::{Config, DetectorKind, GateConfig, LoggingConfig, StorageConfig};
pub use error::{AttikaError, Result};
pub use store::{
    decide_name, detect_type, AttachmentStore, ContentGate, StoredFile, MAX_FILENAME_LENGTH,
    UNKNOWN_TYPE,
};
