//! Attachment store module for Attika.
//!
//! This module provides the attachment-handling core:
//! - Stored-name policy (pass-through or random-token obfuscation)
//! - Content gate (detected MIME type against an allow-list)
//! - Flat on-disk store with load and idempotent delete

mod detect;
mod name;
mod storage;

pub use detect::{detect_type, ContentGate, UNKNOWN_TYPE};
pub use name::decide_name;
pub use storage::{AttachmentStore, StoredFile};

/// Maximum length for an original file name (in characters).
pub const MAX_FILENAME_LENGTH: usize = 255;
