//! Stored-name policy.
//!
//! Decides the on-disk name for an uploaded file: either the caller's
//! original name verbatim, or a random token with or without the original
//! extension, depending on the obfuscation settings.

use std::path::Path;

use uuid::Uuid;

use crate::config::StorageConfig;
use crate::{AttikaError, Result};

/// Decide the stored name for an upload.
///
/// With obfuscation disabled the original name is returned as-is (the
/// caller accepts the collision risk). With obfuscation enabled a fresh
/// UUID v4 token is generated; unless `hide_extension` is set, the original
/// file's extension is appended. An original name with no extension yields
/// the bare token.
pub fn decide_name(original_name: &str, config: &StorageConfig) -> Result<String> {
    if original_name.is_empty() {
        return Err(AttikaError::InvalidName(
            "original file name is empty".to_string(),
        ));
    }

    if !config.obfuscate {
        return Ok(original_name.to_string());
    }

    let token = Uuid::new_v4().to_string();

    if config.hide_extension {
        return Ok(token);
    }

    match extract_extension(original_name) {
        Some(ext) => Ok(format!("{token}.{ext}")),
        None => Ok(token),
    }
}

/// Extract the file extension (text after the final `.`), if any.
fn extract_extension(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|s| s.to_str())
}
