// ── Photo domain types ──

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Stored photo metadata attached to a pet or tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub file_name: String,
    pub content_type: String,
    pub url: String,
}

/// A photo waiting to be uploaded after a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a photo from disk, guessing the content type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::validation(format!("Cannot read photo {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_owned();
        let content_type = content_type_for(path).ok_or_else(|| {
            CoreError::validation(format!(
                "Unsupported photo format: {file_name} (expected jpg, png, gif or webp)"
            ))
        })?;

        Ok(Self::new(file_name, content_type, Bytes::from(bytes)))
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
