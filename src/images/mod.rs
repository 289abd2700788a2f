use std::path::Path;

use bytes::Bytes;

use crate::error::ValidationFailure;

/// A photo picked for analysis. Only ever holds `image/*` content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file_name: String,
    media_type: String,
    body: Bytes,
}

impl SelectedImage {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        body: Bytes,
    ) -> Result<Self, ValidationFailure> {
        let media_type = media_type.into();
        if !is_image(&media_type) {
            return Err(ValidationFailure::NotAnImage { media_type });
        }
        Ok(Self {
            file_name: file_name.into(),
            media_type,
            body,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

fn is_image(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Media type implied by a file extension; unknown extensions are opaque bytes.
pub fn media_type_for_path(path: &Path) -> &'static str {
    mime_from_path(path).unwrap_or("application/octet-stream")
}

fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
