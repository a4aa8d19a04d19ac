//! Image preview for upload controls
//!
//! The chosen file is read into memory and shown as a `data:` URL. Type and
//! size are not checked.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub src: String,
    pub visible: bool,
}

impl ImagePreview {
    pub fn render_html(&self) -> String {
        let display = if self.visible { "block" } else { "none" };
        format!(
            r#"<img id="image-preview" src="{}" style="display: {};">"#,
            self.src, display
        )
    }
}

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file and encode it as a data URL
pub async fn read_data_url(path: &Path) -> Result<String, PreviewError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| PreviewError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(data_url(mime_from_path(path), &bytes))
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// MIME type from the file extension
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}
