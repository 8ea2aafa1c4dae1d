/// Media upload storage on the local filesystem
///
/// Uploaded files are written as `<uuid>.<ext>` under the upload directory
/// and exposed to clients as `{public_prefix}/{file}`.
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::MediaType;

/// A file received in a multipart form, already classified
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: mime::Mime,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    upload_dir: PathBuf,
    public_prefix: String,
}

impl MediaStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await
    }

    /// Write an upload to disk and return its public URL
    pub async fn store(&self, file: &UploadedFile) -> io::Result<String> {
        let name = format!("{}.{}", Uuid::new_v4(), extension_for(&file.content_type));

        self.ensure_dir().await?;
        tokio::fs::write(self.upload_dir.join(&name), &file.bytes).await?;

        tracing::debug!(
            file = %name,
            original = file.filename.as_deref().unwrap_or("-"),
            size = file.bytes.len(),
            "Stored media file"
        );
        Ok(format!("{}/{}", self.public_prefix, name))
    }

    /// Delete a previously stored file. Failures are logged and ignored.
    pub async fn remove(&self, url: &str) {
        let Some(path) = self.path_for_url(url) else {
            tracing::warn!(url = %url, "Media URL is outside the upload prefix, not removing");
            return;
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(url = %url, error = %e, "Failed to remove media file");
        }
    }

    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let name = url
            .strip_prefix(&self.public_prefix)?
            .strip_prefix('/')?;

        // Only bare file names produced by `store` are accepted
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.upload_dir.join(name))
    }
}

/// Extension for a checked content type; the client's filename is never used.
/// Unlisted subtypes are stored as `bin`.
fn extension_for(content_type: &mime::Mime) -> &'static str {
    let top = content_type.type_().as_str().to_ascii_lowercase();
    let subtype = content_type.subtype().as_str().to_ascii_lowercase();
    match (top.as_str(), subtype.as_str()) {
        ("image", "png") => "png",
        ("image", "jpeg" | "jpg" | "pjpeg") => "jpg",
        ("image", "gif") => "gif",
        ("image", "webp") => "webp",
        ("image", "bmp") => "bmp",
        ("image", "avif") => "avif",
        ("image", "heic") => "heic",
        ("video", "mp4") => "mp4",
        ("video", "webm") => "webm",
        ("video", "ogg") => "ogv",
        ("video", "quicktime") => "mov",
        ("video", "x-msvideo") => "avi",
        ("video", "x-matroska") => "mkv",
        ("video", "mpeg") => "mpeg",
        _ => "bin",
    }
}
