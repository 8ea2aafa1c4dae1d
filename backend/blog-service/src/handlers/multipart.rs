/// Multipart form parsing for post create/update
///
/// Recognized fields: `title`, `content`, repeated `media` files and
/// `keepMedia` (also accepted as `keepMedia[]`). Unknown fields are drained
/// and ignored.
use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;

use crate::error::{AppError, Result};
use crate::media::UploadedFile;
use crate::models::MediaType;
use crate::services::PostForm;
use crate::UploadLimits;

const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

pub async fn read_post_form(mut payload: Multipart, limits: &UploadLimits) -> Result<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = payload.next().await {
        let field = field?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => form.title = Some(read_text(field).await?),
            "content" => form.content = Some(read_text(field).await?),
            "keepMedia" | "keepMedia[]" => form.keep_media.push(read_text(field).await?),
            "media" => {
                if form.files.len() >= limits.max_files {
                    return Err(AppError::BadRequest(format!(
                        "Too many files, at most {} allowed",
                        limits.max_files
                    )));
                }
                form.files
                    .push(read_file(field, limits.max_file_size_bytes).await?);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
                drain(field).await?;
            }
        }
    }

    Ok(form)
}

async fn read_text(mut field: Field) -> Result<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::BadRequest("Form field too large".into()));
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf).map_err(|_| AppError::BadRequest("Form field is not valid UTF-8".into()))
}

async fn read_file(mut field: Field, max_bytes: usize) -> Result<UploadedFile> {
    let content_type = field
        .content_type()
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Media file is missing a content type".into()))?;

    let media_type = MediaType::from_mime(&content_type).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unsupported file type {content_type}, only images and videos are allowed"
        ))
    })?;

    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(AppError::BadRequest(format!(
                "File exceeds the {max_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        filename,
        content_type,
        media_type,
        bytes,
    })
}

async fn drain(mut field: Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
