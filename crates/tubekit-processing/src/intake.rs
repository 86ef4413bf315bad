//! Clip intake: upload validation → storage → candidate extraction, and the
//! bridge from a chosen ephemeral candidate to the clip's persisted cover
//! image.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use tubekit_core::models::{Clip, MediaResource, StoredImage};
use tubekit_core::TubeConfig;
use tubekit_storage::{keys, LocalStorage, Storage, StorageError};

use crate::decoder::VideoDecoder;
use crate::thumbnails::{ThumbnailCandidate, ThumbnailExtractor};

/// An uploaded media file held in memory during intake.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Intake failures surfaced to the editing form.
///
/// The display messages are fixed; the underlying cause stays in the logs.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Select a video file to upload.")]
    InvalidContentType,

    #[error("Unsupported media format.")]
    UnsupportedMediaFormat,

    #[error("The uploaded file is too large.")]
    FileTooLarge,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful media intake.
///
/// `candidates` is `None` when thumbnail extraction failed; the form falls
/// back to an upload-only state in that case.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub media: MediaResource,
    pub candidates: Option<Vec<ThumbnailCandidate>>,
}

fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "upload".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "upload".to_string()
    } else {
        s
    }
}

fn content_type_for_name(filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Validates uploaded clips and wires chosen thumbnails into clips.
pub struct ClipIntake {
    decoder: Arc<dyn VideoDecoder>,
    storage: LocalStorage,
    extractor: ThumbnailExtractor,
    allowed_content_types: Vec<String>,
    max_video_size_bytes: usize,
}

impl ClipIntake {
    pub fn new(decoder: Arc<dyn VideoDecoder>, storage: LocalStorage, config: &TubeConfig) -> Self {
        Self {
            extractor: ThumbnailExtractor::new(decoder.clone(), storage.clone()),
            decoder,
            storage,
            allowed_content_types: config.video_allowed_content_types.clone(),
            max_video_size_bytes: config.max_video_size_bytes,
        }
    }

    fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        if !normalized.starts_with("video/") {
            return false;
        }
        self.allowed_content_types.is_empty()
            || self.allowed_content_types.iter().any(|ct| ct == &normalized)
    }

    /// Validate an uploaded media file.
    ///
    /// Skipped entirely when the media field was not changed in this edit.
    /// Content-type rejection happens before any decode work; otherwise the
    /// upload is materialized to a temp file and probed with a single-frame
    /// decode. Temp files are removed on every path out of this fn.
    pub async fn validate_media(
        &self,
        upload: &MediaUpload,
        media_changed: bool,
    ) -> Result<(), IntakeError> {
        if !media_changed {
            return Ok(());
        }

        if upload.data.len() > self.max_video_size_bytes {
            return Err(IntakeError::FileTooLarge);
        }

        if !self.is_allowed_content_type(&upload.content_type) {
            return Err(IntakeError::InvalidContentType);
        }

        let temp = tempfile::Builder::new()
            .prefix("tubekit-intake-")
            .tempfile()?;
        tokio::fs::write(temp.path(), &upload.data).await?;

        if let Err(error) = self.decoder.probe_first_frame(temp.path()).await {
            tracing::debug!(
                %error,
                filename = %upload.filename,
                "Decode probe rejected upload"
            );
            return Err(IntakeError::UnsupportedMediaFormat);
        }

        Ok(())
    }

    /// Persist the uploaded media under a fresh storage key.
    pub async fn store_media(&self, upload: &MediaUpload) -> Result<MediaResource, IntakeError> {
        let safe = sanitize_filename(&upload.filename);
        let extension = Path::new(&safe)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4")
            .to_lowercase();
        let stored_filename = format!("{}.{}", Uuid::new_v4(), extension);

        let (storage_key, url) = self
            .storage
            .upload(&stored_filename, &upload.content_type, upload.data.to_vec())
            .await?;

        Ok(MediaResource {
            filename: safe,
            storage_key,
            url,
            content_type: upload.content_type.to_lowercase(),
            file_size: upload.data.len() as i64,
        })
    }

    /// Full intake for a new or replaced media file: validate, store, and
    /// sample thumbnail candidates.
    pub async fn accept_upload(&self, upload: &MediaUpload) -> Result<IntakeOutcome, IntakeError> {
        self.validate_media(upload, true).await?;

        let media = self.store_media(upload).await?;

        let media_path = self.storage.absolute_path(&media.storage_key)?;
        let stem = Path::new(&media.storage_key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("clip")
            .to_string();
        let candidates = self.extractor.extract_candidates(&media_path, &stem).await;

        Ok(IntakeOutcome { media, candidates })
    }

    /// Persist the chosen candidate as the clip's cover image.
    ///
    /// The chosen file may live outside the permanent media area, so it is
    /// read from its filesystem path, wrapped as an in-memory upload, and
    /// stored under the clip's cover key.
    pub async fn apply_chosen_thumbnail(
        &self,
        clip: &mut Clip,
        chosen_file_path: &Path,
    ) -> Result<(), IntakeError> {
        let data = tokio::fs::read(chosen_file_path).await?;

        let name = chosen_file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cover.jpg");
        let content_type = content_type_for_name(name);
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_lowercase();

        let key = keys::cover_key(clip.id, &extension);
        let url = self
            .storage
            .upload_with_key(&key, data, &content_type)
            .await?;

        clip.cover_image = Some(StoredImage {
            storage_key: key,
            url,
            content_type,
        });
        clip.updated_at = Utc::now();

        tracing::info!(clip_id = %clip.id, "Cover image applied from chosen thumbnail");

        Ok(())
    }

    /// Drop ephemeral candidate files after the final save.
    pub async fn discard_candidates(&self, candidates: &[ThumbnailCandidate]) {
        self.extractor.discard_candidates(candidates).await;
    }
}
