//! Thumbnail candidate extraction.
//!
//! Samples a handful of frames from an uploaded clip, writes them into the
//! storage area, and returns them as selectable cover-image candidates.
//! Extraction is best-effort: any open or decode failure yields no candidates
//! rather than an error, and never a partial set.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;
use tubekit_core::constants::{THUMBNAIL_CANDIDATE_COUNT, THUMBNAIL_LEAD_IN_SECONDS};
use tubekit_storage::{keys, LocalStorage};

use crate::decoder::VideoDecoder;

/// A decoded frame offered as a selectable cover image, not yet persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailCandidate {
    pub frame_index: u64,
    pub file_path: PathBuf,
    pub url: String,
    /// Display label for the selection gallery.
    pub label: String,
}

/// Frame indices to sample from a stream of the given duration and rate.
///
/// Four indices spaced by `frame_count / 4` across the stream, with the first
/// moved past the 3-second lead-in when the clip is long enough (opening
/// frames are often black). Streams with fewer than four frames yield no
/// indices at all.
pub fn candidate_frame_indices(duration_seconds: f64, fps: f64) -> Vec<u64> {
    if duration_seconds <= 0.0 || fps <= 0.0 {
        return Vec::new();
    }

    let frame_count = duration_seconds.floor() as u64 * fps.floor() as u64;
    let step = frame_count / THUMBNAIL_CANDIDATE_COUNT;
    if step == 0 {
        return Vec::new();
    }

    let mut indices: Vec<u64> = (0..THUMBNAIL_CANDIDATE_COUNT).map(|i| i * step).collect();

    let lead_in = fps.floor() as u64 * THUMBNAIL_LEAD_IN_SECONDS;
    if lead_in < frame_count {
        indices[0] = lead_in;
    }

    indices
}

/// Extracts candidate cover frames from uploaded clips.
pub struct ThumbnailExtractor {
    decoder: Arc<dyn VideoDecoder>,
    storage: LocalStorage,
}

impl ThumbnailExtractor {
    pub fn new(decoder: Arc<dyn VideoDecoder>, storage: LocalStorage) -> Self {
        Self { decoder, storage }
    }

    /// Sample candidate thumbnails from the video at `media_path`.
    ///
    /// Candidate files are written under `thumbs/` in the storage area, named
    /// after `stem` and the frame index. Returns `None` on any open or decode
    /// failure; callers treat that as a normal, displayable state.
    pub async fn extract_candidates(
        &self,
        media_path: &std::path::Path,
        stem: &str,
    ) -> Option<Vec<ThumbnailCandidate>> {
        match self.try_extract(media_path, stem).await {
            Ok(candidates) => Some(candidates),
            Err(error) => {
                tracing::debug!(
                    %error,
                    path = %media_path.display(),
                    "Thumbnail extraction failed, offering no candidates"
                );
                None
            }
        }
    }

    async fn try_extract(
        &self,
        media_path: &std::path::Path,
        stem: &str,
    ) -> Result<Vec<ThumbnailCandidate>> {
        // Stream handle is released by drop on every path out of this fn.
        let mut stream = self.decoder.open(media_path).await?;

        let indices =
            candidate_frame_indices(stream.duration_seconds(), stream.frames_per_second());
        if indices.is_empty() {
            bail!("Clip too short for thumbnail sampling");
        }

        let mut candidates: Vec<ThumbnailCandidate> = Vec::with_capacity(indices.len());

        for frame_index in indices {
            let key = keys::thumbnail_key(stem, frame_index);
            let path = self.storage.prepare_path(&key).await?;

            if let Err(error) = stream.decode_frame(frame_index, &path).await {
                // A partial candidate set is worse than none.
                self.discard_candidates(&candidates).await;
                return Err(error);
            }

            candidates.push(ThumbnailCandidate {
                frame_index,
                url: self.storage.public_url(&key),
                label: format!("Frame {}", frame_index),
                file_path: path,
            });
        }

        tracing::debug!(
            count = candidates.len(),
            path = %media_path.display(),
            "Thumbnail candidates extracted"
        );

        Ok(candidates)
    }

    /// Delete candidate files, best-effort. Used for both abort cleanup and
    /// discarding unchosen candidates after the final save.
    pub async fn discard_candidates(&self, candidates: &[ThumbnailCandidate]) {
        for candidate in candidates {
            if let Err(error) = tokio::fs::remove_file(&candidate.file_path).await {
                tracing::warn!(
                    %error,
                    path = %candidate.file_path.display(),
                    "Failed to remove thumbnail candidate"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockDecoder;
    use tempfile::tempdir;

    async fn test_storage(dir: &std::path::Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:8000/media".to_string())
            .await
            .unwrap()
    }

    #[test]
    fn test_indices_skip_lead_in() {
        // 8s at 30fps: 240 frames, step 60, first index moved to 3s.
        let indices = candidate_frame_indices(8.0, 30.0);
        assert_eq!(indices, vec![90, 60, 120, 180]);
    }

    #[test]
    fn test_indices_long_video() {
        // 100s at 25fps: 2500 frames, step 625.
        let indices = candidate_frame_indices(100.0, 25.0);
        assert_eq!(indices, vec![75, 625, 1250, 1875]);
    }

    #[test]
    fn test_indices_short_video_keeps_step_index() {
        // 2s at 30fps: 60 frames; the 3-second lead-in (frame 90) is past the
        // end, so the step-derived first index stays.
        let indices = candidate_frame_indices(2.0, 30.0);
        assert_eq!(indices, vec![0, 15, 30, 45]);
    }

    #[test]
    fn test_indices_fractional_rates_truncate() {
        // floor(duration) * floor(fps): 10s at 29.97fps -> 290 frames, step 72.
        let indices = candidate_frame_indices(10.9, 29.97);
        assert_eq!(indices, vec![87, 72, 144, 216]);
    }

    #[test]
    fn test_indices_tiny_stream_yields_none() {
        let indices = candidate_frame_indices(1.0, 2.0);
        assert!(indices.is_empty());

        assert!(candidate_frame_indices(0.0, 30.0).is_empty());
        assert!(candidate_frame_indices(8.0, 0.0).is_empty());
    }

    #[tokio::test]
    async fn test_extract_candidates_success() {
        let dir = tempdir().unwrap();
        let storage = test_storage(dir.path()).await;
        let decoder = Arc::new(MockDecoder::ok(8.0, 30.0));
        let extractor = ThumbnailExtractor::new(decoder, storage);

        let candidates = extractor
            .extract_candidates(&dir.path().join("clip.mp4"), "clip")
            .await
            .expect("extraction should succeed");

        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].frame_index, 90); // floor(fps) * 3
        assert!(candidates[1].frame_index < candidates[2].frame_index);
        assert!(candidates[2].frame_index < candidates[3].frame_index);

        for candidate in &candidates {
            assert!(candidate.file_path.is_file());
            assert!(candidate
                .url
                .starts_with("http://localhost:8000/media/thumbs/clip_"));
        }
    }

    #[tokio::test]
    async fn test_extract_candidates_open_failure_is_none() {
        let dir = tempdir().unwrap();
        let storage = test_storage(dir.path()).await;
        let decoder = Arc::new(MockDecoder::open_fails());
        let extractor = ThumbnailExtractor::new(decoder, storage);

        let candidates = extractor
            .extract_candidates(&dir.path().join("clip.mp4"), "clip")
            .await;

        assert!(candidates.is_none());
    }

    #[tokio::test]
    async fn test_extract_candidates_decode_failure_leaves_no_partials() {
        let dir = tempdir().unwrap();
        let storage = test_storage(dir.path()).await;
        // 8s at 30fps samples [90, 60, 120, 180]; fail on the third.
        let decoder = Arc::new(MockDecoder::fails_at_frame(8.0, 30.0, 120));
        let extractor = ThumbnailExtractor::new(decoder, storage);

        let candidates = extractor
            .extract_candidates(&dir.path().join("clip.mp4"), "clip")
            .await;

        assert!(candidates.is_none());

        // The two frames written before the failure were cleaned up.
        let thumbs_dir = dir.path().join("thumbs");
        if thumbs_dir.exists() {
            let leftover: Vec<_> = std::fs::read_dir(&thumbs_dir).unwrap().collect();
            assert!(leftover.is_empty(), "partial candidates left behind");
        }
    }

    #[tokio::test]
    async fn test_extract_candidates_too_short_is_none() {
        let dir = tempdir().unwrap();
        let storage = test_storage(dir.path()).await;
        let decoder = Arc::new(MockDecoder::ok(1.0, 2.0));
        let extractor = ThumbnailExtractor::new(decoder, storage);

        let candidates = extractor
            .extract_candidates(&dir.path().join("clip.mp4"), "clip")
            .await;

        assert!(candidates.is_none());
    }
}
