//! Shared key generation for storage backends.

use uuid::Uuid;

/// Key for an uploaded media file.
pub fn media_key(filename: &str) -> String {
    format!("media/{}", filename)
}

/// Key for a candidate thumbnail sampled at `frame_index`.
///
/// `stem` is the stored media filename without its extension, which is unique
/// per upload, so concurrent extractions never collide on a key.
pub fn thumbnail_key(stem: &str, frame_index: u64) -> String {
    format!("thumbs/{}_{}.jpg", stem, frame_index)
}

/// Key for a clip's persisted cover image.
pub fn cover_key(clip_id: Uuid, extension: &str) -> String {
    format!("covers/{}.{}", clip_id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(media_key("abc.mp4"), "media/abc.mp4");
        assert_eq!(thumbnail_key("abc", 90), "thumbs/abc_90.jpg");

        let id = Uuid::new_v4();
        assert_eq!(cover_key(id, "jpg"), format!("covers/{}.jpg", id));
    }
}
