//! Application-wide constants.

/// Number of candidate thumbnails sampled from an uploaded clip.
pub const THUMBNAIL_CANDIDATE_COUNT: u64 = 4;

/// Seconds skipped at the start of a clip when choosing the first candidate frame.
/// Opening frames are often black or still on a title card.
pub const THUMBNAIL_LEAD_IN_SECONDS: u64 = 3;

/// Default cap on uploaded clip size, in megabytes.
pub const DEFAULT_MAX_VIDEO_SIZE_MB: usize = 500;
