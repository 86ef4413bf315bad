//! Tubekit Storage Library
//!
//! Storage abstraction for uploaded media and generated thumbnails: the
//! `Storage` trait plus a local filesystem backend serving files from a root
//! path under a public base URL.
//!
//! # Storage key format
//!
//! All backends use the same key layout:
//!
//! - **Uploaded media**: `media/{filename}`
//! - **Thumbnail candidates**: `thumbs/{stem}_{frame_index}.jpg`
//! - **Persisted cover images**: `covers/{clip_id}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so producers and backends stay consistent.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubekit_core::StorageBackend;
