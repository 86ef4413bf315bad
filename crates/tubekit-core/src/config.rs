//! Configuration module
//!
//! Environment-driven configuration for the media intake and thumbnail
//! extraction services. Values come from the process environment, with a
//! `.env` file loaded first when present.

use std::env;

use crate::constants::DEFAULT_MAX_VIDEO_SIZE_MB;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct TubeConfig {
    pub environment: String,
    /// Path to the ffmpeg executable used for frame extraction.
    pub ffmpeg_path: String,
    /// Path to the ffprobe executable used for stream metadata.
    pub ffprobe_path: String,
    /// Root directory for uploaded media and generated thumbnails.
    pub local_storage_path: String,
    /// Public base URL under which files in `local_storage_path` are served.
    pub local_storage_base_url: String,
    pub max_video_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
}

impl TubeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenvy::dotenv();

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB);

        let video_allowed_content_types = env::var("VIDEO_ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| {
                "video/mp4,video/webm,video/quicktime,video/x-msvideo,video/x-matroska"
                    .to_string()
            })
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = TubeConfig {
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./media".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/media".to_string()),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            video_allowed_content_types,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.local_storage_path.trim().is_empty() {
            anyhow::bail!("LOCAL_STORAGE_PATH must not be empty");
        }
        if self.local_storage_base_url.trim().is_empty() {
            anyhow::bail!("LOCAL_STORAGE_BASE_URL must not be empty");
        }
        if self.max_video_size_bytes == 0 {
            anyhow::bail!("MAX_VIDEO_SIZE_MB must be greater than zero");
        }
        if self.video_allowed_content_types.is_empty() {
            anyhow::bail!("VIDEO_ALLOWED_CONTENT_TYPES must list at least one type");
        }
        for content_type in &self.video_allowed_content_types {
            if !content_type.starts_with("video/") {
                anyhow::bail!(
                    "VIDEO_ALLOWED_CONTENT_TYPES entry '{}' is not a video type",
                    content_type
                );
            }
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TubeConfig {
        TubeConfig {
            environment: "test".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            local_storage_path: "/tmp/tubekit-media".to_string(),
            local_storage_base_url: "http://localhost:8000/media".to_string(),
            max_video_size_bytes: 100 * 1024 * 1024,
            video_allowed_content_types: vec!["video/mp4".to_string()],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_storage_path() {
        let mut config = test_config();
        config.local_storage_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_video_content_type() {
        let mut config = test_config();
        config.video_allowed_content_types = vec!["image/png".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "prod".to_string();
        assert!(config.is_production());
    }
}
