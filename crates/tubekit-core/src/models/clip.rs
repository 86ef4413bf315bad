use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AgeRestriction, Channel, Series};

/// Uploaded clip file as stored in the media area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResource {
    /// Sanitized original filename, kept for display.
    pub filename: String,
    pub storage_key: String,
    pub url: String,
    pub content_type: String,
    pub file_size: i64,
}

/// Persisted cover image chosen from the extracted thumbnail candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    pub storage_key: String,
    pub url: String,
    pub content_type: String,
}

/// Duration split into display units.
///
/// Satisfies `3600 * hours + 60 * minutes + seconds == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Decompose a duration in seconds into hours, minutes, and seconds.
pub fn hours_minutes_seconds(total: u64) -> DurationParts {
    DurationParts {
        hours: total / 3600,
        minutes: (total % 3600) / 60,
        seconds: total % 60,
    }
}

/// An uploaded video item with its metadata.
///
/// A single composed record: the optional sub-structures stand in for what
/// would be foreign keys in the host's persistence layer, resolved for
/// display. The media resource and cover image are absent until intake
/// completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: Uuid,
    pub title: String,
    /// Duration in seconds, normally determined from the uploaded media.
    pub duration: Option<u64>,
    pub age_restriction: Option<AgeRestriction>,
    /// Series this clip is an episode of. When set, its channel takes
    /// priority over [`Clip::channel`].
    pub series: Option<Series>,
    /// Channel this clip is displayed on. Only honoured when no series is
    /// set.
    pub channel: Option<Channel>,
    pub media: Option<MediaResource>,
    pub cover_image: Option<StoredImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Clip {
    /// Channel this clip is displayed under.
    ///
    /// When a series is set its channel is authoritative, even when that
    /// channel is absent; the clip's own channel is not used as a fallback
    /// in that case.
    pub fn effective_channel(&self) -> Option<&Channel> {
        if let Some(series) = &self.series {
            return series.channel.as_ref();
        }
        self.channel.as_ref()
    }

    /// Content identifier of the effective channel, when one resolves.
    pub fn effective_channel_id(&self) -> Option<&str> {
        self.effective_channel().map(|c| c.content_id.as_str())
    }

    /// Display title of the related series, or the empty string.
    pub fn series_title(&self) -> String {
        self.series
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_default()
    }

    /// Identifier of the related series, or the empty string.
    pub fn series_id(&self) -> String {
        self.series
            .as_ref()
            .map(|s| s.id.to_string())
            .unwrap_or_default()
    }

    /// Duration split into hours, minutes, and seconds, when known.
    pub fn duration_parts(&self) -> Option<DurationParts> {
        self.duration.map(hours_minutes_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_channel(content_id: &str) -> Channel {
        Channel {
            id: Uuid::new_v4(),
            content_id: content_id.to_string(),
            title: format!("Channel {}", content_id),
            age_restriction: None,
        }
    }

    fn test_clip() -> Clip {
        Clip {
            id: Uuid::new_v4(),
            title: "Test clip".to_string(),
            duration: None,
            age_restriction: None,
            series: None,
            channel: None,
            media: None,
            cover_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hours_minutes_seconds_zero() {
        let parts = hours_minutes_seconds(0);
        assert_eq!(parts.hours, 0);
        assert_eq!(parts.minutes, 0);
        assert_eq!(parts.seconds, 0);
    }

    #[test]
    fn test_hours_minutes_seconds_exact_minute() {
        let parts = hours_minutes_seconds(3660);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 0);
    }

    #[test]
    fn test_hours_minutes_seconds_with_remainder() {
        let parts = hours_minutes_seconds(3665);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 5);
    }

    #[test]
    fn test_hours_minutes_seconds_large() {
        let parts = hours_minutes_seconds(74564376);
        assert_eq!(parts.hours, 20712);
        assert_eq!(parts.minutes, 19);
        assert_eq!(parts.seconds, 36);
    }

    #[test]
    fn test_hours_minutes_seconds_identity() {
        for total in [1u64, 59, 60, 61, 3599, 3600, 3601, 86400, 1234567] {
            let parts = hours_minutes_seconds(total);
            assert_eq!(parts.hours * 3600 + parts.minutes * 60 + parts.seconds, total);
            assert!(parts.minutes < 60);
            assert!(parts.seconds < 60);
        }
    }

    #[test]
    fn test_effective_channel_prefers_series_channel() {
        let series_channel = test_channel("series-channel");
        let own_channel = test_channel("own-channel");

        let mut clip = test_clip();
        clip.channel = Some(own_channel);
        clip.series = Some(Series {
            id: Uuid::new_v4(),
            title: "A show".to_string(),
            channel: Some(series_channel.clone()),
        });

        assert_eq!(clip.effective_channel(), Some(&series_channel));
        assert_eq!(clip.effective_channel_id(), Some("series-channel"));
    }

    #[test]
    fn test_effective_channel_series_without_channel_short_circuits() {
        // A series without a channel wins over the clip's own channel.
        let mut clip = test_clip();
        clip.channel = Some(test_channel("own-channel"));
        clip.series = Some(Series {
            id: Uuid::new_v4(),
            title: "A show".to_string(),
            channel: None,
        });

        assert_eq!(clip.effective_channel(), None);
        assert_eq!(clip.effective_channel_id(), None);
    }

    #[test]
    fn test_effective_channel_falls_back_to_own_channel() {
        let own_channel = test_channel("own-channel");
        let mut clip = test_clip();
        clip.channel = Some(own_channel.clone());

        assert_eq!(clip.effective_channel(), Some(&own_channel));
        assert_eq!(clip.effective_channel_id(), Some("own-channel"));
    }

    #[test]
    fn test_effective_channel_none_when_unset() {
        let clip = test_clip();
        assert_eq!(clip.effective_channel(), None);
        assert_eq!(clip.effective_channel_id(), None);
    }

    #[test]
    fn test_effective_channel_idempotent() {
        let mut clip = test_clip();
        clip.series = Some(Series {
            id: Uuid::new_v4(),
            title: "A show".to_string(),
            channel: Some(test_channel("x")),
        });

        let first = clip.effective_channel().cloned();
        let second = clip.effective_channel().cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_series_accessors_empty_string_sentinels() {
        let clip = test_clip();
        assert_eq!(clip.series_title(), "");
        assert_eq!(clip.series_id(), "");
    }

    #[test]
    fn test_series_accessors_with_series() {
        let series_id = Uuid::new_v4();
        let mut clip = test_clip();
        clip.series = Some(Series {
            id: series_id,
            title: "A show".to_string(),
            channel: None,
        });

        assert_eq!(clip.series_title(), "A show");
        assert_eq!(clip.series_id(), series_id.to_string());
    }

    #[test]
    fn test_duration_parts_none_when_unknown() {
        let clip = test_clip();
        assert_eq!(clip.duration_parts(), None);
    }

    #[test]
    fn test_duration_parts_from_duration() {
        let mut clip = test_clip();
        clip.duration = Some(3665);
        assert_eq!(
            clip.duration_parts(),
            Some(DurationParts {
                hours: 1,
                minutes: 1,
                seconds: 5
            })
        );
    }
}
