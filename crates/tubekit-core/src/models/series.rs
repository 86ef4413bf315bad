use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Channel;

/// Identity entity grouping clips into installments.
///
/// A series may carry its own channel. When it does, that channel takes
/// priority over the channel set on any of its clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: Uuid,
    pub title: String,
    pub channel: Option<Channel>,
}

/// Season of a series. Clips are attached through [`Episode`] join records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,
    pub series_id: Uuid,
    pub number: i32,
    pub title: Option<String>,
}

/// Join record ordering a clip within a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub clip_id: Uuid,
    pub season_id: Uuid,
    /// Position within the season. Unnumbered episodes sort last.
    pub episode_number: Option<i32>,
}

/// Sort a season's episodes into display order.
///
/// Episodes are ordered by `episode_number` ascending; episodes without a
/// number keep their relative order at the end.
pub fn sort_episodes(episodes: &mut [Episode]) {
    episodes.sort_by_key(|e| (e.episode_number.is_none(), e.episode_number));
}
