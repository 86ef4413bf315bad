use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AgeRestriction;

/// Top-level content stream that clips and series are displayed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Uuid,
    /// External content identifier used by the host platform.
    pub content_id: String,
    pub title: String,
    pub age_restriction: Option<AgeRestriction>,
}
