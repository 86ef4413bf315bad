use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Viewer age rating referenced by channels and clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRestriction {
    pub id: Uuid,
    /// Rating age, i.e. 13, 18.
    pub age: i32,
    /// Rating symbol, i.e. PG, R, G.
    pub symbol: Option<String>,
    /// Explanation of the symbol, i.e. "Parental Guidance Suggested".
    pub description: Option<String>,
}
