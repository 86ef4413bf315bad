//! Data models for the tube hierarchy
//!
//! Channels sit at the top of the hierarchy; series group clips into ordered
//! installments via seasons and episodes. Clips carry the uploaded media
//! resource and the chosen cover image.

mod age_restriction;
mod channel;
mod clip;
mod series;

// Re-export all models for convenient imports
pub use age_restriction::*;
pub use channel::*;
pub use clip::*;
pub use series::*;
