//! Media domain types
//!
//! Input resources (bytes + mime + metadata), slot identity, and the
//! recording duration value object.

pub mod duration;
pub mod resource;
pub mod slot;

pub use duration::Duration;
pub use resource::{MediaMimeType, MediaResource};
pub use slot::SlotId;
