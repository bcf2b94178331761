//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod media;
pub mod report;

// Re-export common types
pub use capture::{CapturePhase, CaptureStateMachine};
pub use config::AppConfig;
pub use error::*;
pub use media::{Duration, MediaMimeType, MediaResource, SlotId};
pub use report::{compose, EnvironmentInfo, ExportFormat, ReportDocument, ReportSnapshot};
