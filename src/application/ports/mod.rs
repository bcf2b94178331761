//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod captioner;
pub mod config;
pub mod exporter;
pub mod preview;

// Re-export common types
pub use capture::{CaptureError, CaptureSource, CaptureStream, CapturedAudio};
pub use captioner::{CaptionError, CaptionOutput, Captioner, CaptionerFactory};
pub use config::ConfigStore;
pub use exporter::{EncodeError, ReportEncoder};
pub use preview::{PreviewError, PreviewHandle, PreviewRegistry};
