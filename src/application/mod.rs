//! Application layer
//!
//! Use cases and port definitions sitting between the domain and the
//! infrastructure adapters.

pub mod captioning;
pub mod export;
pub mod lifecycle;
pub mod ports;
pub mod session;

pub use captioning::{CaptioningGateway, PipelineState};
pub use export::{ExportArtifact, ExportDispatcher, ExportError};
pub use lifecycle::ResourceLifecycle;
pub use session::{ReportSession, SessionError};
