//! Report domain
//!
//! The composed plain-text report, its environment header, and the
//! compositor that renders the current slot contents into a document.

pub mod compositor;
pub mod document;
pub mod environment;
pub mod format;

pub use compositor::{compose, ReportSnapshot};
pub use document::ReportDocument;
pub use environment::EnvironmentInfo;
pub use format::ExportFormat;
