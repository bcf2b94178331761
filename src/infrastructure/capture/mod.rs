//! Audio capture adapters

pub mod cpal_source;
pub mod flac;

pub use cpal_source::CpalCaptureSource;
