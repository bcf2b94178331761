//! Report encoding port interface

use thiserror::Error;

use crate::domain::report::ReportDocument;

/// Encoding errors from the underlying renderer/serializer
#[derive(Debug, Clone, Error)]
#[error("Export encoding failed: {0}")]
pub struct EncodeError(pub String);

/// Port for encoding a report into one output format.
/// Implementations are independent, stateless transforms; a failure in
/// one format does not affect the others.
pub trait ReportEncoder: Send + Sync {
    /// Encode the document into the target format's bytes
    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, EncodeError>;
}
