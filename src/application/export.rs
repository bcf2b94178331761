//! Export dispatch
//!
//! Routes a built report to the encoder for the requested format and
//! pairs the encoded bytes with a download filename.

use thiserror::Error;

use crate::domain::report::{ExportFormat, ReportDocument};

use super::ports::{EncodeError, ReportEncoder};

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("No report has been generated yet")]
    NothingToExport,

    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

/// One encoded export, ready to be written out
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
}

/// Holds one encoder per supported format and dispatches on request.
/// Encoders are independent; a failure in one format leaves the others
/// usable.
pub struct ExportDispatcher {
    text: Box<dyn ReportEncoder>,
    pdf: Box<dyn ReportEncoder>,
    docx: Box<dyn ReportEncoder>,
}

impl ExportDispatcher {
    pub fn new(
        text: Box<dyn ReportEncoder>,
        pdf: Box<dyn ReportEncoder>,
        docx: Box<dyn ReportEncoder>,
    ) -> Self {
        Self { text, pdf, docx }
    }

    /// Encode a report in the requested format.
    /// The artifact filename is the document's stem plus the format's
    /// extension.
    pub fn export(
        &self,
        document: &ReportDocument,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let encoder = match format {
            ExportFormat::Text => &self.text,
            ExportFormat::Pdf => &self.pdf,
            ExportFormat::Docx => &self.docx,
        };

        let bytes = encoder.encode(document)?;

        Ok(ExportArtifact {
            filename: format!("{}.{}", document.filename_stem(), format.extension()),
            bytes,
            format,
        })
    }
}
