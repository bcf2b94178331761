//! DOCX report encoder
//!
//! Renders a bold document title, a generation timestamp, and one
//! paragraph per report body line.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use crate::application::ports::{EncodeError, ReportEncoder};
use crate::domain::report::ReportDocument;

// docx-rs sizes are half-points
const TITLE_SIZE: usize = 32;
const META_SIZE: usize = 20;

pub struct DocxEncoder;

impl ReportEncoder for DocxEncoder {
    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, EncodeError> {
        let mut docx = Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text("Multimodal → Text Report")
                        .bold()
                        .size(TITLE_SIZE),
                ),
            )
            .add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(format!("Generated: {}", document.timestamp()))
                        .size(META_SIZE),
                ),
            )
            .add_paragraph(Paragraph::new());

        for line in document.body().lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| EncodeError(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}
