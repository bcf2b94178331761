//! PDF report encoder
//!
//! Renders the report body line by line in a monospace font on A4
//! pages, with a bold title line on the first page.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::application::ports::{EncodeError, ReportEncoder};
use crate::domain::report::ReportDocument;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const LINE_HEIGHT_MM: f32 = 4.6;

const TITLE_SIZE_PT: f32 = 14.0;
const META_SIZE_PT: f32 = 10.0;
const BODY_SIZE_PT: f32 = 9.0;

pub struct PdfEncoder;

impl ReportEncoder for PdfEncoder {
    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, EncodeError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            "Multimodal → Text Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let title_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| EncodeError(e.to_string()))?;
        let meta_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| EncodeError(e.to_string()))?;
        let body_font = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| EncodeError(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

        layer.use_text(
            "Multimodal → Text Report",
            TITLE_SIZE_PT,
            Mm(MARGIN_MM),
            Mm(y),
            &title_font,
        );
        y -= LINE_HEIGHT_MM * 2.0;

        for line in document.meta().lines() {
            layer.use_text(line, META_SIZE_PT, Mm(MARGIN_MM), Mm(y), &meta_font);
            y -= LINE_HEIGHT_MM;
        }
        y -= LINE_HEIGHT_MM;

        for line in document.body().lines() {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }

            if !line.is_empty() {
                layer.use_text(line, BODY_SIZE_PT, Mm(MARGIN_MM), Mm(y), &body_font);
            }
            y -= LINE_HEIGHT_MM;
        }

        doc.save_to_bytes().map_err(|e| EncodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{compose, EnvironmentInfo, ReportSnapshot};

    fn doc() -> ReportDocument {
        let env = EnvironmentInfo::new("CLI (linux)");
        compose(&ReportSnapshot {
            text: "hello pdf",
            recorded_audio: None,
            uploaded_audio: None,
            image: None,
            caption: None,
            environment: &env,
        })
    }

    #[test]
    fn output_is_valid_pdf() {
        let bytes = PdfEncoder.encode(&doc()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_body_paginates() {
        let env = EnvironmentInfo::new("CLI (linux)");
        let long_text = (0..300)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let document = compose(&ReportSnapshot {
            text: &long_text,
            recorded_audio: None,
            uploaded_audio: None,
            image: None,
            caption: None,
            environment: &env,
        });

        let bytes = PdfEncoder.encode(&document).unwrap();
        // Several /Page objects means pagination happened
        let needle = b"/Page";
        let pages = bytes
            .windows(needle.len())
            .filter(|w| w == needle)
            .count();
        assert!(pages > 1);
    }
}
