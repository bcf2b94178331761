//! Report export encoders

pub mod docx;
pub mod pdf;
pub mod text;

pub use docx::DocxEncoder;
pub use pdf::PdfEncoder;
pub use text::TextEncoder;
