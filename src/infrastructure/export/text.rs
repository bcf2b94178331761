//! Plain-text report encoder
//!
//! The TXT export is the report body verbatim, UTF-8 encoded.

use crate::application::ports::{EncodeError, ReportEncoder};
use crate::domain::report::ReportDocument;

pub struct TextEncoder;

impl ReportEncoder for TextEncoder {
    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, EncodeError> {
        Ok(document.body().as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{compose, EnvironmentInfo, ReportSnapshot};

    #[test]
    fn bytes_are_body_verbatim() {
        let env = EnvironmentInfo::new("CLI (linux)");
        let doc = compose(&ReportSnapshot {
            text: "X",
            recorded_audio: None,
            uploaded_audio: None,
            image: None,
            caption: None,
            environment: &env,
        });

        let bytes = TextEncoder.encode(&doc).unwrap();
        assert_eq!(bytes, doc.body().as_bytes());
        assert!(String::from_utf8(bytes).unwrap().contains("X"));
    }
}
