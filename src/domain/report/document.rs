//! Report document value object

use chrono::{DateTime, SecondsFormat, Utc};

/// A fully composed plain-text report.
///
/// Derived from the slot contents at compose time; regenerated wholesale
/// on each build, never partially updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    body: String,
    created_at: DateTime<Utc>,
    environment: String,
}

impl ReportDocument {
    /// Create a document (called by the compositor)
    pub(crate) fn new(body: String, created_at: DateTime<Utc>, environment: String) -> Self {
        Self {
            body,
            created_at,
            environment,
        }
    }

    /// The full report text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation time of this document
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The environment descriptor recorded in the header
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Creation time as an ISO-8601 string, as it appears on the
    /// `Timestamp:` header line
    pub fn timestamp(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The "print" projection metadata block (timestamp + environment),
    /// used by the PDF template
    pub fn meta(&self) -> String {
        format!(
            "Timestamp: {}\nBrowser: {}",
            self.timestamp(),
            self.environment
        )
    }

    /// Timestamped filename stem for export artifacts
    pub fn filename_stem(&self) -> String {
        format!(
            "multimodal_text_output_{}",
            self.created_at.timestamp_millis()
        )
    }
}
