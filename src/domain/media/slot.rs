//! Input slot identity

use std::fmt;

/// Identity of one input slot.
/// Each slot holds at most one resource at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    RecordedAudio,
    UploadedAudio,
    Image,
}

impl SlotId {
    /// All slots, in report section order
    pub const ALL: [SlotId; 3] = [Self::RecordedAudio, Self::UploadedAudio, Self::Image];

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RecordedAudio => "recorded-audio",
            Self::UploadedAudio => "uploaded-audio",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
