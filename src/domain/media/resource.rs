//! Media resource value object

use std::fmt;
use std::path::Path;

/// Supported media MIME types.
///
/// Unknown upload types degrade to the `audio/*` / `image/*` wildcard so
/// the report can still describe the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaMimeType {
    Flac,
    Ogg,
    Mp3,
    Wav,
    Webm,
    Mp4,
    Png,
    Jpeg,
    Gif,
    AudioOther,
    ImageOther,
}

impl MediaMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mp3",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Mp4 => "audio/mp4",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::AudioOther => "audio/*",
            Self::ImageOther => "image/*",
        }
    }

    /// Get the file extension used for preview files
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::AudioOther | Self::ImageOther => "bin",
        }
    }

    /// Whether this is an image type
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Gif | Self::ImageOther)
    }

    /// Guess an audio mime type from a file path extension.
    /// Unknown extensions map to the `audio/*` wildcard.
    pub fn audio_from_path(path: &Path) -> Self {
        match ext_lowercase(path).as_deref() {
            Some("flac") => Self::Flac,
            Some("ogg" | "oga" | "opus") => Self::Ogg,
            Some("mp3") => Self::Mp3,
            Some("wav") => Self::Wav,
            Some("webm") => Self::Webm,
            Some("mp4" | "m4a") => Self::Mp4,
            _ => Self::AudioOther,
        }
    }

    /// Guess an image mime type from a file path extension.
    /// Unknown extensions map to the `image/*` wildcard.
    pub fn image_from_path(path: &Path) -> Self {
        match ext_lowercase(path).as_deref() {
            Some("png") => Self::Png,
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("gif") => Self::Gif,
            _ => Self::ImageOther,
        }
    }
}

fn ext_lowercase(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

impl fmt::Display for MediaMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for MediaMimeType {
    /// Fallback encoding when the capture environment does not report one
    fn default() -> Self {
        Self::Flac
    }
}

/// Value object representing one user-provided input resource.
/// Contains raw bytes, its MIME type, and an optional filename
/// (present for uploads, absent for recordings).
#[derive(Debug, Clone)]
pub struct MediaResource {
    data: Vec<u8>,
    mime_type: MediaMimeType,
    filename: Option<String>,
}

impl MediaResource {
    /// Create a resource from raw bytes
    pub fn new(data: Vec<u8>, mime_type: MediaMimeType) -> Self {
        Self {
            data,
            mime_type,
            filename: None,
        }
    }

    /// Create a named resource (upload path)
    pub fn with_filename(
        data: Vec<u8>,
        mime_type: MediaMimeType,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            data,
            mime_type,
            filename: Some(filename.into()),
        }
    }

    /// Get the raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> MediaMimeType {
        self.mime_type
    }

    /// Get the original filename, if any
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether the resource holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the resource bytes as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}
