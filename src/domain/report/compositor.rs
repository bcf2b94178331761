//! Report compositor
//!
//! Renders the current state of all input slots into one ordered
//! plain-text document. Section ordering and labels are part of the
//! external report contract; downstream tooling may parse them.

use chrono::Utc;

use super::document::ReportDocument;
use super::environment::EnvironmentInfo;
use crate::domain::media::MediaResource;

/// Placeholder when no free text was entered
const NO_TEXT: &str = "(ไม่มีข้อความ)";
/// Audio summary when neither recorded nor uploaded audio exists
const NO_AUDIO: &str = "เสียง: (ไม่มี)";
/// Image summary when no image was uploaded
const NO_IMAGE: &str = "รูปภาพ: (ไม่มี)";
/// Caption placeholder before any caption run completed
const NO_CAPTION: &str = "(ยังไม่สร้าง/ไม่มีผลลัพธ์)";
/// Transcription is not implemented in this version
const NO_TRANSCRIPTION: &str = "(ยังไม่ถอดเสียงเป็นข้อความในเวอร์ชันนี้)";

/// Horizontal rule under the report header
const RULE: &str = "------------------------------------------------------------";

/// Snapshot of all slot contents taken at build time.
/// The compositor reads from the slots but does not own them.
#[derive(Debug, Clone, Copy)]
pub struct ReportSnapshot<'a> {
    pub text: &'a str,
    pub recorded_audio: Option<&'a MediaResource>,
    pub uploaded_audio: Option<&'a MediaResource>,
    pub image: Option<&'a MediaResource>,
    pub caption: Option<&'a str>,
    pub environment: &'a EnvironmentInfo,
}

/// Compose a report from the current slot contents.
///
/// Pure apart from the wall-clock timestamp captured at build time: two
/// builds of the same snapshot differ only in the `Timestamp:` line.
pub fn compose(snapshot: &ReportSnapshot<'_>) -> ReportDocument {
    let created_at = Utc::now();
    let environment = snapshot.environment.descriptor().to_string();

    let mut lines: Vec<String> = Vec::new();
    lines.push("MULTIMODAL → TEXT REPORT".to_string());
    lines.push(format!(
        "Timestamp: {}",
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    ));
    lines.push(format!("Browser: {}", environment));
    lines.push(RULE.to_string());
    lines.push(String::new());
    lines.push("SECTION A: TEXT (User Input)".to_string());
    lines.push(if snapshot.text.is_empty() {
        NO_TEXT.to_string()
    } else {
        snapshot.text.to_string()
    });
    lines.push(String::new());
    lines.push("SECTION B: AUDIO".to_string());
    lines.push(audio_summary(snapshot));
    lines.push(format!("Transcription: {}", NO_TRANSCRIPTION));
    lines.push(String::new());
    lines.push("SECTION C: IMAGE".to_string());
    lines.push(image_summary(snapshot.image));
    lines.push(format!(
        "Image→Text (Transformer): {}",
        snapshot.caption.filter(|c| !c.is_empty()).unwrap_or(NO_CAPTION)
    ));
    lines.push(String::new());
    lines.push("END OF REPORT".to_string());

    ReportDocument::new(lines.join("\n"), created_at, environment)
}

/// Audio summary line. The recorded resource takes precedence over the
/// uploaded one when both exist.
fn audio_summary(snapshot: &ReportSnapshot<'_>) -> String {
    if let Some(rec) = snapshot.recorded_audio {
        return format!(
            "เสียง (อัด): MIME={}, Size={} bytes",
            rec.mime_type(),
            rec.size_bytes()
        );
    }
    if let Some(up) = snapshot.uploaded_audio {
        return format!(
            "เสียง (อัปโหลด): Name={}, MIME={}, Size={} bytes",
            up.filename().unwrap_or("-"),
            up.mime_type(),
            up.size_bytes()
        );
    }
    NO_AUDIO.to_string()
}

/// Image summary line
fn image_summary(image: Option<&MediaResource>) -> String {
    match image {
        Some(img) => format!(
            "รูปภาพ: Name={}, MIME={}, Size={} bytes",
            img.filename().unwrap_or("-"),
            img.mime_type(),
            img.size_bytes()
        ),
        None => NO_IMAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MediaMimeType;

    fn env() -> EnvironmentInfo {
        EnvironmentInfo::new("CLI (linux)")
    }

    fn empty_snapshot(environment: &EnvironmentInfo) -> ReportSnapshot<'_> {
        ReportSnapshot {
            text: "",
            recorded_audio: None,
            uploaded_audio: None,
            image: None,
            caption: None,
            environment,
        }
    }

    #[test]
    fn empty_inputs_use_placeholders() {
        let environment = env();
        let doc = compose(&empty_snapshot(&environment));
        let body = doc.body();

        assert!(body.contains("SECTION A: TEXT (User Input)\n(ไม่มีข้อความ)"));
        assert!(body.contains("SECTION B: AUDIO\nเสียง: (ไม่มี)"));
        assert!(body.contains("SECTION C: IMAGE\nรูปภาพ: (ไม่มี)"));
        assert!(body.contains("Image→Text (Transformer): (ยังไม่สร้าง/ไม่มีผลลัพธ์)"));
    }

    #[test]
    fn header_and_footer_markers() {
        let environment = env();
        let doc = compose(&empty_snapshot(&environment));
        let body = doc.body();

        assert!(body.starts_with("MULTIMODAL → TEXT REPORT\n"));
        assert!(body.contains("\nBrowser: CLI (linux)\n"));
        assert!(body.contains(&format!("\nTimestamp: {}\n", doc.timestamp())));
        assert!(body.contains(&"-".repeat(60)));
        assert!(body.ends_with("\nEND OF REPORT"));
    }

    #[test]
    fn transcription_not_implemented_line() {
        let environment = env();
        let doc = compose(&empty_snapshot(&environment));
        assert!(doc
            .body()
            .contains("Transcription: (ยังไม่ถอดเสียงเป็นข้อความในเวอร์ชันนี้)"));
    }

    #[test]
    fn text_section_carries_user_input() {
        let environment = env();
        let mut snapshot = empty_snapshot(&environment);
        snapshot.text = "hello\nworld";

        let doc = compose(&snapshot);
        assert!(doc
            .body()
            .contains("SECTION A: TEXT (User Input)\nhello\nworld\n"));
    }

    #[test]
    fn recorded_audio_takes_precedence_over_uploaded() {
        let environment = env();
        let recorded = MediaResource::new(vec![0u8; 64], MediaMimeType::Flac);
        let uploaded =
            MediaResource::with_filename(vec![0u8; 128], MediaMimeType::Mp3, "song.mp3");

        let mut snapshot = empty_snapshot(&environment);
        snapshot.recorded_audio = Some(&recorded);
        snapshot.uploaded_audio = Some(&uploaded);

        let doc = compose(&snapshot);
        assert!(doc
            .body()
            .contains("เสียง (อัด): MIME=audio/flac, Size=64 bytes"));
        assert!(!doc.body().contains("song.mp3"));
    }

    #[test]
    fn uploaded_audio_summary_includes_name() {
        let environment = env();
        let uploaded =
            MediaResource::with_filename(vec![0u8; 128], MediaMimeType::Mp3, "song.mp3");

        let mut snapshot = empty_snapshot(&environment);
        snapshot.uploaded_audio = Some(&uploaded);

        let doc = compose(&snapshot);
        assert!(doc
            .body()
            .contains("เสียง (อัปโหลด): Name=song.mp3, MIME=audio/mp3, Size=128 bytes"));
    }

    #[test]
    fn caption_appears_verbatim() {
        let environment = env();
        let image = MediaResource::with_filename(vec![1, 2, 3], MediaMimeType::Jpeg, "dog.jpg");

        let mut snapshot = empty_snapshot(&environment);
        snapshot.image = Some(&image);
        snapshot.caption = Some("a dog running");

        let doc = compose(&snapshot);
        assert!(doc
            .body()
            .contains("Image→Text (Transformer): a dog running"));
        assert!(doc
            .body()
            .contains("รูปภาพ: Name=dog.jpg, MIME=image/jpeg, Size=3 bytes"));
    }

    #[test]
    fn consecutive_builds_differ_only_in_timestamp() {
        let environment = env();
        let snapshot = empty_snapshot(&environment);

        let a = compose(&snapshot);
        let b = compose(&snapshot);

        let strip = |doc: &ReportDocument| -> Vec<String> {
            doc.body()
                .lines()
                .filter(|l| !l.starts_with("Timestamp: "))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));
    }
}
