//! Report session controller
//!
//! Orchestrates the input slots, the recording state machine, the
//! captioning gateway, and export dispatch. One session corresponds to
//! one open "page" of the application.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::capture::{CaptureStateMachine, InvalidCaptureTransition};
use crate::domain::media::{MediaResource, SlotId};
use crate::domain::report::{compose, EnvironmentInfo, ExportFormat, ReportDocument, ReportSnapshot};

use super::captioning::CaptioningGateway;
use super::export::{ExportArtifact, ExportDispatcher, ExportError};
use super::lifecycle::ResourceLifecycle;
use super::ports::{
    CaptionError, CaptionerFactory, CaptureError, CaptureSource, CaptureStream, PreviewError,
    PreviewRegistry,
};

/// Session-level errors, aggregated from the subsystems
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Caption(#[from] CaptionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Transition(#[from] InvalidCaptureTransition),
}

/// Orchestrates one capture-and-report session.
pub struct ReportSession {
    lifecycle: ResourceLifecycle,
    capture: Arc<dyn CaptureSource>,
    machine: CaptureStateMachine,
    live: Option<Box<dyn CaptureStream>>,
    gateway: CaptioningGateway,
    dispatcher: ExportDispatcher,
    environment: EnvironmentInfo,
    text: String,
    caption: Option<String>,
    image_generation: u64,
    report: Option<ReportDocument>,
}

impl ReportSession {
    pub fn new(
        registry: Arc<dyn PreviewRegistry>,
        capture: Arc<dyn CaptureSource>,
        captioner_factory: Box<dyn CaptionerFactory>,
        dispatcher: ExportDispatcher,
        environment: EnvironmentInfo,
    ) -> Self {
        Self {
            lifecycle: ResourceLifecycle::new(registry),
            capture,
            machine: CaptureStateMachine::new(),
            live: None,
            gateway: CaptioningGateway::new(captioner_factory),
            dispatcher,
            environment,
            text: String::new(),
            caption: None,
            image_generation: 0,
            report: None,
        }
    }

    // --- text slot ---

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    // --- audio slots ---

    /// Whether the environment supports audio capture (advisory only)
    pub fn capture_supported(&self) -> bool {
        self.capture.is_supported()
    }

    pub fn is_recording(&self) -> bool {
        self.machine.is_recording()
    }

    /// Store an uploaded audio file in its slot.
    pub fn upload_audio(&mut self, resource: MediaResource) -> Result<(), SessionError> {
        self.lifecycle
            .set_resource(SlotId::UploadedAudio, resource)?;
        Ok(())
    }

    /// Begin a recording session.
    /// Fails while another recording is open or when the environment has
    /// no capture support; on device errors the session stays idle.
    pub async fn start_recording(&mut self) -> Result<(), SessionError> {
        if !self.capture.is_supported() {
            return Err(CaptureError::Unsupported.into());
        }
        if self.machine.is_recording() {
            return Err(InvalidCaptureTransition {
                current_phase: self.machine.phase(),
                action: "start recording".to_string(),
            }
            .into());
        }

        let stream = self.capture.open().await?;

        // Device is live: commit the transition and drop any previous take
        self.machine.start()?;
        self.lifecycle.clear(SlotId::RecordedAudio);
        self.live = Some(stream);
        Ok(())
    }

    /// Stop the open recording and store the result in the
    /// recorded-audio slot. Stopping while idle is a no-op returning
    /// `None`. An empty recording is still stored.
    pub async fn stop_recording(&mut self) -> Result<Option<&MediaResource>, SessionError> {
        if !self.machine.stop() {
            return Ok(None);
        }

        let mut stream = match self.live.take() {
            Some(stream) => stream,
            None => return Ok(None),
        };

        let captured = stream.finish().await?;
        let mime_type = captured.mime_type.unwrap_or_default();
        let resource = MediaResource::new(captured.into_bytes(), mime_type);

        self.lifecycle.set_resource(SlotId::RecordedAudio, resource)?;
        Ok(self.lifecycle.resource(SlotId::RecordedAudio))
    }

    // --- image slot + captioning ---

    /// Store an uploaded image in its slot.
    /// Invalidates any caption of the previous image.
    pub fn upload_image(&mut self, resource: MediaResource) -> Result<(), SessionError> {
        self.lifecycle.set_resource(SlotId::Image, resource)?;
        self.image_generation += 1;
        self.caption = None;
        Ok(())
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Generation counter of the image slot. Bumped on every image
    /// change so late caption results can be recognized as stale.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    /// Apply a caption result produced against `generation`.
    /// Returns false (and discards the text) when the image has changed
    /// since that generation was observed.
    pub fn apply_caption(&mut self, generation: u64, text: String) -> bool {
        if generation != self.image_generation {
            return false;
        }
        self.caption = Some(text);
        true
    }

    /// Caption the current image through the gateway.
    /// Loads the pipeline on first use; the result is stored only if the
    /// image is unchanged when inference completes.
    pub async fn caption_image(&mut self) -> Result<String, SessionError> {
        let image = self
            .lifecycle
            .resource(SlotId::Image)
            .ok_or(CaptionError::MissingInput)?
            .clone();
        let generation = self.image_generation;

        let text = self.gateway.caption(&image).await?;
        self.apply_caption(generation, text.clone());
        Ok(text)
    }

    // --- slot management ---

    pub fn resource(&self, slot: SlotId) -> Option<&MediaResource> {
        self.lifecycle.resource(slot)
    }

    /// Empty one slot. Clearing the image slot also drops its caption.
    pub fn clear_slot(&mut self, slot: SlotId) {
        self.lifecycle.clear(slot);
        if slot == SlotId::Image {
            self.image_generation += 1;
            self.caption = None;
        }
    }

    // --- report + export ---

    /// Compose the report from the current slot contents.
    /// Regenerates the whole document; the previous one is discarded.
    pub fn build(&mut self) -> &ReportDocument {
        let snapshot = ReportSnapshot {
            text: &self.text,
            recorded_audio: self.lifecycle.resource(SlotId::RecordedAudio),
            uploaded_audio: self.lifecycle.resource(SlotId::UploadedAudio),
            image: self.lifecycle.resource(SlotId::Image),
            caption: self.caption.as_deref(),
            environment: &self.environment,
        };
        self.report.insert(compose(&snapshot))
    }

    pub fn report(&self) -> Option<&ReportDocument> {
        self.report.as_ref()
    }

    /// Export the last built report in the requested format.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact, SessionError> {
        let document = self.report.as_ref().ok_or(ExportError::NothingToExport)?;
        Ok(self.dispatcher.export(document, format)?)
    }

    /// Tear the session down: abort any live recording, release all
    /// previews, and drop text, caption, and report.
    pub async fn reset(&mut self) {
        if let Some(mut stream) = self.live.take() {
            stream.abort().await;
        }
        self.machine.stop();
        self.lifecycle.reset();
        self.text.clear();
        self.caption = None;
        self.image_generation += 1;
        self.report = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CaptionOutput, Captioner, CapturedAudio, EncodeError, PreviewHandle, ReportEncoder,
    };
    use crate::domain::media::MediaMimeType;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    // --- mocks ---

    #[derive(Default)]
    struct NoopRegistry;

    impl PreviewRegistry for NoopRegistry {
        fn acquire(
            &self,
            _slot: SlotId,
            _resource: &MediaResource,
        ) -> Result<PreviewHandle, PreviewError> {
            Ok(PreviewHandle::new(0, None))
        }

        fn release(&self, _handle: &PreviewHandle) {}
    }

    struct MockSource {
        supported: bool,
        deny: bool,
        chunks: Vec<Vec<u8>>,
        mime_type: Option<MediaMimeType>,
        aborted: Arc<AtomicBool>,
    }

    impl MockSource {
        fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                supported: true,
                deny: false,
                chunks,
                mime_type: Some(MediaMimeType::Flac),
                aborted: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl CaptureSource for MockSource {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
            if self.deny {
                return Err(CaptureError::PermissionDenied);
            }
            Ok(Box::new(MockStream {
                chunks: self.chunks.clone(),
                mime_type: self.mime_type,
                aborted: Arc::clone(&self.aborted),
            }))
        }
    }

    struct MockStream {
        chunks: Vec<Vec<u8>>,
        mime_type: Option<MediaMimeType>,
        aborted: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CaptureStream for MockStream {
        async fn finish(&mut self) -> Result<CapturedAudio, CaptureError> {
            Ok(CapturedAudio {
                chunks: std::mem::take(&mut self.chunks),
                mime_type: self.mime_type,
            })
        }

        async fn abort(&mut self) {
            self.aborted.store(true, Ordering::SeqCst);
        }
    }

    struct MockCaptioner {
        text: String,
        calls: Arc<AtomicU64>,
    }

    #[async_trait]
    impl Captioner for MockCaptioner {
        async fn caption(
            &self,
            _image: &MediaResource,
            _max_new_tokens: u32,
        ) -> Result<Vec<CaptionOutput>, CaptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![CaptionOutput {
                generated_text: self.text.clone(),
            }])
        }
    }

    struct MockFactory {
        text: String,
        calls: Arc<AtomicU64>,
    }

    impl MockFactory {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Arc::new(AtomicU64::new(0)),
            }
        }
    }

    #[async_trait]
    impl CaptionerFactory for MockFactory {
        async fn load(&self) -> Result<Box<dyn Captioner>, CaptionError> {
            Ok(Box::new(MockCaptioner {
                text: self.text.clone(),
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    struct BodyEncoder;

    impl ReportEncoder for BodyEncoder {
        fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, EncodeError> {
            Ok(document.body().as_bytes().to_vec())
        }
    }

    fn dispatcher() -> ExportDispatcher {
        ExportDispatcher::new(
            Box::new(BodyEncoder),
            Box::new(BodyEncoder),
            Box::new(BodyEncoder),
        )
    }

    fn session_with_source(source: MockSource) -> ReportSession {
        ReportSession::new(
            Arc::new(NoopRegistry),
            Arc::new(source),
            Box::new(MockFactory::new("a dog running")),
            dispatcher(),
            EnvironmentInfo::new("CLI (linux)"),
        )
    }

    fn session() -> ReportSession {
        session_with_source(MockSource::with_chunks(vec![vec![1, 2], vec![3]]))
    }

    fn image() -> MediaResource {
        MediaResource::with_filename(vec![9, 9, 9], MediaMimeType::Png, "cat.png")
    }

    // --- recording ---

    #[tokio::test]
    async fn record_cycle_stores_concatenated_chunks() {
        let mut session = session();

        session.start_recording().await.unwrap();
        assert!(session.is_recording());

        let resource = session.stop_recording().await.unwrap().unwrap();
        assert_eq!(resource.data(), &[1, 2, 3]);
        assert_eq!(resource.mime_type(), MediaMimeType::Flac);
        assert!(!session.is_recording());
    }

    #[tokio::test]
    async fn stop_while_idle_is_noop() {
        let mut session = session();
        assert!(session.stop_recording().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn start_while_recording_fails() {
        let mut session = session();
        session.start_recording().await.unwrap();

        let err = session.start_recording().await.unwrap_err();
        assert!(matches!(err, SessionError::Transition(_)));
        assert!(session.is_recording());
    }

    #[tokio::test]
    async fn unsupported_environment_cannot_start() {
        let mut source = MockSource::with_chunks(Vec::new());
        source.supported = false;
        let mut session = session_with_source(source);

        assert!(!session.capture_supported());
        let err = session.start_recording().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Capture(CaptureError::Unsupported)
        ));
        assert!(!session.is_recording());
    }

    #[tokio::test]
    async fn denied_capture_leaves_session_idle() {
        let mut source = MockSource::with_chunks(Vec::new());
        source.deny = true;
        let mut session = session_with_source(source);

        let err = session.start_recording().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Capture(CaptureError::PermissionDenied)
        ));
        assert!(!session.is_recording());
        // Can retry after the failure
        assert!(session.stop_recording().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_recording_is_still_stored() {
        let mut stream_source = MockSource::with_chunks(Vec::new());
        stream_source.mime_type = None;
        let mut session = session_with_source(stream_source);

        session.start_recording().await.unwrap();
        let resource = session.stop_recording().await.unwrap().unwrap();

        assert!(resource.is_empty());
        // Unreported media type falls back to the default
        assert_eq!(resource.mime_type(), MediaMimeType::Flac);
        assert!(session.resource(SlotId::RecordedAudio).is_some());
    }

    #[tokio::test]
    async fn new_recording_drops_previous_take() {
        let mut session = session();

        session.start_recording().await.unwrap();
        session.stop_recording().await.unwrap();
        assert!(session.resource(SlotId::RecordedAudio).is_some());

        session.start_recording().await.unwrap();
        assert!(session.resource(SlotId::RecordedAudio).is_none());
    }

    // --- captioning ---

    #[tokio::test]
    async fn caption_without_image_fails() {
        let mut session = session();
        let err = session.caption_image().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Caption(CaptionError::MissingInput)
        ));
    }

    #[tokio::test]
    async fn caption_is_stored_for_current_image() {
        let mut session = session();
        session.upload_image(image()).unwrap();

        let text = session.caption_image().await.unwrap();
        assert_eq!(text, "a dog running");
        assert_eq!(session.caption(), Some("a dog running"));
    }

    #[tokio::test]
    async fn replacing_image_clears_caption() {
        let mut session = session();
        session.upload_image(image()).unwrap();
        session.caption_image().await.unwrap();

        session.upload_image(image()).unwrap();
        assert_eq!(session.caption(), None);
    }

    #[tokio::test]
    async fn clearing_image_slot_clears_caption() {
        let mut session = session();
        session.upload_image(image()).unwrap();
        session.caption_image().await.unwrap();

        session.clear_slot(SlotId::Image);
        assert_eq!(session.caption(), None);
        assert!(session.resource(SlotId::Image).is_none());
    }

    #[tokio::test]
    async fn stale_caption_result_is_discarded() {
        let mut session = session();
        session.upload_image(image()).unwrap();
        let generation = session.image_generation();

        // Image changes while inference is notionally in flight
        session.upload_image(image()).unwrap();

        assert!(!session.apply_caption(generation, "stale text".to_string()));
        assert_eq!(session.caption(), None);

        assert!(session.apply_caption(session.image_generation(), "fresh".to_string()));
        assert_eq!(session.caption(), Some("fresh"));
    }

    // --- report + export ---

    #[tokio::test]
    async fn build_composes_all_sections() {
        let mut session = session();
        session.set_text("note to self");
        session
            .upload_audio(MediaResource::with_filename(
                vec![0u8; 4],
                MediaMimeType::Mp3,
                "clip.mp3",
            ))
            .unwrap();
        session.upload_image(image()).unwrap();
        session.caption_image().await.unwrap();

        let body = session.build().body().to_string();
        assert!(body.contains("note to self"));
        assert!(body.contains("เสียง (อัปโหลด): Name=clip.mp3"));
        assert!(body.contains("รูปภาพ: Name=cat.png"));
        assert!(body.contains("Image→Text (Transformer): a dog running"));
    }

    #[tokio::test]
    async fn export_without_report_fails() {
        let session = session();
        let err = session.export(ExportFormat::Text).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Export(ExportError::NothingToExport)
        ));
    }

    #[tokio::test]
    async fn export_after_build_yields_artifact() {
        let mut session = session();
        session.set_text("hello");
        session.build();

        let artifact = session.export(ExportFormat::Text).unwrap();
        assert!(artifact.filename.ends_with(".txt"));
        let body = String::from_utf8(artifact.bytes).unwrap();
        assert!(body.contains("hello"));
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_report() {
        let mut session = session();
        session.set_text("first");
        session.build();
        session.set_text("second");
        session.build();

        let body = String::from_utf8(session.export(ExportFormat::Text).unwrap().bytes).unwrap();
        assert!(body.contains("second"));
        assert!(!body.contains("first"));
    }

    // --- reset ---

    #[tokio::test]
    async fn reset_clears_everything_and_aborts_live_stream() {
        let source = MockSource::with_chunks(vec![vec![1]]);
        let aborted = Arc::clone(&source.aborted);
        let mut session = session_with_source(source);

        session.set_text("draft");
        session.upload_image(image()).unwrap();
        session.caption_image().await.unwrap();
        session.build();
        session.start_recording().await.unwrap();

        session.reset().await;

        assert!(aborted.load(Ordering::SeqCst));
        assert!(!session.is_recording());
        assert_eq!(session.text(), "");
        assert_eq!(session.caption(), None);
        assert!(session.report().is_none());
        for slot in SlotId::ALL {
            assert!(session.resource(slot).is_none());
        }
    }
}
