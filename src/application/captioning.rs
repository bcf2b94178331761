//! Captioning gateway
//!
//! Lazily initializes a single shared captioning pipeline and maps an
//! image resource to a short text description. The pipeline is created
//! once per process and never torn down.

use tokio::sync::Mutex;

use crate::domain::media::MediaResource;

use super::ports::{CaptionError, Captioner, CaptionerFactory};

/// Cap on generated caption length
pub const MAX_NEW_TOKENS: u32 = 30;

/// Returned when the pipeline produced no text for the image
pub const NO_CAPTION_SENTINEL: &str = "(ไม่สามารถสร้างข้อความจากรูปได้)";

/// Pipeline initialization states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unloaded,
    Loading,
    Ready,
}

struct Inner {
    state: PipelineState,
    pipeline: Option<Box<dyn Captioner>>,
}

/// Gateway in front of the captioning pipeline.
///
/// Only one load may be in flight: a caller arriving while the pipeline
/// is `Loading` gets `CaptionError::ConcurrentLoad` and must retry after
/// the load resolves. A failed load returns the gateway to `Unloaded`.
pub struct CaptioningGateway {
    factory: Box<dyn CaptionerFactory>,
    inner: Mutex<Inner>,
}

impl CaptioningGateway {
    /// Create a gateway; the pipeline is not loaded until first use
    pub fn new(factory: Box<dyn CaptionerFactory>) -> Self {
        Self {
            factory,
            inner: Mutex::new(Inner {
                state: PipelineState::Unloaded,
                pipeline: None,
            }),
        }
    }

    /// Current pipeline state
    pub async fn state(&self) -> PipelineState {
        self.inner.lock().await.state
    }

    /// Make sure the pipeline is loaded.
    /// Returns immediately when `Ready`; fails with `ConcurrentLoad`
    /// while another load is in flight.
    pub async fn ensure_ready(&self) -> Result<(), CaptionError> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                PipelineState::Ready => return Ok(()),
                PipelineState::Loading => return Err(CaptionError::ConcurrentLoad),
                PipelineState::Unloaded => inner.state = PipelineState::Loading,
            }
        }

        // Load outside the lock so state stays observable
        match self.factory.load().await {
            Ok(pipeline) => {
                let mut inner = self.inner.lock().await;
                inner.pipeline = Some(pipeline);
                inner.state = PipelineState::Ready;
                Ok(())
            }
            Err(e) => {
                let mut inner = self.inner.lock().await;
                inner.state = PipelineState::Unloaded;
                Err(e)
            }
        }
    }

    /// Caption an image resource.
    /// Requires a non-empty image; loads the pipeline on first use.
    /// Returns the first generated text, or the sentinel string when the
    /// pipeline produced none.
    pub async fn caption(&self, image: &MediaResource) -> Result<String, CaptionError> {
        if image.is_empty() {
            return Err(CaptionError::MissingInput);
        }

        self.ensure_ready().await?;

        let inner = self.inner.lock().await;
        let pipeline = inner
            .pipeline
            .as_ref()
            .ok_or_else(|| CaptionError::ModelLoad("pipeline missing after load".to_string()))?;

        let results = pipeline.caption(image, MAX_NEW_TOKENS).await?;

        let text = results
            .into_iter()
            .next()
            .map(|r| r.generated_text.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_CAPTION_SENTINEL.to_string());

        Ok(text)
    }
}
