//! Image captioning port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::MediaResource;

/// Captioning errors
#[derive(Debug, Clone, Error)]
pub enum CaptionError {
    #[error("Caption model is already loading")]
    ConcurrentLoad,

    #[error("Failed to load caption model: {0}")]
    ModelLoad(String),

    #[error("No image available to caption")]
    MissingInput,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Failed to parse inference response: {0}")]
    ParseError(String),
}

/// One generated caption candidate
#[derive(Debug, Clone)]
pub struct CaptionOutput {
    pub generated_text: String,
}

/// Port for a loaded captioning pipeline
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Run inference against an image resource.
    ///
    /// # Arguments
    /// * `image` - The image to describe
    /// * `max_new_tokens` - Cap on generated caption length
    ///
    /// # Returns
    /// Generated caption candidates (possibly empty) or an error
    async fn caption(
        &self,
        image: &MediaResource,
        max_new_tokens: u32,
    ) -> Result<Vec<CaptionOutput>, CaptionError>;
}

/// Port for the one-time pipeline initialization
#[async_trait]
pub trait CaptionerFactory: Send + Sync {
    /// Load the captioning pipeline. Called at most once per process by
    /// the gateway; may be slow on first use.
    async fn load(&self) -> Result<Box<dyn Captioner>, CaptionError>;
}
