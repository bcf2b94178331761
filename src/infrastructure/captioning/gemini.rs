//! Gemini API captioner adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CaptionError, CaptionOutput, Captioner, CaptionerFactory};
use crate::domain::media::MediaResource;

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Instruction sent alongside the image
const CAPTION_INSTRUCTION: &str = "Describe this image in one short sentence.";

// Request types for Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Response types for Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini API captioner
pub struct GeminiCaptioner {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiCaptioner {
    /// Create a new Gemini captioner for the given model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with a custom base URL (for tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Build the request body
    fn build_request(&self, image: &MediaResource, max_new_tokens: u32) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part {
                        text: Some(CAPTION_INSTRUCTION.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.to_base64(),
                        }),
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(max_new_tokens),
            }),
        }
    }

    /// Extract text from response
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

#[async_trait]
impl Captioner for GeminiCaptioner {
    async fn caption(
        &self,
        image: &MediaResource,
        max_new_tokens: u32,
    ) -> Result<Vec<CaptionOutput>, CaptionError> {
        let url = self.api_url();
        let body = self.build_request(image, max_new_tokens);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptionError::Inference(e.to_string()))?;

        let status = response.status();

        // Handle HTTP errors
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CaptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CaptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CaptionError::Inference(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // Parse response
        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CaptionError::ParseError(e.to_string()))?;

        // Check for API error in response body
        if let Some(error) = response.error {
            return Err(CaptionError::Inference(error.message));
        }

        // An empty candidate list is a valid "no caption" outcome
        Ok(Self::extract_text(&response)
            .map(|text| {
                vec![CaptionOutput {
                    generated_text: text,
                }]
            })
            .unwrap_or_default())
    }
}

/// Factory producing Gemini-backed captioners.
/// Standing in for the pipeline download step; fails fast when no API
/// key is configured.
pub struct GeminiCaptionerFactory {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl GeminiCaptionerFactory {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    /// Point the factory at a custom base URL (for tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[async_trait]
impl CaptionerFactory for GeminiCaptionerFactory {
    async fn load(&self) -> Result<Box<dyn Captioner>, CaptionError> {
        if self.api_key.is_empty() {
            return Err(CaptionError::ModelLoad(
                "No API key configured. Set it with 'config set api_key <KEY>' or GEMINI_API_KEY."
                    .to_string(),
            ));
        }

        let captioner = match &self.base_url {
            Some(base_url) => {
                GeminiCaptioner::with_base_url(&self.api_key, &self.model, base_url)
            }
            None => GeminiCaptioner::new(&self.api_key, &self.model),
        };

        Ok(Box::new(captioner))
    }
}
