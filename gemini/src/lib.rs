//! Minimal Google Gemini API client.
//!
//! This crate provides a focused client for the Generative Language API with:
//! - Text generation via `generateContent`, including JSON-schema constrained
//!   output and image-modality responses
//! - Still-image generation via the Imagen `predict` endpoint

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors that can occur when using the Gemini client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Gemini API client.
#[derive(Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
}

impl Gemini {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
        }
    }

    /// Create a Gemini client from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Send a `generateContent` request and return the full response.
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, Error> {
        let api_request = build_api_request(&request);
        let url = format!("{API_BASE}/models/{model}:generateContent");
        self.post_json(&url, &api_request).await
    }

    /// Send an Imagen `predict` request and return the generated images.
    pub async fn generate_images(
        &self,
        model: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, Error> {
        let api_request = ApiPredictRequest {
            instances: vec![ApiPredictInstance {
                prompt: request.prompt,
            }],
            parameters: ApiPredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio,
                output_mime_type: request.output_mime_type,
            },
        };

        let url = format!("{API_BASE}/models/{model}:predict");
        let api_response: ApiPredictResponse = self.post_json(&url, &api_request).await?;

        Ok(ImageResponse {
            images: api_response
                .predictions
                .into_iter()
                .map(|p| GeneratedImage {
                    data: p.bytes_base64_encoded,
                    mime_type: p.mime_type,
                })
                .collect(),
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, Error> {
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        response.json().await.map_err(|e| Error::Parse(e.to_string()))
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| Error::Config(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A `generateContent` request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<serde_json::Value>,
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerateRequest {
    /// Create a new request with the given conversation contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            temperature: None,
            response_mime_type: None,
            response_schema: None,
            response_modalities: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Constrain the response to a MIME type (e.g. `application/json`).
    pub fn with_response_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.response_mime_type = Some(mime_type.into());
        self
    }

    /// Constrain the response to a JSON schema.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Restrict the modalities the model may respond with.
    pub fn with_response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.response_modalities = Some(modalities);
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user message with text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model message with text content.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Get all text parts concatenated.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One part of a message: text or inline binary data, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

/// Base64-encoded inline binary data with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// A response modality the model may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
}

/// A `generateContent` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Get the text of the first candidate, concatenating its text parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.content.text())
            .unwrap_or_default()
    }

    /// Get the parts of the first candidate.
    pub fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }
}

/// A single generation candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// An Imagen `predict` request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub number_of_images: u32,
    pub aspect_ratio: Option<String>,
    pub output_mime_type: Option<String>,
}

impl ImageRequest {
    /// Create a request for a single image from the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: 1,
            aspect_ratio: None,
            output_mime_type: None,
        }
    }

    pub fn with_number_of_images(mut self, count: u32) -> Self {
        self.number_of_images = count;
        self
    }

    /// Set the aspect ratio (e.g. `16:9`).
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Set the output MIME type (e.g. `image/jpeg`).
    pub fn with_output_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.output_mime_type = Some(mime_type.into());
        self
    }
}

/// An Imagen `predict` response.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub images: Vec<GeneratedImage>,
}

/// One generated image: base64-encoded bytes and their MIME type.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: String,
    pub mime_type: String,
}

// ============================================================================
// Internal API types
// ============================================================================

fn build_api_request(request: &GenerateRequest) -> ApiGenerateRequest {
    let generation_config = if request.temperature.is_some()
        || request.response_mime_type.is_some()
        || request.response_schema.is_some()
        || request.response_modalities.is_some()
    {
        Some(ApiGenerationConfig {
            temperature: request.temperature,
            response_mime_type: request.response_mime_type.clone(),
            response_schema: request.response_schema.clone(),
            response_modalities: request.response_modalities.clone(),
        })
    } else {
        None
    };

    ApiGenerateRequest {
        contents: request.contents.clone(),
        system_instruction: request
            .system_instruction
            .as_ref()
            .map(|text| ApiSystemInstruction {
                parts: vec![Part::text(text)],
            }),
        generation_config,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ApiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct ApiSystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<Modality>>,
}

#[derive(Debug, Serialize)]
struct ApiPredictRequest {
    instances: Vec<ApiPredictInstance>,
    parameters: ApiPredictParameters,
}

#[derive(Debug, Serialize)]
struct ApiPredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiPredictParameters {
    sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPredictResponse {
    #[serde(default)]
    predictions: Vec<ApiPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPrediction {
    bytes_base64_encoded: String,
    #[serde(default = "default_image_mime")]
    mime_type: String,
}

fn default_image_mime() -> String {
    "image/jpeg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new("test-key");
        assert_eq!(client.api_key, "test-key");
    }

    #[test]
    fn test_content_helpers() {
        let user = Content::user("Hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.text(), "Hello");

        let model = Content::model("Hi there");
        assert_eq!(model.role, Role::Model);
        assert_eq!(model.text(), "Hi there");
    }

    #[test]
    fn test_generate_request_builder() {
        let request = GenerateRequest::new(vec![Content::user("Hello")])
            .with_system_instruction("Be brief")
            .with_temperature(0.9)
            .with_response_mime_type("application/json");

        assert_eq!(request.temperature, Some(0.9));
        assert!(request.system_instruction.is_some());
        assert_eq!(
            request.response_mime_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_generate_request_wire_format() {
        let request = GenerateRequest::new(vec![Content::user("Hello")])
            .with_system_instruction("Be brief")
            .with_temperature(0.9)
            .with_response_modalities(vec![Modality::Image]);

        let json = serde_json::to_value(build_api_request(&request)).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief");
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.9).abs() < 1e-6);
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_image_request_wire_format() {
        let request = ImageRequest::new("a castle")
            .with_aspect_ratio("16:9")
            .with_output_mime_type("image/jpeg");

        let api = ApiPredictRequest {
            instances: vec![ApiPredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: ApiPredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio.clone(),
                output_mime_type: request.output_mime_type.clone(),
            },
        };

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "a castle");
        assert_eq!(json["parameters"]["sampleCount"], 1);
        assert_eq!(json["parameters"]["aspectRatio"], "16:9");
        assert_eq!(json["parameters"]["outputMimeType"], "image/jpeg");
    }

    #[test]
    fn test_generate_response_text() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "once "}, {"text": "upon"}]},
                "finishReason": "STOP"
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "once upon");
    }

    #[test]
    fn test_generate_response_inline_data() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"inlineData": {"mimeType": "image/png", "data": "QUJD"}}]
                }
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let inline = response.parts()[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "QUJD");
    }

    #[test]
    fn test_empty_response_text() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }
}
