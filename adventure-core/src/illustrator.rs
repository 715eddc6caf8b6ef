//! Image generation client.
//!
//! Two mutually exclusive backends, selected by [`ImageModel`]: the
//! dedicated Imagen endpoint (one JPEG at a fixed wide aspect ratio) and
//! the image-capable chat model (inline image bytes among the reply
//! parts). Unlike the narrator, a reply with no usable image is a hard
//! error for that call. That asymmetry matches the observed product
//! behavior and is kept on purpose.

use async_trait::async_trait;
use gemini::{Content, Gemini, GenerateRequest, ImageRequest, Modality};
use thiserror::Error;

use crate::state::ImageModel;

const IMAGE_ASPECT_RATIO: &str = "16:9";

/// Errors from the image generation client.
#[derive(Debug, Error)]
pub enum IllustratorError {
    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),

    #[error("image model returned no image data")]
    NoImage,
}

/// The image generation boundary. Returns the image as a data URI.
#[async_trait]
pub trait Illustrator: Send + Sync {
    async fn illustrate(&self, prompt: &str, model: ImageModel)
        -> Result<String, IllustratorError>;
}

/// Production illustrator backed by the Gemini image endpoints.
pub struct GeminiIllustrator {
    client: Gemini,
}

impl GeminiIllustrator {
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }

    async fn illustrate_still(&self, prompt: &str) -> Result<String, IllustratorError> {
        let request = ImageRequest::new(prompt)
            .with_number_of_images(1)
            .with_aspect_ratio(IMAGE_ASPECT_RATIO)
            .with_output_mime_type("image/jpeg");

        let response = self
            .client
            .generate_images(ImageModel::Imagen.api_name(), request)
            .await?;

        let image = response.images.first().ok_or(IllustratorError::NoImage)?;
        Ok(format!("data:image/jpeg;base64,{}", image.data))
    }

    async fn illustrate_inline(&self, prompt: &str) -> Result<String, IllustratorError> {
        let request = GenerateRequest::new(vec![Content::user(prompt)])
            .with_response_modalities(vec![Modality::Image]);

        let response = self
            .client
            .generate_content(ImageModel::FlashImage.api_name(), request)
            .await?;

        for part in response.parts() {
            if let Some(inline) = &part.inline_data {
                return Ok(format!(
                    "data:{};base64,{}",
                    inline.mime_type, inline.data
                ));
            }
        }

        Err(IllustratorError::NoImage)
    }
}

#[async_trait]
impl Illustrator for GeminiIllustrator {
    async fn illustrate(
        &self,
        prompt: &str,
        model: ImageModel,
    ) -> Result<String, IllustratorError> {
        match model {
            ImageModel::Imagen => self.illustrate_still(prompt).await,
            ImageModel::FlashImage => self.illustrate_inline(prompt).await,
        }
    }
}
