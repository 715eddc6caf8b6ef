//! Story generation client.
//!
//! The narrator turns the conversation history plus the player's latest
//! choice into the next structured scene. Replies that cannot be parsed
//! as the expected JSON shape never escape this module: they are replaced
//! by a fixed, localized fallback scene so the turn loop stays alive.
//! Transport and API failures do propagate as [`NarratorError`].

use async_trait::async_trait;
use gemini::{Content, Gemini, GenerateRequest, Role as WireRole};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::{History, Role};
use crate::state::{Language, Settings};

const STORY_TEMPERATURE: f32 = 0.9;

/// Errors from the story generation client.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("Gemini API error: {0}")]
    Api(#[from] gemini::Error),
}

/// One structured scene from the story model. All fields are required by
/// the response schema. `image_prompt` is always English regardless of the
/// display language, because it feeds an English-tuned image model.
///
/// Serializes with camelCase field names; the serialized form is what the
/// history stores as the model turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub story: String,
    pub choices: Vec<String>,
    pub inventory: Vec<String>,
    pub quest: String,
    pub image_prompt: String,
}

impl Scene {
    /// The fixed "connection to the aether is weak" scene substituted when
    /// the story model's reply cannot be parsed. Localized except for the
    /// image prompt, which stays English.
    pub fn fallback(language: Language) -> Self {
        match language {
            Language::Korean => Self {
                story: "운명의 바람이 울부짖고 있지만, 길은 불분명합니다. \
                        에테르와의 연결이 약합니다. 다시 한번 선택해 주세요."
                    .to_string(),
                choices: vec![
                    "다시 바람의 소리에 귀 기울여 본다.".to_string(),
                    "다른 길을 찾아본다.".to_string(),
                ],
                inventory: Vec::new(),
                quest: "운명과 다시 연결하세요.".to_string(),
                image_prompt: "Static noise on a television screen, digital art.".to_string(),
            },
            Language::English => Self {
                story: "The winds of fate are howling, but the path is unclear. \
                        The connection to the aether is weak. Please try making a choice again."
                    .to_string(),
                choices: vec![
                    "Try to listen to the winds again.".to_string(),
                    "Look for a different path.".to_string(),
                ],
                inventory: Vec::new(),
                quest: "Reconnect with your destiny.".to_string(),
                image_prompt: "Static noise on a television screen, digital art.".to_string(),
            },
        }
    }
}

/// The story generation boundary.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Generate the next scene from the prior history and the latest choice.
    async fn next_scene(
        &self,
        history: &History,
        choice: &str,
        settings: &Settings,
    ) -> Result<Scene, NarratorError>;
}

/// Production narrator backed by the Gemini `generateContent` endpoint.
pub struct GeminiNarrator {
    client: Gemini,
}

impl GeminiNarrator {
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Narrator for GeminiNarrator {
    async fn next_scene(
        &self,
        history: &History,
        choice: &str,
        settings: &Settings,
    ) -> Result<Scene, NarratorError> {
        let mut contents: Vec<Content> = history
            .turns()
            .iter()
            .map(|turn| Content {
                role: match turn.role {
                    Role::User => WireRole::User,
                    Role::Model => WireRole::Model,
                },
                parts: vec![gemini::Part::text(&turn.text)],
            })
            .collect();
        contents.push(Content::user(choice));

        let request = GenerateRequest::new(contents)
            .with_system_instruction(build_system_instruction(settings.language))
            .with_temperature(STORY_TEMPERATURE)
            .with_response_mime_type("application/json")
            .with_response_schema(scene_schema());

        let response = self
            .client
            .generate_content(settings.story_model.api_name(), request)
            .await?;

        Ok(parse_scene(&response.text(), settings.language))
    }
}

/// Build the system instruction for the given language.
pub fn build_system_instruction(language: Language) -> String {
    let mut instruction = String::new();
    instruction.push_str(include_str!("prompts/narrator_base.txt"));
    instruction.push_str(match language {
        Language::English => include_str!("prompts/narrator_lang_en.txt"),
        Language::Korean => include_str!("prompts/narrator_lang_ko.txt"),
    });
    instruction
}

/// JSON schema constraining the story model's output to the scene shape.
fn scene_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "story": {
                "type": "STRING",
                "description": "The next part of the story. A single paragraph of 3-5 sentences."
            },
            "choices": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "2-4 distinct choices for the player, each starting with an emoji."
            },
            "inventory": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "The player's current inventory."
            },
            "quest": {
                "type": "STRING",
                "description": "The current quest objective."
            },
            "imagePrompt": {
                "type": "STRING",
                "description": "A descriptive prompt in English for an image generation model."
            }
        },
        "required": ["story", "choices", "inventory", "quest", "imagePrompt"]
    })
}

/// Parse the raw model text as a scene, substituting the localized
/// fallback when the reply is malformed.
pub(crate) fn parse_scene(text: &str, language: Language) -> Scene {
    match serde_json::from_str::<Scene>(text.trim()) {
        Ok(scene) => scene,
        Err(_) => Scene::fallback(language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_scene() {
        let json = r#"{
            "story": "You enter the clearing.",
            "choices": ["🌲 Go deeper", "🏃 Run back"],
            "inventory": ["lantern"],
            "quest": "Find the shrine",
            "imagePrompt": "A moonlit forest clearing, digital art"
        }"#;

        let scene = parse_scene(json, Language::English);
        assert_eq!(scene.story, "You enter the clearing.");
        assert_eq!(scene.choices.len(), 2);
        assert_eq!(scene.inventory, vec!["lantern"]);
        assert_eq!(scene.image_prompt, "A moonlit forest clearing, digital art");
    }

    #[test]
    fn test_parse_malformed_reply_yields_fallback() {
        let scene = parse_scene("I cannot answer in JSON today.", Language::English);

        assert!(!scene.story.is_empty());
        assert!(!scene.choices.is_empty());
        assert!(scene.inventory.is_empty());
        assert!(!scene.quest.is_empty());
        assert!(!scene.image_prompt.is_empty());
    }

    #[test]
    fn test_korean_fallback_keeps_english_image_prompt() {
        let scene = parse_scene("{broken", Language::Korean);

        assert!(scene.story.contains("에테르"));
        assert!(scene.image_prompt.is_ascii());
    }

    #[test]
    fn test_scene_serializes_camel_case() {
        let scene = Scene::fallback(Language::English);
        let json = serde_json::to_value(&scene).unwrap();
        assert!(json.get("imagePrompt").is_some());
        assert!(json.get("image_prompt").is_none());
    }

    #[test]
    fn test_system_instruction_language_rules() {
        let en = build_system_instruction(Language::English);
        assert!(en.contains("must be in English"));

        let ko = build_system_instruction(Language::Korean);
        assert!(ko.contains("in Korean"));
        assert!(ko.contains("'imagePrompt' field MUST remain in English"));
    }
}
