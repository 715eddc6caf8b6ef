//! Player-visible game state and process-wide settings.

use crate::narrator::Scene;

/// Display language for the story. The image prompt is always English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Korean,
}

impl Language {
    /// Human-readable name for the settings surface.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "한국어",
        }
    }

    /// The other language (the settings surface toggles between two).
    pub fn toggled(&self) -> Self {
        match self {
            Language::English => Language::Korean,
            Language::Korean => Language::English,
        }
    }
}

/// Story generation model tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryModel {
    /// Faster responses, lighter model.
    #[default]
    Flash,
    /// Deeper narrative, slower model.
    Pro,
}

impl StoryModel {
    pub fn api_name(&self) -> &'static str {
        match self {
            StoryModel::Flash => "gemini-2.5-flash",
            StoryModel::Pro => "gemini-2.5-pro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoryModel::Flash => "Fast",
            StoryModel::Pro => "Deep",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            StoryModel::Flash => StoryModel::Pro,
            StoryModel::Pro => StoryModel::Flash,
        }
    }
}

/// Image generation model. Selects which of the two backends the
/// illustrator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageModel {
    /// Dedicated still-image model (Imagen).
    #[default]
    Imagen,
    /// Image-capable chat model.
    FlashImage,
}

impl ImageModel {
    pub fn api_name(&self) -> &'static str {
        match self {
            ImageModel::Imagen => "imagen-4.0-generate-001",
            ImageModel::FlashImage => "gemini-2.5-flash-image",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageModel::Imagen => "Quality",
            ImageModel::FlashImage => "Fast",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ImageModel::Imagen => ImageModel::FlashImage,
            ImageModel::FlashImage => ImageModel::Imagen,
        }
    }
}

/// User-mutable configuration. Takes effect on the next generation call;
/// a language change additionally invalidates the history (the session
/// handles that).
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub language: Language,
    pub story_model: StoryModel,
    pub image_model: ImageModel,
}

/// The player-visible snapshot: story text, scene image, choices,
/// inventory and quest.
///
/// `image` holds a data URI or the empty string, never an "unset" state:
/// while a fresh image is in flight the previous value (or "") stands in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub story: String,
    pub image: String,
    pub choices: Vec<String>,
    pub inventory: Vec<String>,
    pub quest: String,
}

impl GameState {
    /// Apply a freshly generated scene: update every text field, keep the
    /// current image until the new one resolves.
    pub fn apply_scene(&mut self, scene: &Scene) {
        self.story = scene.story.clone();
        self.choices = scene.choices.clone();
        self.inventory = scene.inventory.clone();
        self.quest = scene.quest.clone();
    }

    /// Replace only the scene image, preserving all text fields.
    pub fn set_image(&mut self, data_uri: String) {
        self.image = data_uri;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names() {
        assert_eq!(StoryModel::Flash.api_name(), "gemini-2.5-flash");
        assert_eq!(StoryModel::Pro.api_name(), "gemini-2.5-pro");
        assert_eq!(ImageModel::Imagen.api_name(), "imagen-4.0-generate-001");
        assert_eq!(ImageModel::FlashImage.api_name(), "gemini-2.5-flash-image");
    }

    #[test]
    fn test_apply_scene_keeps_image() {
        let mut state = GameState {
            image: "data:image/jpeg;base64,OLD".to_string(),
            ..GameState::default()
        };

        let scene = Scene {
            story: "A new scene".to_string(),
            choices: vec!["go".to_string()],
            inventory: vec!["torch".to_string()],
            quest: "Find the door".to_string(),
            image_prompt: "A door".to_string(),
        };

        state.apply_scene(&scene);

        assert_eq!(state.story, "A new scene");
        assert_eq!(state.choices, vec!["go"]);
        assert_eq!(state.image, "data:image/jpeg;base64,OLD");
    }

    #[test]
    fn test_toggles_are_involutions() {
        assert_eq!(Language::English.toggled().toggled(), Language::English);
        assert_eq!(StoryModel::Pro.toggled().toggled(), StoryModel::Pro);
        assert_eq!(ImageModel::Imagen.toggled().toggled(), ImageModel::Imagen);
    }
}
