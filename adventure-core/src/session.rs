//! GameSession - the turn controller and the primary public API.
//!
//! A session owns the conversation history, the player-visible game state
//! and the settings, and orchestrates one game turn across the narrator
//! and illustrator boundaries. The caller owns the session's lifecycle:
//! create it on game start, keep it for the whole run, reset it on new
//! game or language change.
//!
//! A turn has two phases. [`GameSession::advance`] performs the story
//! call and updates every text field while the old image stays visible;
//! [`GameSession::illustrate`] performs the image call and backfills the
//! image. Callers that do not need to observe the intermediate state use
//! [`GameSession::process_turn`], which composes both.
//!
//! At-most-one turn in flight is enforced here, not in the UI: a second
//! `advance` while a turn is outstanding fails with
//! [`SessionError::TurnInFlight`]. This also means a stale image call can
//! never race a newer turn, so no cancellation machinery exists.

use thiserror::Error;

use crate::history::History;
use crate::illustrator::{GeminiIllustrator, Illustrator, IllustratorError};
use crate::narrator::{GeminiNarrator, Narrator, NarratorError, Scene};
use crate::state::{GameState, ImageModel, Language, Settings, StoryModel};

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("story generation failed: {0}")]
    Narrator(#[from] NarratorError),

    #[error("image generation failed: {0}")]
    Illustrator(#[from] IllustratorError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("a turn is already in flight")]
    TurnInFlight,

    #[error("no API key configured - set GEMINI_API_KEY environment variable")]
    NoApiKey,
}

/// An interactive fiction game session.
pub struct GameSession {
    narrator: Box<dyn Narrator>,
    illustrator: Box<dyn Illustrator>,
    settings: Settings,
    history: History,
    state: GameState,
    pending_image_prompt: Option<String>,
    turn_loading: bool,
    image_loading: bool,
}

impl GameSession {
    /// Create a session with explicit client implementations.
    pub fn new(narrator: Box<dyn Narrator>, illustrator: Box<dyn Illustrator>) -> Self {
        Self {
            narrator,
            illustrator,
            settings: Settings::default(),
            history: History::new(),
            state: GameState::default(),
            pending_image_prompt: None,
            turn_loading: false,
            image_loading: false,
        }
    }

    /// Create a session backed by the Gemini API.
    ///
    /// Requires the `GEMINI_API_KEY` environment variable to be set.
    pub fn from_env() -> Result<Self, SessionError> {
        let client = gemini::Gemini::from_env().map_err(|_| SessionError::NoApiKey)?;
        Ok(Self::new(
            Box::new(GeminiNarrator::new(client.clone())),
            Box::new(GeminiIllustrator::new(client)),
        ))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True from the start of a turn until both phases have completed.
    /// The choice UI stays disabled while this is set.
    pub fn turn_loading(&self) -> bool {
        self.turn_loading
    }

    /// True while the image half of a turn is still outstanding. Can be
    /// true after the text has already rendered.
    pub fn image_loading(&self) -> bool {
        self.image_loading
    }

    /// Select the story model. Takes effect on the next turn.
    pub fn set_story_model(&mut self, model: StoryModel) {
        self.settings.story_model = model;
    }

    /// Select the image model. Takes effect on the next image call.
    pub fn set_image_model(&mut self, model: ImageModel) {
        self.settings.image_model = model;
    }

    /// Change the display language.
    ///
    /// The existing history is language-tagged by content, not by a field,
    /// so a real change invalidates it: history and state are reset and the
    /// caller is expected to start a new game. Returns whether the language
    /// actually changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.settings.language == language {
            return false;
        }
        self.settings.language = language;
        self.reset();
        true
    }

    /// Discard history and state, keeping the settings.
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = GameState::default();
        self.pending_image_prompt = None;
    }

    /// The fixed localized prompt that opens a fresh adventure.
    pub fn opening_prompt(&self) -> &'static str {
        match self.settings.language {
            Language::Korean => {
                "새로운 판타지 모험 게임을 시작해 주세요. 마법에 걸린 숲에서 시작합니다."
            }
            Language::English => {
                "Start a new fantasy adventure game for me. Begin in an enchanted forest."
            }
        }
    }

    /// Phase one of a turn: generate the next scene.
    ///
    /// On success every text field of the state is updated immediately
    /// (the image keeps its previous value), exactly two entries are
    /// appended to the history, and the scene's image prompt is staged
    /// for [`illustrate`](Self::illustrate). On failure the story panel
    /// shows a localized connection error with the choices cleared, the
    /// loading flags are dropped, and the error propagates.
    pub async fn advance(&mut self, choice: &str) -> Result<Scene, SessionError> {
        if self.turn_loading {
            return Err(SessionError::TurnInFlight);
        }
        self.turn_loading = true;
        self.image_loading = true;

        match self
            .narrator
            .next_scene(&self.history, choice, &self.settings)
            .await
        {
            Ok(scene) => {
                self.state.apply_scene(&scene);
                let serialized = serde_json::to_string(&scene).map_err(|e| {
                    self.turn_loading = false;
                    self.image_loading = false;
                    SessionError::Serialization(e)
                })?;
                self.history.record_exchange(choice, serialized);
                self.pending_image_prompt = Some(scene.image_prompt.clone());
                Ok(scene)
            }
            Err(e) => {
                self.state.story = connection_error_story(self.settings.language).to_string();
                self.state.choices.clear();
                self.turn_loading = false;
                self.image_loading = false;
                Err(e.into())
            }
        }
    }

    /// Phase two of a turn: generate the scene image.
    ///
    /// Updates only the image field; all other fields are preserved. The
    /// loading flags are cleared whether the call succeeds or fails, so a
    /// failed image never wedges the turn loop. On failure the previous
    /// image stays visible.
    pub async fn illustrate(&mut self) -> Result<(), SessionError> {
        let Some(prompt) = self.pending_image_prompt.take() else {
            self.turn_loading = false;
            self.image_loading = false;
            return Ok(());
        };

        let result = self
            .illustrator
            .illustrate(&prompt, self.settings.image_model)
            .await;

        self.turn_loading = false;
        self.image_loading = false;

        match result {
            Ok(data_uri) => {
                self.state.set_image(data_uri);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run one full game turn: story phase, then image phase.
    pub async fn process_turn(&mut self, choice: &str) -> Result<(), SessionError> {
        self.advance(choice).await?;
        self.illustrate().await
    }

    /// Clear everything and open a fresh adventure in the current language.
    pub async fn new_game(&mut self) -> Result<(), SessionError> {
        if self.turn_loading {
            return Err(SessionError::TurnInFlight);
        }
        self.reset();
        let prompt = self.opening_prompt();
        self.process_turn(prompt).await
    }
}

/// Story text shown when the story call itself fails (transport or auth),
/// as opposed to a malformed reply, which the narrator already turns into
/// its own fallback scene.
fn connection_error_story(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "이야기의 흐름이 끊어졌습니다. 잠시 후 새 모험을 시작하거나 다시 시도해 주세요."
        }
        Language::English => {
            "The thread of the story has been severed. Start a new adventure, or try again in a moment."
        }
    }
}
