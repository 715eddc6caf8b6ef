//! Testing utilities for the turn engine.
//!
//! This module provides scripted stand-ins for the two hosted-service
//! boundaries so integration tests run deterministically without API
//! calls:
//! - `ScriptedNarrator` returns queued scenes or transport failures
//! - `ScriptedIllustrator` returns queued data URIs and records every
//!   prompt it was handed

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::history::History;
use crate::illustrator::{Illustrator, IllustratorError};
use crate::narrator::{Narrator, NarratorError, Scene};
use crate::state::{ImageModel, Settings};

/// A scripted narrator step.
#[derive(Debug, Clone)]
pub enum ScriptedStory {
    /// Return this scene.
    Scene(Scene),
    /// Fail as if the network dropped.
    TransportError,
}

/// A narrator that replays scripted responses in order.
///
/// When the script runs out it returns the localized fallback scene,
/// which keeps accidental over-reads visible in assertions.
pub struct ScriptedNarrator {
    script: Mutex<VecDeque<ScriptedStory>>,
}

impl ScriptedNarrator {
    pub fn new(script: Vec<ScriptedStory>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// A narrator that always returns the given scene.
    pub fn single(scene: Scene) -> Self {
        Self::new(vec![ScriptedStory::Scene(scene)])
    }

    /// A narrator whose first call fails at the transport level.
    pub fn failing() -> Self {
        Self::new(vec![ScriptedStory::TransportError])
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn next_scene(
        &self,
        _history: &History,
        _choice: &str,
        settings: &Settings,
    ) -> Result<Scene, NarratorError> {
        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();

        match step {
            Some(ScriptedStory::Scene(scene)) => Ok(scene),
            Some(ScriptedStory::TransportError) => Err(NarratorError::Api(
                gemini::Error::Network("scripted transport failure".to_string()),
            )),
            None => Ok(Scene::fallback(settings.language)),
        }
    }
}

/// An illustrator that replays scripted results and records the prompts
/// it received. Clone the handle from [`seen_prompts`] before moving the
/// illustrator into a session.
///
/// [`seen_prompts`]: ScriptedIllustrator::seen_prompts
pub struct ScriptedIllustrator {
    script: Mutex<VecDeque<Result<String, IllustratorError>>>,
    default_uri: Option<String>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedIllustrator {
    pub fn new(script: Vec<Result<String, IllustratorError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            default_uri: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An illustrator that always succeeds with a fixed data URI.
    pub fn always(data_uri: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_uri: Some(data_uri.into()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An illustrator whose first call fails with `NoImage`.
    pub fn failing() -> Self {
        Self::new(vec![Err(IllustratorError::NoImage)])
    }

    /// Shared handle to the prompts this illustrator has been called with.
    pub fn seen_prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl Illustrator for ScriptedIllustrator {
    async fn illustrate(
        &self,
        prompt: &str,
        _model: ImageModel,
    ) -> Result<String, IllustratorError> {
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .push(prompt.to_string());

        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();

        match step {
            Some(result) => result,
            None => Ok(self
                .default_uri
                .clone()
                .unwrap_or_else(|| "data:image/jpeg;base64,TEST".to_string())),
        }
    }
}

/// A sample scene for tests.
pub fn sample_scene() -> Scene {
    Scene {
        story: "A".to_string(),
        choices: vec!["go".to_string()],
        inventory: Vec::new(),
        quest: "Q".to_string(),
        image_prompt: "P".to_string(),
    }
}
