//! Main application state and logic.

use adventure_core::{ImageModel, Language, StoryModel};
use tokio::sync::mpsc;

use crate::worker::{Snapshot, WorkerRequest, WorkerResponse};
use crate::ui::theme::GameTheme;

/// Input modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and hotkeys (default).
    #[default]
    Normal,
    /// Typing a free-text custom action.
    Insert,
}

/// Main application state.
pub struct App {
    // Channel communication with the session worker
    pub request_tx: mpsc::Sender<WorkerRequest>,
    pub response_rx: mpsc::Receiver<WorkerResponse>,

    // Latest session snapshot for rendering
    pub snapshot: Snapshot,

    // UI state
    pub theme: GameTheme,
    pub selected_choice: usize,
    pub input_mode: InputMode,
    input_buffer: String,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    /// Create a new application with channel endpoints.
    pub fn new(
        request_tx: mpsc::Sender<WorkerRequest>,
        response_rx: mpsc::Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            request_tx,
            response_rx,
            snapshot: Snapshot::default(),
            theme: GameTheme::default(),
            selected_choice: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_message: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    /// Apply all pending worker responses without blocking.
    pub fn drain_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                WorkerResponse::Update(snapshot) => {
                    self.snapshot = snapshot;
                    let choice_count = self.snapshot.state.choices.len();
                    if choice_count == 0 {
                        self.selected_choice = 0;
                    } else if self.selected_choice >= choice_count {
                        self.selected_choice = choice_count - 1;
                    }
                    if !self.snapshot.turn_loading {
                        self.clear_status();
                    }
                }
                WorkerResponse::Failure(message) => {
                    self.set_status(message);
                }
            }
        }
    }

    /// Move choice selection down, wrapping.
    pub fn select_next_choice(&mut self) {
        let count = self.snapshot.state.choices.len();
        if count > 0 {
            self.selected_choice = (self.selected_choice + 1) % count;
        }
    }

    /// Move choice selection up, wrapping.
    pub fn select_prev_choice(&mut self) {
        let count = self.snapshot.state.choices.len();
        if count > 0 {
            self.selected_choice = (self.selected_choice + count - 1) % count;
        }
    }

    /// Submit the currently selected predefined choice.
    pub fn submit_selected_choice(&mut self) {
        let Some(choice) = self
            .snapshot
            .state
            .choices
            .get(self.selected_choice)
            .cloned()
        else {
            return;
        };
        self.send_choice(choice);
    }

    /// Submit a choice by its 1-based display number.
    pub fn submit_choice_number(&mut self, number: usize) {
        let Some(choice) = self
            .snapshot
            .state
            .choices
            .get(number.wrapping_sub(1))
            .cloned()
        else {
            return;
        };
        self.selected_choice = number - 1;
        self.send_choice(choice);
    }

    /// Submit the typed custom action and leave insert mode.
    pub fn submit_custom_action(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;
        if !input.trim().is_empty() {
            self.send_choice(input);
        }
    }

    fn send_choice(&mut self, choice: String) {
        if self.snapshot.turn_loading {
            self.set_status("The story is still unfolding...");
            return;
        }
        if self.send_request(WorkerRequest::Choice(choice)) {
            self.mark_turn_started();
            self.set_status("The narrator is thinking...");
        }
    }

    /// Request a fresh adventure.
    pub fn request_new_game(&mut self) {
        if self.snapshot.turn_loading {
            self.set_status("The story is still unfolding...");
            return;
        }
        if self.send_request(WorkerRequest::NewGame) {
            self.mark_turn_started();
            self.set_status("Starting a new adventure...");
        }
    }

    /// Raise the loading flags on the local snapshot as soon as a turn
    /// request is accepted, before the worker's own loading snapshot
    /// arrives. A second submission in that window must already be
    /// blocked, not queued behind the first.
    fn mark_turn_started(&mut self) {
        self.snapshot.turn_loading = true;
        self.snapshot.image_loading = true;
    }

    /// Toggle the display language. A real change restarts the game.
    pub fn toggle_language(&mut self) {
        if self.snapshot.turn_loading {
            self.set_status("The story is still unfolding...");
            return;
        }
        let next: Language = self.snapshot.settings.language.toggled();
        if self.send_request(WorkerRequest::SetLanguage(next)) {
            self.set_status(format!("Language: {}", next.label()));
        }
    }

    /// Toggle the story model tier. Takes effect next turn.
    pub fn toggle_story_model(&mut self) {
        let next: StoryModel = self.snapshot.settings.story_model.toggled();
        if self.send_request(WorkerRequest::SetStoryModel(next)) {
            self.set_status(format!("Story model: {}", next.label()));
        }
    }

    /// Toggle the image model. Takes effect on the next image call.
    pub fn toggle_image_model(&mut self) {
        let next: ImageModel = self.snapshot.settings.image_model.toggled();
        if self.send_request(WorkerRequest::SetImageModel(next)) {
            self.set_status(format!("Image model: {}", next.label()));
        }
    }

    fn send_request(&mut self, request: WorkerRequest) -> bool {
        if self.request_tx.try_send(request).is_err() {
            self.set_status("Worker busy, please wait...");
            return false;
        }
        true
    }

    /// Handle a typed character.
    pub fn type_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Handle backspace.
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Leave insert mode, discarding the buffer.
    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Tick for animations.
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Set status message (always overwrites).
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Get the current status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Get the current input buffer.
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }
}
