//! Turn engine for an AI-driven interactive fiction game.
//!
//! This crate provides:
//! - Conversation history and player-visible game state
//! - Story and image generation clients over the Gemini API
//! - `GameSession`, the turn controller that drives one game turn across
//!   both clients with a text-first, image-later update order
//! - Scripted mock clients for deterministic tests
//!
//! # Quick Start
//!
//! ```ignore
//! use adventure_core::GameSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::from_env()?;
//!
//!     session.new_game().await?;
//!     println!("{}", session.state().story);
//!
//!     let choice = session.state().choices[0].clone();
//!     session.process_turn(&choice).await?;
//!     println!("{}", session.state().story);
//!     Ok(())
//! }
//! ```

pub mod history;
pub mod illustrator;
pub mod narrator;
pub mod session;
pub mod state;
pub mod testing;

// Primary public API
pub use history::{History, Role, Turn};
pub use illustrator::{GeminiIllustrator, Illustrator, IllustratorError};
pub use narrator::{GeminiNarrator, Narrator, NarratorError, Scene};
pub use session::{GameSession, SessionError};
pub use state::{GameState, ImageModel, Language, Settings, StoryModel};
