//! QA smoke tests against the live Gemini API.
//!
//! These hit the real endpoints and cost quota, so they are ignored by
//! default. Run with:
//! `GEMINI_API_KEY=$GEMINI_API_KEY cargo test -p adventure-core qa_live -- --ignored --nocapture`

use adventure_core::{GameSession, ImageModel};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("GEMINI_API_KEY").is_ok()
}

#[tokio::test]
#[ignore]
async fn test_qa_live_opening_turn() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let mut session = GameSession::from_env().expect("session from env");

    session.new_game().await.expect("opening turn");

    println!("story: {}", session.state().story);
    println!("choices: {:?}", session.state().choices);
    println!("quest: {}", session.state().quest);
    println!("image bytes (base64): {}", session.state().image.len());

    assert!(!session.state().story.is_empty());
    assert!(!session.state().choices.is_empty());
    assert!(session.state().image.starts_with("data:image/"));
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_qa_live_flash_image_backend() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let mut session = GameSession::from_env().expect("session from env");
    session.set_image_model(ImageModel::FlashImage);

    session.new_game().await.expect("opening turn");

    assert!(session.state().image.starts_with("data:"));
}
