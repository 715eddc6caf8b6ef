//! Integration tests for the turn loop, using scripted clients.
//!
//! These cover the observable guarantees of a game turn:
//! - text fields update before the image field
//! - history grows by exactly two entries per successful turn
//! - the image prompt handed to the illustrator stays English
//! - failures never leave the loading flags stuck

use adventure_core::testing::{sample_scene, ScriptedIllustrator, ScriptedNarrator, ScriptedStory};
use adventure_core::{GameSession, Language, Role, Scene, SessionError};

fn session_with(narrator: ScriptedNarrator, illustrator: ScriptedIllustrator) -> GameSession {
    GameSession::new(Box::new(narrator), Box::new(illustrator))
}

#[tokio::test]
async fn test_full_turn_updates_state_and_history() {
    let mut session = session_with(
        ScriptedNarrator::single(sample_scene()),
        ScriptedIllustrator::always("data:image/jpeg;base64,XYZ"),
    );

    session
        .process_turn("Start the adventure.")
        .await
        .expect("turn should succeed");

    let state = session.state();
    assert_eq!(state.story, "A");
    assert_eq!(state.choices, vec!["go"]);
    assert!(state.inventory.is_empty());
    assert_eq!(state.quest, "Q");
    assert_eq!(state.image, "data:image/jpeg;base64,XYZ");

    let turns = session.history().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, "Start the adventure.");
    assert_eq!(turns[1].role, Role::Model);

    // The model turn stores the entire structured response, not just prose.
    let stored: Scene = serde_json::from_str(&turns[1].text).unwrap();
    assert_eq!(stored, sample_scene());

    assert!(!session.turn_loading());
    assert!(!session.image_loading());
}

#[tokio::test]
async fn test_text_renders_before_image() {
    let mut session = session_with(
        ScriptedNarrator::single(sample_scene()),
        ScriptedIllustrator::always("data:image/jpeg;base64,NEW"),
    );

    session.advance("look around").await.unwrap();

    // Story phase done: text fields fresh, image untouched, turn still open.
    assert_eq!(session.state().story, "A");
    assert_eq!(session.state().image, "");
    assert!(session.turn_loading());
    assert!(session.image_loading());

    session.illustrate().await.unwrap();

    assert_eq!(session.state().image, "data:image/jpeg;base64,NEW");
    assert!(!session.turn_loading());
    assert!(!session.image_loading());
}

#[tokio::test]
async fn test_second_turn_keeps_previous_image_during_story_phase() {
    let scene_two = Scene {
        story: "B".to_string(),
        ..sample_scene()
    };
    let mut session = session_with(
        ScriptedNarrator::new(vec![
            ScriptedStory::Scene(sample_scene()),
            ScriptedStory::Scene(scene_two),
        ]),
        ScriptedIllustrator::always("data:image/jpeg;base64,ONE"),
    );

    session.process_turn("first").await.unwrap();
    assert_eq!(session.state().image, "data:image/jpeg;base64,ONE");

    session.advance("second").await.unwrap();
    assert_eq!(session.state().story, "B");
    assert_eq!(session.state().image, "data:image/jpeg;base64,ONE");

    session.illustrate().await.unwrap();
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn test_history_grows_by_two_even_when_image_fails() {
    let mut session = session_with(
        ScriptedNarrator::single(sample_scene()),
        ScriptedIllustrator::failing(),
    );

    let result = session.process_turn("open the chest").await;

    assert!(matches!(result, Err(SessionError::Illustrator(_))));
    assert_eq!(session.history().len(), 2);

    // Text landed, image kept its previous (empty) value, nothing stuck.
    assert_eq!(session.state().story, "A");
    assert_eq!(session.state().image, "");
    assert!(!session.turn_loading());
    assert!(!session.image_loading());
}

#[tokio::test]
async fn test_image_prompt_stays_english_for_korean_sessions() {
    let korean_scene = Scene {
        story: "당신은 어두운 숲 속에 서 있습니다.".to_string(),
        choices: vec!["🌲 숲으로 들어간다".to_string()],
        inventory: Vec::new(),
        quest: "길을 찾으세요.".to_string(),
        image_prompt: "A dark enchanted forest at dusk, digital art".to_string(),
    };

    let illustrator = ScriptedIllustrator::always("data:image/jpeg;base64,KO");
    let prompts = illustrator.seen_prompts();

    let mut session = session_with(ScriptedNarrator::single(korean_scene), illustrator);
    assert!(session.set_language(Language::Korean));

    session.process_turn(session.opening_prompt()).await.unwrap();

    let seen = prompts.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_ascii(), "image prompt must stay English: {}", seen[0]);
}

#[tokio::test]
async fn test_story_transport_failure_clears_choices_and_flags() {
    let mut session = session_with(
        ScriptedNarrator::failing(),
        ScriptedIllustrator::always("data:image/jpeg;base64,UNUSED"),
    );

    let result = session.process_turn("go north").await;

    assert!(matches!(result, Err(SessionError::Narrator(_))));
    assert!(session.state().choices.is_empty());
    assert!(!session.state().story.is_empty());
    assert!(session.history().is_empty());
    assert!(!session.turn_loading());
    assert!(!session.image_loading());
}

#[tokio::test]
async fn test_language_change_resets_history_and_state() {
    let mut session = session_with(
        ScriptedNarrator::single(sample_scene()),
        ScriptedIllustrator::always("data:image/jpeg;base64,XYZ"),
    );

    session.process_turn("begin").await.unwrap();
    assert_eq!(session.history().len(), 2);

    assert!(session.set_language(Language::Korean));
    assert!(session.history().is_empty());
    assert_eq!(*session.state(), Default::default());
    assert_eq!(session.settings().language, Language::Korean);

    // Setting the same language again is a no-op.
    assert!(!session.set_language(Language::Korean));
}

#[tokio::test]
async fn test_second_advance_while_turn_in_flight_is_rejected() {
    let mut session = session_with(
        ScriptedNarrator::new(vec![
            ScriptedStory::Scene(sample_scene()),
            ScriptedStory::Scene(sample_scene()),
        ]),
        ScriptedIllustrator::always("data:image/jpeg;base64,XYZ"),
    );

    session.advance("first").await.unwrap();

    // The image phase is still outstanding; a new turn may not start.
    let result = session.advance("second").await;
    assert!(matches!(result, Err(SessionError::TurnInFlight)));
    assert_eq!(session.history().len(), 2);

    session.illustrate().await.unwrap();
    session.advance("third").await.unwrap();
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn test_new_game_sends_opening_prompt_with_empty_history() {
    let mut session = session_with(
        ScriptedNarrator::new(vec![
            ScriptedStory::Scene(sample_scene()),
            ScriptedStory::Scene(sample_scene()),
        ]),
        ScriptedIllustrator::always("data:image/jpeg;base64,XYZ"),
    );

    session.process_turn("wander off").await.unwrap();
    session.new_game().await.unwrap();

    let turns = session.history().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].text, session.opening_prompt());
}
