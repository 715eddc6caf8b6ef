//! Session worker task.
//!
//! The `GameSession` lives on its own tokio task; the UI thread owns only
//! render state and talks to it over bounded channels. Requests are
//! processed strictly one at a time, which upholds the single-writer
//! discipline and means a new turn can never overlap an outstanding
//! image call.

use adventure_core::{GameSession, GameState, ImageModel, Language, Settings, StoryModel};
use tokio::sync::mpsc;

/// A player intent sent to the worker.
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    /// Play one turn with this choice or custom action.
    Choice(String),
    /// Reset everything and open a fresh adventure.
    NewGame,
    /// Change the display language (restarts the game if it changed).
    SetLanguage(Language),
    SetStoryModel(StoryModel),
    SetImageModel(ImageModel),
}

/// What the UI renders: a point-in-time copy of the session.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub state: GameState,
    pub settings: Settings,
    pub turn_loading: bool,
    pub image_loading: bool,
}

/// A message from the worker back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    /// Fresh session snapshot; sent after every observable change,
    /// including the text-ready point in the middle of a turn.
    Update(Snapshot),
    /// A turn or image call failed; human-readable summary for the
    /// status bar. Always preceded by an `Update` with the flags down.
    Failure(String),
}

fn snapshot(session: &GameSession) -> Snapshot {
    Snapshot {
        state: session.state().clone(),
        settings: *session.settings(),
        turn_loading: session.turn_loading(),
        image_loading: session.image_loading(),
    }
}

/// Spawn the worker task owning the session; returns the UI's endpoints.
pub fn spawn(session: GameSession) -> (mpsc::Sender<WorkerRequest>, mpsc::Receiver<WorkerResponse>) {
    let (request_tx, request_rx) = mpsc::channel(8);
    let (response_tx, response_rx) = mpsc::channel(32);

    tokio::spawn(run(session, request_rx, response_tx));

    (request_tx, response_rx)
}

async fn run(
    mut session: GameSession,
    mut requests: mpsc::Receiver<WorkerRequest>,
    responses: mpsc::Sender<WorkerResponse>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            WorkerRequest::Choice(choice) => {
                run_turn(&mut session, &choice, &responses).await;
            }
            WorkerRequest::NewGame => {
                session.reset();
                let prompt = session.opening_prompt().to_string();
                run_turn(&mut session, &prompt, &responses).await;
            }
            WorkerRequest::SetLanguage(language) => {
                if session.set_language(language) {
                    let _ = responses
                        .send(WorkerResponse::Update(snapshot(&session)))
                        .await;
                    let prompt = session.opening_prompt().to_string();
                    run_turn(&mut session, &prompt, &responses).await;
                }
            }
            WorkerRequest::SetStoryModel(model) => {
                session.set_story_model(model);
                let _ = responses
                    .send(WorkerResponse::Update(snapshot(&session)))
                    .await;
            }
            WorkerRequest::SetImageModel(model) => {
                session.set_image_model(model);
                let _ = responses
                    .send(WorkerResponse::Update(snapshot(&session)))
                    .await;
            }
        }
    }
}

/// One full turn: publish a loading snapshot, story phase, publish the
/// text-ready snapshot, image phase, publish again. Failures go to the
/// status bar; the session has already settled its own state and flags
/// by the time they surface.
async fn run_turn(
    session: &mut GameSession,
    choice: &str,
    responses: &mpsc::Sender<WorkerResponse>,
) {
    // Raise the flags before the story call so watchers see the turn
    // open for its whole duration, not only after the first await.
    let mut loading = snapshot(session);
    loading.turn_loading = true;
    loading.image_loading = true;
    let _ = responses.send(WorkerResponse::Update(loading)).await;

    match session.advance(choice).await {
        Ok(_) => {
            let _ = responses
                .send(WorkerResponse::Update(snapshot(session)))
                .await;

            let result = session.illustrate().await;
            let _ = responses
                .send(WorkerResponse::Update(snapshot(session)))
                .await;
            if let Err(e) = result {
                let _ = responses
                    .send(WorkerResponse::Failure(format!("Illustration failed: {e}")))
                    .await;
            }
        }
        Err(e) => {
            let _ = responses
                .send(WorkerResponse::Update(snapshot(session)))
                .await;
            let _ = responses
                .send(WorkerResponse::Failure(format!("Turn failed: {e}")))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::testing::{sample_scene, ScriptedIllustrator, ScriptedNarrator};

    fn scripted_session() -> GameSession {
        GameSession::new(
            Box::new(ScriptedNarrator::single(sample_scene())),
            Box::new(ScriptedIllustrator::always("data:image/jpeg;base64,XYZ")),
        )
    }

    async fn next_update(responses: &mut mpsc::Receiver<WorkerResponse>) -> Snapshot {
        match responses.recv().await {
            Some(WorkerResponse::Update(snapshot)) => snapshot,
            other => panic!("expected an update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_loading_snapshot_precedes_story_result() {
        let (requests, mut responses) = spawn(scripted_session());

        requests
            .send(WorkerRequest::Choice("go".to_string()))
            .await
            .unwrap();

        // The turn opens before the story call, with the flags raised
        // and the state untouched.
        let loading = next_update(&mut responses).await;
        assert!(loading.turn_loading);
        assert!(loading.image_loading);
        assert_eq!(loading.state.story, "");

        // Text-ready snapshot: story landed, turn still open.
        let text_ready = next_update(&mut responses).await;
        assert_eq!(text_ready.state.story, "A");
        assert_eq!(text_ready.state.image, "");
        assert!(text_ready.turn_loading);

        // Settled snapshot: image in place, flags down.
        let settled = next_update(&mut responses).await;
        assert_eq!(settled.state.image, "data:image/jpeg;base64,XYZ");
        assert!(!settled.turn_loading);
        assert!(!settled.image_loading);
    }

    #[tokio::test]
    async fn test_story_failure_still_opens_and_closes_the_turn() {
        let session = GameSession::new(
            Box::new(ScriptedNarrator::failing()),
            Box::new(ScriptedIllustrator::always("data:image/jpeg;base64,XYZ")),
        );
        let (requests, mut responses) = spawn(session);

        requests
            .send(WorkerRequest::Choice("go".to_string()))
            .await
            .unwrap();

        let loading = next_update(&mut responses).await;
        assert!(loading.turn_loading);

        let settled = next_update(&mut responses).await;
        assert!(!settled.turn_loading);
        assert!(settled.state.choices.is_empty());

        match responses.recv().await {
            Some(WorkerResponse::Failure(message)) => {
                assert!(message.starts_with("Turn failed"));
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }
}
