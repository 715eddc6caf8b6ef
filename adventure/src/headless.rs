//! Headless game interface: a plain stdin/stdout loop over the same
//! session, for scripted play and manual QA without a terminal UI.

use std::io::{self, BufRead, Write};

use adventure_core::{GameSession, ImageModel, Language, SessionError, StoryModel};

/// Run the game headless until EOF or `:quit`.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GameSession::from_env()?;

    println!("Infinite Adventure (headless)");
    println!("Type a choice number, free text for a custom action, or :help for commands.");
    println!();

    report(session.new_game().await);
    print_scene(&session);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                print_help();
                continue;
            }
            ":new" => {
                report(session.new_game().await);
            }
            _ if input.starts_with(":lang") => {
                let language = match input.split_whitespace().nth(1) {
                    Some("ko") => Language::Korean,
                    Some("en") => Language::English,
                    _ => {
                        println!("usage: :lang en|ko");
                        continue;
                    }
                };
                if session.set_language(language) {
                    report(session.new_game().await);
                } else {
                    println!("already in {}", language.label());
                    continue;
                }
            }
            _ if input.starts_with(":story") => {
                let model = match input.split_whitespace().nth(1) {
                    Some("fast") => StoryModel::Flash,
                    Some("deep") => StoryModel::Pro,
                    _ => {
                        println!("usage: :story fast|deep");
                        continue;
                    }
                };
                session.set_story_model(model);
                println!("story model: {}", model.label());
                continue;
            }
            _ if input.starts_with(":image") => {
                let model = match input.split_whitespace().nth(1) {
                    Some("quality") => ImageModel::Imagen,
                    Some("fast") => ImageModel::FlashImage,
                    _ => {
                        println!("usage: :image quality|fast");
                        continue;
                    }
                };
                session.set_image_model(model);
                println!("image model: {}", model.label());
                continue;
            }
            _ => {
                let choice = match input.parse::<usize>() {
                    Ok(n) => match session.state().choices.get(n.wrapping_sub(1)) {
                        Some(choice) => choice.clone(),
                        None => {
                            println!("no such choice: {n}");
                            continue;
                        }
                    },
                    Err(_) => input.to_string(),
                };
                report(session.process_turn(&choice).await);
            }
        }

        print_scene(&session);
    }

    Ok(())
}

fn report(result: Result<(), SessionError>) {
    if let Err(e) = result {
        println!("error: {e}");
    }
}

fn print_scene(session: &GameSession) {
    let state = session.state();

    println!();
    println!("{}", state.story);
    println!();
    if !state.quest.is_empty() {
        println!("quest: {}", state.quest);
    }
    if !state.inventory.is_empty() {
        println!("inventory: {}", state.inventory.join(", "));
    }
    if !state.image.is_empty() {
        println!("illustration: {} chars of data URI", state.image.len());
    }
    for (i, choice) in state.choices.iter().enumerate() {
        println!("  {}. {choice}", i + 1);
    }
    println!();
}

fn print_help() {
    println!("COMMANDS:");
    println!("  <number>          Pick that choice");
    println!("  <any text>        Take a custom action");
    println!("  :new              Start a new adventure");
    println!("  :lang en|ko       Switch language (restarts the game)");
    println!("  :story fast|deep  Switch story model");
    println!("  :image quality|fast  Switch image model");
    println!("  :quit             Exit");
}
