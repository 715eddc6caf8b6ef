//! Infinite Adventure TUI application.
//!
//! An AI-driven interactive fiction client: the story, choices, inventory
//! and quest come from a generative text model, and each scene gets an
//! illustration from an image model.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a plain text interface suitable for scripted
//! play and automated testing:
//!
//! ```bash
//! cargo run -p adventure -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;
mod worker;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

use adventure_core::GameSession;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Check for API key
    if std::env::var("GEMINI_API_KEY").is_err() {
        eprintln!("Error: GEMINI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--headless") {
        return headless::run().await;
    }

    let session = match GameSession::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to create game session: {e}");
            std::process::exit(1);
        }
    };

    // The session lives on a worker task; the UI keeps only render state.
    let (request_tx, response_rx) = worker::spawn(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(request_tx, response_rx)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    // Open the adventure as soon as the loop starts
    app.request_new_game();

    loop {
        app.drain_responses();

        terminal.draw(|f| render(f, &app))?;

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Infinite Adventure - AI-driven interactive fiction");
    println!();
    println!("USAGE:");
    println!("  adventure [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Run in headless mode (text-only, no TUI)");
    println!();
    println!("KEYS (TUI mode):");
    println!("  j/k or arrows    Select a choice        Enter  Take it");
    println!("  1-9              Take a choice by number");
    println!("  i                Type a custom action");
    println!("  l                Toggle language (restarts the game)");
    println!("  m / M            Toggle story / image model");
    println!("  n                New game");
    println!("  q or Ctrl-C      Quit");
    println!();
    println!("ENVIRONMENT:");
    println!("  GEMINI_API_KEY   API key for the Gemini service (required)");
}
