//! Event handling for the adventure TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode};

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event.
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcut (always works)
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return EventResult::Quit;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
    }
}

/// Normal mode: choice navigation and hotkeys.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,

        // Choice selection
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next_choice();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev_choice();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_selected_choice();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='9') => {
            app.submit_choice_number(c as usize - '0' as usize);
            EventResult::NeedsRedraw
        }

        // Free-text custom action
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }

        // Settings and new game
        KeyCode::Char('n') => {
            app.request_new_game();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('l') => {
            app.toggle_language();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('m') => {
            app.toggle_story_model();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('M') => {
            app.toggle_image_model();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Insert mode: typing a custom action.
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.cancel_input();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_custom_action();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
