//! Render orchestration for the adventure TUI.

use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::layout::AppLayout;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::calculate(frame.area());

    render_title_bar(frame, app, layout.title_area);
    render_story(frame, app, layout.story_area);
    render_illustration(frame, app, layout.illustration_area);
    render_choices(frame, app, layout.choices_area);
    render_sidebar(frame, app, layout.sidebar_area);
    render_input(frame, app, layout.input_area);
    render_status_bar(frame, app, layout.status_area);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let settings = &app.snapshot.settings;
    let title = format!(
        " Infinite Adventure | {} | story: {} | image: {} ",
        settings.language.label(),
        settings.story_model.label(),
        settings.image_model.label(),
    );
    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_story(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let loading = app.snapshot.turn_loading;
    let title = if loading { " Story (…) " } else { " Story " };

    let text = if app.snapshot.state.story.is_empty() {
        Line::from(Span::styled(
            "The adventure has not begun yet.",
            app.theme.system_style(),
        ))
    } else {
        Line::from(Span::styled(
            app.snapshot.state.story.clone(),
            app.theme.story_style(),
        ))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(loading));
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_illustration(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let (text, style) = if app.snapshot.image_loading {
        let spinner = SPINNER_FRAMES[app.animation_frame as usize % SPINNER_FRAMES.len()];
        (
            format!("{spinner} Illustrating the scene..."),
            app.theme.system_style(),
        )
    } else if app.snapshot.state.image.is_empty() {
        ("No illustration yet.".to_string(), app.theme.system_style())
    } else {
        (
            describe_data_uri(&app.snapshot.state.image),
            app.theme.story_style(),
        )
    };

    let block = Block::default()
        .title(" Illustration ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(app.snapshot.image_loading));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style))).block(block),
        area,
    );
}

fn render_choices(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let enabled = !app.snapshot.turn_loading;
    let title = if enabled {
        " Choices [j/k + Enter, i: custom action] "
    } else {
        " Choices (waiting for the story) "
    };

    let lines: Vec<Line> = app
        .snapshot
        .state
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let marker = if i == app.selected_choice && enabled {
                "> "
            } else {
                "  "
            };
            Line::from(Span::styled(
                format!("{marker}{}. {choice}", i + 1),
                app.theme.choice_style(i == app.selected_choice, enabled),
            ))
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(enabled));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_sidebar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let state = &app.snapshot.state;
    let settings = &app.snapshot.settings;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled("Quest", app.theme.title_style())));
    lines.push(Line::from(Span::styled(
        if state.quest.is_empty() {
            "—".to_string()
        } else {
            state.quest.clone()
        },
        app.theme.quest_style(),
    )));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        "Inventory",
        app.theme.title_style(),
    )));
    if state.inventory.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            app.theme.system_style(),
        )));
    } else {
        for item in &state.inventory {
            lines.push(Line::from(Span::styled(
                format!("• {item}"),
                app.theme.inventory_style(),
            )));
        }
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        "Settings",
        app.theme.title_style(),
    )));
    lines.push(Line::from(Span::styled(
        format!("[l] Language: {}", settings.language.label()),
        app.theme.system_style(),
    )));
    lines.push(Line::from(Span::styled(
        format!("[m] Story model: {}", settings.story_model.label()),
        app.theme.system_style(),
    )));
    lines.push(Line::from(Span::styled(
        format!("[M] Image model: {}", settings.image_model.label()),
        app.theme.system_style(),
    )));
    lines.push(Line::from(Span::styled(
        "[n] New game",
        app.theme.system_style(),
    )));

    let block = Block::default()
        .title(" Adventurer ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_input(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let (title, text) = match app.input_mode {
        InputMode::Insert => (
            " Custom action [Enter: submit, Esc: cancel] ",
            format!("{}_", app.input_buffer()),
        ),
        InputMode::Normal => (" Custom action [press i] ", String::new()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(app.input_mode == InputMode::Insert));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let text = app
        .status_message()
        .map(str::to_string)
        .unwrap_or_else(|| " q: quit | n: new game | l/m/M: settings".to_string());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, app.theme.system_style()))),
        area,
    );
}

/// Summarize a `data:<mime>;base64,<payload>` URI for display.
fn describe_data_uri(uri: &str) -> String {
    let mime = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("image");
    let payload_len = uri.rsplit(',').next().map(str::len).unwrap_or(0);
    // Base64 expands bytes by 4/3.
    let kib = payload_len * 3 / 4 / 1024;
    format!("Scene ready ({mime}, ~{kib} KiB)")
}
