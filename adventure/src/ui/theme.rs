//! Color theme and styling for the adventure TUI.

use ratatui::style::{Color, Modifier, Style};

/// Game UI color theme.
#[derive(Debug, Clone)]
pub struct GameTheme {
    pub border: Color,
    pub border_active: Color,
    pub story_text: Color,
    pub choice_text: Color,
    pub choice_selected: Color,
    pub quest_text: Color,
    pub inventory_text: Color,
    pub system_text: Color,
    pub title: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            border_active: Color::Cyan,
            story_text: Color::White,
            choice_text: Color::Cyan,
            choice_selected: Color::Yellow,
            quest_text: Color::LightGreen,
            inventory_text: Color::White,
            system_text: Color::DarkGray,
            title: Color::Magenta,
        }
    }
}

impl GameTheme {
    pub fn border_style(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.border_active)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    pub fn choice_style(&self, selected: bool, enabled: bool) -> Style {
        let mut style = if selected {
            Style::default()
                .fg(self.choice_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.choice_text)
        };
        if !enabled {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }

    pub fn inventory_style(&self) -> Style {
        Style::default().fg(self.inventory_text)
    }

    pub fn quest_style(&self) -> Style {
        Style::default().fg(self.quest_text)
    }

    pub fn system_style(&self) -> Style {
        Style::default().fg(self.system_text)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }
}
