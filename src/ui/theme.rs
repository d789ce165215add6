//! Colors and styles for the TUI
//!
//! Single source of truth for every style the widgets use.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Catppuccin Mocha palette
mod palette {
    use super::Color;

    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a

    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086

    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8
}

pub mod symbols {
    pub const CHECKED: &str = "[x]";
    pub const UNCHECKED: &str = "[ ]";
    pub const PENDING: &str = "[-]";
    pub const FAILED: &str = "[!]";
    pub const CURSOR: &str = "▶ ";
    pub const NO_CURSOR: &str = "  ";
    pub const LOADING: &str = "…";
    pub const ERROR: &str = "!";
}

pub struct Theme;

impl Theme {
    // === Rows ===

    pub fn text() -> Style {
        Style::default().fg(palette::TEXT).bg(palette::BASE)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(palette::SUBTEXT1).bg(palette::BASE)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(palette::OVERLAY0).bg(palette::BASE)
    }

    pub fn cursor_row() -> Style {
        Style::default().fg(palette::TEXT).bg(palette::SURFACE1)
    }

    /// Checked rows are highlighted even without the cursor
    pub fn selected_row() -> Style {
        Style::default()
            .fg(palette::LAVENDER)
            .bg(palette::SURFACE0)
            .add_modifier(Modifier::BOLD)
    }

    /// Rows waiting for their delete to commit
    pub fn pending_row() -> Style {
        Style::default()
            .fg(palette::OVERLAY0)
            .bg(palette::BASE)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    }

    pub fn failed_marker() -> Style {
        Style::default()
            .fg(palette::RED)
            .bg(palette::BASE)
            .add_modifier(Modifier::BOLD)
    }

    // === Bars ===

    pub fn status_bar() -> Style {
        Style::default().bg(palette::MANTLE).fg(palette::TEXT)
    }

    pub fn error_bar() -> Style {
        Style::default().bg(palette::RED).fg(palette::BASE)
    }

    pub fn action_bar() -> Style {
        Style::default()
            .bg(palette::BLUE)
            .fg(palette::BASE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        Style::default().bg(palette::MANTLE).fg(palette::YELLOW)
    }

    pub fn summary() -> Style {
        Style::default().bg(palette::BASE).fg(palette::SUBTEXT1)
    }

    // === Undo notices ===

    pub fn notice() -> Style {
        Style::default().bg(palette::SURFACE0).fg(palette::TEXT)
    }

    pub fn notice_countdown() -> Style {
        Style::default()
            .bg(palette::SURFACE0)
            .fg(palette::PEACH)
            .add_modifier(Modifier::BOLD)
    }

    pub fn notice_failed() -> Style {
        Style::default().bg(palette::SURFACE0).fg(palette::RED)
    }

    pub fn success() -> Style {
        Style::default().fg(palette::GREEN)
    }

    // === Popups ===

    pub fn popup() -> Style {
        Style::default().bg(palette::MANTLE).fg(palette::TEXT)
    }

    pub fn popup_border() -> Style {
        Style::default().fg(palette::LAVENDER)
    }

    pub fn popup_title() -> Style {
        Style::default()
            .fg(palette::LAVENDER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn category_header() -> Style {
        Style::default()
            .fg(palette::BLUE)
            .add_modifier(Modifier::BOLD)
    }
}
