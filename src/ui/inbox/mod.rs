//! Inbox view rendering.
//!
//! This module is split into:
//! - `mod.rs` - Layout and the email list
//! - `notices.rs` - Undo notifications for deferred deletes
//! - `format.rs` - Text formatting utilities
//! - `popups.rs` - Modal overlays (confirm delete, accounts, help)

mod format;
mod notices;
mod popups;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::state::{AppState, EmailRow, ModalState};

use super::status_bar::{render_action_bar, render_status_bar, render_summary_line};
use super::theme::{Theme, symbols};

use format::{display_width, fit_to_width, row_marker, truncate_to_width};
use notices::{notice_height, render_notices};
use popups::{
    render_accounts_popup, render_confirm_modal, render_confirm_remove_account, render_help_popup,
};

const SENDER_WIDTH: usize = 22;

pub fn render_inbox(frame: &mut Frame, state: &AppState) {
    let notices = notice_height(state);
    let action_bar = if state.selected_count > 0 { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // Summary line
            Constraint::Min(0),             // Email list
            Constraint::Length(notices),    // Undo notices
            Constraint::Length(action_bar), // "N selected"
            Constraint::Length(1),          // Status bar or error
        ])
        .split(frame.area());

    render_summary_line(frame, chunks[0], state);
    render_email_list(frame, chunks[1], state);
    if notices > 0 {
        render_notices(frame, chunks[2], state);
    }
    if action_bar > 0 {
        render_action_bar(frame, chunks[3], state);
    }
    render_status_bar(frame, chunks[4], state);

    match &state.modal {
        ModalState::ConfirmDelete { count } => {
            render_confirm_modal(frame, frame.area(), *count, state.grace);
        }
        ModalState::Help {
            keybindings,
            scroll,
        } => render_help_popup(frame, frame.area(), keybindings, *scroll),
        ModalState::Accounts { selected } => {
            render_accounts_popup(frame, frame.area(), &state.accounts, *selected);
        }
        ModalState::ConfirmRemoveAccount { email, .. } => {
            render_confirm_remove_account(frame, frame.area(), email);
        }
        ModalState::None => {}
    }
}

fn render_email_list(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.rows.is_empty() {
        let msg = if state.status.loading {
            "Loading..."
        } else {
            "Inbox is clear"
        };
        let paragraph = Paragraph::new(msg)
            .style(Theme::text_muted())
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the cursor on screen
    let height = area.height as usize;
    let offset = state.cursor.saturating_sub(height.saturating_sub(1));

    let show_account = state.accounts.len() > 1;
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, row)| {
            email_item(row, idx == state.cursor, show_account, area.width as usize)
        })
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), area);
}

fn email_item(
    row: &EmailRow,
    is_cursor: bool,
    show_account: bool,
    width: usize,
) -> ListItem<'static> {
    let style = if row.is_pending() {
        Theme::pending_row()
    } else if is_cursor {
        Theme::cursor_row()
    } else if row.selected {
        Theme::selected_row()
    } else {
        Theme::text()
    };
    let marker_style = if row.is_failed() {
        Theme::failed_marker()
    } else {
        style
    };

    let cursor = if is_cursor {
        symbols::CURSOR
    } else {
        symbols::NO_CURSOR
    };

    let time = truncate_to_width(row.email.time.as_deref().unwrap_or_default(), 12);
    // cursor(2) + marker(3) + spaces(4) + time
    let fixed = 2 + 3 + 4 + SENDER_WIDTH + display_width(&time);
    let subject_width = width.saturating_sub(fixed);

    let mut subject = row.email.subject.clone();
    if show_account && !row.email.account.is_empty() {
        subject = format!("[{}] {}", row.email.account, subject);
    }
    if let Some(summary) = &row.email.summary {
        subject = format!("{} - {}", subject, summary);
    }
    if let Some(reason) = &row.failure {
        subject = format!("{} (delete failed: {})", subject, reason);
    }

    let line = Line::from(vec![
        Span::styled(cursor, style),
        Span::styled(row_marker(row), marker_style),
        Span::styled(" ", style),
        Span::styled(fit_to_width(&row.email.sender, SENDER_WIDTH), style),
        Span::styled("  ", style),
        Span::styled(fit_to_width(&subject, subject_width), style),
        Span::styled(" ", style),
        Span::styled(time, Theme::text_secondary()),
    ]);
    ListItem::new(line)
}
