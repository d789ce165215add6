//! Modal popup overlays for the inbox view.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::state::human_duration;
use crate::input::KeybindingEntry;
use crate::remote::Account;
use crate::ui::theme::{Theme, symbols};

/// Centered rect, preferring the max size and never below the min
fn centered(area: Rect, min: (u16, u16), max: (u16, u16)) -> Rect {
    let w = max.0.min(area.width.saturating_sub(4)).max(min.0);
    let h = max.1.min(area.height.saturating_sub(4)).max(min.1);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w.min(area.width), h.min(area.height))
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), Theme::popup_title()))
        .borders(Borders::ALL)
        .border_type(Theme::popup_border_type())
        .border_style(Theme::popup_border())
        .style(Theme::popup())
}

/// "Delete N email(s)?" confirmation
pub fn render_confirm_modal(frame: &mut Frame, area: Rect, count: usize, grace: Duration) {
    render_yes_no(
        frame,
        area,
        format!("Delete {} email(s)?", count),
        format!("You'll have {} to undo.", human_duration(grace)),
        "delete",
    );
}

/// "Remove account?" confirmation. This one cannot be undone.
pub fn render_confirm_remove_account(frame: &mut Frame, area: Rect, email: &str) {
    render_yes_no(
        frame,
        area,
        format!("Remove {}?", email),
        "Its emails will no longer be listed.".to_string(),
        "remove",
    );
}

fn render_yes_no(frame: &mut Frame, area: Rect, question: String, detail: String, verb: &str) {
    let popup_area = centered(area, (30, 6), (56, 6));
    frame.render_widget(Clear, popup_area);

    let block = popup_block("Confirm");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from(Span::styled(question, Theme::popup())),
        Line::from(Span::styled(detail, Theme::popup())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Theme::help_key()),
            Span::styled(format!(" {}   ", verb), Theme::popup()),
            Span::styled("n", Theme::help_key()),
            Span::styled(" cancel", Theme::popup()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Linked accounts with provider and address
pub fn render_accounts_popup(frame: &mut Frame, area: Rect, accounts: &[Account], selected: usize) {
    let height = (accounts.len().max(1) as u16).saturating_add(2);
    let popup_area = centered(area, (30, 3), (56, height));
    frame.render_widget(Clear, popup_area);

    let block = popup_block("Accounts").title_bottom(" d remove │ A or Esc close ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if accounts.is_empty() {
        let paragraph = Paragraph::new("No linked accounts")
            .style(Theme::text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    let items: Vec<ListItem> = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| {
            let (cursor, style) = if idx == selected {
                (symbols::CURSOR, Theme::cursor_row())
            } else {
                (symbols::NO_CURSOR, Theme::popup())
            };
            ListItem::new(Line::from(vec![
                Span::styled(cursor, style),
                Span::styled(format!("{:<9}", account.provider_name()), style),
                Span::styled(account.email.clone(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

pub fn render_help_popup(frame: &mut Frame, area: Rect, keys: &[KeybindingEntry], scroll: usize) {
    let mut categories = 0;
    let mut last = "";
    for key in keys {
        if key.category != last {
            categories += 1;
            last = key.category;
        }
    }
    let content_height = keys.len() + categories * 2;

    let popup_area = centered(area, (36, 10), (50, content_height as u16 + 2));
    frame.render_widget(Clear, popup_area);

    let block = popup_block("Help").title_bottom(" j/k scroll │ ? or Esc close ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut items: Vec<ListItem> = Vec::new();
    let mut current_category: Option<&str> = None;
    let key_width = 12;

    for entry in keys {
        if current_category != Some(entry.category) {
            if current_category.is_some() {
                items.push(ListItem::new(Line::from("")));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                format!("── {} ", entry.category),
                Theme::category_header(),
            ))));
            current_category = Some(entry.category);
        }

        let line = Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(
                format!("{:width$}", entry.key, width = key_width),
                Theme::help_key(),
            ),
            Span::styled(entry.description, Theme::popup()),
        ]);
        items.push(ListItem::new(line));
    }

    let visible: Vec<ListItem> = items.into_iter().skip(scroll).collect();
    frame.render_widget(List::new(visible), inner);
}
