//! Summary line, action bar and status bar

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::{Theme, symbols};
use crate::app::state::AppState;

/// Email and account counts plus the service check interval
pub fn render_summary_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let accounts = state.accounts.len();
    let providers = if accounts == 0 {
        String::new()
    } else {
        let names: Vec<&str> = state.accounts.iter().map(|a| a.provider_name()).collect();
        format!(" ({})", names.join(", "))
    };
    let mut spans = vec![Span::styled(
        format!(
            " {} email{} from {} account{}{} · checked every {}h",
            state.rows.len(),
            plural(state.rows.len()),
            accounts,
            plural(accounts),
            providers,
            state.check_interval_hours
        ),
        Theme::summary(),
    )];

    if state.counts.pending > 0 {
        spans.push(Span::styled(
            format!(" · {} pending", state.counts.pending),
            Theme::summary(),
        ));
    }
    if state.counts.failed > 0 {
        spans.push(Span::styled(
            format!(" · {} failed", state.counts.failed),
            Theme::failed_marker(),
        ));
    }
    if state.counts.removed > 0 {
        spans.push(Span::styled(
            format!(" · {} deleted", state.counts.removed),
            Theme::success(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::summary()), area);
}

pub fn render_action_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = format!(
        " {} selected   d delete   Esc clear ",
        state.selected_count
    );
    frame.render_widget(Paragraph::new(text).style(Theme::action_bar()), area);
}

/// Transient error when present, otherwise the status message and key hints
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(error) = &state.status.error {
        let paragraph = Paragraph::new(format!(" {} ", error)).style(Theme::error_bar());
        frame.render_widget(paragraph, area);
        return;
    }

    let style = Theme::status_bar();
    let mut spans = Vec::new();
    if state.status.loading {
        spans.push(Span::styled(format!(" {}", symbols::LOADING), style));
    }
    if state.has_unacknowledged_error() {
        spans.push(Span::styled(
            format!(" {}", symbols::ERROR),
            Theme::failed_marker(),
        ));
    }
    spans.push(Span::styled(format!(" {} ", state.status.message), style));

    let hints = [("space", "select"), ("d", "delete"), ("u", "undo"), ("?", "help")];
    let hint_width: usize = hints.iter().map(|(k, d)| k.len() + d.len() + 3).sum();
    let used: usize = spans.iter().map(|s| s.content.len()).sum();
    let padding = (area.width as usize).saturating_sub(used + hint_width);
    spans.push(Span::styled(" ".repeat(padding), style));

    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {}", key), Theme::help_key()));
        spans.push(Span::styled(format!(" {} ", desc), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
