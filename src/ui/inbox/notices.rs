//! Undo notifications, one line per deferred delete

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{AppState, UndoNotice, countdown};
use crate::deferred::ActionStatus;
use crate::ui::theme::Theme;

/// Most notices shown at once; older ones are summarised
const MAX_NOTICES: usize = 4;

pub fn notice_height(state: &AppState) -> u16 {
    (state.pending.len() + state.failed.len()).min(MAX_NOTICES) as u16
}

pub fn render_notices(frame: &mut Frame, area: Rect, state: &AppState) {
    // Newest first, failures on top so they are not missed
    let mut lines: Vec<Line> = state
        .failed
        .iter()
        .rev()
        .chain(state.pending.iter().rev())
        .map(notice_line)
        .collect();

    let total = lines.len();
    if total > MAX_NOTICES {
        lines.truncate(MAX_NOTICES - 1);
        lines.push(Line::from(Span::styled(
            format!(" … and {} more", total - (MAX_NOTICES - 1)),
            Theme::notice(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Theme::notice()), area);
}

fn notice_line(notice: &UndoNotice) -> Line<'static> {
    let what = format!(" {} Deleting {} email(s) ", notice.action_id, notice.count);
    match notice.status {
        ActionStatus::Scheduled => Line::from(vec![
            Span::styled(what, Theme::notice()),
            Span::styled(countdown(notice.remaining), Theme::notice_countdown()),
            Span::styled(format!(" / {}", countdown(notice.grace)), Theme::notice()),
            Span::styled("  u undo", Theme::notice()),
        ]),
        ActionStatus::Failed => Line::from(vec![
            Span::styled(
                format!(
                    " {} Delete of {} email(s) from {} failed: {} ",
                    notice.action_id,
                    notice.count,
                    notice.confirmed_at,
                    notice.failure.as_deref().unwrap_or("unknown error")
                ),
                Theme::notice_failed(),
            ),
            Span::styled(" R retry  x keep", Theme::notice()),
        ]),
        // Committing: undo is no longer possible
        _ => Line::from(Span::styled(what, Theme::notice())),
    }
}
