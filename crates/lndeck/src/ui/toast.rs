//! Transient toast notifications.
//!
//! Failures of background actions (channel close, peer disconnect) have no
//! form to report into, so they surface here: small boxes stacked in the
//! bottom-right corner that disappear after a few seconds (expiry happens
//! on scheduler ticks, see `App::handle_action`).

use crate::app::{App, ToastLevel};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

/// How many toasts are shown at once; older ones wait underneath.
const MAX_VISIBLE: usize = 3;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Renders the toast stack in the bottom-right corner.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.toasts.is_empty() {
        return;
    }

    let visible = app.toasts.iter().rev().take(MAX_VISIBLE);

    for (slot, toast) in visible.enumerate() {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        // Stack upward from just above the status bar
        let y_offset = 2 + (slot as u16 + 1) * TOAST_HEIGHT;
        if area.height < y_offset {
            break;
        }
        let y = area.y + area.height - y_offset;
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);

        let color = match toast.level {
            ToastLevel::Info => Color::DarkGray,
            ToastLevel::Error => Color::Red,
        };

        frame.render_widget(Clear, toast_area);
        let widget = Paragraph::new(toast.text.clone())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(widget, toast_area);
    }
}
