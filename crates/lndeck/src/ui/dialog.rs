//! The close-channel confirmation modal.
//!
//! Closing a channel is an on-chain action, so it is gated behind an
//! explicit confirmation. While the dialog is open it captures all input;
//! while the close call is in flight it shows a loading state and ignores
//! cancellation (the dialog closes when the call finishes, whatever the
//! outcome).

use crate::app::App;
use crate::ui::layout::centered_rect;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Renders the confirmation dialog, if one is open.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm_close else {
        return;
    };

    let dialog_area = centered_rect(60, 7, area);

    // Wipe whatever the panels drew underneath the modal
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Close channel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let hint = if confirm.closing {
        Line::from(Span::styled(
            "closing...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" close channel   "),
            Span::styled("[n]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" keep it"),
        ])
    };

    let lines = vec![
        Line::from("Are you sure you want to close this channel?"),
        Line::from(Span::styled(
            confirm.outpoint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        hint,
    ];

    let dialog = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(dialog, dialog_area);
}
