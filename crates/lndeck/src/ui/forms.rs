//! The connect-peer and open-channel forms.
//!
//! Both forms live beneath their lists and share the same text-field
//! editing model. The connect form is a single input; the open form has a
//! pubkey field and an amount field, with the active one marked.
//!
//! The cursor is positioned explicitly when a field is focused — ratatui
//! doesn't render a cursor by default.

use crate::app::{App, FocusedPanel, OpenField};
use lndeck_core::engine::{is_plausible_peer_uri, PEER_URI_PREFIX};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the connect-peer form.
pub fn render_connect(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focused == FocusedPanel::ConnectForm;
    let value = &app.connect_form.input.value;
    let plausible = is_plausible_peer_uri(value.trim());

    // An implausible connect string marks the border without blocking
    // submission; a red border also flags an engine failure.
    let border_style = if !plausible || app.connect_form.error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if app.connect_form.submitting {
        " Connect peer (connecting...) "
    } else if is_focused {
        " Connect peer (Enter to submit) "
    } else {
        " Connect peer "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines = vec![Line::from(format!("> {value}"))];
    if let Some(err) = &app.connect_form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if !plausible {
        lines.push(Line::from(Span::styled(
            format!("expecting something like {PEER_URI_PREFIX}02ab..@host:9735"),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(widget, area);

    if is_focused {
        // +1 border, +2 for the "> " prefix
        let cursor_x =
            area.x + 1 + 2 + visual_cursor_offset(value, app.connect_form.input.cursor) as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// Renders the open-channel form.
pub fn render_open(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focused == FocusedPanel::OpenForm;
    let form = &app.open_form;

    let border_style = if form.error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if form.submitting {
        " Open channel (opening...) "
    } else if is_focused {
        " Open channel (Enter to submit) "
    } else {
        " Open channel "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let field_style = |field: OpenField| {
        if is_focused && form.active == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Pubkey: ", field_style(OpenField::Pubkey)),
            Span::styled(form.pubkey.value.clone(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Amount (sats): ", field_style(OpenField::Amount)),
            Span::styled(form.amount.value.clone(), Style::default().fg(Color::White)),
        ]),
    ];

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    if let Some(channel) = &form.last_opened {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("opened: {}", channel.outpoint),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            app.explorer_tx_url(channel.outpoint.txid()),
            Style::default().fg(Color::Blue),
        )));
    }

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);

    if is_focused {
        // Field rows start under the top border; the label widths differ.
        let (label_width, field, row) = match form.active {
            OpenField::Pubkey => ("Pubkey: ".len(), &form.pubkey, 0),
            OpenField::Amount => ("Amount (sats): ".len(), &form.amount, 1),
        };
        let cursor_x =
            area.x + 1 + label_width as u16 + visual_cursor_offset(&field.value, field.cursor) as u16;
        frame.set_cursor_position((cursor_x, area.y + 1 + row));
    }
}

/// Calculates the visual column offset for the cursor.
///
/// The byte offset may not equal the visual column for multi-byte input;
/// each character contributes one column. This is a simplification that
/// works well for the hex and URI strings these fields hold.
fn visual_cursor_offset(input: &str, byte_cursor: usize) -> usize {
    input[..byte_cursor].chars().count()
}
