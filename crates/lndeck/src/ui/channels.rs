//! Channel list panel (right column).
//!
//! Shows every channel the engine knows about. Each row names the remote
//! peer and the funding outpoint; the selected channel can be expanded
//! into a detail view with the raw engine record, an explorer link for the
//! funding transaction, and the close action.

use crate::app::{App, FocusedPanel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

/// Renders the channel list panel (and the detail view when expanded).
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let show_detail = app.channel_detail && app.selected_channel_info().is_some();

    let (list_area, detail_area) = if show_detail {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    render_list(frame, app, list_area);
    if let Some(detail_area) = detail_area {
        render_detail(frame, app, detail_area);
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focused == FocusedPanel::ChannelList;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Channels ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.channels.is_empty() {
        let empty_msg = Paragraph::new("No channels")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .channels
        .iter()
        .map(|channel| {
            let confirm_color = if channel.confirmed {
                Color::Green
            } else {
                Color::Yellow
            };

            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", short_pubkey(channel.peer.as_str())),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{} ", short_outpoint(&channel.outpoint.to_string())),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} sats", channel.balance_sats),
                    Style::default().fg(confirm_color),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    list_state.select(app.selected_channel);

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the raw engine record for the selected channel.
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(channel) = app.selected_channel_info() else {
        return;
    };

    let block = Block::default()
        .title(" Channel detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let json = serde_json::to_string_pretty(channel)
        .unwrap_or_else(|e| format!("<could not render channel: {e}>"));

    let mut lines: Vec<Line> = json
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.explorer_tx_url(channel.outpoint.txid()),
        Style::default().fg(Color::Blue),
    )));
    lines.push(Line::from(Span::styled(
        "x: close channel",
        Style::default().fg(Color::Yellow),
    )));

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(detail, area);
}

/// Shortens a pubkey for list rows: first 10 characters plus an ellipsis.
fn short_pubkey(pubkey: &str) -> String {
    if pubkey.len() > 12 {
        format!("{}..", &pubkey[..10])
    } else {
        pubkey.to_string()
    }
}

/// Shortens an outpoint for list rows: truncated txid, full index.
fn short_outpoint(outpoint: &str) -> String {
    match outpoint.split_once(':') {
        Some((txid, vout)) if txid.len() > 8 => format!("{}..:{vout}", &txid[..8]),
        _ => outpoint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_pubkey_truncates_long_keys() {
        let key = "02abcdef0123456789abcdef";
        assert_eq!(short_pubkey(key), "02abcdef01..");
        assert_eq!(short_pubkey("02ab"), "02ab");
    }

    #[test]
    fn short_outpoint_keeps_the_index() {
        let txid = "3f2a1c9e8d7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1f";
        assert_eq!(short_outpoint(&format!("{txid}:7")), "3f2a1c9e..:7");
    }
}
