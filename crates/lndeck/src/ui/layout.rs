//! Main screen layout.
//!
//! Divides the terminal into two columns plus a status bar:
//!
//! ```text
//! +-- Peers ------------+-- Channels --------------------+
//! | * ACINQ             | 02ec.. 3f2a..:0  1.0M sats     |
//! |   031f..            | 039a.. 8bc1..:1  0.5M sats     |
//! |                     |                                |
//! +-- Connect peer -----+-- Open channel ----------------+
//! | > lightning:02ab... | Pubkey: 02ec..                 |
//! +---------------------| Amount (sats): 500000          |
//!                       +--------------------------------+
//! | lndeck v0.1.0 | node 1/1 | signet | 10:30:05         |
//! +----------------------------------------------------- +
//! ```
//!
//! Uses ratatui's `Layout` with `Constraint`s to define proportional
//! and fixed-size regions. The confirmation dialog and toasts render
//! last, on top of everything else.

use crate::app::App;
use crate::ui::{channels, dialog, forms, peers, toast};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Renders the complete TUI to the given frame.
///
/// This is the top-level render function called on every frame.
/// It divides the screen into regions and delegates to sub-renderers.
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Main vertical layout: content area + status bar
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Content (both columns)
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let content_area = vertical[0];
    let status_area = vertical[1];

    // Horizontal split: peers column | channels column
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Peers + connect form
            Constraint::Percentage(60), // Channels + open form
        ])
        .split(content_area);

    // Peers column: list on top, connect form below
    let peers_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(columns[0]);

    // Channels column: list on top, open form below
    let channels_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(9)])
        .split(columns[1]);

    peers::render(frame, app, peers_column[0]);
    forms::render_connect(frame, app, peers_column[1]);
    channels::render(frame, app, channels_column[0]);
    forms::render_open(frame, app, channels_column[1]);
    render_status_bar(frame, app, status_area);

    // Overlays last, on top of the panels
    dialog::render(frame, app, size);
    toast::render(frame, app, size);
}

/// Renders the status bar at the bottom of the screen.
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let node_label = match (app.selected_node, app.nodes.len()) {
        (_, 0) => "no nodes".to_string(),
        (Some(idx), n) => format!("node {}/{n}", idx + 1),
        (None, n) => format!("node ?/{n} (press n)"),
    };

    let network_label = app
        .network
        .map(|n| n.to_string())
        .unwrap_or_else(|| "network ?".to_string());

    let mut spans = vec![
        Span::styled(
            " lndeck v0.1.0 ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(
            format!("{} peers, {} channels", app.peers.len(), app.channels.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw(" | "),
        Span::styled(node_label, Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled(network_label, Style::default().fg(Color::Green)),
    ];

    if let Some(at) = &app.last_refresh {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("refreshed {at}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    // A failed refresh keeps the stale lists on screen; this is the
    // operator's only hint that the data is not current.
    if let Some(err) = &app.fetch_error {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

/// Returns a rectangle of the given size centered inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
