//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{REGISTER_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sidebar items: shortcut key, label and accent
const SIDEBAR_ITEMS: &[(&str, &str, Option<Color>)] = &[
    ("≡", "Tickets", None),
    ("n", "New Ticket", None),
    ("e", "Emergency", Some(Color::Red)),
];

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Sidebar
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Create full-width layout without sidebar (sign-in and registration)
pub fn create_layout_no_sidebar(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    chunks[0]
}

/// Draw the sidebar with boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(SIDEBAR_ITEMS.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, (key, label, accent)) in SIDEBAR_ITEMS.iter().enumerate() {
        let is_selected = match idx {
            0 => matches!(
                app.state.current_view,
                View::Tickets | View::TicketDetail
            ),
            1 => app.state.current_view == View::TicketCreate,
            2 => app.state.current_view == View::EmergencyTicket,
            _ => false,
        };
        render_sidebar_button(frame, chunks[idx + 1], key, label, is_selected, *accent);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    let session = if app.state.session.is_some() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(session);

    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Login => format!("Tab:next  Enter:sign in  {REGISTER_SHORTCUT}:register"),
        View::Register => "Tab:next  Enter:register  Esc:back".to_string(),
        View::Tickets if app.state.search_draft.is_some() => {
            "Enter:search  Esc:cancel".to_string()
        }
        View::Tickets => {
            "j/k:nav  Enter:view  /:search  n:new  e:emergency  d:delete  h/l:page  p:rows  L:logout"
                .to_string()
        }
        View::TicketDetail => {
            "c:comment  s:status  d:delete  y:copy  j/k:scroll  r:reload  Esc:back".to_string()
        }
        View::TicketCreate => format!("Tab:next  {SUBMIT_SHORTCUT}:submit  Esc:cancel"),
        View::EmergencyTicket if app.state.wizard.is_in_flight() => "Submitting...".to_string(),
        View::EmergencyTicket if app.state.wizard.is_confirming() => {
            "←/→:choose  Enter:select  y:submit  n:cancel".to_string()
        }
        View::EmergencyTicket => "Tab:field  Enter:next  Esc:back".to_string(),
    }
}
