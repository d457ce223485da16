//! Standard ticket creation form

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::Form;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the create ticket form
pub fn draw_create(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.create_form;

    let block = Block::default()
        .title(" New Ticket ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Description
            Constraint::Length(3), // Priority
            Constraint::Length(3), // Location
            Constraint::Length(1), // Help
        ])
        .margin(1)
        .split(area);

    for index in 0..form.field_count() {
        if let Some(field) = form.get_field(index) {
            draw_field(frame, chunks[index], field, form.active_field() == index);
        }
    }

    let help = format!("Tab:next  Enter:newline in description  {SUBMIT_SHORTCUT}:submit  Esc:cancel");
    draw_help_text(frame, chunks[4], &help);
}
