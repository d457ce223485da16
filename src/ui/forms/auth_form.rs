//! Sign-in and registration forms

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::platform::REGISTER_SHORTCUT;
use crate::state::Form;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Centered box of the given size inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draw a form of single-line fields inside a centered titled box
fn draw_auth_box<F: Form>(frame: &mut Frame, area: Rect, title: &str, form: &F, help: &str) {
    let count = form.field_count() as u16;
    let box_area = centered(area, 56, count * 3 + 5);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, box_area);

    let mut constraints = vec![Constraint::Length(3); count as usize];
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(box_area);

    for index in 0..form.field_count() {
        if let Some(field) = form.get_field(index) {
            draw_field(frame, chunks[index], field, form.active_field() == index);
        }
    }
    draw_help_text(frame, chunks[form.field_count()], help);
}

/// Draw the sign-in form
pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let help = format!("Tab:next  Enter:sign in  {REGISTER_SHORTCUT}:register");
    draw_auth_box(frame, area, "Sign In", &app.state.login_form, &help);
}

/// Draw the registration form
pub fn draw_register(frame: &mut Frame, area: Rect, app: &App) {
    let help = format!("Tab:next  Enter:register  Esc or {REGISTER_SHORTCUT}:back");
    draw_auth_box(frame, area, "Create Account", &app.state.register_form, &help);
}
