//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod tickets;
mod widgets;

pub use widgets::render_scrollable_list;

use crate::app::App;
use crate::state::View;
use components::{render_delete_dialog, render_error_dialog, render_submit_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let view = &app.state.current_view;

    let main_area = if view.requires_session() {
        let (sidebar_area, main_area) = layout::create_layout(area);
        layout::draw_sidebar(frame, sidebar_area, app);
        main_area
    } else {
        layout::create_layout_no_sidebar(area)
    };

    match view {
        View::Login => forms::draw_login(frame, main_area, app),
        View::Register => forms::draw_register(frame, main_area, app),
        View::Tickets => tickets::draw_list(frame, main_area, app),
        View::TicketDetail => tickets::draw_detail(frame, main_area, app),
        View::TicketCreate => forms::draw_create(frame, main_area, app),
        View::EmergencyTicket => forms::draw_emergency(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    if let Some(action) = &app.state.pending_delete {
        render_delete_dialog(frame, action);
    }

    if *view == View::EmergencyTicket && app.state.wizard.is_confirming() {
        render_submit_dialog(frame, &app.state.wizard);
    }

    // Errors sit above everything else
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.queued_errors());
    }
}
