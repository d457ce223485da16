//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_button, render_sidebar_button, BUTTON_HEIGHT};
pub use dialog::{render_delete_dialog, render_error_dialog, render_submit_dialog};
