//! Form rendering

mod auth_form;
mod emergency_form;
mod field_renderer;
mod ticket_form;

pub use auth_form::{draw_login, draw_register};
pub use emergency_form::draw_emergency;
pub use ticket_form::draw_create;
