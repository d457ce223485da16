//! Form domain layer
//!
//! This module provides type-safe form handling for the login, registration
//! and standard ticket creation views.

mod field;
mod form_state;

pub use field::FormField;
pub use form_state::{Form, LoginForm, RegisterForm, TicketCreateForm};
