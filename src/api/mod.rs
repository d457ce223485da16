//! Ticket API client module for HTTP communication

mod client;
mod delivery;
mod error;
mod models;
mod session;
mod traits;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use delivery::BestEffort;
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use session::{Session, SessionStore};
pub use traits::TicketApi;

#[cfg(test)]
pub use traits::MockTicketApi;
