//! Trait abstraction for the ticket API to enable mocking in tests

use super::error::ApiResult;
use super::models::{
    CreatedTicket, Credentials, EmergencyNotification, EmergencyTicketRequest, NewTicket,
    Registration, TicketPage, TicketQuery,
};
use super::session::Session;
use crate::state::Ticket;
use async_trait::async_trait;

/// Ticket API operations.
///
/// Every authorized call takes the caller's [`Session`]; the implementation
/// never reads credentials from anywhere else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Exchange credentials for a session
    async fn login(&self, credentials: &Credentials) -> ApiResult<Session>;

    /// Register a new account
    async fn register(&self, registration: &Registration) -> ApiResult<()>;

    /// List one page of tickets
    async fn list_tickets(&self, session: &Session, query: &TicketQuery) -> ApiResult<TicketPage>;

    /// Get a ticket with its comments
    async fn get_ticket(&self, session: &Session, ticket_id: i64) -> ApiResult<Ticket>;

    /// Create a standard ticket
    async fn create_ticket(&self, session: &Session, ticket: &NewTicket) -> ApiResult<()>;

    /// Create an emergency ticket (the primary write of the wizard)
    async fn create_emergency_ticket(
        &self,
        session: &Session,
        request: &EmergencyTicketRequest,
    ) -> ApiResult<CreatedTicket>;

    /// Send emergency notifications for a created ticket
    async fn send_emergency_notifications(
        &self,
        session: &Session,
        notification: &EmergencyNotification,
    ) -> ApiResult<()>;

    /// Add a comment to a ticket
    async fn add_comment(&self, session: &Session, ticket_id: i64, content: &str) -> ApiResult<()>;

    /// Change the status of a ticket
    async fn update_status(&self, session: &Session, ticket_id: i64, status: &str)
        -> ApiResult<()>;

    /// Delete a ticket
    async fn delete_ticket(&self, session: &Session, ticket_id: i64) -> ApiResult<()>;
}
