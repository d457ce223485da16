//! Application state and core logic

use crate::api::{
    ApiClient, ApiError, Session, SessionStore, TicketApi, TicketQuery,
};
use crate::config::Settings;
use crate::platform;
use crate::state::wizard::{self, EmergencyField, SubmissionOutcome, WizardController};
use crate::state::{
    next_status, AppState, DetailFocus, EmergencyType, Form, LoginForm, Pagination,
    PendingDeleteAction, RegisterForm, TicketCreateForm, View, ViewParams,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Message shown when the server rejects the session
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Results delivered by background tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    EmergencySubmitted(SubmissionOutcome),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Ticket API used for every request
    api: Arc<dyn TicketApi>,
    /// Where the session survives restarts
    session_store: SessionStore,
    /// Whether the app should quit
    quit: bool,
    /// Feedback line shown in the status bar
    pub status_message: Option<String>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new App instance and restore the previous session
    pub async fn new(settings: Settings) -> Result<Self> {
        let client = ApiClient::new(&settings.api_base_url, settings.request_timeout)?;
        tracing::info!("Using ticket API at {}", client.base_url());

        let mut app = Self::with_api(
            Arc::new(client),
            SessionStore::new(),
            settings.rows_per_page,
        );
        app.restore_session().await;
        Ok(app)
    }

    /// Create an App around an existing API implementation
    pub fn with_api(
        api: Arc<dyn TicketApi>,
        session_store: SessionStore,
        rows_per_page: usize,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut state = AppState::default();
        state.pagination = Pagination::with_rows_per_page(rows_per_page);

        Self {
            state,
            api,
            session_store,
            quit: false,
            status_message: None,
            events_tx,
            events_rx,
        }
    }

    /// Open the ticket list when a valid session is stored, the login view otherwise
    pub async fn restore_session(&mut self) {
        match self.session_store.load_valid() {
            Ok(Some(session)) => {
                tracing::info!("Restored stored session");
                self.state.session = Some(session);
                self.show_tickets();
                self.load_tickets().await;
            }
            Ok(None) => self.show_login(),
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                self.show_login();
            }
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Drain results from background tasks
    pub async fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event).await;
        }
    }

    /// Apply one background result
    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::EmergencySubmitted(outcome) => {
                if let Some(ticket_id) = self.state.wizard.finish_submission(&outcome) {
                    self.status_message = Some(format!("Emergency ticket #{ticket_id} created"));
                    self.navigate_to_created_item(View::TicketDetail, ViewParams::ticket(ticket_id));
                    self.load_ticket(ticket_id).await;
                }
            }
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Handle delete confirmation (modal)
        if self.state.pending_delete.is_some() {
            self.handle_delete_dialog_key(key).await?;
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::Login => self.handle_login_key(key).await?,
            View::Register => self.handle_register_key(key).await?,
            View::Tickets => self.handle_tickets_key(key).await?,
            View::TicketDetail => self.handle_ticket_detail_key(key).await?,
            View::TicketCreate => self.handle_ticket_create_key(key).await?,
            View::EmergencyTicket => self.handle_emergency_key(key)?,
        }
        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View, params: ViewParams) {
        // Save current view to history
        self.state.view_history.push((
            self.state.current_view.clone(),
            self.state.view_params.clone(),
        ));
        self.state.current_view = view;
        self.state.view_params = params;
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        // Skip form views in history to go back to the last non-form view
        while let Some((view, params)) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            self.state.view_params = params;
            return;
        }
        self.state.current_view = View::Tickets;
        self.state.view_params = ViewParams::default();
    }

    /// Navigate to the detail view for a newly created item
    fn navigate_to_created_item(&mut self, view: View, params: ViewParams) {
        self.reset_detail();
        self.navigate(view, params);
    }

    fn show_login(&mut self) {
        self.state.view_history.clear();
        self.state.current_view = View::Login;
        self.state.view_params = ViewParams::default();
    }

    fn show_tickets(&mut self) {
        self.state.view_history.clear();
        self.state.current_view = View::Tickets;
        self.state.view_params = ViewParams::default();
    }

    /// The current session, or a trip back to login when there is none
    fn session(&mut self) -> Option<Session> {
        if self.state.session.is_none() {
            self.end_session();
        }
        self.state.session.clone()
    }

    /// Forget the session everywhere and return to login
    fn end_session(&mut self) {
        if let Err(e) = self.session_store.clear() {
            tracing::warn!("Failed to remove stored session: {}", e);
        }
        self.state.clear_session_data();
        self.show_login();
    }

    /// Sign out
    pub fn logout(&mut self) {
        tracing::info!("Signing out");
        self.end_session();
        self.status_message = Some("Signed out".to_string());
    }

    /// Report an API failure, sending the user back to login when the session is gone
    fn handle_api_error(&mut self, error: ApiError, message: &str) {
        if error.requires_login() {
            tracing::warn!("Session rejected: {}", error);
            self.end_session();
            self.push_error(SESSION_EXPIRED_MESSAGE);
        } else {
            tracing::error!("{}: {}", message, error);
            self.push_error(message);
        }
    }

    // Authentication

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('r') if platform::is_shortcut(key.modifiers) => {
                self.state.register_form = RegisterForm::default();
                self.state.current_view = View::Register;
            }
            KeyCode::Tab | KeyCode::Down => self.state.login_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.login_form.prev_field(),
            KeyCode::Enter => self.login().await,
            KeyCode::Backspace => self.state.login_form.get_active_field_mut().pop_char(),
            KeyCode::Char(c) if is_plain(key.modifiers) => {
                self.state.login_form.get_active_field_mut().push_char(c)
            }
            _ => {}
        }
        Ok(())
    }

    async fn login(&mut self) {
        let credentials = match self.state.login_form.credentials() {
            Ok(credentials) => credentials,
            Err(message) => {
                self.push_error(message);
                return;
            }
        };

        match self.api.login(&credentials).await {
            Ok(session) => {
                tracing::info!("Signed in as {}", credentials.email);
                if let Err(e) = self.session_store.save(&session) {
                    tracing::warn!("Failed to store session: {}", e);
                }
                self.state.session = Some(session);
                self.state.login_form = LoginForm::default();
                self.show_tickets();
                self.load_tickets().await;
            }
            Err(e) => {
                tracing::warn!("Sign-in failed: {}", e);
                self.push_error("Invalid email or password");
            }
        }
    }

    async fn handle_register_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.show_login(),
            KeyCode::Char('r') if platform::is_shortcut(key.modifiers) => self.show_login(),
            KeyCode::Tab | KeyCode::Down => self.state.register_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.register_form.prev_field(),
            KeyCode::Enter => self.register().await,
            KeyCode::Backspace => self.state.register_form.get_active_field_mut().pop_char(),
            KeyCode::Char(c) if is_plain(key.modifiers) => {
                self.state.register_form.get_active_field_mut().push_char(c)
            }
            _ => {}
        }
        Ok(())
    }

    async fn register(&mut self) {
        let registration = match self.state.register_form.registration() {
            Ok(registration) => registration,
            Err(message) => {
                self.push_error(message);
                return;
            }
        };

        match self.api.register(&registration).await {
            Ok(()) => {
                tracing::info!("Registered {}", registration.email);
                self.state.register_form = RegisterForm::default();
                self.show_login();
                self.status_message = Some("Registration successful. Please sign in.".to_string());
            }
            Err(ApiError::Status { message, .. }) if !message.is_empty() => {
                tracing::warn!("Registration rejected: {}", message);
                self.push_error(format!("Registration failed: {message}"));
            }
            Err(e) => {
                tracing::error!("Registration failed: {}", e);
                self.push_error("Registration failed. Please try again.");
            }
        }
    }

    // Ticket list

    async fn handle_tickets_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.search_draft.is_some() {
            self.handle_search_key(key).await;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.tickets.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_ticket().map(|t| t.id) {
                    self.open_ticket(id).await;
                }
            }
            KeyCode::Char('/') => self.state.begin_search(),
            KeyCode::Esc if !self.state.search.is_empty() => {
                self.state.search_draft = Some(String::new());
                if self.state.apply_search() {
                    self.load_tickets().await;
                }
            }
            KeyCode::Char('n') => self.open_create_form(),
            KeyCode::Char('e') => self.open_emergency_wizard(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(ticket) = self.state.selected_ticket() {
                    self.state.pending_delete = Some(PendingDeleteAction::new(ticket));
                }
            }
            KeyCode::Char('r') => self.load_tickets().await,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                if self.state.pagination.next_page() {
                    self.state.reset_selection();
                    self.load_tickets().await;
                }
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                if self.state.pagination.prev_page() {
                    self.state.reset_selection();
                    self.load_tickets().await;
                }
            }
            KeyCode::Char('p') => {
                self.state.pagination.cycle_rows_per_page();
                self.state.reset_selection();
                self.load_tickets().await;
            }
            KeyCode::Char('L') => self.logout(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_search_key(&mut self, key: KeyEvent) {
        let Some(draft) = self.state.search_draft.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.cancel_search(),
            KeyCode::Enter => {
                if self.state.apply_search() {
                    self.load_tickets().await;
                }
            }
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Char(c) if is_plain(key.modifiers) => draft.push(c),
            _ => {}
        }
    }

    /// Load the current page of tickets
    pub async fn load_tickets(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        loop {
            let query = TicketQuery {
                page: self.state.pagination.page,
                limit: self.state.pagination.rows_per_page,
                search: self.state.search.trim().to_string(),
            };

            match self.api.list_tickets(&session, &query).await {
                Ok(page) => {
                    tracing::debug!("Loaded {} of {} tickets", page.tickets.len(), page.total);
                    self.state.tickets = page.tickets;
                    // The current page no longer exists, fetch the new last page
                    if self.state.pagination.set_total(page.total) {
                        continue;
                    }
                    self.state.clamp_selection();
                }
                Err(e) => {
                    self.state.tickets.clear();
                    self.handle_api_error(e, "Error loading tickets. Please try again later.");
                }
            }
            return;
        }
    }

    // Ticket detail

    fn reset_detail(&mut self) {
        self.state.ticket = None;
        self.state.comment_draft.clear();
        self.state.detail_focus = DetailFocus::Content;
        self.state.scroll_offset = 0;
    }

    async fn open_ticket(&mut self, ticket_id: i64) {
        self.reset_detail();
        self.navigate(View::TicketDetail, ViewParams::ticket(ticket_id));
        self.load_ticket(ticket_id).await;
    }

    /// Load one ticket with its comments
    pub async fn load_ticket(&mut self, ticket_id: i64) {
        let Some(session) = self.session() else {
            return;
        };
        match self.api.get_ticket(&session, ticket_id).await {
            Ok(ticket) => self.state.ticket = Some(ticket),
            Err(e) => {
                self.handle_api_error(e, "Error loading ticket details. Please try again later.")
            }
        }
    }

    async fn handle_ticket_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.detail_focus == DetailFocus::CommentInput {
            match key.code {
                KeyCode::Esc | KeyCode::Tab => self.state.detail_focus.toggle(),
                KeyCode::Enter => self.add_comment().await,
                KeyCode::Backspace => {
                    self.state.comment_draft.pop();
                }
                KeyCode::Char(c) if is_plain(key.modifiers) => self.state.comment_draft.push(c),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab | KeyCode::Char('c') => self.state.detail_focus.toggle(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('s') => self.cycle_status().await,
            KeyCode::Char('r') => {
                if let Some(id) = self.state.view_params.ticket_id {
                    self.load_ticket(id).await;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(ticket) = &self.state.ticket {
                    self.state.pending_delete = Some(PendingDeleteAction::new(ticket));
                }
            }
            KeyCode::Char('y') => self.copy_ticket_reference(),
            KeyCode::Esc | KeyCode::Backspace => {
                self.reset_detail();
                self.go_back();
                self.load_tickets().await;
            }
            _ => {}
        }
        Ok(())
    }

    async fn add_comment(&mut self) {
        let content = self.state.comment_draft.trim().to_string();
        if content.is_empty() {
            return;
        }
        let Some(ticket_id) = self.state.ticket.as_ref().map(|t| t.id) else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };

        match self.api.add_comment(&session, ticket_id, &content).await {
            Ok(()) => {
                self.state.comment_draft.clear();
                self.status_message = Some("Comment added".to_string());
                self.load_ticket(ticket_id).await;
            }
            Err(e) => self.handle_api_error(e, "Error adding comment"),
        }
    }

    async fn cycle_status(&mut self) {
        let Some((ticket_id, status)) = self
            .state
            .ticket
            .as_ref()
            .map(|t| (t.id, next_status(&t.status)))
        else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };

        match self.api.update_status(&session, ticket_id, status).await {
            Ok(()) => {
                self.status_message = Some(format!("Status changed to {status}"));
                self.load_ticket(ticket_id).await;
            }
            Err(e) => self.handle_api_error(e, "Error updating ticket status"),
        }
    }

    fn copy_ticket_reference(&mut self) {
        let Some(reference) = self.state.ticket.as_ref().map(|t| t.reference()) else {
            return;
        };
        match self.copy_to_clipboard(&reference) {
            Ok(()) => self.status_message = Some(format!("Copied {reference}")),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.push_error("Failed to copy to clipboard");
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    // Delete confirmation

    async fn handle_delete_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(pending) = self.state.pending_delete.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('j')
            | KeyCode::Char('k') => {
                pending.selected_option = !pending.selected_option;
            }
            KeyCode::Enter => {
                if pending.selected_option {
                    self.delete_pending_ticket().await;
                } else {
                    self.state.pending_delete = None;
                }
            }
            KeyCode::Char('y') => self.delete_pending_ticket().await,
            KeyCode::Char('n') | KeyCode::Esc => self.state.pending_delete = None,
            _ => {}
        }
        Ok(())
    }

    async fn delete_pending_ticket(&mut self) {
        let Some(pending) = self.state.pending_delete.take() else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };
        let from_detail = self.state.current_view == View::TicketDetail;

        match self.api.delete_ticket(&session, pending.ticket_id).await {
            Ok(()) => {
                tracing::info!("Deleted ticket {}", pending.ticket_id);
                self.status_message = Some(format!("Deleted \"{}\"", pending.entity_display));
                if from_detail {
                    self.reset_detail();
                    self.go_back();
                }
                self.load_tickets().await;
            }
            Err(e) => {
                let message = if from_detail {
                    "Error deleting ticket"
                } else {
                    "Failed to delete ticket"
                };
                self.handle_api_error(e, message);
            }
        }
    }

    // Standard ticket creation

    fn open_create_form(&mut self) {
        self.state.create_form = TicketCreateForm::default();
        self.navigate(View::TicketCreate, ViewParams::default());
    }

    async fn handle_ticket_create_key(&mut self, key: KeyEvent) -> Result<()> {
        let form = &mut self.state.create_form;
        let on_multiline = form
            .get_field(form.active_field())
            .is_some_and(|field| field.is_multiline);

        match key.code {
            KeyCode::Char('s') if platform::is_shortcut(key.modifiers) => {
                self.create_ticket().await
            }
            KeyCode::Esc => {
                self.state.create_form = TicketCreateForm::default();
                self.go_back();
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            // Enter in description field adds newline
            KeyCode::Enter if on_multiline => form.get_active_field_mut().push_char('\n'),
            KeyCode::Enter => self.create_ticket().await,
            KeyCode::Backspace => form.get_active_field_mut().pop_char(),
            KeyCode::Char(c) if is_plain(key.modifiers) => form.get_active_field_mut().push_char(c),
            _ => {}
        }
        Ok(())
    }

    async fn create_ticket(&mut self) {
        let ticket = match self.state.create_form.new_ticket() {
            Ok(ticket) => ticket,
            Err(message) => {
                self.push_error(message);
                return;
            }
        };
        let Some(session) = self.session() else {
            return;
        };

        match self.api.create_ticket(&session, &ticket).await {
            Ok(()) => {
                tracing::info!("Created ticket \"{}\"", ticket.title);
                self.state.create_form = TicketCreateForm::default();
                self.status_message = Some("Ticket created successfully!".to_string());
            }
            Err(e @ ApiError::Transport(_)) => self.handle_api_error(e, "Error creating ticket"),
            Err(e) => self.handle_api_error(e, "Failed to create ticket"),
        }
    }

    // Emergency wizard

    fn open_emergency_wizard(&mut self) {
        self.state.wizard = WizardController::default();
        self.navigate(View::EmergencyTicket, ViewParams::default());
    }

    fn leave_emergency_wizard(&mut self) {
        self.state.wizard = WizardController::default();
        self.go_back();
    }

    fn handle_emergency_key(&mut self, key: KeyEvent) -> Result<()> {
        let wizard = &mut self.state.wizard;

        if wizard.is_in_flight() {
            return Ok(());
        }

        if wizard.is_confirming() {
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                    wizard.toggle_confirm_highlight()
                }
                KeyCode::Enter if wizard.confirm_highlighted() => self.start_emergency_submission(),
                KeyCode::Char('y') => self.start_emergency_submission(),
                KeyCode::Enter | KeyCode::Char('n') | KeyCode::Esc => wizard.cancel_confirmation(),
                _ => {}
            }
            return Ok(());
        }

        let focused = wizard.focused_field();
        match key.code {
            KeyCode::Esc if wizard.step().prev().is_none() => self.leave_emergency_wizard(),
            KeyCode::Esc => wizard.retreat(),
            KeyCode::Enter => wizard.advance(),
            KeyCode::Tab | KeyCode::Down => wizard.focus_next(),
            KeyCode::BackTab | KeyCode::Up => wizard.focus_prev(),
            KeyCode::Left if focused == Some(EmergencyField::EmergencyType) => {
                wizard.toggle_focused(false)
            }
            KeyCode::Right if focused == Some(EmergencyField::EmergencyType) => {
                wizard.toggle_focused(true)
            }
            KeyCode::Backspace => wizard.backspace(),
            KeyCode::Char(c) if is_plain(key.modifiers) => match focused {
                Some(field) if field.is_text() => wizard.type_char(c),
                Some(EmergencyField::EmergencyType) => {
                    if let Some(picked) = c
                        .to_digit(10)
                        .and_then(|d| (d as usize).checked_sub(1))
                        .and_then(|i| EmergencyType::ALL.get(i))
                    {
                        wizard.select_type(*picked);
                    } else if c == ' ' {
                        wizard.toggle_focused(true);
                    }
                }
                Some(field) if field.is_toggle() && c == ' ' => wizard.toggle_focused(true),
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    /// Send the confirmed emergency ticket on a background task
    fn start_emergency_submission(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(request) = self.state.wizard.begin_submission() else {
            return;
        };

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = wizard::submit(api.as_ref(), &session, &request).await;
            if tx.send(AppEvent::EmergencySubmitted(outcome)).is_err() {
                tracing::warn!("Emergency submission finished after the app closed");
            }
        });
    }
}

/// Whether a key carries no modifier other than Shift
fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CreatedTicket, MockTicketApi, TicketPage};
    use crate::state::wizard::{WizardState, WizardStep, SUBMISSION_FAILED_MESSAGE};
    use crate::state::{Ticket, TicketPriority};
    use chrono::Utc;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn ticket(id: i64) -> Ticket {
        Ticket {
            id,
            title: format!("Ticket {id}"),
            description: "Details".to_string(),
            status: "open".to_string(),
            priority: TicketPriority::Medium,
            location: Some("Building A".to_string()),
            created_at: Utc::now(),
            comments: Vec::new(),
        }
    }

    fn page(ids: &[i64], total: u64) -> TicketPage {
        TicketPage {
            tickets: ids.iter().map(|id| ticket(*id)).collect(),
            total,
        }
    }

    fn app_with(api: MockTicketApi) -> App {
        App::with_api(Arc::new(api), SessionStore::in_memory(), 10)
    }

    fn signed_in(api: MockTicketApi) -> App {
        let mut app = app_with(api);
        app.state.session = Some(Session::new("token", None));
        app.show_tickets();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code)).await.unwrap();
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    #[tokio::test]
    async fn test_login_opens_ticket_list() {
        let mut api = MockTicketApi::new();
        api.expect_login()
            .withf(|c| c.email == "tenant@example.com" && c.password == "pw")
            .times(1)
            .returning(|_| Ok(Session::new("abc", Some(3600))));
        api.expect_list_tickets()
            .withf(|s, q| s.token == "abc" && q.page == 0 && q.limit == 10)
            .returning(|_, _| Ok(page(&[1, 2], 2)));

        let mut app = app_with(api);
        type_text(&mut app, "tenant@example.com").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "pw").await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.state.current_view, View::Tickets);
        assert_eq!(app.state.tickets.len(), 2);
        assert!(app.state.session.is_some());
        assert_eq!(app.state.login_form.email.as_text(), "");
    }

    #[tokio::test]
    async fn test_login_failure_shows_message() {
        let mut api = MockTicketApi::new();
        api.expect_login().returning(|_| Err(ApiError::Unauthorized));

        let mut app = app_with(api);
        type_text(&mut app, "a@b.c").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "wrong").await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.state.current_view, View::Login);
        assert_eq!(app.state.current_error(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_sends_nothing() {
        let mut api = MockTicketApi::new();
        api.expect_login().times(0);

        let mut app = app_with(api);
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(
            app.state.current_error(),
            Some("Email and password are required")
        );

        // Error dialog is modal and dismissed with Enter
        press(&mut app, KeyCode::Enter).await;
        assert!(!app.state.has_errors());
    }

    #[tokio::test]
    async fn test_register_returns_to_login() {
        let mut api = MockTicketApi::new();
        api.expect_register()
            .withf(|r| r.name == "Sam" && r.email == "sam@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let mut app = app_with(api);
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert_eq!(app.state.current_view, View::Register);

        type_text(&mut app, "Sam").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "sam@example.com").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "pw").await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.state.current_view, View::Login);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Registration successful. Please sign in.")
        );
    }

    #[tokio::test]
    async fn test_restore_session_from_store() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&Session::new("stored", Some(600))).unwrap();

        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .withf(|s, _| s.token == "stored")
            .times(1)
            .returning(|_, _| Ok(page(&[3], 1)));

        let mut app = App::with_api(Arc::new(api), store, 25);
        app.restore_session().await;

        assert_eq!(app.state.current_view, View::Tickets);
        assert_eq!(app.state.pagination.rows_per_page, 25);
    }

    #[tokio::test]
    async fn test_restore_without_session_opens_login() {
        let mut app = app_with(MockTicketApi::new());
        app.restore_session().await;
        assert_eq!(app.state.current_view, View::Login);
    }

    #[tokio::test]
    async fn test_unauthorized_list_returns_to_login() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .returning(|_, _| Err(ApiError::Unauthorized));

        let mut app = signed_in(api);
        app.load_tickets().await;

        assert_eq!(app.state.current_view, View::Login);
        assert!(app.state.session.is_none());
        assert_eq!(app.state.current_error(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_failure_shows_message() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .returning(|_, _| Err(ApiError::status(500, "boom")));

        let mut app = signed_in(api);
        app.load_tickets().await;

        assert_eq!(app.state.current_view, View::Tickets);
        assert_eq!(
            app.state.current_error(),
            Some("Error loading tickets. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_search_applies_on_enter_from_first_page() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .withf(|_, q| q.search.is_empty())
            .returning(|_, _| Ok(page(&[1, 2, 3], 30)));
        api.expect_list_tickets()
            .withf(|_, q| q.search == "leak" && q.page == 0)
            .times(1)
            .returning(|_, _| Ok(page(&[7], 1)));

        let mut app = signed_in(api);
        app.load_tickets().await;
        press(&mut app, KeyCode::Char('l')).await;
        assert_eq!(app.state.pagination.page, 1);

        press(&mut app, KeyCode::Char('/')).await;
        type_text(&mut app, "leak").await;
        assert_eq!(app.state.search, "");
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.state.search, "leak");
        assert_eq!(app.state.pagination.page, 0);
        assert_eq!(app.state.tickets[0].id, 7);
    }

    #[tokio::test]
    async fn test_rows_per_page_cycle_reloads() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .withf(|_, q| q.limit == 25 && q.page == 0)
            .times(1)
            .returning(|_, _| Ok(page(&[1], 1)));

        let mut app = signed_in(api);
        press(&mut app, KeyCode::Char('p')).await;
        assert_eq!(app.state.pagination.rows_per_page, 25);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .returning(|_, _| Ok(page(&[1, 2], 2)));
        api.expect_delete_ticket()
            .withf(|_, id| *id == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut app = signed_in(api);
        app.load_tickets().await;

        press(&mut app, KeyCode::Char('d')).await;
        assert!(app.state.pending_delete.is_some());
        // Cancel is highlighted first
        press(&mut app, KeyCode::Enter).await;
        assert!(app.state.pending_delete.is_none());

        press(&mut app, KeyCode::Char('d')).await;
        press(&mut app, KeyCode::Right).await;
        press(&mut app, KeyCode::Enter).await;
        assert!(app.state.pending_delete.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Deleted \"Ticket 1\""));
    }

    #[tokio::test]
    async fn test_deleting_last_row_reloads_previous_page() {
        let mut api = MockTicketApi::new();
        let mut seq = Sequence::new();
        api.expect_list_tickets()
            .withf(|_, q| q.page == 0)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&(1..=10).collect::<Vec<_>>(), 11)));
        api.expect_list_tickets()
            .withf(|_, q| q.page == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&[11], 11)));
        api.expect_delete_ticket()
            .withf(|_, id| *id == 11)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        api.expect_list_tickets()
            .withf(|_, q| q.page == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&[], 10)));
        api.expect_list_tickets()
            .withf(|_, q| q.page == 0)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&(1..=10).collect::<Vec<_>>(), 10)));

        let mut app = signed_in(api);
        app.load_tickets().await;
        press(&mut app, KeyCode::Char('l')).await;
        assert_eq!(app.state.pagination.page, 1);

        press(&mut app, KeyCode::Char('d')).await;
        press(&mut app, KeyCode::Char('y')).await;

        assert_eq!(app.state.pagination.page, 0);
        assert_eq!(app.state.tickets.len(), 10);
        assert_eq!(app.state.pagination.range_label(), "1-10 of 10");
    }

    #[tokio::test]
    async fn test_delete_failure_from_list() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .returning(|_, _| Ok(page(&[1], 1)));
        api.expect_delete_ticket()
            .returning(|_, _| Err(ApiError::status(403, "forbidden")));

        let mut app = signed_in(api);
        app.load_tickets().await;
        press(&mut app, KeyCode::Char('d')).await;
        press(&mut app, KeyCode::Char('y')).await;
        assert_eq!(app.state.current_error(), Some("Failed to delete ticket"));
    }

    #[tokio::test]
    async fn test_open_detail_and_comment() {
        let mut api = MockTicketApi::new();
        api.expect_list_tickets()
            .returning(|_, _| Ok(page(&[5], 1)));
        api.expect_get_ticket()
            .withf(|_, id| *id == 5)
            .returning(|_, id| Ok(ticket(id)));
        api.expect_add_comment()
            .withf(|_, id, content| *id == 5 && content == "On my way")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut app = signed_in(api);
        app.load_tickets().await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.state.current_view, View::TicketDetail);
        assert_eq!(app.state.ticket.as_ref().map(|t| t.id), Some(5));

        press(&mut app, KeyCode::Tab).await;
        // Blank comments are ignored
        type_text(&mut app, "  ").await;
        press(&mut app, KeyCode::Enter).await;
        app.state.comment_draft.clear();

        type_text(&mut app, "On my way").await;
        press(&mut app, KeyCode::Enter).await;
        assert!(app.state.comment_draft.is_empty());

        press(&mut app, KeyCode::Esc).await;
        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.state.current_view, View::Tickets);
    }

    #[tokio::test]
    async fn test_status_cycles_to_next() {
        let mut api = MockTicketApi::new();
        api.expect_get_ticket().returning(|_, id| Ok(ticket(id)));
        api.expect_update_status()
            .withf(|_, id, status| *id == 9 && status == "in_progress")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut app = signed_in(api);
        app.open_ticket(9).await;
        press(&mut app, KeyCode::Char('s')).await;
        assert_eq!(
            app.status_message.as_deref(),
            Some("Status changed to in_progress")
        );
    }

    #[tokio::test]
    async fn test_status_failure_shows_message() {
        let mut api = MockTicketApi::new();
        api.expect_get_ticket().returning(|_, id| Ok(ticket(id)));
        api.expect_update_status()
            .returning(|_, _, _| Err(ApiError::status(500, "boom")));

        let mut app = signed_in(api);
        app.open_ticket(9).await;
        press(&mut app, KeyCode::Char('s')).await;
        assert_eq!(
            app.state.current_error(),
            Some("Error updating ticket status")
        );
    }

    #[tokio::test]
    async fn test_create_ticket_resets_form() {
        let mut api = MockTicketApi::new();
        api.expect_create_ticket()
            .withf(|_, t| t.title == "Light out" && t.priority == TicketPriority::High)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut app = signed_in(api);
        press(&mut app, KeyCode::Char('n')).await;
        assert_eq!(app.state.current_view, View::TicketCreate);

        type_text(&mut app, "Light out").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "Stairwell B").await;
        press(&mut app, KeyCode::Tab).await;
        press(&mut app, KeyCode::Char('3')).await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "Building B").await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(
            app.status_message.as_deref(),
            Some("Ticket created successfully!")
        );
        assert_eq!(app.state.create_form.title.as_text(), "");
        assert_eq!(app.state.current_view, View::TicketCreate);
    }

    #[tokio::test]
    async fn test_create_ticket_rejected() {
        let mut api = MockTicketApi::new();
        api.expect_create_ticket()
            .returning(|_, _| Err(ApiError::status(422, "invalid")));

        let mut app = signed_in(api);
        press(&mut app, KeyCode::Char('n')).await;
        type_text(&mut app, "T").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "D").await;
        press(&mut app, KeyCode::Tab).await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "L").await;
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await
            .unwrap();

        assert_eq!(app.state.current_error(), Some("Failed to create ticket"));
        assert_eq!(app.state.create_form.title.as_text(), "T");
    }

    async fn fill_wizard_to_gate(app: &mut App) {
        press(app, KeyCode::Char('e')).await;
        assert_eq!(app.state.current_view, View::EmergencyTicket);

        type_text(app, "Burst pipe").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "Water everywhere").await;
        press(app, KeyCode::Tab).await;
        press(app, KeyCode::Char('4')).await;
        press(app, KeyCode::Enter).await;

        type_text(app, "B-204").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "555-123-4567").await;
        press(app, KeyCode::Enter).await;
        press(app, KeyCode::Enter).await;

        assert_eq!(
            app.state.wizard.state(),
            WizardState::ConfirmGate { in_flight: false }
        );
        assert_eq!(
            app.state.wizard.form().emergency_type,
            Some(EmergencyType::Water)
        );
    }

    #[tokio::test]
    async fn test_emergency_success_navigates_to_created_ticket() {
        let mut api = MockTicketApi::new();
        let mut seq = Sequence::new();
        api.expect_create_emergency_ticket()
            .withf(|_, r| r.contact_number == "555-123-4567" && r.status == "urgent")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(CreatedTicket { ticket_id: 42 }));
        api.expect_send_emergency_notifications()
            .withf(|_, n| n.ticket_id == 42 && n.notify_management)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        api.expect_get_ticket()
            .withf(|_, id| *id == 42)
            .times(1)
            .returning(|_, id| Ok(ticket(id)));

        let mut app = signed_in(api);
        fill_wizard_to_gate(&mut app).await;

        press(&mut app, KeyCode::Right).await;
        press(&mut app, KeyCode::Enter).await;
        assert!(app.state.wizard.is_in_flight());

        // Keys are ignored while the request is pending
        press(&mut app, KeyCode::Esc).await;
        press(&mut app, KeyCode::Char('y')).await;
        assert!(app.state.wizard.is_in_flight());

        let event = app.events_rx.recv().await.unwrap();
        app.handle_event(event).await;

        assert_eq!(app.state.current_view, View::TicketDetail);
        assert_eq!(app.state.view_params.ticket_id, Some(42));
        assert_eq!(app.state.ticket.as_ref().map(|t| t.id), Some(42));

        // Back skips the wizard and lands on the list
        app.go_back();
        assert_eq!(app.state.current_view, View::Tickets);
    }

    #[tokio::test]
    async fn test_emergency_failure_keeps_form() {
        let mut api = MockTicketApi::new();
        api.expect_create_emergency_ticket()
            .times(1)
            .returning(|_, _| Err(ApiError::status(500, "boom")));
        api.expect_send_emergency_notifications().times(0);

        let mut app = signed_in(api);
        fill_wizard_to_gate(&mut app).await;
        let before = app.state.wizard.form().clone();

        press(&mut app, KeyCode::Char('y')).await;
        let event = app.events_rx.recv().await.unwrap();
        app.handle_event(event).await;

        assert_eq!(app.state.current_view, View::EmergencyTicket);
        assert_eq!(
            app.state.wizard.state(),
            WizardState::Step(WizardStep::Review)
        );
        assert_eq!(app.state.wizard.error(), Some(SUBMISSION_FAILED_MESSAGE));
        assert_eq!(app.state.wizard.form(), &before);
    }

    #[tokio::test]
    async fn test_gate_defaults_to_cancel() {
        let mut app = signed_in(MockTicketApi::new());
        fill_wizard_to_gate(&mut app).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(
            app.state.wizard.state(),
            WizardState::Step(WizardStep::Review)
        );
    }

    #[tokio::test]
    async fn test_escape_walks_back_then_leaves_wizard() {
        let mut app = signed_in(MockTicketApi::new());
        press(&mut app, KeyCode::Char('e')).await;
        type_text(&mut app, "Gas smell").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "Lobby").await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.state.wizard.step(), WizardStep::LocationContact);

        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.state.wizard.step(), WizardStep::Details);
        assert_eq!(app.state.wizard.form().title, "Gas smell");

        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.state.current_view, View::Tickets);
        assert_eq!(app.state.wizard.form().title, "");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::at(path.clone());
        store.save(&Session::new("token", None)).unwrap();

        let mut app = App::with_api(Arc::new(MockTicketApi::new()), store, 10);
        app.state.session = Some(Session::new("token", None));
        app.show_tickets();

        press(&mut app, KeyCode::Char('L')).await;
        assert_eq!(app.state.current_view, View::Login);
        assert!(app.state.session.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_is_plain() {
        assert!(is_plain(KeyModifiers::NONE));
        assert!(is_plain(KeyModifiers::SHIFT));
        assert!(!is_plain(KeyModifiers::CONTROL));
        assert!(!is_plain(KeyModifiers::ALT | KeyModifiers::SHIFT));
    }
}
