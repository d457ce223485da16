//! Application state definitions

use super::forms::{LoginForm, RegisterForm, TicketCreateForm};
use super::pagination::Pagination;
use super::wizard::WizardController;
use crate::api::{deserialize_location, deserialize_timestamp, Session};
use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Register,
    Tickets,
    TicketDetail,
    TicketCreate,
    EmergencyTicket,
}

impl View {
    /// Views that edit a form and are skipped when going back
    pub fn is_form_view(&self) -> bool {
        matches!(
            self,
            View::Login | View::Register | View::TicketCreate | View::EmergencyTicket
        )
    }

    /// Views reachable only with a session
    pub fn requires_session(&self) -> bool {
        !matches!(self, View::Login | View::Register)
    }
}

/// View parameters for navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub ticket_id: Option<i64>,
}

impl ViewParams {
    pub fn ticket(id: i64) -> Self {
        Self {
            ticket_id: Some(id),
        }
    }
}

/// Ticket priority tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    #[default]
    Low,
    Medium,
    High,
    Emergency,
    #[serde(other)]
    Unknown,
}

impl TicketPriority {
    /// Priorities selectable when creating a ticket
    pub const SELECTABLE: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Emergency,
    ];

    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Emergency,
            Self::Emergency | Self::Unknown => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Emergency => "emergency",
            Self::Unknown => "unknown",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Low => Color::Green,
            Self::Medium => Color::Yellow,
            Self::High | Self::Emergency => Color::Red,
            Self::Unknown => Color::Gray,
        }
    }
}

/// A `null` priority reads as unknown; a missing one still takes the default
fn deserialize_priority<'de, D>(deserializer: D) -> Result<TicketPriority, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TicketPriority>::deserialize(deserializer)?.unwrap_or(TicketPriority::Unknown))
}

/// Ticket statuses cycled from the detail view
pub const TICKET_STATUSES: [&str; 4] = ["open", "in_progress", "resolved", "closed"];

/// Next status in the detail view cycle
pub fn next_status(current: &str) -> &'static str {
    TICKET_STATUSES
        .iter()
        .position(|s| *s == current)
        .map(|i| TICKET_STATUSES[(i + 1) % TICKET_STATUSES.len()])
        .unwrap_or(TICKET_STATUSES[0])
}

/// Comment on a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Ticket information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: TicketPriority,
    /// Plain text, or a structured location flattened to text
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Ticket {
    /// Short reference used for the clipboard and dialogs
    pub fn reference(&self) -> String {
        format!("#{} {}", self.id, self.title)
    }
}

/// Focus state for the ticket detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Content,
    CommentInput,
}

impl DetailFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Content => Self::CommentInput,
            Self::CommentInput => Self::Content,
        };
    }
}

/// Pending delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeleteAction {
    pub ticket_id: i64,
    pub entity_display: String,
    /// true = Delete highlighted, false = Cancel highlighted
    pub selected_option: bool,
}

impl PendingDeleteAction {
    pub fn new(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.id,
            entity_display: ticket.title.clone(),
            selected_option: false,
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_params: ViewParams,
    pub view_history: Vec<(View, ViewParams)>,

    // Session
    pub session: Option<Session>,

    // Ticket list
    pub tickets: Vec<Ticket>,
    pub pagination: Pagination,
    pub search: String,
    /// Search text being edited, `None` when not in search mode
    pub search_draft: Option<String>,
    pub selected_index: usize,

    // Ticket detail
    pub ticket: Option<Ticket>,
    pub comment_draft: String,
    pub detail_focus: DetailFocus,
    pub scroll_offset: usize,

    // Dialogs
    pub pending_delete: Option<PendingDeleteAction>,
    errors: VecDeque<String>,

    // Forms
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    pub create_form: TicketCreateForm,
    pub wizard: WizardController,
}

impl AppState {
    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    /// Whether an error dialog is showing
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The error currently displayed
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Errors waiting behind the displayed one
    pub fn queued_errors(&self) -> usize {
        self.errors.len().saturating_sub(1)
    }

    /// Dismiss the displayed error
    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Keep the selection inside the loaded page
    pub fn clamp_selection(&mut self) {
        let len = self.tickets.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Ticket under the list cursor
    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.tickets.get(self.selected_index)
    }

    /// Scroll down
    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    /// Scroll up
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Enter search mode seeded with the applied search
    pub fn begin_search(&mut self) {
        self.search_draft = Some(self.search.clone());
    }

    /// Leave search mode without applying
    pub fn cancel_search(&mut self) {
        self.search_draft = None;
    }

    /// Apply the edited search; returns true when the term changed
    pub fn apply_search(&mut self) -> bool {
        match self.search_draft.take() {
            Some(draft) if draft != self.search => {
                self.search = draft;
                self.pagination.first_page();
                self.reset_selection();
                true
            }
            _ => false,
        }
    }

    /// Drop everything tied to the signed-in user
    pub fn clear_session_data(&mut self) {
        self.session = None;
        self.tickets.clear();
        self.ticket = None;
        self.comment_draft.clear();
        self.search.clear();
        self.search_draft = None;
        self.pagination = Pagination::with_rows_per_page(self.pagination.rows_per_page);
        self.pending_delete = None;
        self.create_form = TicketCreateForm::default();
        self.wizard = WizardController::default();
        self.reset_selection();
    }
}
