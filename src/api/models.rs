//! Request and response bodies exchanged with the ticket API

use crate::state::{EmergencyType, Ticket, TicketPriority};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Token response from the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// New account registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for the ticket list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    /// Zero-based page index
    pub page: usize,
    pub limit: usize,
    pub search: String,
}

impl TicketQuery {
    /// Query-string pairs; the API counts pages from 1
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", (self.page + 1).to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
        ]
    }
}

/// One page of tickets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPage {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub total: u64,
}

/// Body of a standard ticket creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub location: String,
}

/// Body of an emergency ticket creation.
///
/// `priority` and `status` are always forced to the most urgent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyTicketRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub contact_number: String,
    pub emergency_type: Option<EmergencyType>,
    pub immediate_action: bool,
    pub notify_management: bool,
    pub notify_security: bool,
    pub priority: TicketPriority,
    pub status: &'static str,
}

/// Status forced on emergency tickets
pub const EMERGENCY_STATUS: &str = "urgent";

/// Identifier returned by ticket creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CreatedTicketBody")]
pub struct CreatedTicket {
    pub ticket_id: i64,
}

/// Creation response as sent: `ticketId`, a full ticket with `id`, or both
#[derive(Deserialize)]
struct CreatedTicketBody {
    #[serde(rename = "ticketId")]
    ticket_id: Option<i64>,
    id: Option<i64>,
}

impl TryFrom<CreatedTicketBody> for CreatedTicket {
    type Error = &'static str;

    fn try_from(body: CreatedTicketBody) -> Result<Self, Self::Error> {
        body.ticket_id
            .or(body.id)
            .map(|ticket_id| CreatedTicket { ticket_id })
            .ok_or("creation response carries neither `ticketId` nor `id`")
    }
}

/// Body of the emergency notification call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyNotification {
    pub ticket_id: i64,
    pub notify_management: bool,
    pub notify_security: bool,
}

/// Body of a new comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub content: String,
}

/// Body of a status update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Deserialize a timestamp that may or may not carry a timezone.
///
/// Missing or unparseable values fall back to the current time.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(parse_timestamp(raw.as_deref().unwrap_or_default()))
}

/// Deserialize a location sent either as text or as a structured object.
///
/// Objects are flattened to their scalar values joined with ", ".
pub fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| location_text(&value)))
}

fn location_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => map
            .values()
            .filter_map(location_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .filter_map(location_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Parse an ISO timestamp string to DateTime<Utc>
pub fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if s.is_empty() {
        return Utc::now();
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc()))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_pages_are_one_based_on_the_wire() {
        let query = TicketQuery {
            page: 0,
            limit: 10,
            search: "leak".to_string(),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("search", "leak".to_string()),
            ]
        );
    }

    #[test]
    fn test_emergency_request_serializes_camel_case_with_forced_fields() {
        let request = EmergencyTicketRequest {
            title: "Burst pipe".to_string(),
            description: "Water everywhere".to_string(),
            location: "B-204".to_string(),
            contact_number: "555-123-4567".to_string(),
            emergency_type: Some(EmergencyType::Water),
            immediate_action: false,
            notify_management: true,
            notify_security: false,
            priority: TicketPriority::Emergency,
            status: EMERGENCY_STATUS,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contactNumber"], "555-123-4567");
        assert_eq!(json["emergencyType"], "water");
        assert_eq!(json["notifyManagement"], true);
        assert_eq!(json["priority"], "emergency");
        assert_eq!(json["status"], "urgent");
    }

    #[test]
    fn test_created_ticket_accepts_ticket_id_or_id() {
        let a: CreatedTicket = serde_json::from_str(r#"{"ticketId": 42}"#).unwrap();
        let b: CreatedTicket = serde_json::from_str(r#"{"id": 7, "title": "x"}"#).unwrap();
        assert_eq!(a.ticket_id, 42);
        assert_eq!(b.ticket_id, 7);
    }

    #[test]
    fn test_created_ticket_with_both_ids_prefers_ticket_id() {
        let both: CreatedTicket = serde_json::from_str(r#"{"ticketId": 42, "id": 42}"#).unwrap();
        assert_eq!(both.ticket_id, 42);
        let differing: CreatedTicket =
            serde_json::from_str(r#"{"id": 9, "ticketId": 42, "title": "Gas leak"}"#).unwrap();
        assert_eq!(differing.ticket_id, 42);
    }

    #[test]
    fn test_created_ticket_without_id_is_rejected() {
        assert!(serde_json::from_str::<CreatedTicket>(r#"{"title": "x"}"#).is_err());
    }

    #[test]
    fn test_ticket_page_with_structured_location_and_null_priority() {
        let page: TicketPage = serde_json::from_str(
            r#"{"tickets": [
                {"id": 1, "title": "Leak", "location": {"building": "B", "room": "204"}},
                {"id": 2, "title": "Door", "priority": null, "location": "Lobby"}
            ], "total": 2}"#,
        )
        .unwrap();
        assert_eq!(page.tickets[0].location.as_deref(), Some("B, 204"));
        assert_eq!(page.tickets[1].priority, TicketPriority::Unknown);
        assert_eq!(page.tickets[1].location.as_deref(), Some("Lobby"));
    }

    #[test]
    fn test_parse_timestamp_with_and_without_timezone() {
        let with_tz = parse_timestamp("2024-03-01T10:15:00Z");
        assert_eq!((with_tz.year(), with_tz.hour()), (2024, 10));

        let naive = parse_timestamp("2024-03-01T10:15:00.123456");
        assert_eq!((naive.month(), naive.minute()), (3, 15));
    }

    #[test]
    fn test_ticket_page_tolerates_missing_fields() {
        let page: TicketPage = serde_json::from_str("{}").unwrap();
        assert!(page.tickets.is_empty());
        assert_eq!(page.total, 0);
    }
}
