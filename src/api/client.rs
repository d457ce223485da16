//! HTTP client for the ticket API
//!
//! Talks JSON over HTTP to the maintenance API. Every authorized request
//! carries the bearer token of the session passed in by the caller; any
//! non-2xx response is turned into an [`ApiError`].

use super::error::{ApiError, ApiResult};
use super::models::{
    CreatedTicket, Credentials, EmergencyNotification, EmergencyTicketRequest, LoginResponse,
    NewComment, NewTicket, Registration, StatusUpdate, TicketPage, TicketQuery,
};
use super::session::Session;
use super::traits::TicketApi;
use crate::state::Ticket;
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Default API address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the ticket API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("ticketdesk/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The API base address
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer header, refusing expired sessions before any I/O
    fn authorized(&self, builder: RequestBuilder, session: &Session) -> ApiResult<RequestBuilder> {
        if session.is_expired() {
            return Err(ApiError::SessionExpired);
        }
        Ok(builder.header(AUTHORIZATION, session.bearer()))
    }

    async fn send(builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::status(status.as_u16(), error_detail(&body)))
    }
}

/// Pull the `detail` field out of an error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TicketApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let builder = self.http.post(self.url("/api/auth/login")).json(credentials);
        let body: LoginResponse = Self::send(builder).await?.json().await?;
        Ok(Session::new(body.access_token, body.expires_in))
    }

    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let builder = self
            .http
            .post(self.url("/api/auth/register"))
            .json(registration);
        Self::send(builder).await?;
        Ok(())
    }

    async fn list_tickets(&self, session: &Session, query: &TicketQuery) -> ApiResult<TicketPage> {
        let builder = self
            .http
            .get(self.url("/api/tickets/"))
            .query(&query.to_pairs());
        let builder = self.authorized(builder, session)?;
        Ok(Self::send(builder).await?.json().await?)
    }

    async fn get_ticket(&self, session: &Session, ticket_id: i64) -> ApiResult<Ticket> {
        let builder = self.http.get(self.url(&format!("/api/tickets/{ticket_id}")));
        let builder = self.authorized(builder, session)?;
        Ok(Self::send(builder).await?.json().await?)
    }

    async fn create_ticket(&self, session: &Session, ticket: &NewTicket) -> ApiResult<()> {
        let builder = self.http.post(self.url("/api/tickets/")).json(ticket);
        let builder = self.authorized(builder, session)?;
        Self::send(builder).await?;
        Ok(())
    }

    async fn create_emergency_ticket(
        &self,
        session: &Session,
        request: &EmergencyTicketRequest,
    ) -> ApiResult<CreatedTicket> {
        let builder = self
            .http
            .post(self.url("/api/tickets/emergency"))
            .json(request);
        let builder = self.authorized(builder, session)?;
        Ok(Self::send(builder).await?.json().await?)
    }

    async fn send_emergency_notifications(
        &self,
        session: &Session,
        notification: &EmergencyNotification,
    ) -> ApiResult<()> {
        let builder = self
            .http
            .post(self.url("/api/notifications/emergency"))
            .json(notification);
        let builder = self.authorized(builder, session)?;
        Self::send(builder).await?;
        Ok(())
    }

    async fn add_comment(&self, session: &Session, ticket_id: i64, content: &str) -> ApiResult<()> {
        let builder = self
            .http
            .post(self.url(&format!("/api/tickets/{ticket_id}/comments")))
            .json(&NewComment {
                content: content.to_string(),
            });
        let builder = self.authorized(builder, session)?;
        Self::send(builder).await?;
        Ok(())
    }

    async fn update_status(
        &self,
        session: &Session,
        ticket_id: i64,
        status: &str,
    ) -> ApiResult<()> {
        let builder = self
            .http
            .patch(self.url(&format!("/api/tickets/{ticket_id}")))
            .json(&StatusUpdate {
                status: status.to_string(),
            });
        let builder = self.authorized(builder, session)?;
        Self::send(builder).await?;
        Ok(())
    }

    async fn delete_ticket(&self, session: &Session, ticket_id: i64) -> ApiResult<()> {
        let builder = self
            .http
            .delete(self.url(&format!("/api/tickets/{ticket_id}")));
        let builder = self.authorized(builder, session)?;
        Self::send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::EMERGENCY_STATUS;
    use crate::state::{EmergencyType, TicketPriority};
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn session() -> Session {
        Session::new("tok123", None)
    }

    fn emergency_request() -> EmergencyTicketRequest {
        EmergencyTicketRequest {
            title: "Burst pipe".to_string(),
            description: "Water everywhere".to_string(),
            location: "B-204".to_string(),
            contact_number: "555-123-4567".to_string(),
            emergency_type: Some(EmergencyType::Water),
            immediate_action: true,
            notify_management: true,
            notify_security: false,
            priority: TicketPriority::Emergency,
            status: EMERGENCY_STATUS,
        }
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = ApiClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_error_detail_prefers_json_detail() {
        assert_eq!(error_detail(r#"{"detail": "Not found"}"#), "Not found");
        assert_eq!(error_detail("plain failure\n"), "plain failure");
    }

    #[tokio::test]
    async fn test_login_returns_session_with_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok123",
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = client(&server)
            .login(&Credentials {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.token, "tok123");
        assert!(session.expires_at.is_some());
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_emergency_create_sends_bearer_and_forced_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets/emergency"))
            .and(header("authorization", "Bearer tok123"))
            .and(body_partial_json(json!({
                "title": "Burst pipe",
                "contactNumber": "555-123-4567",
                "priority": "emergency",
                "status": "urgent"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ticketId": 42})))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server)
            .create_emergency_ticket(&session(), &emergency_request())
            .await
            .unwrap();

        assert_eq!(created.ticket_id, 42);
    }

    #[tokio::test]
    async fn test_full_ticket_creation_response_still_notifies() {
        use crate::state::wizard::{submit, SubmissionOutcome};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets/emergency"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"ticketId": 42, "id": 42, "title": "Burst pipe"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/emergency"))
            .and(body_json(json!({
                "ticketId": 42,
                "notifyManagement": true,
                "notifySecurity": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = submit(&client(&server), &session(), &emergency_request()).await;

        assert_eq!(outcome, SubmissionOutcome::Created { ticket_id: 42 });
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets/emergency"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "Internal server error"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .create_emergency_ticket(&session(), &emergency_request())
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal server error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tickets/7"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server).get_ticket(&session(), 7).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_expired_session_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let mut expired = session();
        expired.expires_at = Some(Utc::now() - chrono::Duration::seconds(5));

        let err = client(&server)
            .delete_ticket(&expired, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
    }

    #[tokio::test]
    async fn test_list_tickets_sends_page_limit_and_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tickets/"))
            .and(query_param("page", "3"))
            .and(query_param("limit", "25"))
            .and(query_param("search", "leak"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tickets": [{
                    "id": 9,
                    "title": "Leak in lobby",
                    "description": "Ceiling drip",
                    "status": "open",
                    "priority": "high",
                    "created_at": "2024-03-01T10:15:00"
                }],
                "total": 51
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .list_tickets(
                &session(),
                &TicketQuery {
                    page: 2,
                    limit: 25,
                    search: "leak".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total, 51);
        assert_eq!(page.tickets.len(), 1);
        assert_eq!(page.tickets[0].id, 9);
        assert_eq!(page.tickets[0].priority, TicketPriority::High);
    }

    #[tokio::test]
    async fn test_add_comment_posts_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets/5/comments"))
            .and(body_json(json!({"content": "On my way"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .add_comment(&session(), 5, "On my way")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_status_patches_ticket() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/tickets/5"))
            .and(body_json(json!({"status": "resolved"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_status(&session(), 5, "resolved")
            .await
            .unwrap();
    }
}
