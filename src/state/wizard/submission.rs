//! Emergency submission: the primary create followed by best-effort notifications

use crate::api::{
    BestEffort, EmergencyNotification, EmergencyTicketRequest, Session, TicketApi,
};
use tracing::Instrument;
use uuid::Uuid;

/// Message shown when the primary create fails
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "Failed to create emergency ticket. Please try again or contact support directly.";

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created { ticket_id: i64 },
    Failed { message: String },
}

/// Run one submission attempt against the API.
///
/// Only the primary create decides the outcome. The notification call runs
/// after it succeeds, and only when at least one notify flag is set.
pub async fn submit(
    api: &dyn TicketApi,
    session: &Session,
    request: &EmergencyTicketRequest,
) -> SubmissionOutcome {
    let span = tracing::info_span!("emergency_submission", attempt = %Uuid::new_v4());

    async move {
        let created = match api.create_emergency_ticket(session, request).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!("Emergency ticket creation failed: {}", e);
                return SubmissionOutcome::Failed {
                    message: SUBMISSION_FAILED_MESSAGE.to_string(),
                };
            }
        };
        tracing::info!(ticket_id = created.ticket_id, "Emergency ticket created");

        if request.notify_management || request.notify_security {
            let notification = EmergencyNotification {
                ticket_id: created.ticket_id,
                notify_management: request.notify_management,
                notify_security: request.notify_security,
            };
            BestEffort::new(
                "emergency notification",
                api.send_emergency_notifications(session, &notification),
            )
            .run()
            .await;
        }

        SubmissionOutcome::Created {
            ticket_id: created.ticket_id,
        }
    }
    .instrument(span)
    .await
}
