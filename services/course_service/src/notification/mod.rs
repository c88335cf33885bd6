//! Post-decision notification dispatch.
//!
//! The dispatcher is a collaborator, not part of the decision transaction:
//! `decide` records the outcome of the call and moves on. Delivery is
//! best-effort and bounded by the HTTP client timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::enrollment::types::EnrollmentStatus;

const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What the user gets told about the review of their enrollment.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DecisionSummary {
    pub enrollment_id: Uuid,
    pub course_name: String,
    pub status: EnrollmentStatus,
    pub admin_notes: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification endpoint is not configured.")]
    NotConfigured,

    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification endpoint replied with status {0}.")]
    Status(u16),
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, user_id: &str, summary: &DecisionSummary) -> Result<(), NotifyError>;
}

/// Posts the decision summary as JSON to the configured endpoint.
pub struct HttpNotificationDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct NotifyRequest<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    summary: &'a DecisionSummary,
}

impl HttpNotificationDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DISPATCH_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with these options");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn notify(&self, user_id: &str, summary: &DecisionSummary) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NotifyRequest { user_id, summary })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Used when no endpoint is configured. Reports failure instead of
/// pretending delivery happened, so callers see `notification_sent = false`.
pub struct UnconfiguredDispatcher;

#[async_trait]
impl NotificationDispatcher for UnconfiguredDispatcher {
    async fn notify(&self, user_id: &str, summary: &DecisionSummary) -> Result<(), NotifyError> {
        log::warn!(
            "No notification endpoint configured; decision {} for user {} not delivered.",
            summary.enrollment_id,
            user_id
        );
        Err(NotifyError::NotConfigured)
    }
}
