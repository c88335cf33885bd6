use std::error::Error;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Decision, Enrollment};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("An active enrollment for this user and course already exists.")]
    ActiveDuplicate,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum GetEnrollmentError {
    #[error("Enrollment not found.")]
    NotFound,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Enrollment not found.")]
    NotFound,

    /// The enrollment was already in a terminal state when the decision
    /// arrived; the record was not touched.
    #[error("Enrollment has already been processed.")]
    AlreadyProcessed,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(#[from] pub Box<dyn Error + Send + Sync>);

/// Narrow interface to the content store for enrollment records.
#[async_trait]
pub trait EnrollmentsRepository: Send + Sync {
    /// Stores a new pending enrollment. Fails with `ActiveDuplicate` when a
    /// pending or approved record already exists for the same user/course.
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), SubmitError>;

    async fn get_enrollment(&self, enrollment_id: &Uuid) -> Result<Enrollment, GetEnrollmentError>;

    /// Applies a decision to a pending enrollment as one atomic check-and-set
    /// against the store: of two concurrent calls for the same record exactly
    /// one succeeds, the other observes `AlreadyProcessed`.
    async fn record_decision(&self, enrollment_id: &Uuid, decision: &Decision) -> Result<Enrollment, DecisionError>;

    async fn enrollments_for_user_course(&self, user_id: &str, course_id: &Uuid)
        -> Result<Vec<Enrollment>, StoreError>;

    /// Every enrollment record, optionally scoped to one course. Statistics
    /// are always computed from this, never from a cached counter.
    async fn scan_enrollments(&self, course_id: Option<&Uuid>) -> Result<Vec<Enrollment>, StoreError>;
}
