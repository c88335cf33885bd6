use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::CatalogRepository;
use crate::enrollment::repository::{DecisionError, EnrollmentsRepository};
use crate::enrollment::types::{Decision, DecisionAction};
use crate::notification::{DecisionSummary, NotificationDispatcher};
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DecideEnrollmentError {
    #[error("Enrollment not found.")]
    NotFound,

    #[error("Enrollment has already been processed.")]
    AlreadyProcessed,
}

/// Applies an approve/reject decision to a pending enrollment.
///
/// The status transition is the single atomic step; of two concurrent
/// reviewers exactly one wins and the other sees `AlreadyProcessed`. The
/// student counter bump and the user notification happen after the
/// transition and never roll it back.
pub async fn decide_enrollment(
    catalog: &impl CatalogRepository,
    enrollments: &impl EnrollmentsRepository,
    dispatcher: &dyn NotificationDispatcher,
    input: pb::DecideEnrollmentInput,
) -> Result<pb::DecideEnrollmentOutput, EndpointError<DecideEnrollmentError>> {
    let enrollment_id = Uuid::parse_str(&input.enrollment_id)
        .map_err(|_| EndpointError::validation("Invalid enrollment ID provided."))?;

    let action: DecisionAction = input
        .action
        .parse()
        .map_err(|_| EndpointError::validation("Action must be \"approve\" or \"reject\"."))?;

    if action == DecisionAction::Reject && !non_blank(&input.admin_notes) {
        return Err(EndpointError::validation("Admin notes are required when rejecting."));
    }
    if !non_blank(&input.reviewer) {
        return Err(EndpointError::validation("Reviewer is required."));
    }

    let decision = Decision {
        action,
        notes: input.admin_notes.trim().to_owned(),
        reviewed_by: input.reviewer.trim().to_owned(),
        reviewed_at: chrono::offset::Utc::now(),
    };

    let enrollment = enrollments
        .record_decision(&enrollment_id, &decision)
        .await
        .map_err(|err| match err {
            DecisionError::NotFound => EndpointError::operation(DecideEnrollmentError::NotFound),
            DecisionError::AlreadyProcessed => {
                EndpointError::operation(DecideEnrollmentError::AlreadyProcessed)
            }
            err => {
                log::error!("Failed to record decision. Original error: {:?}.", err);
                EndpointError::internal()
            }
        })?;

    if action == DecisionAction::Approve {
        // Display counter only; statistics are computed from the records.
        if let Err(err) = catalog.increment_student_count(&enrollment.course_id).await {
            log::error!(
                "Failed to bump student count for course {}. Original error: {:?}.",
                enrollment.course_id,
                err
            );
        }
    }

    let summary = DecisionSummary {
        enrollment_id: enrollment.enrollment_id,
        course_name: enrollment.course_name.clone(),
        status: enrollment.status,
        admin_notes: enrollment.admin_notes.clone(),
    };
    let notification_sent = match dispatcher.notify(&enrollment.user_id, &summary).await {
        Ok(()) => true,
        Err(err) => {
            log::warn!(
                "Failed to notify user about enrollment {}: {:?}.",
                enrollment.enrollment_id,
                err
            );
            false
        }
    };

    Ok(pb::DecideEnrollmentOutput {
        enrollment: Some(enrollment.into()),
        notification_sent,
    })
}

impl OperationError for DecideEnrollmentError {
    fn code(&self) -> tonic::Code {
        match self {
            DecideEnrollmentError::NotFound => tonic::Code::NotFound,
            DecideEnrollmentError::AlreadyProcessed => tonic::Code::FailedPrecondition,
        }
    }
}
