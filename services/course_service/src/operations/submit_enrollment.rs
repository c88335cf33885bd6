use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, GetError};
use crate::enrollment::repository::{EnrollmentsRepository, SubmitError};
use crate::enrollment::types::Enrollment;
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SubmitEnrollmentError {
    #[error("Course not found.")]
    CourseNotFound,

    #[error("An active enrollment for this user and course already exists.")]
    DuplicateEnrollment,
}

/// Records a pending enrollment request. Course name and price are copied
/// into the record so later course edits do not rewrite review history.
pub async fn submit_enrollment(
    catalog: &impl CatalogRepository,
    enrollments: &impl EnrollmentsRepository,
    input: pb::SubmitEnrollmentInput,
) -> Result<pb::SubmitEnrollmentOutput, EndpointError<SubmitEnrollmentError>> {
    let course_id = Uuid::parse_str(&input.course_id)
        .map_err(|_| EndpointError::validation("Invalid course ID provided."))?;

    if !non_blank(&input.user_id) {
        return Err(EndpointError::validation("User ID is required."));
    }
    if !non_blank(&input.transaction_id) {
        return Err(EndpointError::validation("Transaction ID is required."));
    }
    if !non_blank(&input.payment_method) {
        return Err(EndpointError::validation("Payment method is required."));
    }
    if !input.final_amount.is_finite() || input.final_amount < 0.0 {
        return Err(EndpointError::validation("Final amount must be a non-negative number."));
    }

    let course = catalog.get_course(&course_id).await.map_err(|err| match err {
        GetError::NotFound => EndpointError::operation(SubmitEnrollmentError::CourseNotFound),
        err => {
            log::error!("Failed to retrieve course. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    let enrollment = Enrollment::builder()
        .user_id(input.user_id.trim())
        .course_id(course_id)
        .course_name(course.title)
        .course_price(course.price)
        .transaction_id(input.transaction_id.trim())
        .payment_method(input.payment_method.trim())
        .final_amount(input.final_amount)
        .user_name(input.user_name)
        .user_email(input.user_email)
        .user_phone(input.user_phone)
        .build();

    enrollments.create_enrollment(&enrollment).await.map_err(|err| match err {
        SubmitError::ActiveDuplicate => EndpointError::operation(SubmitEnrollmentError::DuplicateEnrollment),
        err => {
            log::error!("Failed to store enrollment. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::SubmitEnrollmentOutput {
        enrollment: Some(enrollment.into()),
    })
}

impl OperationError for SubmitEnrollmentError {
    fn code(&self) -> tonic::Code {
        match self {
            SubmitEnrollmentError::CourseNotFound => tonic::Code::NotFound,
            SubmitEnrollmentError::DuplicateEnrollment => tonic::Code::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, MemCatalogRepository};
    use crate::enrollment::MemEnrollmentsRepository;

    async fn seeded_course(catalog: &MemCatalogRepository) -> Course {
        let course = Course::builder()
            .title("React Masterclass")
            .description("From zero to production.")
            .price(197.0)
            .build();
        catalog.create_course(&course).await.unwrap();
        course
    }

    fn input(course_id: &Uuid) -> pb::SubmitEnrollmentInput {
        pb::SubmitEnrollmentInput {
            user_id: "user-1".to_owned(),
            course_id: course_id.to_string(),
            transaction_id: "TXN-42".to_owned(),
            payment_method: "bank-transfer".to_owned(),
            final_amount: 197.0,
            user_name: "Ana Pop".to_owned(),
            user_email: "ana@example.com".to_owned(),
            user_phone: "+40700000000".to_owned(),
        }
    }

    #[tokio::test]
    async fn snapshots_course_name_and_price() {
        let catalog = MemCatalogRepository::new();
        let enrollments = MemEnrollmentsRepository::new();
        let course = seeded_course(&catalog).await;

        let output = submit_enrollment(&catalog, &enrollments, input(&course.course_id))
            .await
            .unwrap();

        let record = output.enrollment.unwrap();
        assert_eq!(record.status, "pending");
        assert_eq!(record.course_name, "React Masterclass");
        assert_eq!(record.course_price, 197.0);
        assert!(record.reviewed_at.is_empty());
        assert!(record.reviewed_by.is_empty());
    }

    #[tokio::test]
    async fn second_active_submission_is_refused() {
        let catalog = MemCatalogRepository::new();
        let enrollments = MemEnrollmentsRepository::new();
        let course = seeded_course(&catalog).await;

        submit_enrollment(&catalog, &enrollments, input(&course.course_id)).await.unwrap();
        let result = submit_enrollment(&catalog, &enrollments, input(&course.course_id)).await;

        assert!(matches!(
            result,
            Err(EndpointError::Operation(SubmitEnrollmentError::DuplicateEnrollment))
        ));
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let catalog = MemCatalogRepository::new();
        let enrollments = MemEnrollmentsRepository::new();

        let result = submit_enrollment(&catalog, &enrollments, input(&Uuid::new_v4())).await;
        assert!(matches!(
            result,
            Err(EndpointError::Operation(SubmitEnrollmentError::CourseNotFound))
        ));
    }

    #[tokio::test]
    async fn blank_transaction_id_is_a_validation_error() {
        let catalog = MemCatalogRepository::new();
        let enrollments = MemEnrollmentsRepository::new();
        let course = seeded_course(&catalog).await;

        let result = submit_enrollment(
            &catalog,
            &enrollments,
            pb::SubmitEnrollmentInput {
                transaction_id: "  ".to_owned(),
                ..input(&course.course_id)
            },
        )
        .await;
        assert!(matches!(result, Err(EndpointError::Validation(_))));
    }
}
