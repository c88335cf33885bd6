use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::enrollment::repository::EnrollmentsRepository;
use crate::enrollment::search;
use crate::enrollment::types::EnrollmentStatus;
use crate::pb;

/// Lists enrollment records with optional status/course/text filters.
///
/// The statistics block always covers the course-scoped set before the
/// status and text filters apply, so a reviewer sees the full workload even
/// while drilling into one slice of it.
pub async fn list_enrollments(
    enrollments: &impl EnrollmentsRepository,
    input: pb::ListEnrollmentsInput,
) -> Result<pb::ListEnrollmentsOutput, EndpointError<Infallible>> {
    let status = input
        .status
        .as_deref()
        .map(|v| {
            v.parse::<EnrollmentStatus>()
                .map_err(|_| EndpointError::validation("Unknown enrollment status."))
        })
        .transpose()?;
    let course_id = input
        .course_id
        .as_deref()
        .map(|v| Uuid::parse_str(v).map_err(|_| EndpointError::validation("Invalid course ID provided.")))
        .transpose()?;

    let records = enrollments.scan_enrollments(course_id.as_ref()).await.map_err(|err| {
        log::error!("Failed to scan enrollments. Original error: {:?}.", err);
        EndpointError::internal()
    })?;

    let stats = search::aggregate(&records);
    let filtered = search::filter(records, status, &input.query);

    Ok(pb::ListEnrollmentsOutput {
        enrollments: filtered.into_iter().map(Into::into).collect(),
        stats: Some(stats.into()),
    })
}

#[cfg(test)]
mod tests {
    use chrono::offset::Utc;

    use super::*;
    use crate::enrollment::{Decision, DecisionAction, Enrollment, MemEnrollmentsRepository};

    fn record(user_id: &str, course_id: Uuid, name: &str) -> Enrollment {
        Enrollment::builder()
            .user_id(user_id)
            .course_id(course_id)
            .course_name("React Masterclass")
            .course_price(197.0)
            .transaction_id(format!("TXN-{}", user_id))
            .payment_method("card")
            .final_amount(197.0)
            .user_name(name)
            .build()
    }

    fn input() -> pb::ListEnrollmentsInput {
        pb::ListEnrollmentsInput {
            status: None,
            query: String::new(),
            course_id: None,
        }
    }

    #[tokio::test]
    async fn stats_ignore_the_status_and_text_filters() {
        let enrollments = MemEnrollmentsRepository::new();
        let course_id = Uuid::new_v4();
        let pending = record("u1", course_id, "Ana Pop");
        let approved = record("u2", course_id, "Bob Ionescu");
        enrollments.create_enrollment(&pending).await.unwrap();
        enrollments.create_enrollment(&approved).await.unwrap();
        enrollments
            .record_decision(
                &approved.enrollment_id,
                &Decision {
                    action: DecisionAction::Approve,
                    notes: "verified".to_owned(),
                    reviewed_by: "admin".to_owned(),
                    reviewed_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let output = list_enrollments(
            &enrollments,
            pb::ListEnrollmentsInput {
                status: Some("pending".to_owned()),
                ..input()
            },
        )
        .await
        .unwrap();

        assert_eq!(output.enrollments.len(), 1);
        assert_eq!(output.enrollments[0].user_id, "u1");

        let stats = output.stats.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 1);
    }

    #[tokio::test]
    async fn course_scope_applies_to_both_records_and_stats() {
        let enrollments = MemEnrollmentsRepository::new();
        let course_a = Uuid::new_v4();
        let course_b = Uuid::new_v4();
        enrollments.create_enrollment(&record("u1", course_a, "Ana")).await.unwrap();
        enrollments.create_enrollment(&record("u2", course_b, "Bob")).await.unwrap();

        let output = list_enrollments(
            &enrollments,
            pb::ListEnrollmentsInput {
                course_id: Some(course_a.to_string()),
                ..input()
            },
        )
        .await
        .unwrap();

        assert_eq!(output.enrollments.len(), 1);
        assert_eq!(output.stats.unwrap().total, 1);
    }

    #[tokio::test]
    async fn text_query_narrows_the_records() {
        let enrollments = MemEnrollmentsRepository::new();
        let course_id = Uuid::new_v4();
        enrollments.create_enrollment(&record("u1", course_id, "Ana Pop")).await.unwrap();
        enrollments.create_enrollment(&record("u2", course_id, "Bob Ionescu")).await.unwrap();

        let output = list_enrollments(
            &enrollments,
            pb::ListEnrollmentsInput {
                query: "ionescu".to_owned(),
                ..input()
            },
        )
        .await
        .unwrap();

        assert_eq!(output.enrollments.len(), 1);
        assert_eq!(output.enrollments[0].user_name, "Bob Ionescu");
    }

    #[tokio::test]
    async fn unknown_status_is_a_validation_error() {
        let enrollments = MemEnrollmentsRepository::new();
        let result = list_enrollments(
            &enrollments,
            pb::ListEnrollmentsInput {
                status: Some("waitlisted".to_owned()),
                ..input()
            },
        )
        .await;
        assert!(matches!(result, Err(EndpointError::Validation(_))));
    }
}
