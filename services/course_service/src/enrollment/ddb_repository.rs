//! DynamoDB implementation of the enrollments repository.
//!
//! Records are keyed by `EnrollmentId`; a `UserCourseIndex` GSI on
//! (`UserId`, `CourseId`) serves the duplicate check and access lookups.
//! `Status` is a DynamoDB reserved word, hence the `#status` aliases.

use std::collections::HashMap;

use common_macros::hash_map;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    AttributeValue, DynamoDb, GetItemInput, PutItemInput, QueryInput, ScanInput, UpdateItemError, UpdateItemInput,
};
use serde::Serialize;
use uuid::Uuid;

use super::repository::{DecisionError, EnrollmentsRepository, GetEnrollmentError, StoreError, SubmitError};
use super::types::{Decision, Enrollment, EnrollmentStatus};

#[derive(Clone, Debug)]
pub struct EnrollmentsTable {
    pub name: String,
}

pub struct DdbEnrollmentsRepository<D: DynamoDb + Send + Sync> {
    ddb: D,
    table: EnrollmentsTable,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EnrollmentIdKey {
    enrollment_id: Uuid,
}

fn string_attr(value: impl Into<String>) -> AttributeValue {
    AttributeValue {
        s: Some(value.into()),
        ..AttributeValue::default()
    }
}

impl<D: DynamoDb + Send + Sync> DdbEnrollmentsRepository<D> {
    pub fn new(ddb: D, table: EnrollmentsTable) -> Self {
        Self { ddb, table }
    }

    fn enrollment_key(enrollment_id: &Uuid) -> HashMap<String, AttributeValue> {
        serde_dynamodb::to_hashmap(&EnrollmentIdKey {
            enrollment_id: *enrollment_id,
        })
        .unwrap()
    }
}

#[async_trait::async_trait]
impl<D: DynamoDb + Send + Sync> EnrollmentsRepository for DdbEnrollmentsRepository<D> {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), SubmitError> {
        // Best-effort duplicate guard; the index lags writes slightly, but a
        // duplicate pending record cannot grant access and stays visible to
        // reviewers.
        let existing = self
            .enrollments_for_user_course(&enrollment.user_id, &enrollment.course_id)
            .await
            .map_err(|StoreError(e)| SubmitError::Other(e))?;
        if existing.iter().any(Enrollment::is_active) {
            return Err(SubmitError::ActiveDuplicate);
        }

        self.ddb
            .put_item(PutItemInput {
                table_name: self.table.name.clone(),
                item: serde_dynamodb::to_hashmap(enrollment).unwrap(),
                condition_expression: Some("attribute_not_exists(EnrollmentId)".to_owned()),
                ..PutItemInput::default()
            })
            .await
            .map_err(|e| {
                log::error!("Failed to write enrollment. Original error: {:?}.", e);
                SubmitError::Other(e.into())
            })?;

        Ok(())
    }

    async fn get_enrollment(&self, enrollment_id: &Uuid) -> Result<Enrollment, GetEnrollmentError> {
        let output = self
            .ddb
            .get_item(GetItemInput {
                table_name: self.table.name.clone(),
                key: Self::enrollment_key(enrollment_id),
                consistent_read: Some(true),
                ..GetItemInput::default()
            })
            .await
            .map_err(|e| GetEnrollmentError::Other(e.into()))?;

        match output.item {
            None => Err(GetEnrollmentError::NotFound),
            Some(item) => serde_dynamodb::from_hashmap(item).map_err(|e| GetEnrollmentError::Other(e.into())),
        }
    }

    async fn record_decision(&self, enrollment_id: &Uuid, decision: &Decision) -> Result<Enrollment, DecisionError> {
        let output = self
            .ddb
            .update_item(UpdateItemInput {
                table_name: self.table.name.clone(),
                key: Self::enrollment_key(enrollment_id),
                // The condition and the write execute as one unit; a caller
                // racing another reviewer loses on the condition, never by
                // overwriting a terminal record.
                condition_expression: Some("attribute_exists(EnrollmentId) AND #status = :pending".to_owned()),
                update_expression: Some(
                    "SET #status = :status, ReviewedAt = :reviewed_at, ReviewedBy = :reviewed_by, AdminNotes = :notes"
                        .to_owned(),
                ),
                expression_attribute_names: Some(hash_map! {
                    "#status".to_owned() => "Status".to_owned(),
                }),
                expression_attribute_values: Some(hash_map! {
                    ":pending".to_owned() => string_attr(EnrollmentStatus::Pending.to_string()),
                    ":status".to_owned() => string_attr(decision.action.resulting_status().to_string()),
                    ":reviewed_at".to_owned() => string_attr(decision.reviewed_at.to_rfc3339()),
                    ":reviewed_by".to_owned() => string_attr(decision.reviewed_by.clone()),
                    ":notes".to_owned() => string_attr(decision.notes.clone()),
                }),
                return_values: Some("ALL_NEW".to_owned()),
                ..UpdateItemInput::default()
            })
            .await;

        let output = match output {
            Ok(output) => output,
            Err(RusotoError::Service(UpdateItemError::ConditionalCheckFailed(_))) => {
                // Either the record does not exist or it is already terminal;
                // one read tells the caller which.
                return match self.get_enrollment(enrollment_id).await {
                    Ok(_) => Err(DecisionError::AlreadyProcessed),
                    Err(GetEnrollmentError::NotFound) => Err(DecisionError::NotFound),
                    Err(GetEnrollmentError::Other(e)) => Err(DecisionError::Other(e)),
                };
            }
            Err(e) => {
                log::error!("Failed to record decision. Original error: {:?}.", e);
                return Err(DecisionError::Other(e.into()));
            }
        };

        let attributes = output
            .attributes
            .ok_or_else(|| DecisionError::Other("Malformed reply: missing attributes".into()))?;
        serde_dynamodb::from_hashmap(attributes).map_err(|e| DecisionError::Other(e.into()))
    }

    async fn enrollments_for_user_course(
        &self,
        user_id: &str,
        course_id: &Uuid,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let mut records = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let output = self
                .ddb
                .query(QueryInput {
                    table_name: self.table.name.clone(),
                    index_name: Some("UserCourseIndex".to_owned()),
                    key_condition_expression: Some("UserId = :user_id AND CourseId = :course_id".to_owned()),
                    expression_attribute_values: Some(hash_map! {
                        ":user_id".to_owned() => string_attr(user_id),
                        ":course_id".to_owned() => string_attr(course_id.to_string()),
                    }),
                    exclusive_start_key,
                    ..QueryInput::default()
                })
                .await
                .map_err(|e| StoreError(e.into()))?;

            for item in output.items.unwrap_or_default() {
                let record = serde_dynamodb::from_hashmap(item).map_err(|e| StoreError(e.into()))?;
                records.push(record);
            }

            exclusive_start_key = output.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(records)
    }

    async fn scan_enrollments(&self, course_id: Option<&Uuid>) -> Result<Vec<Enrollment>, StoreError> {
        let (filter_expression, expression_attribute_values) = match course_id {
            Some(course_id) => (
                Some("CourseId = :course_id".to_owned()),
                Some(hash_map! {
                    ":course_id".to_owned() => string_attr(course_id.to_string()),
                }),
            ),
            None => (None, None),
        };

        let mut records: Vec<Enrollment> = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let output = self
                .ddb
                .scan(ScanInput {
                    table_name: self.table.name.clone(),
                    filter_expression: filter_expression.clone(),
                    expression_attribute_values: expression_attribute_values.clone(),
                    exclusive_start_key,
                    ..ScanInput::default()
                })
                .await
                .map_err(|e| StoreError(e.into()))?;

            for item in output.items.unwrap_or_default() {
                let record = serde_dynamodb::from_hashmap(item).map_err(|e| StoreError(e.into()))?;
                records.push(record);
            }

            exclusive_start_key = output.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }

        records.sort_by_key(|e: &Enrollment| e.enrolled_at);
        Ok(records)
    }
}
