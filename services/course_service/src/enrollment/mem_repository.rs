//! In-memory implementation of the enrollments repository.
//!
//! The decision check-and-set and the duplicate check both run under the
//! write lock, which gives the same atomicity the DynamoDB implementation
//! gets from condition expressions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{DecisionError, EnrollmentsRepository, GetEnrollmentError, StoreError, SubmitError};
use super::types::{Decision, Enrollment};

#[derive(Default)]
pub struct MemEnrollmentsRepository {
    records: RwLock<HashMap<Uuid, Enrollment>>,
}

impl MemEnrollmentsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnrollmentsRepository for MemEnrollmentsRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), SubmitError> {
        let mut records = self.records.write().await;
        let duplicate = records
            .values()
            .any(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id && e.is_active());
        if duplicate {
            return Err(SubmitError::ActiveDuplicate);
        }

        records.insert(enrollment.enrollment_id, enrollment.clone());
        Ok(())
    }

    async fn get_enrollment(&self, enrollment_id: &Uuid) -> Result<Enrollment, GetEnrollmentError> {
        let records = self.records.read().await;
        records.get(enrollment_id).cloned().ok_or(GetEnrollmentError::NotFound)
    }

    async fn record_decision(&self, enrollment_id: &Uuid, decision: &Decision) -> Result<Enrollment, DecisionError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(enrollment_id).ok_or(DecisionError::NotFound)?;
        if record.is_terminal() {
            return Err(DecisionError::AlreadyProcessed);
        }

        *record = record.clone().with_decision(decision);
        Ok(record.clone())
    }

    async fn enrollments_for_user_course(
        &self,
        user_id: &str,
        course_id: &Uuid,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|e| e.user_id == user_id && e.course_id == *course_id)
            .cloned()
            .collect())
    }

    async fn scan_enrollments(&self, course_id: Option<&Uuid>) -> Result<Vec<Enrollment>, StoreError> {
        let records = self.records.read().await;
        let mut matching: Vec<_> = records
            .values()
            .filter(|e| course_id.map_or(true, |id| e.course_id == *id))
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.enrolled_at);
        Ok(matching)
    }
}
