//! Filtering and aggregation over enrollment records.
//!
//! Both run on the records returned by a repository scan; the aggregate is
//! always recomputed from current state, never read from a cached counter.

use serde::Serialize;

use super::types::{Enrollment, EnrollmentStatus};

#[derive(Serialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct StatusCounts {
    pub total: u32,
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Enrollment>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for record in records {
        counts.total += 1;
        match record.status {
            EnrollmentStatus::Pending => counts.pending += 1,
            EnrollmentStatus::Approved => counts.approved += 1,
            EnrollmentStatus::Rejected => counts.rejected += 1,
        }
    }
    counts
}

/// Case-insensitive substring match across the searchable fields. An empty
/// (or all-whitespace) query matches everything.
pub fn matches_query(record: &Enrollment, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        record.user_name.as_str(),
        record.user_email.as_str(),
        record.user_phone.as_str(),
        record.transaction_id.as_str(),
        record.course_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

pub fn filter(records: Vec<Enrollment>, status: Option<EnrollmentStatus>, query: &str) -> Vec<Enrollment> {
    records
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .filter(|r| matches_query(r, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::enrollment::types::{Decision, DecisionAction};

    fn record(name: &str, email: &str, transaction_id: &str, course: &str) -> Enrollment {
        Enrollment::builder()
            .user_id("u1")
            .course_id(Uuid::new_v4())
            .course_name(course)
            .course_price(50.0)
            .transaction_id(transaction_id)
            .payment_method("card")
            .final_amount(50.0)
            .user_name(name)
            .user_email(email)
            .user_phone("+40 700 000 000")
            .build()
    }

    #[test]
    fn query_is_case_insensitive_and_spans_fields() {
        let r = record("Ana Pop", "ana@example.com", "TXN-42", "React Masterclass");

        assert!(matches_query(&r, "ana"));
        assert!(matches_query(&r, "ANA@EXAMPLE"));
        assert!(matches_query(&r, "txn-42"));
        assert!(matches_query(&r, "masterclass"));
        assert!(matches_query(&r, "700 000"));
        assert!(!matches_query(&r, "vue"));
    }

    #[test]
    fn empty_query_keeps_status_filtered_set_unmodified() {
        let records = vec![
            record("Ana", "ana@example.com", "TXN-1", "React"),
            record("Bob", "bob@example.com", "TXN-2", "Rust"),
        ];

        let out = filter(records.clone(), None, "   ");
        assert_eq!(out.len(), 2);

        let out = filter(records, Some(EnrollmentStatus::Pending), "");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn aggregate_counts_every_status_and_total_matches() {
        let approve = Decision {
            action: DecisionAction::Approve,
            notes: "verified".to_owned(),
            reviewed_by: "admin".to_owned(),
            reviewed_at: chrono::offset::Utc::now(),
        };
        let reject = Decision {
            action: DecisionAction::Reject,
            notes: "no payment".to_owned(),
            ..approve.clone()
        };

        let records = vec![
            record("Ana", "a@example.com", "TXN-1", "React"),
            record("Bob", "b@example.com", "TXN-2", "React").with_decision(&approve),
            record("Cat", "c@example.com", "TXN-3", "React").with_decision(&reject),
        ];

        let counts = aggregate(&records);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.total, counts.pending + counts.approved + counts.rejected);
    }
}
