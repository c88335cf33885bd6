use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// A user's request to access a paid course.
///
/// Course name/price and the user contact fields are snapshots captured at
/// submission so later course edits do not retroactively alter history.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
#[serde(deny_unknown_fields)]
pub struct Enrollment {
    #[builder(default = Uuid::new_v4())]
    pub enrollment_id: Uuid,

    #[builder(setter(into))]
    pub user_id: String,

    pub course_id: Uuid,

    #[builder(setter(into))]
    pub course_name: String,

    pub course_price: f64,

    #[builder(setter(into))]
    pub transaction_id: String,

    #[builder(setter(into))]
    pub payment_method: String,

    pub final_amount: f64,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub user_name: String,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub user_email: String,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub user_phone: String,

    #[builder(default)]
    pub status: EnrollmentStatus,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub admin_notes: String,

    #[serde(default = "chrono::offset::Utc::now")]
    #[builder(default = chrono::offset::Utc::now())]
    pub enrolled_at: DateTime<Utc>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub reviewed_by: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// A reviewed decision to be recorded against a pending enrollment.
#[derive(Clone, Debug)]
pub struct Decision {
    pub action: DecisionAction,
    pub notes: String,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
}

impl Enrollment {
    /// `approved` and `rejected` are terminal; only `pending` may transition.
    pub fn is_terminal(&self) -> bool {
        self.status != EnrollmentStatus::Pending
    }

    /// Whether this record blocks a new submission for the same user/course.
    pub fn is_active(&self) -> bool {
        matches!(self.status, EnrollmentStatus::Pending | EnrollmentStatus::Approved)
    }

    pub fn with_decision(mut self, decision: &Decision) -> Self {
        self.status = decision.action.resulting_status();
        self.admin_notes = decision.notes.clone();
        self.reviewed_at = Some(decision.reviewed_at);
        self.reviewed_by = Some(decision.reviewed_by.clone());
        self
    }
}

impl DecisionAction {
    pub fn resulting_status(&self) -> EnrollmentStatus {
        match self {
            DecisionAction::Approve => EnrollmentStatus::Approved,
            DecisionAction::Reject => EnrollmentStatus::Rejected,
        }
    }
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        EnrollmentStatus::Pending
    }
}

impl Display for EnrollmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Approved => "approved",
            EnrollmentStatus::Rejected => "rejected",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EnrollmentStatus::Pending),
            "approved" => Ok(EnrollmentStatus::Approved),
            "rejected" => Ok(EnrollmentStatus::Rejected),
            _ => Err(()),
        }
    }
}

impl Display for DecisionAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionAction::Approve => write!(f, "approve"),
            DecisionAction::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for DecisionAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(DecisionAction::Approve),
            "reject" => Ok(DecisionAction::Reject),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment() -> Enrollment {
        Enrollment::builder()
            .user_id("user-1")
            .course_id(Uuid::new_v4())
            .course_name("React Masterclass")
            .course_price(197.0)
            .transaction_id("TXN-1")
            .payment_method("bank-transfer")
            .final_amount(197.0)
            .build()
    }

    #[test]
    fn submission_starts_pending() {
        let e = enrollment();
        assert_eq!(e.status, EnrollmentStatus::Pending);
        assert!(!e.is_terminal());
        assert!(e.is_active());
        assert!(e.reviewed_at.is_none());
        assert!(e.reviewed_by.is_none());
    }

    #[test]
    fn decision_fills_review_fields() {
        let decision = Decision {
            action: DecisionAction::Reject,
            notes: "Transaction id not found.".to_owned(),
            reviewed_by: "admin@example.com".to_owned(),
            reviewed_at: chrono::offset::Utc::now(),
        };

        let e = enrollment().with_decision(&decision);

        assert_eq!(e.status, EnrollmentStatus::Rejected);
        assert!(e.is_terminal());
        assert!(!e.is_active());
        assert_eq!(e.reviewed_by.as_deref(), Some("admin@example.com"));
        assert_eq!(e.admin_notes, "Transaction id not found.");
    }

    #[test]
    fn stored_record_omits_review_fields_until_reviewed() {
        let value = serde_json::to_value(enrollment()).unwrap();

        assert_eq!(value["Status"], "pending");
        assert!(value.get("ReviewedAt").is_none());
        assert!(value.get("ReviewedBy").is_none());
    }

    #[test]
    fn action_parsing_is_strict() {
        assert_eq!("approve".parse::<DecisionAction>().unwrap(), DecisionAction::Approve);
        assert_eq!("reject".parse::<DecisionAction>().unwrap(), DecisionAction::Reject);
        assert!("Approve".parse::<DecisionAction>().is_err());
        assert!("".parse::<DecisionAction>().is_err());
    }
}
