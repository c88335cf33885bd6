pub mod ddb_repository;
pub mod mem_repository;
pub mod repository;
pub mod search;
pub mod types;

pub use ddb_repository::{DdbEnrollmentsRepository, EnrollmentsTable};
pub use mem_repository::MemEnrollmentsRepository;
pub use repository::EnrollmentsRepository;
pub use types::{Decision, DecisionAction, Enrollment, EnrollmentStatus};
