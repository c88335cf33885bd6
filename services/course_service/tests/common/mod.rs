#![allow(dead_code)]

use async_trait::async_trait;
use course_service::catalog::{CatalogRepository, Course, MemCatalogRepository, Module, Video};
use course_service::notification::{DecisionSummary, NotificationDispatcher, NotifyError};
use course_service::pb;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Test dispatcher that remembers every delivered summary.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub delivered: Mutex<Vec<(String, DecisionSummary)>>,
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify(&self, user_id: &str, summary: &DecisionSummary) -> Result<(), NotifyError> {
        self.delivered.lock().await.push((user_id.to_owned(), summary.clone()));
        Ok(())
    }
}

pub async fn seed_course(catalog: &MemCatalogRepository, title: &str, price: f64) -> Course {
    let course = Course::builder()
        .title(title)
        .description("Seeded for tests.")
        .price(price)
        .build();
    catalog.create_course(&course).await.unwrap();
    course
}

pub async fn seed_module(catalog: &MemCatalogRepository, course_id: Uuid, title: &str) -> Module {
    catalog
        .add_module(Module::builder().course_id(course_id).title(title).build())
        .await
        .unwrap()
}

pub async fn seed_video(
    catalog: &MemCatalogRepository,
    module_id: Uuid,
    video_id: &str,
    free: bool,
) -> Video {
    catalog
        .add_video(
            Video::builder()
                .video_id(video_id)
                .module_id(module_id)
                .title(video_id.to_uppercase())
                .duration("10:30")
                .free(free)
                .build(),
        )
        .await
        .unwrap()
}

pub fn submit_input(user_id: &str, course_id: &Uuid) -> pb::SubmitEnrollmentInput {
    pb::SubmitEnrollmentInput {
        user_id: user_id.to_owned(),
        course_id: course_id.to_string(),
        transaction_id: format!("TXN-{}", user_id),
        payment_method: "bank-transfer".to_owned(),
        final_amount: 197.0,
        user_name: "Ana Pop".to_owned(),
        user_email: format!("{}@example.com", user_id),
        user_phone: "+40700000000".to_owned(),
    }
}

pub fn decide_input(enrollment_id: &str, action: &str, notes: &str) -> pb::DecideEnrollmentInput {
    pb::DecideEnrollmentInput {
        enrollment_id: enrollment_id.to_owned(),
        action: action.to_owned(),
        admin_notes: notes.to_owned(),
        reviewer: "admin@example.com".to_owned(),
    }
}
