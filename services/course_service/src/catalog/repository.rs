use std::error::Error;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Course, CourseUpdate, Module, ModuleUpdate, Video, VideoUpdate};

#[derive(Debug, Error)]
pub enum PutError {
    #[error("Parent record not found.")]
    ParentNotFound,

    #[error("A record with this identifier already exists.")]
    Duplicate,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum GetError {
    #[error("Record not found.")]
    NotFound,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Record not found.")]
    NotFound,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Record not found.")]
    NotFound,

    /// The cascade stopped before all child records were removed. The parent
    /// is deleted last, so an interrupted cascade never leaves a child whose
    /// parent is gone; what remains is a retryable partial deletion.
    #[error("Cascade interrupted before completion.")]
    CascadeInterrupted,

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

/// Narrow interface to the content store for the course hierarchy.
///
/// Append operations assign `position` themselves and return the stored
/// record; delete operations cascade children-first.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_course(&self, course: &Course) -> Result<(), PutError>;

    async fn get_course(&self, course_id: &Uuid) -> Result<Course, GetError>;

    async fn list_courses(&self) -> Result<Vec<Course>, GetError>;

    async fn update_course(&self, course_id: &Uuid, update: &CourseUpdate) -> Result<Course, UpdateError>;

    async fn delete_course(&self, course_id: &Uuid) -> Result<(), DeleteError>;

    /// Bumps the denormalized student counter; display-only, see `Course`.
    async fn increment_student_count(&self, course_id: &Uuid) -> Result<(), UpdateError>;

    async fn add_module(&self, module: Module) -> Result<Module, PutError>;

    async fn get_module(&self, module_id: &Uuid) -> Result<Module, GetError>;

    async fn modules_of_course(&self, course_id: &Uuid) -> Result<Vec<Module>, GetError>;

    async fn update_module(&self, module_id: &Uuid, update: &ModuleUpdate) -> Result<Module, UpdateError>;

    async fn delete_module(&self, module_id: &Uuid) -> Result<(), DeleteError>;

    async fn add_video(&self, video: Video) -> Result<Video, PutError>;

    async fn get_video(&self, video_id: &str) -> Result<Video, GetError>;

    async fn videos_of_module(&self, module_id: &Uuid) -> Result<Vec<Video>, GetError>;

    async fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<Video, UpdateError>;

    async fn delete_video(&self, video_id: &str) -> Result<(), DeleteError>;
}
