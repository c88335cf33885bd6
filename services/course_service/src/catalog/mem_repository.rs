//! In-memory implementation of the catalog repository.
//!
//! Backs tests and local development: a single `RwLock` over plain maps, so
//! every mutation (including a full cascade) is atomic within the process.
//! Not durable; state is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{CatalogRepository, DeleteError, GetError, PutError, UpdateError};
use super::types::{Course, CourseUpdate, Module, ModuleUpdate, Video, VideoUpdate};

#[derive(Default)]
struct CatalogState {
    courses: HashMap<Uuid, Course>,
    modules: HashMap<Uuid, Module>,
    videos: HashMap<String, Video>,
}

#[derive(Default)]
pub struct MemCatalogRepository {
    state: RwLock<CatalogState>,
}

impl MemCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for MemCatalogRepository {
    async fn create_course(&self, course: &Course) -> Result<(), PutError> {
        let mut state = self.state.write().await;
        if state.courses.contains_key(&course.course_id) {
            return Err(PutError::Duplicate);
        }

        state.courses.insert(course.course_id, course.clone());
        Ok(())
    }

    async fn get_course(&self, course_id: &Uuid) -> Result<Course, GetError> {
        let state = self.state.read().await;
        state.courses.get(course_id).cloned().ok_or(GetError::NotFound)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, GetError> {
        let state = self.state.read().await;
        let mut courses: Vec<_> = state.courses.values().cloned().collect();
        courses.sort_by_key(|c| c.created_at);
        Ok(courses)
    }

    async fn update_course(&self, course_id: &Uuid, update: &CourseUpdate) -> Result<Course, UpdateError> {
        let mut state = self.state.write().await;
        let course = state.courses.get_mut(course_id).ok_or(UpdateError::NotFound)?;
        course.apply(update);
        Ok(course.clone())
    }

    async fn delete_course(&self, course_id: &Uuid) -> Result<(), DeleteError> {
        let mut state = self.state.write().await;
        if !state.courses.contains_key(course_id) {
            return Err(DeleteError::NotFound);
        }

        // Children first, parent last; the whole cascade runs under one
        // write lock.
        state.videos.retain(|_, v| v.course_id != *course_id);
        state.modules.retain(|_, m| m.course_id != *course_id);
        state.courses.remove(course_id);
        Ok(())
    }

    async fn increment_student_count(&self, course_id: &Uuid) -> Result<(), UpdateError> {
        let mut state = self.state.write().await;
        let course = state.courses.get_mut(course_id).ok_or(UpdateError::NotFound)?;
        course.student_count += 1;
        Ok(())
    }

    async fn add_module(&self, mut module: Module) -> Result<Module, PutError> {
        let mut state = self.state.write().await;
        if !state.courses.contains_key(&module.course_id) {
            return Err(PutError::ParentNotFound);
        }
        if state.modules.contains_key(&module.module_id) {
            return Err(PutError::Duplicate);
        }

        module.position = state.modules.values().filter(|m| m.course_id == module.course_id).count() as i32;
        state.modules.insert(module.module_id, module.clone());
        Ok(module)
    }

    async fn get_module(&self, module_id: &Uuid) -> Result<Module, GetError> {
        let state = self.state.read().await;
        state.modules.get(module_id).cloned().ok_or(GetError::NotFound)
    }

    async fn modules_of_course(&self, course_id: &Uuid) -> Result<Vec<Module>, GetError> {
        let state = self.state.read().await;
        let mut modules: Vec<_> = state
            .modules
            .values()
            .filter(|m| m.course_id == *course_id)
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.position);
        Ok(modules)
    }

    async fn update_module(&self, module_id: &Uuid, update: &ModuleUpdate) -> Result<Module, UpdateError> {
        let mut state = self.state.write().await;
        let module = state.modules.get_mut(module_id).ok_or(UpdateError::NotFound)?;
        module.apply(update);
        Ok(module.clone())
    }

    async fn delete_module(&self, module_id: &Uuid) -> Result<(), DeleteError> {
        let mut state = self.state.write().await;
        if !state.modules.contains_key(module_id) {
            return Err(DeleteError::NotFound);
        }

        state.videos.retain(|_, v| v.module_id != *module_id);
        state.modules.remove(module_id);
        Ok(())
    }

    async fn add_video(&self, mut video: Video) -> Result<Video, PutError> {
        let mut state = self.state.write().await;
        let module = state.modules.get(&video.module_id).ok_or(PutError::ParentNotFound)?;
        if state.videos.contains_key(&video.video_id) {
            return Err(PutError::Duplicate);
        }

        video.course_id = module.course_id;
        video.position = state.videos.values().filter(|v| v.module_id == video.module_id).count() as i32;
        state.videos.insert(video.video_id.clone(), video.clone());
        Ok(video)
    }

    async fn get_video(&self, video_id: &str) -> Result<Video, GetError> {
        let state = self.state.read().await;
        state.videos.get(video_id).cloned().ok_or(GetError::NotFound)
    }

    async fn videos_of_module(&self, module_id: &Uuid) -> Result<Vec<Video>, GetError> {
        let state = self.state.read().await;
        let mut videos: Vec<_> = state
            .videos
            .values()
            .filter(|v| v.module_id == *module_id)
            .cloned()
            .collect();
        videos.sort_by_key(|v| v.position);
        Ok(videos)
    }

    async fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<Video, UpdateError> {
        let mut state = self.state.write().await;
        let video = state.videos.get_mut(video_id).ok_or(UpdateError::NotFound)?;
        video.apply(update);
        Ok(video.clone())
    }

    async fn delete_video(&self, video_id: &str) -> Result<(), DeleteError> {
        let mut state = self.state.write().await;
        state.videos.remove(video_id).map(|_| ()).ok_or(DeleteError::NotFound)
    }
}
