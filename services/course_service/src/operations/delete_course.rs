use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, DeleteError};
use crate::pb;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DeleteCourseError {
    #[error("Course not found.")]
    NotFound,

    #[error("Course deletion was interrupted; retry to finish removing child records.")]
    CascadeFailure,
}

/// Removes a course and everything under it, children first. An interrupted
/// cascade leaves the course in place so the remaining children stay
/// reachable for a retry.
pub async fn delete_course(
    catalog: &impl CatalogRepository,
    input: pb::DeleteCourseInput,
) -> Result<pb::DeleteCourseOutput, EndpointError<DeleteCourseError>> {
    let course_id = Uuid::parse_str(&input.course_id)
        .map_err(|_| EndpointError::validation("Invalid course ID provided."))?;

    catalog.delete_course(&course_id).await.map_err(|err| match err {
        DeleteError::NotFound => EndpointError::operation(DeleteCourseError::NotFound),
        DeleteError::CascadeInterrupted => {
            log::error!("Cascade interrupted while deleting course {}.", course_id);
            EndpointError::operation(DeleteCourseError::CascadeFailure)
        }
        err => {
            log::error!("Failed to delete course. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::DeleteCourseOutput {})
}

impl OperationError for DeleteCourseError {
    fn code(&self) -> tonic::Code {
        match self {
            DeleteCourseError::NotFound => tonic::Code::NotFound,
            DeleteCourseError::CascadeFailure => tonic::Code::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::GetError;
    use crate::catalog::{Course, MemCatalogRepository, Module, Video};

    #[tokio::test]
    async fn removes_course_and_descendants() {
        let catalog = MemCatalogRepository::new();
        let course = Course::builder().title("X").description("d").build();
        catalog.create_course(&course).await.unwrap();
        let module = catalog
            .add_module(Module::builder().course_id(course.course_id).title("M1").build())
            .await
            .unwrap();
        catalog
            .add_video(
                Video::builder()
                    .video_id("v-1")
                    .module_id(module.module_id)
                    .title("V1")
                    .duration("1:00")
                    .build(),
            )
            .await
            .unwrap();

        delete_course(
            &catalog,
            pb::DeleteCourseInput {
                course_id: course.course_id.to_string(),
            },
        )
        .await
        .unwrap();

        assert!(matches!(catalog.get_course(&course.course_id).await, Err(GetError::NotFound)));
        assert!(matches!(catalog.get_module(&module.module_id).await, Err(GetError::NotFound)));
        assert!(matches!(catalog.get_video("v-1").await, Err(GetError::NotFound)));
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let catalog = MemCatalogRepository::new();
        let result = delete_course(
            &catalog,
            pb::DeleteCourseInput {
                course_id: Uuid::new_v4().to_string(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(EndpointError::Operation(DeleteCourseError::NotFound))
        ));
    }
}
