use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, DeleteError};
use crate::pb;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DeleteModuleError {
    #[error("Module not found.")]
    NotFound,

    #[error("Module deletion was interrupted; retry to finish removing child records.")]
    CascadeFailure,
}

/// Removes a module and its videos, videos first.
pub async fn delete_module(
    catalog: &impl CatalogRepository,
    input: pb::DeleteModuleInput,
) -> Result<pb::DeleteModuleOutput, EndpointError<DeleteModuleError>> {
    let module_id = Uuid::parse_str(&input.module_id)
        .map_err(|_| EndpointError::validation("Invalid module ID provided."))?;

    catalog.delete_module(&module_id).await.map_err(|err| match err {
        DeleteError::NotFound => EndpointError::operation(DeleteModuleError::NotFound),
        DeleteError::CascadeInterrupted => {
            log::error!("Cascade interrupted while deleting module {}.", module_id);
            EndpointError::operation(DeleteModuleError::CascadeFailure)
        }
        err => {
            log::error!("Failed to delete module. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::DeleteModuleOutput {})
}

impl OperationError for DeleteModuleError {
    fn code(&self) -> tonic::Code {
        match self {
            DeleteModuleError::NotFound => tonic::Code::NotFound,
            DeleteModuleError::CascadeFailure => tonic::Code::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::GetError;
    use crate::catalog::{Course, MemCatalogRepository, Module, Video};

    #[tokio::test]
    async fn removes_module_and_its_videos_only() {
        let catalog = MemCatalogRepository::new();
        let course = Course::builder().title("X").description("d").build();
        catalog.create_course(&course).await.unwrap();
        let doomed = catalog
            .add_module(Module::builder().course_id(course.course_id).title("M1").build())
            .await
            .unwrap();
        let kept = catalog
            .add_module(Module::builder().course_id(course.course_id).title("M2").build())
            .await
            .unwrap();
        catalog
            .add_video(
                Video::builder()
                    .video_id("v-doomed")
                    .module_id(doomed.module_id)
                    .title("V1")
                    .duration("1:00")
                    .build(),
            )
            .await
            .unwrap();
        catalog
            .add_video(
                Video::builder()
                    .video_id("v-kept")
                    .module_id(kept.module_id)
                    .title("V2")
                    .duration("1:00")
                    .build(),
            )
            .await
            .unwrap();

        delete_module(
            &catalog,
            pb::DeleteModuleInput {
                module_id: doomed.module_id.to_string(),
            },
        )
        .await
        .unwrap();

        assert!(matches!(catalog.get_module(&doomed.module_id).await, Err(GetError::NotFound)));
        assert!(matches!(catalog.get_video("v-doomed").await, Err(GetError::NotFound)));
        assert!(catalog.get_video("v-kept").await.is_ok());
        assert!(catalog.get_course(&course.course_id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_module_is_not_found() {
        let catalog = MemCatalogRepository::new();
        let result = delete_module(
            &catalog,
            pb::DeleteModuleInput {
                module_id: Uuid::new_v4().to_string(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(EndpointError::Operation(DeleteModuleError::NotFound))
        ));
    }
}
