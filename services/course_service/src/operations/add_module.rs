use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, PutError};
use crate::catalog::types::Module;
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AddModuleError {
    #[error("Course not found.")]
    CourseNotFound,
}

/// Appends a module to the end of the course's module list.
pub async fn add_module(
    catalog: &impl CatalogRepository,
    input: pb::AddModuleInput,
) -> Result<pb::AddModuleOutput, EndpointError<AddModuleError>> {
    let course_id = Uuid::parse_str(&input.course_id)
        .map_err(|_| EndpointError::validation("Invalid course ID provided."))?;

    if !non_blank(&input.title) {
        return Err(EndpointError::validation("Title is required."));
    }

    let module = Module::builder()
        .course_id(course_id)
        .title(input.title.trim())
        .description(input.description)
        .build();

    let module = catalog.add_module(module).await.map_err(|err| match err {
        PutError::ParentNotFound => EndpointError::operation(AddModuleError::CourseNotFound),
        err => {
            log::error!("Failed to add module. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::AddModuleOutput {
        module: Some(module.into()),
    })
}

impl OperationError for AddModuleError {
    fn code(&self) -> tonic::Code {
        match self {
            AddModuleError::CourseNotFound => tonic::Code::NotFound,
        }
    }
}
