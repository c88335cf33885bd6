use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, UpdateError};
use crate::catalog::types::ModuleUpdate;
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum UpdateModuleError {
    #[error("Module not found.")]
    NotFound,
}

pub async fn update_module(
    catalog: &impl CatalogRepository,
    input: pb::UpdateModuleInput,
) -> Result<pb::UpdateModuleOutput, EndpointError<UpdateModuleError>> {
    let module_id = Uuid::parse_str(&input.module_id)
        .map_err(|_| EndpointError::validation("Invalid module ID provided."))?;

    if let Some(title) = &input.title {
        if !non_blank(title) {
            return Err(EndpointError::validation("Title cannot be blank."));
        }
    }

    let update = ModuleUpdate {
        title: input.title,
        description: input.description,
    };

    let module = catalog.update_module(&module_id, &update).await.map_err(|err| match err {
        UpdateError::NotFound => EndpointError::operation(UpdateModuleError::NotFound),
        err => {
            log::error!("Failed to update module. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::UpdateModuleOutput {
        module: Some(module.into()),
    })
}

impl OperationError for UpdateModuleError {
    fn code(&self) -> tonic::Code {
        match self {
            UpdateModuleError::NotFound => tonic::Code::NotFound,
        }
    }
}
