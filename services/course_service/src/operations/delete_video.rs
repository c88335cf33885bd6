use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;

use crate::catalog::repository::{CatalogRepository, DeleteError};
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DeleteVideoError {
    #[error("Video not found.")]
    NotFound,
}

pub async fn delete_video(
    catalog: &impl CatalogRepository,
    input: pb::DeleteVideoInput,
) -> Result<pb::DeleteVideoOutput, EndpointError<DeleteVideoError>> {
    if !non_blank(&input.video_id) {
        return Err(EndpointError::validation("Video ID is required."));
    }

    catalog.delete_video(&input.video_id).await.map_err(|err| match err {
        DeleteError::NotFound => EndpointError::operation(DeleteVideoError::NotFound),
        err => {
            log::error!("Failed to delete video. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::DeleteVideoOutput {})
}

impl OperationError for DeleteVideoError {
    fn code(&self) -> tonic::Code {
        match self {
            DeleteVideoError::NotFound => tonic::Code::NotFound,
        }
    }
}
