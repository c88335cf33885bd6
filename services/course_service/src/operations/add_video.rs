use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, PutError};
use crate::catalog::types::Video;
use crate::pb;
use crate::utils::validation::{non_blank, valid_duration};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AddVideoError {
    #[error("Module not found.")]
    ModuleNotFound,

    #[error("A video with this identifier already exists.")]
    DuplicateVideo,
}

/// Appends a video to the end of the module's video list. The video
/// identifier is the caller-supplied external media reference and must be
/// unique across the whole catalog.
pub async fn add_video(
    catalog: &impl CatalogRepository,
    input: pb::AddVideoInput,
) -> Result<pb::AddVideoOutput, EndpointError<AddVideoError>> {
    let module_id = Uuid::parse_str(&input.module_id)
        .map_err(|_| EndpointError::validation("Invalid module ID provided."))?;

    if !non_blank(&input.video_id) {
        return Err(EndpointError::validation("Video ID is required."));
    }
    if !non_blank(&input.title) {
        return Err(EndpointError::validation("Title is required."));
    }
    if !valid_duration(&input.duration) {
        return Err(EndpointError::validation(
            "Duration must be minutes:seconds with zero-padded seconds below 60.",
        ));
    }

    let video = Video::builder()
        .video_id(input.video_id.trim())
        .module_id(module_id)
        .title(input.title.trim())
        .duration(input.duration)
        .free(input.free)
        .build();

    let video = catalog.add_video(video).await.map_err(|err| match err {
        PutError::ParentNotFound => EndpointError::operation(AddVideoError::ModuleNotFound),
        PutError::Duplicate => EndpointError::operation(AddVideoError::DuplicateVideo),
        err => {
            log::error!("Failed to add video. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::AddVideoOutput {
        video: Some(video.into()),
    })
}

impl OperationError for AddVideoError {
    fn code(&self) -> tonic::Code {
        match self {
            AddVideoError::ModuleNotFound => tonic::Code::NotFound,
            AddVideoError::DuplicateVideo => tonic::Code::AlreadyExists,
        }
    }
}
