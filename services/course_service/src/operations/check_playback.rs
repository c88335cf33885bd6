use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;

use crate::access::{self, EvaluateError};
use crate::catalog::repository::CatalogRepository;
use crate::enrollment::repository::EnrollmentsRepository;
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CheckPlaybackError {
    #[error("Video not found.")]
    VideoNotFound,
}

pub async fn check_playback(
    catalog: &impl CatalogRepository,
    enrollments: &impl EnrollmentsRepository,
    input: pb::CheckPlaybackInput,
) -> Result<pb::CheckPlaybackOutput, EndpointError<CheckPlaybackError>> {
    if !non_blank(&input.viewer_id) {
        return Err(EndpointError::validation("Viewer ID is required."));
    }
    if !non_blank(&input.video_id) {
        return Err(EndpointError::validation("Video ID is required."));
    }

    let decision = access::evaluate(catalog, enrollments, &input.viewer_id, &input.video_id)
        .await
        .map_err(|err| match err {
            EvaluateError::VideoNotFound => EndpointError::operation(CheckPlaybackError::VideoNotFound),
            err => {
                log::error!("Failed to evaluate playback access. Original error: {:?}.", err);
                EndpointError::internal()
            }
        })?;

    Ok(pb::CheckPlaybackOutput {
        allowed: decision.allowed,
        reason: decision.reason.to_string(),
    })
}

impl OperationError for CheckPlaybackError {
    fn code(&self) -> tonic::Code {
        match self {
            CheckPlaybackError::VideoNotFound => tonic::Code::NotFound,
        }
    }
}
