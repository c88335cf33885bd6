use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;

use crate::catalog::repository::{CatalogRepository, UpdateError};
use crate::catalog::types::VideoUpdate;
use crate::pb;
use crate::utils::validation::{non_blank, valid_duration};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum UpdateVideoError {
    #[error("Video not found.")]
    NotFound,
}

pub async fn update_video(
    catalog: &impl CatalogRepository,
    input: pb::UpdateVideoInput,
) -> Result<pb::UpdateVideoOutput, EndpointError<UpdateVideoError>> {
    if !non_blank(&input.video_id) {
        return Err(EndpointError::validation("Video ID is required."));
    }
    if let Some(title) = &input.title {
        if !non_blank(title) {
            return Err(EndpointError::validation("Title cannot be blank."));
        }
    }
    if let Some(duration) = &input.duration {
        if !valid_duration(duration) {
            return Err(EndpointError::validation(
                "Duration must be minutes:seconds with zero-padded seconds below 60.",
            ));
        }
    }

    let update = VideoUpdate {
        title: input.title,
        duration: input.duration,
        free: input.free,
    };

    let video = catalog.update_video(&input.video_id, &update).await.map_err(|err| match err {
        UpdateError::NotFound => EndpointError::operation(UpdateVideoError::NotFound),
        err => {
            log::error!("Failed to update video. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::UpdateVideoOutput {
        video: Some(video.into()),
    })
}

impl OperationError for UpdateVideoError {
    fn code(&self) -> tonic::Code {
        match self {
            UpdateVideoError::NotFound => tonic::Code::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, MemCatalogRepository, Module, Video};

    async fn seeded_video(catalog: &MemCatalogRepository) -> Video {
        let course = Course::builder().title("X").description("d").build();
        catalog.create_course(&course).await.unwrap();
        let module = catalog
            .add_module(Module::builder().course_id(course.course_id).title("M1").build())
            .await
            .unwrap();
        catalog
            .add_video(
                Video::builder()
                    .video_id("ext-v1")
                    .module_id(module.module_id)
                    .title("Intro")
                    .duration("4:05")
                    .build(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn flips_the_free_flag_only() {
        let catalog = MemCatalogRepository::new();
        let video = seeded_video(&catalog).await;
        assert!(!video.free);

        let output = update_video(
            &catalog,
            pb::UpdateVideoInput {
                video_id: video.video_id.clone(),
                title: None,
                duration: None,
                free: Some(true),
            },
        )
        .await
        .unwrap();

        let updated = output.video.unwrap();
        assert!(updated.free);
        assert_eq!(updated.title, "Intro");
        assert_eq!(updated.duration, "4:05");
    }

    #[tokio::test]
    async fn malformed_duration_is_refused_without_a_write() {
        let catalog = MemCatalogRepository::new();
        let video = seeded_video(&catalog).await;

        let result = update_video(
            &catalog,
            pb::UpdateVideoInput {
                video_id: video.video_id.clone(),
                title: None,
                duration: Some("4:5".to_owned()),
                free: None,
            },
        )
        .await;
        assert!(matches!(result, Err(EndpointError::Validation(_))));
        assert_eq!(catalog.get_video(&video.video_id).await.unwrap(), video);
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let catalog = MemCatalogRepository::new();
        let result = update_video(
            &catalog,
            pb::UpdateVideoInput {
                video_id: "no-such-video".to_owned(),
                title: None,
                duration: None,
                free: Some(true),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(EndpointError::Operation(UpdateVideoError::NotFound))
        ));
    }
}
