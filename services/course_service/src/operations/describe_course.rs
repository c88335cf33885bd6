use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, GetError};
use crate::pb;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DescribeCourseError {
    #[error("Course not found.")]
    NotFound,
}

/// Returns the course with its modules and videos in append order.
pub async fn describe_course(
    catalog: &impl CatalogRepository,
    input: pb::DescribeCourseInput,
) -> Result<pb::DescribeCourseOutput, EndpointError<DescribeCourseError>> {
    let course_id = Uuid::parse_str(&input.course_id)
        .map_err(|_| EndpointError::validation("Invalid course ID provided."))?;

    let course = catalog.get_course(&course_id).await.map_err(|err| match err {
        GetError::NotFound => EndpointError::operation(DescribeCourseError::NotFound),
        err => {
            log::error!("Failed to retrieve course. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    let modules = catalog.modules_of_course(&course_id).await.map_err(|err| {
        log::error!("Failed to list modules. Original error: {:?}.", err);
        EndpointError::internal()
    })?;

    let mut pb_course: pb::Course = course.into();
    for module in modules {
        let videos = catalog.videos_of_module(&module.module_id).await.map_err(|err| {
            log::error!("Failed to list videos. Original error: {:?}.", err);
            EndpointError::internal()
        })?;

        let mut pb_module: pb::Module = module.into();
        pb_module.videos = videos.into_iter().map(Into::into).collect();
        pb_course.modules.push(pb_module);
    }

    Ok(pb::DescribeCourseOutput {
        course: Some(pb_course),
    })
}

impl OperationError for DescribeCourseError {
    fn code(&self) -> tonic::Code {
        match self {
            DescribeCourseError::NotFound => tonic::Code::NotFound,
        }
    }
}
