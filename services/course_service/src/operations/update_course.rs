use service_core::endpoint_error::EndpointError;
use service_core::operation_error::OperationError;
use uuid::Uuid;

use crate::catalog::repository::{CatalogRepository, UpdateError};
use crate::catalog::types::CourseUpdate;
use crate::pb;
use crate::utils::validation::non_blank;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum UpdateCourseError {
    #[error("Course not found.")]
    NotFound,
}

pub async fn update_course(
    catalog: &impl CatalogRepository,
    input: pb::UpdateCourseInput,
) -> Result<pb::UpdateCourseOutput, EndpointError<UpdateCourseError>> {
    let course_id = Uuid::parse_str(&input.course_id)
        .map_err(|_| EndpointError::validation("Invalid course ID provided."))?;

    if let Some(title) = &input.title {
        if !non_blank(title) {
            return Err(EndpointError::validation("Title cannot be blank."));
        }
    }
    if let Some(description) = &input.description {
        if !non_blank(description) {
            return Err(EndpointError::validation("Description cannot be blank."));
        }
    }
    if let Some(price) = input.price {
        if !price.is_finite() || price < 0.0 {
            return Err(EndpointError::validation("Price must be a non-negative number."));
        }
    }

    let level = input
        .level
        .as_deref()
        .map(|v| v.parse().map_err(|_| EndpointError::validation("Unknown course level.")))
        .transpose()?;
    let status = input
        .status
        .as_deref()
        .map(|v| v.parse().map_err(|_| EndpointError::validation("Unknown course status.")))
        .transpose()?;

    let update = CourseUpdate {
        title: input.title,
        description: input.description,
        price: input.price,
        instructor: input.instructor,
        level,
        category: input.category,
        featured: input.featured,
        status,
        duration_label: input.duration_label,
    };

    let course = catalog.update_course(&course_id, &update).await.map_err(|err| match err {
        UpdateError::NotFound => EndpointError::operation(UpdateCourseError::NotFound),
        err => {
            log::error!("Failed to update course. Original error: {:?}.", err);
            EndpointError::internal()
        }
    })?;

    Ok(pb::UpdateCourseOutput {
        course: Some(course.into()),
    })
}

impl OperationError for UpdateCourseError {
    fn code(&self) -> tonic::Code {
        match self {
            UpdateCourseError::NotFound => tonic::Code::NotFound,
        }
    }
}
