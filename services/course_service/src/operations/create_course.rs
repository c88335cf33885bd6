use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;

use crate::catalog::repository::CatalogRepository;
use crate::catalog::types::{Course, CourseLevel, CourseStatus};
use crate::pb;
use crate::utils::validation::non_blank;

pub async fn create_course(
    catalog: &impl CatalogRepository,
    input: pb::CreateCourseInput,
) -> Result<pb::CreateCourseOutput, EndpointError<Infallible>> {
    if !non_blank(&input.title) {
        return Err(EndpointError::validation("Title is required."));
    }
    if !non_blank(&input.description) {
        return Err(EndpointError::validation("Description is required."));
    }

    let price = input.price.unwrap_or(0.0);
    if !price.is_finite() || price < 0.0 {
        return Err(EndpointError::validation("Price must be a non-negative number."));
    }

    let level = parse_level(&input.level)?;
    let status = parse_status(&input.status)?;

    let course = Course::builder()
        .title(input.title.trim())
        .description(input.description.trim())
        .price(price)
        .instructor(input.instructor)
        .level(level)
        .category(input.category)
        .featured(input.featured)
        .status(status)
        .duration_label(input.duration_label)
        .build();

    catalog.create_course(&course).await.map_err(|err| {
        log::error!("Create course failed: {:?}", err);
        EndpointError::internal()
    })?;

    Ok(pb::CreateCourseOutput {
        course: Some(course.into()),
    })
}

fn parse_level(value: &str) -> Result<CourseLevel, EndpointError<Infallible>> {
    if value.is_empty() {
        return Ok(CourseLevel::default());
    }
    value
        .parse()
        .map_err(|_| EndpointError::validation("Unknown course level."))
}

fn parse_status(value: &str) -> Result<CourseStatus, EndpointError<Infallible>> {
    if value.is_empty() {
        return Ok(CourseStatus::default());
    }
    value
        .parse()
        .map_err(|_| EndpointError::validation("Unknown course status."))
}
