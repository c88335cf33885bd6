use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;

use crate::catalog::repository::CatalogRepository;
use crate::pb;

/// Lists course summaries; modules are left out, `DescribeCourse` loads them.
pub async fn list_courses(
    catalog: &impl CatalogRepository,
    _input: pb::ListCoursesInput,
) -> Result<pb::ListCoursesOutput, EndpointError<Infallible>> {
    let courses = catalog.list_courses().await.map_err(|err| {
        log::error!("Failed to list courses. Original error: {:?}.", err);
        EndpointError::internal()
    })?;

    Ok(pb::ListCoursesOutput {
        courses: courses.into_iter().map(Into::into).collect(),
    })
}
