mod common;

use course_service::catalog::MemCatalogRepository;
use course_service::operations::add_module::add_module;
use course_service::operations::add_video::{add_video, AddVideoError};
use course_service::operations::delete_course::delete_course;
use course_service::operations::delete_module::delete_module;
use course_service::operations::describe_course::{describe_course, DescribeCourseError};
use course_service::operations::update_video::{update_video, UpdateVideoError};
use course_service::pb;
use service_core::endpoint_error::EndpointError;

use common::{seed_course, seed_module, seed_video};

#[tokio::test]
async fn deleting_a_course_takes_its_modules_and_videos_with_it() {
    let catalog = MemCatalogRepository::new();
    let course = seed_course(&catalog, "React Masterclass", 197.0).await;
    let module = seed_module(&catalog, course.course_id, "Getting Started").await;
    seed_video(&catalog, module.module_id, "v-intro", false).await;

    delete_course(
        &catalog,
        pb::DeleteCourseInput {
            course_id: course.course_id.to_string(),
        },
    )
    .await
    .unwrap();

    let result = describe_course(
        &catalog,
        pb::DescribeCourseInput {
            course_id: course.course_id.to_string(),
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(EndpointError::Operation(DescribeCourseError::NotFound))
    ));

    // The video is gone with the course; edits against it miss.
    let result = update_video(
        &catalog,
        pb::UpdateVideoInput {
            video_id: "v-intro".to_owned(),
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

#[tokio::test]
async fn deleting_one_module_spares_its_siblings() {
    let catalog = MemCatalogRepository::new();
    let course = seed_course(&catalog, "React Masterclass", 197.0).await;
    let doomed = seed_module(&catalog, course.course_id, "Old Content").await;
    let kept = seed_module(&catalog, course.course_id, "Getting Started").await;
    seed_video(&catalog, doomed.module_id, "v-old", false).await;
    seed_video(&catalog, kept.module_id, "v-kept", false).await;

    delete_module(
        &catalog,
        pb::DeleteModuleInput {
            module_id: doomed.module_id.to_string(),
        },
    )
    .await
    .unwrap();

    let pb_course = describe_course(
        &catalog,
        pb::DescribeCourseInput {
            course_id: course.course_id.to_string(),
        },
    )
    .await
    .unwrap()
    .course
    .unwrap();

    assert_eq!(pb_course.modules.len(), 1);
    assert_eq!(pb_course.modules[0].title, "Getting Started");
    assert_eq!(pb_course.modules[0].videos.len(), 1);
    assert_eq!(pb_course.modules[0].videos[0].video_id, "v-kept");
}

#[tokio::test]
async fn hierarchy_listing_preserves_append_order() {
    let catalog = MemCatalogRepository::new();
    let course = seed_course(&catalog, "React Masterclass", 197.0).await;

    for title in ["Basics", "Hooks", "Deployment"] {
        add_module(
            &catalog,
            pb::AddModuleInput {
                course_id: course.course_id.to_string(),
                title: title.to_owned(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    }

    let pb_course = describe_course(
        &catalog,
        pb::DescribeCourseInput {
            course_id: course.course_id.to_string(),
        },
    )
    .await
    .unwrap()
    .course
    .unwrap();

    let titles: Vec<_> = pb_course.modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Basics", "Hooks", "Deployment"]);
}

#[tokio::test]
async fn video_identifiers_are_unique_across_courses() {
    let catalog = MemCatalogRepository::new();
    let course_a = seed_course(&catalog, "React Masterclass", 197.0).await;
    let course_b = seed_course(&catalog, "Rust in Practice", 149.0).await;
    let module_a = seed_module(&catalog, course_a.course_id, "M1").await;
    let module_b = seed_module(&catalog, course_b.course_id, "M1").await;

    seed_video(&catalog, module_a.module_id, "shared-ref", false).await;

    let result = add_video(
        &catalog,
        pb::AddVideoInput {
            module_id: module_b.module_id.to_string(),
            video_id: "shared-ref".to_owned(),
            title: "Clash".to_owned(),
            duration: "2:00".to_owned(),
            free: false,
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(EndpointError::Operation(AddVideoError::DuplicateVideo))
    ));
}
