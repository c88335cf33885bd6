pub mod add_module;
pub mod add_video;
pub mod check_playback;
pub mod create_course;
pub mod decide_enrollment;
pub mod delete_course;
pub mod delete_module;
pub mod delete_video;
pub mod describe_course;
pub mod list_courses;
pub mod list_enrollments;
pub mod submit_enrollment;
pub mod update_course;
pub mod update_module;
pub mod update_video;
