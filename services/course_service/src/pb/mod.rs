tonic::include_proto!("course_service");

mod conversion;
