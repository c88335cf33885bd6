use course_service::context::Context;
use course_service::operations::add_module::add_module;
use course_service::operations::add_video::add_video;
use course_service::operations::check_playback::check_playback;
use course_service::operations::create_course::create_course;
use course_service::operations::decide_enrollment::decide_enrollment;
use course_service::operations::delete_course::delete_course;
use course_service::operations::delete_module::delete_module;
use course_service::operations::delete_video::delete_video;
use course_service::operations::describe_course::describe_course;
use course_service::operations::list_courses::list_courses;
use course_service::operations::list_enrollments::list_enrollments;
use course_service::operations::submit_enrollment::submit_enrollment;
use course_service::operations::update_course::update_course;
use course_service::operations::update_module::update_module;
use course_service::operations::update_video::update_video;
use course_service::pb;
use course_service::pb::course_service_server::{CourseService, CourseServiceServer};
use service_core::telemetry::{init_subscriber, make_subscriber};
use tonic::transport::Server;
use tonic::{Request, Response, Status};

struct CourseServiceImpl {
    pub ctx: Context,
}

#[tonic::async_trait]
impl CourseService for CourseServiceImpl {
    async fn create_course(
        &self,
        request: Request<pb::CreateCourseInput>,
    ) -> Result<Response<pb::CreateCourseOutput>, Status> {
        create_course(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn describe_course(
        &self,
        request: Request<pb::DescribeCourseInput>,
    ) -> Result<Response<pb::DescribeCourseOutput>, Status> {
        describe_course(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn update_course(
        &self,
        request: Request<pb::UpdateCourseInput>,
    ) -> Result<Response<pb::UpdateCourseOutput>, Status> {
        update_course(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn delete_course(
        &self,
        request: Request<pb::DeleteCourseInput>,
    ) -> Result<Response<pb::DeleteCourseOutput>, Status> {
        delete_course(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn list_courses(
        &self,
        request: Request<pb::ListCoursesInput>,
    ) -> Result<Response<pb::ListCoursesOutput>, Status> {
        list_courses(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn add_module(
        &self,
        request: Request<pb::AddModuleInput>,
    ) -> Result<Response<pb::AddModuleOutput>, Status> {
        add_module(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn update_module(
        &self,
        request: Request<pb::UpdateModuleInput>,
    ) -> Result<Response<pb::UpdateModuleOutput>, Status> {
        update_module(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn delete_module(
        &self,
        request: Request<pb::DeleteModuleInput>,
    ) -> Result<Response<pb::DeleteModuleOutput>, Status> {
        delete_module(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn add_video(
        &self,
        request: Request<pb::AddVideoInput>,
    ) -> Result<Response<pb::AddVideoOutput>, Status> {
        add_video(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn update_video(
        &self,
        request: Request<pb::UpdateVideoInput>,
    ) -> Result<Response<pb::UpdateVideoOutput>, Status> {
        update_video(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn delete_video(
        &self,
        request: Request<pb::DeleteVideoInput>,
    ) -> Result<Response<pb::DeleteVideoOutput>, Status> {
        delete_video(&self.ctx.catalog, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn submit_enrollment(
        &self,
        request: Request<pb::SubmitEnrollmentInput>,
    ) -> Result<Response<pb::SubmitEnrollmentOutput>, Status> {
        submit_enrollment(&self.ctx.catalog, &self.ctx.enrollments, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn decide_enrollment(
        &self,
        request: Request<pb::DecideEnrollmentInput>,
    ) -> Result<Response<pb::DecideEnrollmentOutput>, Status> {
        decide_enrollment(
            &self.ctx.catalog,
            &self.ctx.enrollments,
            self.ctx.dispatcher.as_ref(),
            request.into_inner(),
        )
        .await
        .map(Response::new)
        .map_err(|err| err.into())
    }

    async fn list_enrollments(
        &self,
        request: Request<pb::ListEnrollmentsInput>,
    ) -> Result<Response<pb::ListEnrollmentsOutput>, Status> {
        list_enrollments(&self.ctx.enrollments, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }

    async fn check_playback(
        &self,
        request: Request<pb::CheckPlaybackInput>,
    ) -> Result<Response<pb::CheckPlaybackOutput>, Status> {
        check_playback(&self.ctx.catalog, &self.ctx.enrollments, request.into_inner())
            .await
            .map(Response::new)
            .map_err(|err| err.into())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = make_subscriber("course_service", "info");
    init_subscriber(subscriber);

    let addr = "0.0.0.0:8080".parse().unwrap();
    let ctx = Context::from_env();
    let course_service = CourseServiceImpl { ctx };
    let server = CourseServiceServer::new(course_service);

    Server::builder().add_service(server).serve(addr).await?;

    Ok(())
}
