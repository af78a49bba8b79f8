use super::{error, pages, quiz, sessions, status};
use hackquiz_model::analytics::TopicSort;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        pages::home,
        quiz::get_quiz,
        quiz::start_quiz,
        quiz::end_quiz_query,
        quiz::end_quiz,
        sessions::record_answer,
        sessions::get_analytics,
        sessions::reset_session,
        status::get_status,
    ),
    components(schemas(error::QuizErrorType, TopicSort)),
    tags(
        (name = "pages", description = "Html pages"),
        (name = "quiz", description = "Loading, starting and scoring quizzes"),
        (name = "sessions", description = "Answers and analytics of running sessions"),
        (name = "util", description = "Operational endpoints"),
    )
)]
struct ApiDoc;

pub(crate) fn create_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
