use crate::AppConfig;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use hackquiz_core::status::get_repository_status;
use hackquiz_model::status::ComponentStatus;
use http::StatusCode;
use tracing::instrument;

pub(crate) fn create_router() -> Router {
    Router::new().route("/", get(get_status))
}

#[derive(Debug, Clone)]
struct Status {
    quizzes: ComponentStatus,
    active_sessions: usize,
}

impl Status {
    pub(crate) fn status_code(&self) -> StatusCode {
        if self.quizzes.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Status> for hackquiz_model::status::Status {
    fn from(val: Status) -> Self {
        hackquiz_model::status::Status {
            quizzes: val.quizzes.into_message(),
            active_sessions: val.active_sessions,
        }
    }
}

impl IntoResponse for Status {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let status: hackquiz_model::status::Status = self.into();
        (status_code, Json(status)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/status",
    responses(
        (status = OK, description = "Server is ok", body = hackquiz_model::status::Status),
        (
            status = INTERNAL_SERVER_ERROR,
            description = "Quiz storage is not reachable",
            body = hackquiz_model::status::Status
        ),
    ),
    tag = "util"
)]
#[instrument(skip_all)]
pub(crate) async fn get_status(Extension(app_config): Extension<AppConfig>) -> impl IntoResponse {
    Status {
        quizzes: get_repository_status(app_config.repository(), None).await,
        active_sessions: app_config.sessions().len(),
    }
}
