use crate::AppConfig;
use crate::routes::error::QuizError;
use crate::routes::extract::{ValidJson, ValidQuery};
use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use hackquiz_core::analytics::{evaluate_answer, summarize};
use hackquiz_core::session::error::SessionError;
use hackquiz_model::analytics::{AnswerRecord, RecordAnswer, SessionAnalytics, TopicSort};
use hackquiz_model::session::{SessionId, SessionMarker};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

pub(crate) fn create_router() -> Router {
    Router::new()
        .route("/{session}/answers", post(record_answer))
        .route("/{session}/analytics", get(get_analytics))
        .route("/{session}/reset", post(reset_session))
}

#[utoipa::path(
    post,
    path = "/api/v0/sessions/{session}/answers",
    params(("session" = String, Path, description = "Session returned by /startquiz")),
    request_body = RecordAnswer,
    responses(
        (status = OK, body = AnswerRecord, description = "The recorded answer"),
        (status = BAD_REQUEST, description = "Malformed body, or the session was started without a quiz"),
        (status = NOT_FOUND, description = "Session or quiz not found"),
        (status = UNPROCESSABLE_ENTITY, description = "The quiz has no such question"),
    ),
    tag = "sessions"
)]
#[instrument(skip_all)]
pub(crate) async fn record_answer(
    Extension(app_config): Extension<AppConfig>,
    Path(session): Path<String>,
    ValidJson(request): ValidJson<RecordAnswer>,
) -> Result<Json<AnswerRecord>, QuizError> {
    let session_id: SessionId = session.parse()?;
    let state = app_config
        .sessions()
        .state(&session_id)
        .ok_or(SessionError::UnknownSession(session_id))?;
    let quiz_id = state
        .marker
        .quiz_id
        .clone()
        .ok_or(QuizError::SessionWithoutQuiz(session_id))?;
    let quiz = app_config.repository().get(&quiz_id).await?;

    let record = evaluate_answer(&quiz, app_config.scoring(), request, state.last_activity(), Utc::now())?;
    app_config.sessions().record_answer(&session_id, record.clone())?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct AnalyticsQuery {
    /// Order of the topics
    #[serde(default)]
    sort: TopicSort,
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions/{session}/analytics",
    params(("session" = String, Path, description = "Session returned by /startquiz"), AnalyticsQuery),
    responses(
        (status = OK, body = SessionAnalytics, description = "Accuracy and timing of the session"),
        (status = BAD_REQUEST, description = "Invalid session id or sort order"),
        (status = NOT_FOUND, description = "Session not found"),
    ),
    tag = "sessions"
)]
#[instrument(skip_all)]
pub(crate) async fn get_analytics(
    Extension(app_config): Extension<AppConfig>,
    Path(session): Path<String>,
    ValidQuery(query): ValidQuery<AnalyticsQuery>,
) -> Result<Json<SessionAnalytics>, QuizError> {
    let session_id: SessionId = session.parse()?;
    let state = app_config
        .sessions()
        .state(&session_id)
        .ok_or(SessionError::UnknownSession(session_id))?;
    Ok(Json(summarize(&state, query.sort)))
}

#[utoipa::path(
    post,
    path = "/api/v0/sessions/{session}/reset",
    params(("session" = String, Path, description = "Session returned by /startquiz")),
    responses(
        (status = OK, body = SessionMarker, description = "The session starts over without answers"),
        (status = BAD_REQUEST, description = "Invalid session id"),
        (status = NOT_FOUND, description = "Session not found"),
    ),
    tag = "sessions"
)]
#[instrument(skip_all)]
pub(crate) async fn reset_session(
    Extension(app_config): Extension<AppConfig>,
    Path(session): Path<String>,
) -> Result<Json<SessionMarker>, QuizError> {
    let session_id: SessionId = session.parse()?;
    let marker = app_config.sessions().reset(&session_id).await?;
    Ok(Json(marker))
}
