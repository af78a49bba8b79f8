use crate::AppConfig;
use crate::routes::error::{PageError, QuizError};
use crate::routes::extract::{ValidJson, ValidQuery};
use crate::views;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use hackquiz_core::scoring::score;
use hackquiz_model::quiz::QuizId;
use hackquiz_model::score::Score;
use hackquiz_model::session::{SessionId, SessionMarker};
use hackquiz_model::submission::EndQuiz;
use maud::Markup;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use utoipa::IntoParams;

pub(crate) fn create_router() -> Router {
    Router::new()
        .route("/quiz", get(get_quiz))
        .route("/startquiz", get(start_quiz).post(start_quiz))
        .route("/endquiz", get(end_quiz_query).post(end_quiz))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct QuizQuery {
    /// Id of the quiz, the file `quiz<id>.json` is loaded
    id: String,
    /// Key of a question. If set the stored question is returned as json instead of the quiz page
    p: Option<String>,
}

#[utoipa::path(
    get,
    path = "/quiz",
    params(QuizQuery),
    responses(
        (status = OK, description = "The quiz page as html, or the stored value of question `p` as json if `p` is set"),
        (status = BAD_REQUEST, description = "Missing or invalid quiz id"),
        (status = NOT_FOUND, description = "Quiz or question not found"),
    ),
    tag = "quiz"
)]
#[instrument(skip_all)]
pub(crate) async fn get_quiz(
    Extension(app_config): Extension<AppConfig>,
    ValidQuery(query): ValidQuery<QuizQuery>,
) -> Response {
    match query.p {
        Some(key) => get_question(&app_config, &query.id, key).await.into_response(),
        None => get_quiz_page(&app_config, &query.id)
            .await
            .map_err(PageError::from)
            .into_response(),
    }
}

async fn get_quiz_page(app_config: &AppConfig, id: &str) -> Result<Markup, QuizError> {
    let id: QuizId = id.parse()?;
    let quiz = app_config.repository().get(&id).await?;
    Ok(views::quiz(app_config.quiz_title(), &quiz))
}

async fn get_question(app_config: &AppConfig, id: &str, key: String) -> Result<Json<Value>, QuizError> {
    let id: QuizId = id.parse()?;
    let mut quiz = app_config.repository().get(&id).await?;
    match quiz.entries.shift_remove(&key) {
        Some(question) => Ok(Json(question)),
        None => Err(QuizError::QuestionNotFound { quiz: id, key }),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct StartQuizQuery {
    /// Quiz that is started. Checked for existence if set
    id: Option<String>,
    /// Existing session to restart. A new session is created if not set
    session: Option<String>,
}

#[utoipa::path(
    get,
    path = "/startquiz",
    params(StartQuizQuery),
    responses(
        (status = OK, body = SessionMarker, description = "Start time of the session. POST is accepted as well"),
        (status = BAD_REQUEST, description = "Invalid quiz or session id"),
        (status = NOT_FOUND, description = "Quiz not found"),
    ),
    tag = "quiz"
)]
#[instrument(skip_all)]
pub(crate) async fn start_quiz(
    Extension(app_config): Extension<AppConfig>,
    ValidQuery(query): ValidQuery<StartQuizQuery>,
) -> Result<Json<SessionMarker>, QuizError> {
    let session_id = query.session.as_deref().map(str::parse::<SessionId>).transpose()?;
    let quiz_id = query.id.as_deref().map(str::parse::<QuizId>).transpose()?;
    if let Some(quiz_id) = &quiz_id {
        app_config.repository().get(quiz_id).await?;
    }
    let marker = app_config.sessions().start(session_id, quiz_id).await?;
    Ok(Json(marker))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct EndQuizQuery {
    id: String,
    /// Json list of answers, e.g. `["b","c"]`
    answers: String,
    session: Option<String>,
}

#[utoipa::path(
    get,
    path = "/endquiz",
    params(EndQuizQuery),
    responses(
        (status = OK, body = Score, description = "Score of the submission"),
        (status = BAD_REQUEST, description = "Invalid id, malformed or empty answers"),
        (status = NOT_FOUND, description = "Quiz not found"),
        (status = UNPROCESSABLE_ENTITY, description = "The quiz has no entry to compare an answer with"),
    ),
    tag = "quiz"
)]
#[instrument(skip_all)]
pub(crate) async fn end_quiz_query(
    Extension(app_config): Extension<AppConfig>,
    ValidQuery(query): ValidQuery<EndQuizQuery>,
) -> Result<Json<Score>, QuizError> {
    let answers: Vec<Value> = serde_json::from_str(&query.answers)?;
    let EndQuiz { id, answers, session } = parse_end_quiz(query.id, answers, query.session)?;
    finish_quiz(&app_config, &id, &answers, session).await.map(Json)
}

/// Body of `POST /endquiz`. Ids are plain strings here so that invalid ids end up
/// as [`QuizError::InvalidQuizId`] instead of a body rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct EndQuizBody {
    id: String,
    answers: Vec<Value>,
    #[serde(default)]
    session: Option<String>,
}

fn parse_end_quiz(id: String, answers: Vec<Value>, session: Option<String>) -> Result<EndQuiz, QuizError> {
    Ok(EndQuiz {
        id: id.parse()?,
        answers,
        session: session.as_deref().map(str::parse::<SessionId>).transpose()?,
    })
}

#[utoipa::path(
    post,
    path = "/endquiz",
    request_body = EndQuiz,
    responses(
        (status = OK, body = Score, description = "Score of the submission"),
        (status = BAD_REQUEST, description = "Malformed body, invalid id or empty answers"),
        (status = NOT_FOUND, description = "Quiz not found"),
        (status = UNPROCESSABLE_ENTITY, description = "The quiz has no entry to compare an answer with"),
    ),
    tag = "quiz"
)]
#[instrument(skip_all)]
pub(crate) async fn end_quiz(
    Extension(app_config): Extension<AppConfig>,
    ValidJson(body): ValidJson<EndQuizBody>,
) -> Result<Json<Score>, QuizError> {
    let EndQuiz { id, answers, session } = parse_end_quiz(body.id, body.answers, body.session)?;
    finish_quiz(&app_config, &id, &answers, session).await.map(Json)
}

async fn finish_quiz(
    app_config: &AppConfig,
    id: &QuizId,
    answers: &[Value],
    session: Option<SessionId>,
) -> Result<Score, QuizError> {
    let quiz = app_config.repository().get(id).await?;
    let mut score = score(answers, &quiz, app_config.scoring())?;

    if let Some(session_id) = session {
        match app_config.sessions().get(&session_id) {
            None => tracing::warn!(session = %session_id, "ending unknown session"),
            Some(marker) if marker.quiz_id.as_ref().is_some_and(|started| started != id) => tracing::warn!(
                session = %session_id,
                started = ?marker.quiz_id,
                "session was started for another quiz, not measuring elapsed time"
            ),
            Some(_) => {
                if let Some(marker) = app_config.sessions().finish(&session_id) {
                    score.elapsed_seconds = Some(marker.elapsed_seconds(Utc::now()));
                }
            }
        }
    }
    tracing::info!(quiz = %id, score = score.score, elapsed = ?score.elapsed_seconds, "quiz finished");
    Ok(score)
}
