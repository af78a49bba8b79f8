use crate::AppConfig;
use crate::routes::error::{PageError, QuizError};
use crate::views;
use axum::routing::get;
use axum::{Extension, Router};
use maud::Markup;
use tracing::instrument;

pub(crate) fn create_router() -> Router {
    Router::new().route("/", get(home))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Html home page listing all quizzes"),
    ),
    tag = "pages"
)]
#[instrument(skip_all)]
pub(crate) async fn home(Extension(app_config): Extension<AppConfig>) -> Result<Markup, PageError> {
    let quizzes = app_config.repository().list().await.map_err(QuizError::from)?;
    Ok(views::home(&quizzes))
}
