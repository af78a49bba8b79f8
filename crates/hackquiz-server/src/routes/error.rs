use crate::views;
use axum::Json;
use axum::response::{IntoResponse, Response};
use hackquiz_core::repository::error::RepositoryError;
use hackquiz_core::scoring::error::ScoreError;
use hackquiz_core::session::error::SessionError;
use hackquiz_model::quiz::{QuizId, QuizIdError};
use hackquiz_model::session::SessionId;
use http::StatusCode;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub(crate) enum QuizError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid quiz id: {0}")]
    InvalidQuizId(#[from] QuizIdError),

    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] uuid::Error),

    #[error("answers are not a json list: {0}")]
    InvalidAnswers(#[from] serde_json::Error),

    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),

    #[error("quiz {quiz} has no question {key:?}")]
    QuestionNotFound { quiz: QuizId, key: String },

    #[error("session {0} was started without a quiz")]
    SessionWithoutQuiz(SessionId),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<RepositoryError> for QuizError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => QuizError::QuizNotFound(id),
            error => QuizError::Repository(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum QuizErrorType {
    InvalidRequest,
    InvalidQuizId,
    InvalidSessionId,
    InvalidAnswers,
    EmptySubmission,
    SessionWithoutQuiz,
    QuizNotFound,
    QuestionNotFound,
    SessionNotFound,
    MissingEntry,
    Internal,
}

pub(crate) trait GetStatusCode {
    fn status_code(&self) -> StatusCode;
}

impl GetStatusCode for QuizErrorType {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest
            | Self::InvalidQuizId
            | Self::InvalidSessionId
            | Self::InvalidAnswers
            | Self::EmptySubmission
            | Self::SessionWithoutQuiz => StatusCode::BAD_REQUEST,
            Self::QuizNotFound | Self::QuestionNotFound | Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::MissingEntry => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl QuizError {
    pub(crate) fn error_type(&self) -> QuizErrorType {
        match self {
            QuizError::InvalidRequest(_) => QuizErrorType::InvalidRequest,
            QuizError::InvalidQuizId(_) => QuizErrorType::InvalidQuizId,
            QuizError::InvalidSessionId(_) => QuizErrorType::InvalidSessionId,
            QuizError::InvalidAnswers(_) => QuizErrorType::InvalidAnswers,
            QuizError::QuizNotFound(_) => QuizErrorType::QuizNotFound,
            QuizError::QuestionNotFound { .. } => QuizErrorType::QuestionNotFound,
            QuizError::SessionWithoutQuiz(_) => QuizErrorType::SessionWithoutQuiz,
            QuizError::Session(SessionError::UnknownSession(_)) => QuizErrorType::SessionNotFound,
            QuizError::Score(ScoreError::EmptySubmission) => QuizErrorType::EmptySubmission,
            QuizError::Score(ScoreError::MissingEntry(_)) => QuizErrorType::MissingEntry,
            QuizError::Repository(_) | QuizError::Session(_) => QuizErrorType::Internal,
        }
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(error = self as &dyn std::error::Error, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
    }
}

impl GetStatusCode for QuizError {
    fn status_code(&self) -> StatusCode {
        self.error_type().status_code()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorData<T> {
    pub(crate) error: T,
    pub(crate) error_description: Cow<'static, str>,
}

impl<T> ErrorData<T> {
    pub fn new<A: Into<Cow<'static, str>>>(error: T, error_description: A) -> Self {
        Self {
            error,
            error_description: error_description.into(),
        }
    }
}

pub(crate) trait ErrorDataProvider<T: GetStatusCode> {
    fn error_data(self) -> Option<ErrorData<T>>;
}

impl ErrorDataProvider<QuizErrorType> for QuizError {
    fn error_data(self) -> Option<ErrorData<QuizErrorType>> {
        match self.error_type() {
            // internals stay in the log
            QuizErrorType::Internal => None,
            error_type => Some(ErrorData::new(error_type, self.to_string())),
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        self.log();
        error_to_axum_response(self)
    }
}

pub(crate) fn error_to_axum_response<E, T>(error: T) -> Response
where
    E: GetStatusCode + Serialize,
    T: GetStatusCode + ErrorDataProvider<E>,
{
    let status_code = GetStatusCode::status_code(&error);
    match error.error_data() {
        Some(data) => {
            let status_code = GetStatusCode::status_code(&data.error);
            (status_code, Json(data)).into_response()
        }
        None => status_code.into_response(),
    }
}

/// Error of an html page, rendered as html.
#[derive(Debug)]
pub(crate) struct PageError(pub(crate) QuizError);

impl From<QuizError> for PageError {
    fn from(error: QuizError) -> Self {
        Self(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let PageError(error) = self;
        error.log();
        let status_code = error.status_code();
        let message = if status_code.is_server_error() {
            "Something went wrong while loading this page.".to_owned()
        } else {
            error.to_string()
        };
        (status_code, views::error_page(status_code, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = QuizError::from(RepositoryError::NotFound("1".parse().unwrap()));
        assert!(matches!(not_found, QuizError::QuizNotFound(_)));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid = QuizError::from("a/b".parse::<QuizId>().unwrap_err());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let parse = QuizError::from(RepositoryError::Parse {
            id: "1".parse().unwrap(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        });
        assert_eq!(parse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(parse.error_data().is_none());

        let unknown = QuizError::from(SessionError::UnknownSession(SessionId::new()));
        assert_eq!(unknown.error_type(), QuizErrorType::SessionNotFound);
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

        let rejected = QuizError::InvalidRequest("missing field `id`".to_owned());
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);

        let empty = QuizError::from(ScoreError::EmptySubmission);
        let data = empty.error_data().unwrap();
        assert_eq!(data.error, QuizErrorType::EmptySubmission);
        assert_eq!(data.error_description, "the submission contains no answers");
    }
}
