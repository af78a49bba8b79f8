use hackquiz_model::quiz::QuizId;
use hackquiz_utils::loader::error::LoadingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),

    #[error("quiz {id} is not a valid quiz file: {source}")]
    Parse {
        id: QuizId,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Loading(#[from] LoadingError),
}
