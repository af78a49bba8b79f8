use hackquiz_model::session::SessionId;
use hackquiz_utils::loader::error::LoadingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session marker: {0}")]
    Marker(#[from] LoadingError),

    #[error("session {0} not found")]
    UnknownSession(SessionId),
}
