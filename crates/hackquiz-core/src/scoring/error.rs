use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("the submission contains no answers")]
    EmptySubmission,

    #[error("the quiz has no entry {0:?} to compare with")]
    MissingEntry(String),
}
