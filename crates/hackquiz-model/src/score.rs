use crate::quiz::QuizId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// How responses are matched with quiz entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Every response is compared with the answer of entry `"0"`.
    #[default]
    AnswerKey,
    /// Response `i` is compared with the answer of entry `"i"`.
    PerQuestion,
}

#[derive(Error, Debug)]
#[error("unknown scoring mode {0:?}, expected one of: answer-key, per-question")]
pub struct UnknownScoringMode(String);

impl FromStr for ScoringMode {
    type Err = UnknownScoringMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer-key" => Ok(Self::AnswerKey),
            "per-question" => Ok(Self::PerQuestion),
            other => Err(UnknownScoringMode(other.to_owned())),
        }
    }
}

impl Display for ScoringMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnswerKey => f.write_str("answer-key"),
            Self::PerQuestion => f.write_str("per-question"),
        }
    }
}

/// Result of one response of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionOutcome {
    /// Key of the entry the response was compared with
    pub compared_with: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Score {
    pub quiz_id: QuizId,
    /// Percentage, starting at 100. Not clamped and not rounded.
    pub score: f64,
    pub answered: usize,
    pub mismatches: usize,
    pub mode: ScoringMode,
    /// One outcome per response, in submission order
    #[serde(default)]
    pub outcomes: Vec<QuestionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
}
