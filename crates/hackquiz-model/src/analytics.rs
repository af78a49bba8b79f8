use crate::quiz::QuizId;
use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

/// Answer to a single question, sent while a quiz is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordAnswer {
    /// Key of the answered question
    pub question: String,
    #[schema(value_type = Object)]
    pub answer: Value,
    /// Time spent on the question. Measured since the previous answer if not set
    #[serde(default)]
    pub time_spent_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerRecord {
    pub question: String,
    #[schema(value_type = Object)]
    pub answer: Value,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub time_spent_seconds: f64,
    pub answered_at: DateTime<Utc>,
}

/// Order of [`SessionAnalytics::topics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TopicSort {
    /// Slowest average time first
    #[default]
    Time,
    /// Lowest accuracy first
    Accuracy,
    /// Most answered questions first
    Count,
}

impl Display for TopicSort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time => f.write_str("time"),
            Self::Accuracy => f.write_str("accuracy"),
            Self::Count => f.write_str("count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopicPerformance {
    pub topic: String,
    pub answered: usize,
    pub correct: usize,
    /// Percentage of correct answers
    pub accuracy: f64,
    pub total_time_seconds: f64,
    pub average_time_seconds: f64,
}

/// Performance of one running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionAnalytics {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<QuizId>,
    pub started_at: DateTime<Utc>,
    pub answered: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub total_time_seconds: f64,
    pub average_time_seconds: f64,
    pub sort: TopicSort,
    pub topics: Vec<TopicPerformance>,
    /// Topics with low accuracy or slow answers
    pub weak_topics: Vec<String>,
    /// Topics answered accurately and fast
    pub strong_topics: Vec<String>,
    pub answers: Vec<AnswerRecord>,
}
