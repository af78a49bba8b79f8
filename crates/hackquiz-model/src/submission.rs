use crate::quiz::QuizId;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Answers a user hands in when ending a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EndQuiz {
    pub id: QuizId,
    #[schema(value_type = Vec<Object>)]
    pub answers: Vec<Value>,
    #[serde(default)]
    pub session: Option<SessionId>,
}
