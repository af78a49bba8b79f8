use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

const MAX_ID_LEN: usize = 64;

/// Key of the entry holding the canonical answer in [`crate::score::ScoringMode::AnswerKey`].
pub const ANSWER_KEY_ENTRY: &str = "0";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizIdError {
    #[error("quiz id is empty")]
    Empty,
    #[error("quiz id is longer than 64 characters")]
    TooLong,
    #[error("quiz id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a quiz. Only `[A-Za-z0-9_-]` is accepted because the id
/// becomes part of a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct QuizId(String);

impl QuizId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the json resource the quiz is stored in.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("quiz{}.json", self.0)
    }

    /// Reverse of [`QuizId::file_name`]. Returns `None` for files that are not quiz files.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let id = file_name.strip_prefix("quiz")?.strip_suffix(".json")?;
        id.parse().ok()
    }
}

impl TryFrom<String> for QuizId {
    type Error = QuizIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(QuizIdError::Empty);
        }
        if value.len() > MAX_ID_LEN {
            return Err(QuizIdError::TooLong);
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(QuizIdError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }
}

impl FromStr for QuizId {
    type Err = QuizIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<QuizId> for String {
    fn from(value: QuizId) -> Self {
        value.0
    }
}

impl Display for QuizId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quiz as stored on disk: a mapping from question index to question data.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub id: QuizId,
    pub entries: IndexMap<String, Value>,
}

impl Quiz {
    #[must_use]
    pub fn new(id: QuizId, entries: IndexMap<String, Value>) -> Self {
        Self { id, entries }
    }

    /// Parses the content of a quiz file. The top level value has to be an object.
    pub fn from_slice(id: QuizId, content: &[u8]) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_slice::<IndexMap<String, Value>>(content)?;
        Ok(Self::new(id, entries))
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// The value a response to the entry `key` is compared with.
    ///
    /// Entries shaped like `{"question": ..., "answer": ...}` are compared by their
    /// `answer` field, every other entry by its whole value.
    #[must_use]
    pub fn answer(&self, key: &str) -> Option<&Value> {
        let entry = self.entry(key)?;
        match entry {
            Value::Object(fields) => Some(fields.get("answer").unwrap_or(entry)),
            _ => Some(entry),
        }
    }

    /// `topic` field of an object entry.
    #[must_use]
    pub fn topic(&self, key: &str) -> Option<&str> {
        self.entry(key)?.get("topic")?.as_str()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
