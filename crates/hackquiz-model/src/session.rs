use crate::quiz::QuizId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Start of a quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionMarker {
    pub session_id: SessionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<QuizId>,
    pub started_at: DateTime<Utc>,
}

impl SessionMarker {
    /// Start time as fractional seconds since the unix epoch.
    #[must_use]
    pub fn epoch_seconds(&self) -> f64 {
        self.started_at.timestamp_micros() as f64 / 1_000_000.0
    }

    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        (now - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_marker_times() {
        let started_at = Utc.timestamp_opt(1_700_000_000, 250_000_000).unwrap();
        let marker = SessionMarker {
            session_id: SessionId::new(),
            quiz_id: None,
            started_at,
        };
        assert!((marker.epoch_seconds() - 1_700_000_000.25).abs() < f64::EPSILON);
        let now = Utc.timestamp_opt(1_700_000_090, 750_000_000).unwrap();
        assert!((marker.elapsed_seconds(now) - 90.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_id_roundtrip_text() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
