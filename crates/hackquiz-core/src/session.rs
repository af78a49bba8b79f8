use crate::session::error::SessionError;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use hackquiz_model::analytics::AnswerRecord;
use hackquiz_model::quiz::QuizId;
use hackquiz_model::session::{SessionId, SessionMarker};
use hackquiz_utils::loader::LoaderTrait;
use hackquiz_utils::loader::error::LoadingError;
use hackquiz_utils::loader::file_system::FileSystemLoader;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub mod error;

pub const DEFAULT_SESSION_TTL: TimeDelta = TimeDelta::hours(2);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Single file holding the start time of the most recent quiz, as seconds since
/// the unix epoch. Every start overwrites it.
#[derive(Debug, Clone)]
pub struct MarkerFile {
    loader: FileSystemLoader,
    file_name: PathBuf,
}

impl MarkerFile {
    pub fn new(path: &Path) -> Result<Self, SessionError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| LoadingError::InvalidPath(path.to_path_buf()))?;
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self {
            loader: FileSystemLoader::new(directory),
            file_name: PathBuf::from(file_name),
        })
    }

    async fn write(&self, marker: &SessionMarker) -> Result<(), SessionError> {
        let content = marker.epoch_seconds().to_string();
        self.loader.store_file(&self.file_name, content.as_bytes()).await?;
        Ok(())
    }
}

/// A running quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub marker: SessionMarker,
    /// Latest answer per question, in the order the questions were first answered.
    pub answers: IndexMap<String, AnswerRecord>,
}

impl SessionState {
    fn new(marker: SessionMarker) -> Self {
        Self {
            marker,
            answers: IndexMap::new(),
        }
    }

    /// Time of the latest answer, or the start if nothing was answered yet.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.answers
            .values()
            .map(|record| record.answered_at)
            .max()
            .map_or(self.marker.started_at, |answered_at| answered_at.max(self.marker.started_at))
    }
}

/// Running quiz sessions, one slot per session.
///
/// Restarting a session replaces its slot, the last write wins. Sessions older
/// than the ttl are dropped on the next start. When `max_sessions` is reached
/// the oldest session makes room for a new one.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionState>,
    marker_file: Option<MarkerFile>,
    ttl: TimeDelta,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(marker_file: Option<MarkerFile>) -> Self {
        Self {
            sessions: DashMap::new(),
            marker_file,
            ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub async fn start(
        &self,
        session_id: Option<SessionId>,
        quiz_id: Option<QuizId>,
    ) -> Result<SessionMarker, SessionError> {
        self.start_at(session_id, quiz_id, Utc::now()).await
    }

    pub async fn start_at(
        &self,
        session_id: Option<SessionId>,
        quiz_id: Option<QuizId>,
        now: DateTime<Utc>,
    ) -> Result<SessionMarker, SessionError> {
        let marker = SessionMarker {
            session_id: session_id.unwrap_or_default(),
            quiz_id,
            started_at: now,
        };
        if let Some(marker_file) = &self.marker_file {
            marker_file.write(&marker).await?;
        }

        self.prune(now);
        if !self.sessions.contains_key(&marker.session_id) {
            self.make_room();
        }
        let previous = self.sessions.insert(marker.session_id, SessionState::new(marker.clone()));
        tracing::info!(
            session = %marker.session_id,
            quiz = ?marker.quiz_id,
            restarted = previous.is_some(),
            "quiz started"
        );
        Ok(marker)
    }

    /// Starts a known session again, dropping its answers.
    pub async fn reset(&self, session_id: &SessionId) -> Result<SessionMarker, SessionError> {
        self.reset_at(session_id, Utc::now()).await
    }

    pub async fn reset_at(&self, session_id: &SessionId, now: DateTime<Utc>) -> Result<SessionMarker, SessionError> {
        let marker = self.get(session_id).ok_or(SessionError::UnknownSession(*session_id))?;
        self.start_at(Some(*session_id), marker.quiz_id, now).await
    }

    #[must_use]
    pub fn get(&self, session_id: &SessionId) -> Option<SessionMarker> {
        self.sessions.get(session_id).map(|entry| entry.marker.clone())
    }

    #[must_use]
    pub fn state(&self, session_id: &SessionId) -> Option<SessionState> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Stores an answer, replacing an earlier answer to the same question.
    pub fn record_answer(&self, session_id: &SessionId, record: AnswerRecord) -> Result<(), SessionError> {
        let mut state = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSession(*session_id))?;
        tracing::debug!(
            session = %session_id,
            question = %record.question,
            correct = record.correct,
            "answer recorded"
        );
        state.answers.insert(record.question.clone(), record);
        Ok(())
    }

    /// Removes the session and returns its marker.
    pub fn finish(&self, session_id: &SessionId) -> Option<SessionMarker> {
        self.sessions.remove(session_id).map(|(_, state)| state.marker)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn prune(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, state| now - state.marker.started_at < self.ttl);
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            tracing::debug!(pruned, "dropped expired sessions");
        }
    }

    fn make_room(&self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.marker.started_at)
                .map(|entry| *entry.key());
            let Some(oldest) = oldest else {
                return;
            };
            self.sessions.remove(&oldest);
            tracing::warn!(
                session = %oldest,
                max_sessions = self.max_sessions,
                "too many sessions, dropped the oldest"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_log::test;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn record(question: &str, correct: bool, answered_at: DateTime<Utc>) -> AnswerRecord {
        AnswerRecord {
            question: question.to_owned(),
            answer: json!("a"),
            correct,
            topic: None,
            time_spent_seconds: 1.0,
            answered_at,
        }
    }

    #[test(tokio::test)]
    async fn test_restart_keeps_last_write() {
        let store = SessionStore::default();
        let first = store.start_at(None, None, at(100)).await.unwrap();
        let second = store
            .start_at(Some(first.session_id), Some("1".parse().unwrap()), at(200))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&first.session_id), Some(second));
        assert_eq!(store.get(&first.session_id).unwrap().started_at, at(200));
    }

    #[test(tokio::test)]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        let first = store.start_at(None, None, at(100)).await.unwrap();
        let second = store.start_at(None, None, at(200)).await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(store.get(&first.session_id).unwrap().started_at, at(100));
        assert_eq!(store.finish(&first.session_id), Some(first.clone()));
        assert_eq!(store.finish(&first.session_id), None);
        assert_eq!(store.len(), 1);
    }

    #[test(tokio::test)]
    async fn test_marker_file_overwritten() {
        let dir = TempDir::with_prefix("session-marker").unwrap();
        let path = dir.path().join("session.txt");
        let store = SessionStore::new(Some(MarkerFile::new(&path).unwrap()));

        store.start_at(None, None, at(1_700_000_000)).await.unwrap();
        store.start_at(None, None, at(1_700_000_005)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.parse::<f64>().unwrap(), 1_700_000_005.0);
    }

    #[test]
    fn test_marker_file_needs_file_name() {
        assert!(MarkerFile::new(Path::new("/")).is_err());
        assert!(MarkerFile::new(Path::new("session.txt")).is_ok());
    }

    #[test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn test_concurrent_starts() {
        let store = Arc::new(SessionStore::default());
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.start(None, None).await.unwrap() })
            })
            .collect();
        for handle in handles {
            let marker = handle.await.unwrap();
            assert!(store.get(&marker.session_id).is_some());
        }
        assert_eq!(store.len(), 32);
    }

    #[test(tokio::test)]
    async fn test_expired_sessions_are_dropped_on_start() {
        let store = SessionStore::default().with_ttl(TimeDelta::seconds(60));
        let old = store.start_at(None, None, at(0)).await.unwrap();
        let recent = store.start_at(None, None, at(30)).await.unwrap();
        assert_eq!(store.len(), 2);

        store.start_at(None, None, at(70)).await.unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(&old.session_id).is_none());
        assert!(store.get(&recent.session_id).is_some());
    }

    #[test(tokio::test)]
    async fn test_anonymous_starts_are_bounded() {
        let store = SessionStore::default().with_max_sessions(3);
        let first = store.start_at(None, None, at(0)).await.unwrap();
        for second in 1..1000 {
            store.start_at(None, None, at(second)).await.unwrap();
        }
        assert_eq!(store.len(), 3);
        assert!(store.get(&first.session_id).is_none());

        let newest = store.start_at(None, None, at(1000)).await.unwrap();
        store.start_at(Some(newest.session_id), None, at(1001)).await.unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test(tokio::test)]
    async fn test_record_answer_and_reset() {
        let store = SessionStore::default();
        let marker = store.start_at(None, Some("1".parse().unwrap()), at(100)).await.unwrap();

        store.record_answer(&marker.session_id, record("0", false, at(110))).unwrap();
        store.record_answer(&marker.session_id, record("1", true, at(120))).unwrap();
        store.record_answer(&marker.session_id, record("0", true, at(130))).unwrap();

        let state = store.state(&marker.session_id).unwrap();
        assert_eq!(state.answers.keys().collect::<Vec<_>>(), ["0", "1"]);
        assert!(state.answers["0"].correct);
        assert_eq!(state.last_activity(), at(130));

        let restarted = store.reset_at(&marker.session_id, at(200)).await.unwrap();
        assert_eq!(restarted.quiz_id, marker.quiz_id);
        let state = store.state(&marker.session_id).unwrap();
        assert!(state.answers.is_empty());
        assert_eq!(state.last_activity(), at(200));
    }

    #[test(tokio::test)]
    async fn test_unknown_session() {
        let store = SessionStore::default();
        let unknown = SessionId::new();
        assert!(matches!(
            store.record_answer(&unknown, record("0", true, at(0))),
            Err(SessionError::UnknownSession(id)) if id == unknown
        ));
        assert!(matches!(
            store.reset(&unknown).await,
            Err(SessionError::UnknownSession(_))
        ));
    }
}
