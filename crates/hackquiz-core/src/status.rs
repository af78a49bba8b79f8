use crate::repository::QuizRepository;
use hackquiz_model::status::ComponentStatus;
use std::error::Error;
use std::time::Duration;
use tokio::time::timeout;
use tracing::instrument;

#[instrument(skip_all)]
pub async fn get_repository_status(repository: &dyn QuizRepository, duration: Option<Duration>) -> ComponentStatus {
    match timeout(duration.unwrap_or_else(|| Duration::from_secs(5)), repository.health()).await {
        Ok(Ok(())) => ComponentStatus::ok(),
        Ok(Err(error)) => {
            tracing::error!(error = &error as &dyn Error, "quiz storage is not reachable");
            ComponentStatus::from_error_text("quiz storage is not reachable")
        }
        Err(error) => {
            tracing::error!(error = &error as &dyn Error, "quiz storage health check timed out");
            ComponentStatus::from_error_text("quiz storage health check timed out")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FileQuizRepository;
    use hackquiz_test_helpers::QuizDir;

    #[tokio::test]
    async fn test_repository_status() {
        let dir = QuizDir::new().unwrap();
        let ok = FileQuizRepository::from_dir(dir.path());
        let missing = FileQuizRepository::from_dir(dir.path().join("missing"));

        assert!(get_repository_status(&ok, None).await.is_ok());
        assert!(!get_repository_status(&missing, None).await.is_ok());
    }
}
