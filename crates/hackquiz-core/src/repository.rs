use crate::repository::error::RepositoryError;
use async_trait::async_trait;
use futures::StreamExt;
use hackquiz_model::quiz::{Quiz, QuizId};
use hackquiz_utils::loader::file_system::FileSystemLoader;
use hackquiz_utils::loader::{Filter, LoaderTrait};
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::instrument;

pub mod error;

/// Source of quiz definitions.
#[async_trait]
pub trait QuizRepository: Send + Sync + Debug {
    async fn get(&self, id: &QuizId) -> Result<Quiz, RepositoryError>;

    /// Ids of all stored quizzes, sorted. Only quizzes that [`QuizRepository::get`]
    /// can load are listed.
    async fn list(&self) -> Result<Vec<QuizId>, RepositoryError>;

    /// Checks that the underlying storage is reachable.
    async fn health(&self) -> Result<(), RepositoryError>;
}

/// Reads `quiz<id>.json` files through a loader. Nothing is cached, so edits on
/// disk are visible to the next request.
#[derive(Debug, Clone)]
pub struct FileQuizRepository<L = FileSystemLoader> {
    loader: L,
}

impl FileQuizRepository<FileSystemLoader> {
    #[must_use]
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSystemLoader::new(path.into()))
    }
}

impl<L> FileQuizRepository<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl<L> QuizRepository for FileQuizRepository<L>
where
    L: LoaderTrait + Debug + Send + Sync,
{
    #[instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &QuizId) -> Result<Quiz, RepositoryError> {
        let file = self.loader.load_file(id.file_name()).await.map_err(|error| {
            if error.is_not_found() {
                RepositoryError::NotFound(id.clone())
            } else {
                RepositoryError::Loading(error)
            }
        })?;
        let quiz = Quiz::from_slice(id.clone(), &file.content).map_err(|source| RepositoryError::Parse {
            id: id.clone(),
            source,
        })?;
        tracing::debug!(entries = quiz.len(), "loaded quiz");
        Ok(quiz)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<QuizId>, RepositoryError> {
        match self.loader.get_file_metadata("").await {
            Err(error) if error.is_not_found() => {
                tracing::warn!("quiz directory does not exist");
                return Ok(Vec::new());
            }
            result => result?,
        };

        let mut ids = Vec::new();
        let mut stream = self.loader.list_dir("", Filter::Json);
        while let Some(metadata) = stream.next().await {
            let metadata = metadata?;
            match metadata.file_name().and_then(QuizId::from_file_name) {
                Some(id) => ids.push(id),
                None => tracing::trace!(key = %metadata.key, "ignoring non quiz file"),
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn health(&self) -> Result<(), RepositoryError> {
        self.loader.get_file_metadata("").await?;
        Ok(())
    }
}
