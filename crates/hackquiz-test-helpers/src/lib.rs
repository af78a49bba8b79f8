use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizDirError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Temporary quiz directory, removed when dropped.
pub struct QuizDir {
    temp_dir: TempDir,
}

impl QuizDir {
    pub fn new() -> Result<Self, QuizDirError> {
        let temp_dir = TempDir::with_prefix("test-quiz-dir")?;
        tracing::info!(path = ?temp_dir.path(), "created quiz dir");
        Ok(Self { temp_dir })
    }

    pub fn with_quiz(self, id: &str, content: &Value) -> Result<Self, QuizDirError> {
        self.write_quiz(id, content)?;
        Ok(self)
    }

    /// Writes `quiz<id>.json`, replacing an existing file.
    pub fn write_quiz(&self, id: &str, content: &Value) -> Result<(), QuizDirError> {
        let content = serde_json::to_vec_pretty(content)?;
        self.write_raw(&format!("quiz{id}.json"), &content)
    }

    /// Writes a file relative to the quiz dir, creating missing parent directories.
    pub fn write_raw(&self, file_name: &str, content: &[u8]) -> Result<(), QuizDirError> {
        let path = self.temp_dir.path().join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
