use crate::loader::error::LoadingError;
use crate::loader::file::{File, FileMetadata};
use futures::Stream;
use std::path::Path;
use std::pin::Pin;

pub mod error;
pub mod file;
pub mod file_system;

#[derive(Debug, Clone, Copy, Default)]
pub enum Filter {
    Json,
    #[default]
    Any,
}

impl Filter {
    pub fn apply<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str());
        let Some(extension) = extension else {
            return false;
        };
        let allowed_extensions: &[&str] = match self {
            Filter::Json => &["json"],
            Filter::Any => return true,
        };
        allowed_extensions.contains(&extension)
    }
}

pub trait LoaderTrait {
    /// Metadata of the files directly inside `path`. Subdirectories are skipped
    /// and file contents are not read.
    fn list_dir<'a, P: AsRef<Path>>(
        &'a self,
        path: P,
        filter: Filter,
    ) -> Pin<Box<dyn Stream<Item = Result<FileMetadata, LoadingError>> + Send + 'a>>;

    fn load_file<P: AsRef<Path> + Send>(&self, path: P) -> impl Future<Output = Result<File, LoadingError>> + Send;

    fn store_file<P: AsRef<Path> + Send>(
        &self,
        path: P,
        content: &[u8],
    ) -> impl Future<Output = Result<(), LoadingError>> + Send;

    fn get_file_metadata<P: AsRef<Path> + Send>(
        &self,
        path: P,
    ) -> impl Future<Output = Result<FileMetadata, LoadingError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter() {
        assert!(Filter::Json.apply("static/quiz/quiz1.json"));
        assert!(!Filter::Json.apply("static/quiz/quiz1.yaml"));
        assert!(!Filter::Json.apply("static/quiz/README"));
        assert!(Filter::Any.apply("anything.bin"));
        assert!(!Filter::Any.apply("no_extension"));
    }
}
