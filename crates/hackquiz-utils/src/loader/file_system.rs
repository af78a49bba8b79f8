use crate::loader::error::LoadingError;
use crate::loader::file::{File, FileMetadata};
use crate::loader::{Filter, LoaderTrait};
use async_stream::try_stream;
use async_walkdir::{DirEntry, Filtering, WalkDir};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

/// Loads files relative to a base directory. Every call hits the disk.
#[derive(Clone, Debug)]
pub struct FileSystemLoader {
    base_path: PathBuf,
}

impl FileSystemLoader {
    #[must_use]
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn sub_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return self.base_path.clone();
        }
        self.base_path.join(path)
    }
}

impl LoaderTrait for FileSystemLoader {
    fn list_dir<'a, P: AsRef<Path>>(
        &'a self,
        path: P,
        filter: Filter,
    ) -> Pin<Box<dyn Stream<Item = Result<FileMetadata, LoadingError>> + Send + 'a>> {
        let path = self.sub_path(path);
        tracing::trace!(?path, "Listing dir");
        let mut walker = WalkDir::new(path).filter(move |entry| apply_filter(entry, filter));
        let stream = try_stream! {
            while let Some(entry) = walker.next().await {
                let entry = entry?;
                let path = entry.path();
                let last_modified = get_last_modified(&path).await?;
                yield FileMetadata::new(path.to_string_lossy().into(), Some(last_modified));
            }
        };
        Box::pin(stream)
    }

    async fn load_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<File, LoadingError> {
        let path = self.sub_path(path);
        read_file(&path).await
    }

    async fn store_file<P: AsRef<Path> + Send>(&self, path: P, content: &[u8]) -> Result<(), LoadingError> {
        let path = self.sub_path(path);
        tracing::trace!(?path, "Storing file");
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(())
    }

    async fn get_file_metadata<P: AsRef<Path> + Send>(&self, path: P) -> Result<FileMetadata, LoadingError> {
        let path = self.sub_path(path);
        tracing::trace!(?path, "Loading file metadata");
        let last_modified = get_last_modified(&path).await?;
        Ok(FileMetadata::new(path.to_string_lossy().to_string(), Some(last_modified)))
    }
}

async fn read_file(path: &Path) -> Result<File, LoadingError> {
    tracing::trace!(?path, "Loading file");
    let data = fs::read(path).await?;
    let last_modified = get_last_modified(path).await?;
    let metadata = FileMetadata::new(path.to_string_lossy().into(), Some(last_modified));
    Ok(File::new(metadata, data))
}

async fn apply_filter(entry: DirEntry, filter: Filter) -> Filtering {
    let Ok(ft) = entry.file_type().await else {
        tracing::warn!(path = ?entry.path(), "could not get file type, skipping");
        return Filtering::Ignore;
    };
    if ft.is_dir() {
        return Filtering::IgnoreDir;
    }
    if !ft.is_file() {
        return Filtering::Ignore;
    }

    if filter.apply(entry.path()) {
        Filtering::Continue
    } else {
        Filtering::Ignore
    }
}

async fn get_last_modified<P: AsRef<Path>>(path: P) -> Result<DateTime<Utc>, LoadingError> {
    let modified = fs::metadata(path).await?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}
