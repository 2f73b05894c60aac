use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid stored file name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A stored upload as seen on disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub file_count: usize,
    pub total_bytes: u64,
}

/// Flat directory of uploaded place files, keyed by stored name.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(FileStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Stored names are generated ids plus an extension; anything that
    // could escape the root is refused outright.
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    pub async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.resolve(name)?;

        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            "Stored uploaded file"
        );
        Ok(path)
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        fs::remove_file(&path).await?;
        tracing::info!(path = %path.display(), "Deleted stored file");
        Ok(())
    }

    /// Enumerate the stored files with size and modification time.
    pub async fn list(&self) -> Result<Vec<StoredFile>, StoreError> {
        let mut out = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            out.push(StoredFile {
                name,
                size: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        Ok(out)
    }

    pub async fn stats(&self) -> Result<StoreStats, StoreError> {
        let files = self.list().await?;
        Ok(StoreStats {
            file_count: files.len(),
            total_bytes: files.iter().map(|f| f.size).sum(),
        })
    }

    /// Delete every stored file older than `max_age` and return what was
    /// removed. Files that vanish mid-sweep are skipped with a warning.
    pub async fn remove_older_than(
        &self,
        max_age: Duration,
    ) -> Result<Vec<StoredFile>, StoreError> {
        let now = SystemTime::now();
        let mut removed = Vec::new();
        for file in self.list().await? {
            let age = now
                .duration_since(file.modified)
                .unwrap_or(Duration::ZERO);
            if age < max_age {
                continue;
            }
            match self.remove(&file.name).await {
                Ok(()) => removed.push(file),
                Err(e) => {
                    tracing::warn!("Failed to delete {}: {}", file.name, e);
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_then_exists_and_stats() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.save("abc123.rbxl", b"<roblox!").await.unwrap();
        store.save("def456.rbxlx", b"<roblox></roblox>").await.unwrap();

        assert!(store.exists("abc123.rbxl").await);
        assert!(!store.exists("missing.rbxl").await);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 8 + 17);
    }

    #[tokio::test]
    async fn remove_deletes_the_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.save("abc123.rbxl", b"data").await.unwrap();
        store.remove("abc123.rbxl").await.unwrap();
        assert!(!store.exists("abc123.rbxl").await);
    }

    #[tokio::test]
    async fn traversal_names_are_refused() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let err = store.save("../escape.rbxl", b"data").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        let err = store.remove("a/b.rbxl").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(!store.exists("..").await);
    }

    #[tokio::test]
    async fn remove_older_than_spares_young_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.save("young.rbxl", b"data").await.unwrap();
        let removed = store
            .remove_older_than(Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(removed.is_empty());
        assert!(store.exists("young.rbxl").await);
    }

    #[tokio::test]
    async fn remove_older_than_zero_sweeps_everything() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.save("one.rbxl", b"a").await.unwrap();
        store.save("two.rbxlx", b"bb").await.unwrap();

        let removed = store.remove_older_than(Duration::ZERO).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(store.stats().await.unwrap().file_count, 0);
    }
}
