use crate::error::{CommonError, CommonResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Handle to the persisted text of one document
#[async_trait]
pub trait StorageHandle: Send + Sync {
    /// Human-readable location, used in logs
    fn name(&self) -> String;

    async fn read(&self) -> CommonResult<String>;

    /// Open a sink that replaces the stored text once closed
    async fn create_writable(&self) -> CommonResult<Box<dyn WritableSink>>;
}

#[async_trait]
pub trait WritableSink: Send {
    async fn write(&mut self, text: &str) -> CommonResult<()>;

    /// Commit everything written so far
    async fn close(self: Box<Self>) -> CommonResult<()>;
}

/// File on disk. Writes go to a sibling temp file that replaces the target on close.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".inspect-tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StorageHandle for FileStorage {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> CommonResult<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    async fn create_writable(&self) -> CommonResult<Box<dyn WritableSink>> {
        let temp = self.temp_path();
        let file = tokio::fs::File::create(&temp).await?;
        debug!(path = %temp.display(), "opened temp file for writing");
        Ok(Box::new(FileSink {
            file: Some(file),
            temp,
            target: self.path.clone(),
        }))
    }
}

struct FileSink {
    /// Released after a failed write
    file: Option<tokio::fs::File>,
    temp: PathBuf,
    target: PathBuf,
}

impl FileSink {
    async fn discard(&mut self) {
        self.file = None;
        if let Err(err) = tokio::fs::remove_file(&self.temp).await {
            debug!(path = %self.temp.display(), error = %err, "failed to remove temp file");
        }
    }
}

#[async_trait]
impl WritableSink for FileSink {
    async fn write(&mut self, text: &str) -> CommonResult<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CommonError::Closed(self.target.display().to_string()))?;
        let written = file.write_all(text.as_bytes()).await;
        if let Err(err) = written {
            self.discard().await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> CommonResult<()> {
        let Some(mut file) = self.file.take() else {
            return Err(CommonError::Closed(self.target.display().to_string()));
        };
        let flushed = file.flush().await;
        drop(file);
        if let Err(err) = flushed {
            self.discard().await;
            return Err(err.into());
        }
        tokio::fs::rename(&self.temp, &self.target).await?;
        Ok(())
    }
}

/// In-memory text, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    name: String,
    contents: Arc<Mutex<String>>,
}

impl MemoryStorage {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Arc::new(Mutex::new(contents.into())),
        }
    }

    pub async fn contents(&self) -> String {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl StorageHandle for MemoryStorage {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn read(&self) -> CommonResult<String> {
        Ok(self.contents().await)
    }

    async fn create_writable(&self) -> CommonResult<Box<dyn WritableSink>> {
        Ok(Box::new(MemorySink {
            buffer: String::new(),
            target: Arc::clone(&self.contents),
        }))
    }
}

struct MemorySink {
    buffer: String,
    target: Arc<Mutex<String>>,
}

#[async_trait]
impl WritableSink for MemorySink {
    async fn write(&mut self, text: &str) -> CommonResult<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    async fn close(self: Box<Self>) -> CommonResult<()> {
        let MemorySink { buffer, target } = *self;
        *target.lock().await = buffer;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_replaces_on_close() {
        let storage = MemoryStorage::new("mem.tsx", "old");
        let mut sink = storage.create_writable().await.unwrap();
        sink.write("new ").await.unwrap();
        sink.write("text").await.unwrap();
        assert_eq!(storage.read().await.unwrap(), "old");

        sink.close().await.unwrap();
        assert_eq!(storage.read().await.unwrap(), "new text");
    }

    #[tokio::test]
    async fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App.tsx");
        tokio::fs::write(&path, "before").await.unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.read().await.unwrap(), "before");

        let mut sink = storage.create_writable().await.unwrap();
        sink.write("after").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "before");
        sink.close().await.unwrap();

        assert_eq!(storage.read().await.unwrap(), "after");
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.tsx"));
        assert!(matches!(storage.read().await, Err(CommonError::Io(_))));
    }
}
