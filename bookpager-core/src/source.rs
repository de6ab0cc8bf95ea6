use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Where the book text comes from. Read once, before the first request.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn read_text(&self) -> Result<String>;
}

/// A UTF-8 text file on disk.
#[derive(Debug, Clone)]
pub struct FileTextSource {
    path: PathBuf,
}

impl FileTextSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TextSource for FileTextSource {
    async fn read_text(&self) -> Result<String> {
        debug!(path = ?self.path, "reading book");
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read book {:?}", self.path))?;
        String::from_utf8(bytes).with_context(|| format!("book {:?} is not valid UTF-8", self.path))
    }
}

#[derive(Debug, Clone)]
pub struct StaticTextSource {
    text: String,
}

impl StaticTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextSource for StaticTextSource {
    async fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}
