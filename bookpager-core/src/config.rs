use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::book::{OverflowPolicy, PaginateOptions, DEFAULT_PAGE_SIZE};
use crate::error::ConfigError;

const DEFAULT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub book_path: Option<PathBuf>,
    pub page_size: usize,
    pub overflow: OverflowPolicy,
    /// Length of the page excerpt shown next to each bookmark.
    pub preview_chars: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            book_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            overflow: OverflowPolicy::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl PagerConfig {
    pub fn from_toml_str(input: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Checks the settings needed before the book can be built and returns
    /// the book path.
    pub fn validate(&self) -> Result<&Path, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        self.book_path.as_deref().ok_or(ConfigError::MissingBookPath)
    }

    pub fn paginate_options(&self) -> PaginateOptions {
        PaginateOptions::new(self.page_size).with_overflow(self.overflow)
    }
}
