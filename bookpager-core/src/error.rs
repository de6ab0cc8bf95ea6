use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a source text into a [`Book`](crate::Book).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginateError {
    #[error("page size must be a positive number of characters")]
    InvalidPageSize,
    #[error("source document contains no readable text")]
    EmptyDocument,
    #[error("no page boundary found within one page of offset {offset}")]
    UnboundedScan { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("page {page} is out of range (book has {page_count} pages)")]
    OutOfRange { page: usize, page_count: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no book path configured")]
    MissingBookPath,
    #[error("page_size must be greater than zero")]
    InvalidPageSize,
}
