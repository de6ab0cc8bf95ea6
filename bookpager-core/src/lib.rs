mod book;
mod config;
mod error;
mod reader;
mod registry;
mod source;

pub use book::{
    is_boundary, Book, OverflowPolicy, Page, PageEnd, PaginateOptions, BOUNDARY_CHARS,
    DEFAULT_PAGE_SIZE,
};
pub use config::PagerConfig;
pub use error::{ConfigError, PaginateError, ReaderError};
pub use reader::{Affordances, Control, PageView, Reader};
pub use registry::{MemoryRegistry, UserId, UserRegistry, UserState};
pub use source::{FileTextSource, StaticTextSource, TextSource};

/// Requests a reader can make, independent of how they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register the user if this is their first visit.
    Start,
    /// Go back to page 1.
    Beginning,
    /// Show the page the user stopped on.
    Continue,
    Advance,
    Retreat,
    JumpTo { page: usize },
    /// Jump to a page picked from the bookmark list.
    OpenBookmark { page: usize },
    BookmarkCurrent,
    ListBookmarks,
    RemoveBookmark { page: usize },
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Ready(UserState),
    Page(PageView),
    Bookmarked { page: usize },
    Bookmarks(Vec<usize>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn end_to_end_reading_session() {
        let source = StaticTextSource::new("Hello, world. This is a test! Another sentence.");
        let book = Book::load_with(&source, &PaginateOptions::new(18))
            .await
            .unwrap();
        let reader = Reader::new(Arc::new(book), Arc::new(MemoryRegistry::new()));

        let state = reader.ensure_user(1001);
        assert_eq!(state.current_page, 1);
        assert!(state.bookmarks.is_empty());

        assert_eq!(reader.advance(1001).page, 2);
        reader.bookmark_current(1001);
        assert_eq!(reader.list_bookmarks(1001), vec![2]);
        assert!(reader.remove_bookmark(1001, 2).is_empty());
    }

    #[test]
    fn separate_readers_do_not_share_users() {
        let book = Arc::new(Book::build("One. Two. Three.", 5).unwrap());
        let first = Reader::new(Arc::clone(&book), Arc::new(MemoryRegistry::new()));
        let second = Reader::new(book, Arc::new(MemoryRegistry::new()));

        first.advance(1);
        assert_eq!(first.current_page(1).page, 2);
        assert_eq!(second.current_page(1).page, 1);
    }
}
