use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::book::Book;
use crate::error::ReaderError;
use crate::registry::{UserId, UserRegistry, UserState};
use crate::{Command, Outcome};

/// Navigation controls that make sense on a given page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub can_retreat: bool,
    pub can_advance: bool,
    /// `"{page}/{page_count}"`
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    Retreat,
    Label(String),
    Advance,
}

impl Affordances {
    pub fn for_page(page: usize, page_count: usize) -> Self {
        Self {
            can_retreat: page > 1,
            can_advance: page < page_count,
            label: format!("{}/{}", page, page_count),
        }
    }

    /// Controls in display order: back, position, forward.
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = Vec::with_capacity(3);
        if self.can_retreat {
            controls.push(Control::Retreat);
        }
        controls.push(Control::Label(self.label.clone()));
        if self.can_advance {
            controls.push(Control::Advance);
        }
        controls
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: usize,
    pub page_count: usize,
    pub text: Arc<str>,
    pub affordances: Affordances,
}

/// Per-user navigation and bookmarks over a shared [`Book`].
pub struct Reader {
    book: Arc<Book>,
    registry: Arc<dyn UserRegistry>,
}

impl Reader {
    pub fn new(book: Arc<Book>, registry: Arc<dyn UserRegistry>) -> Self {
        Self { book, registry }
    }

    pub fn book(&self) -> &Arc<Book> {
        &self.book
    }

    pub fn page_count(&self) -> usize {
        self.book.page_count()
    }

    pub fn ensure_user(&self, user: UserId) -> UserState {
        self.registry.entry(user).lock().clone()
    }

    pub fn current_page(&self, user: UserId) -> PageView {
        let entry = self.registry.entry(user);
        let state = entry.lock();
        self.view(&state)
    }

    #[instrument(skip(self))]
    pub fn advance(&self, user: UserId) -> PageView {
        self.update(user, |state, page_count| {
            if state.current_page < page_count {
                state.current_page += 1;
            }
        })
    }

    #[instrument(skip(self))]
    pub fn retreat(&self, user: UserId) -> PageView {
        self.update(user, |state, _| {
            if state.current_page > 1 {
                state.current_page -= 1;
            }
        })
    }

    #[instrument(skip(self))]
    pub fn jump_to(&self, user: UserId, page: usize) -> Result<PageView, ReaderError> {
        if !self.book.contains(page) {
            debug!(page, "rejected jump");
            return Err(ReaderError::OutOfRange {
                page,
                page_count: self.page_count(),
            });
        }
        Ok(self.update(user, |state, _| state.current_page = page))
    }

    /// Sends the user back to the first page.
    pub fn restart(&self, user: UserId) -> PageView {
        self.update(user, |state, _| state.current_page = 1)
    }

    /// Opens a page picked from the bookmark list.
    pub fn open_bookmark(&self, user: UserId, page: usize) -> Result<PageView, ReaderError> {
        self.jump_to(user, page)
    }

    #[instrument(skip(self))]
    pub fn bookmark_current(&self, user: UserId) -> usize {
        let entry = self.registry.entry(user);
        let mut state = entry.lock();
        let page = state.current_page;
        state.bookmarks.insert(page);
        page
    }

    pub fn list_bookmarks(&self, user: UserId) -> Vec<usize> {
        let entry = self.registry.entry(user);
        let state = entry.lock();
        state.bookmarks.iter().copied().collect()
    }

    #[instrument(skip(self))]
    pub fn remove_bookmark(&self, user: UserId, page: usize) -> Vec<usize> {
        let entry = self.registry.entry(user);
        let mut state = entry.lock();
        state.bookmarks.remove(&page);
        state.bookmarks.iter().copied().collect()
    }

    pub fn apply(&self, user: UserId, command: Command) -> Result<Outcome, ReaderError> {
        let outcome = match command {
            Command::Start => Outcome::Ready(self.ensure_user(user)),
            Command::Beginning => Outcome::Page(self.restart(user)),
            Command::Continue => Outcome::Page(self.current_page(user)),
            Command::Advance => Outcome::Page(self.advance(user)),
            Command::Retreat => Outcome::Page(self.retreat(user)),
            Command::JumpTo { page } => Outcome::Page(self.jump_to(user, page)?),
            Command::OpenBookmark { page } => Outcome::Page(self.open_bookmark(user, page)?),
            Command::BookmarkCurrent => Outcome::Bookmarked {
                page: self.bookmark_current(user),
            },
            Command::ListBookmarks => Outcome::Bookmarks(self.list_bookmarks(user)),
            Command::RemoveBookmark { page } => {
                Outcome::Bookmarks(self.remove_bookmark(user, page))
            }
        };
        Ok(outcome)
    }

    /// Runs `change` under the user's lock and renders the resulting page.
    fn update<F>(&self, user: UserId, change: F) -> PageView
    where
        F: FnOnce(&mut UserState, usize),
    {
        let entry = self.registry.entry(user);
        let mut state = entry.lock();
        change(&mut *state, self.page_count());
        self.view(&state)
    }

    fn view(&self, state: &UserState) -> PageView {
        let page_count = self.page_count();
        // Entries only ever hold validated pages, the clamp guards foreign registries.
        let page = state.current_page.clamp(1, page_count);
        let text = self
            .book
            .text(page)
            .cloned()
            .unwrap_or_else(|| Arc::from(""));
        PageView {
            page,
            page_count,
            text,
            affordances: Affordances::for_page(page, page_count),
        }
    }
}
