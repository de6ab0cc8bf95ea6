use std::sync::Arc;

use anyhow::Result;
use bookpager_core::{Command, Outcome, PageView, Reader, ReaderError, UserId};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::keyboard::{bookmarks_keyboard, edit_keyboard, pagination_keyboard, Keyboard};
use crate::mapper::{BotEvent, Request, RequestMapper};
use crate::messages;

/// What the transport should do in response to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reply {
    /// Post a new message.
    Send {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Replace the message whose button was pressed.
    Edit {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Short acknowledgement without touching any message.
    Notice { text: String },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Send { text, .. } | Reply::Edit { text, .. } | Reply::Notice { text } => text,
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Reply::Send { keyboard, .. } | Reply::Edit { keyboard, .. } => keyboard.as_ref(),
            Reply::Notice { .. } => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Routes requests to a shared [`Reader`] and lays out the answers.
pub struct Dispatcher {
    reader: Arc<Reader>,
    mapper: RequestMapper,
    preview_chars: usize,
}

impl Dispatcher {
    pub fn new(reader: Arc<Reader>, preview_chars: usize) -> Self {
        Self {
            reader,
            mapper: RequestMapper::new(),
            preview_chars,
        }
    }

    pub fn reader(&self) -> &Arc<Reader> {
        &self.reader
    }

    #[instrument(skip(self))]
    pub fn handle(&self, user: UserId, request: &Request) -> Reply {
        let event = self.mapper.map(request);
        debug!(?event, "mapped request");
        // Button presses update the message they belong to.
        let edit = request.is_callback();

        match event {
            BotEvent::Command(command) => self.run(user, command, edit),
            BotEvent::Help => send(messages::HELP, None),
            BotEvent::EditBookmarks => {
                let pages = self.reader.list_bookmarks(user);
                self.edit_menu(&pages)
            }
            BotEvent::Cancel => Reply::Edit {
                text: messages::CANCELLED.to_string(),
                keyboard: None,
            },
            BotEvent::Unknown => send(messages::UNKNOWN, None),
        }
    }

    fn run(&self, user: UserId, command: Command, edit: bool) -> Reply {
        let removing = matches!(command, Command::RemoveBookmark { .. });
        match self.reader.apply(user, command) {
            Ok(Outcome::Ready(_)) => send(messages::START, None),
            Ok(Outcome::Page(view)) => self.page(view, edit),
            Ok(Outcome::Bookmarked { .. }) => Reply::Notice {
                text: messages::BOOKMARK_ADDED.to_string(),
            },
            Ok(Outcome::Bookmarks(pages)) if removing => self.edit_menu(&pages),
            Ok(Outcome::Bookmarks(pages)) => {
                if pages.is_empty() {
                    send(messages::NO_BOOKMARKS, None)
                } else {
                    let keyboard =
                        bookmarks_keyboard(self.reader.book(), &pages, self.preview_chars);
                    send(messages::BOOKMARKS, Some(keyboard))
                }
            }
            Err(ReaderError::OutOfRange { page, page_count }) => {
                debug!(page, page_count, "request for missing page");
                send(messages::NO_SUCH_PAGE, None)
            }
        }
    }

    fn page(&self, view: PageView, edit: bool) -> Reply {
        let text = view.text.to_string();
        let keyboard = Some(pagination_keyboard(&view.affordances));
        if edit {
            Reply::Edit { text, keyboard }
        } else {
            Reply::Send { text, keyboard }
        }
    }

    fn edit_menu(&self, pages: &[usize]) -> Reply {
        if pages.is_empty() {
            return Reply::Edit {
                text: messages::NO_BOOKMARKS.to_string(),
                keyboard: None,
            };
        }
        Reply::Edit {
            text: messages::EDIT_BOOKMARKS.to_string(),
            keyboard: Some(edit_keyboard(self.reader.book(), pages, self.preview_chars)),
        }
    }
}

fn send(text: &str, keyboard: Option<Keyboard>) -> Reply {
    Reply::Send {
        text: text.to_string(),
        keyboard,
    }
}
