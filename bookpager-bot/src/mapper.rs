use bookpager_core::Command;

/// An inbound request: a typed message or the data of a pressed button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Message(String),
    Callback(String),
}

impl Request {
    pub fn is_callback(&self) -> bool {
        matches!(self, Request::Callback(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    Command(Command),
    Help,
    EditBookmarks,
    Cancel,
    Unknown,
}

pub const FORWARD: &str = "forward";
pub const BACKWARD: &str = "backward";
pub const EDIT_BOOKMARKS: &str = "edit_bookmarks";
pub const CANCEL: &str = "cancel";
pub const DELETE_SUFFIX: &str = "del";

#[derive(Debug, Default)]
pub struct RequestMapper;

impl RequestMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, request: &Request) -> BotEvent {
        match request {
            Request::Message(text) => self.map_message(text.trim()),
            Request::Callback(data) => self.map_callback(data.trim()),
        }
    }

    fn map_message(&self, text: &str) -> BotEvent {
        match text {
            "/start" => BotEvent::Command(Command::Start),
            "/help" => BotEvent::Help,
            "/beginning" => BotEvent::Command(Command::Beginning),
            "/continue" => BotEvent::Command(Command::Continue),
            "/bookmarks" => BotEvent::Command(Command::ListBookmarks),
            _ => BotEvent::Unknown,
        }
    }

    fn map_callback(&self, data: &str) -> BotEvent {
        match data {
            FORWARD => return BotEvent::Command(Command::Advance),
            BACKWARD => return BotEvent::Command(Command::Retreat),
            EDIT_BOOKMARKS => return BotEvent::EditBookmarks,
            CANCEL => return BotEvent::Cancel,
            _ => {}
        }

        if let Some(page) = parse_page(data) {
            return BotEvent::Command(Command::OpenBookmark { page });
        }
        if let Some(page) = data.strip_suffix(DELETE_SUFFIX).and_then(parse_page) {
            return BotEvent::Command(Command::RemoveBookmark { page });
        }
        // The "{page}/{total}" label in the middle of the pagination row.
        if let Some((page, total)) = data.split_once('/') {
            if parse_page(page).is_some() && parse_page(total).is_some() {
                return BotEvent::Command(Command::BookmarkCurrent);
            }
        }
        BotEvent::Unknown
    }
}

/// Digits only; rejects signs, whitespace and numbers that overflow.
fn parse_page(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
