//! Request routing for the page reader: turns chat-style messages and button
//! presses into reader commands and lays out the replies. Transport-free.

mod dispatch;
mod keyboard;
mod mapper;
pub mod messages;

pub use dispatch::{Dispatcher, Reply};
pub use keyboard::{bookmarks_keyboard, edit_keyboard, pagination_keyboard, Button, Keyboard};
pub use mapper::{BotEvent, Request, RequestMapper};
