//! Fixed reply texts.

pub const START: &str = "Hello, reader!\n\nThis is a bot for reading a book page by page.\n\nSend /help to see what it can do.";
pub const HELP: &str = "/beginning - go to the start of the book\n/continue - continue where you left off\n/bookmarks - list your bookmarks\n/help - show this message\n\nTap the page number under a page to bookmark it.";
pub const BOOKMARKS: &str = "Your bookmarks:";
pub const EDIT_BOOKMARKS: &str = "Tap a bookmark to delete it:";
pub const NO_BOOKMARKS: &str = "You have no bookmarks yet.\n\nTap the page number under a page to add one.";
pub const BOOKMARK_ADDED: &str = "Page added to bookmarks";
pub const CANCELLED: &str = "Send /continue to keep reading";
pub const NO_SUCH_PAGE: &str = "There is no such page in this book.";
pub const UNKNOWN: &str = "Sorry, I don't understand that. Send /help for the list of commands.";

pub const BACKWARD_BUTTON: &str = "<<";
pub const FORWARD_BUTTON: &str = ">>";
pub const EDIT_BUTTON: &str = "❌ Edit";
pub const CANCEL_BUTTON: &str = "Cancel";
pub const DELETE_MARK: &str = "❌";
