use bookpager_core::{Affordances, Book, Control};
use serde::Serialize;

use crate::mapper::{BACKWARD, CANCEL, DELETE_SUFFIX, EDIT_BOOKMARKS, FORWARD};
use crate::messages;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    /// Sent back as [`Request::Callback`](crate::Request::Callback) when pressed.
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// One row: `<<`, the page label and `>>`, each only where it applies.
pub fn pagination_keyboard(affordances: &Affordances) -> Keyboard {
    let row = affordances
        .controls()
        .into_iter()
        .map(|control| match control {
            Control::Retreat => Button::new(messages::BACKWARD_BUTTON, BACKWARD),
            Control::Label(label) => Button::new(label.clone(), label),
            Control::Advance => Button::new(messages::FORWARD_BUTTON, FORWARD),
        })
        .collect();
    Keyboard { rows: vec![row] }
}

pub fn bookmarks_keyboard(book: &Book, pages: &[usize], preview_chars: usize) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = sorted(pages)
        .into_iter()
        .map(|page| {
            let text = format!("{} - {}", page, excerpt(book, page, preview_chars));
            vec![Button::new(text, page.to_string())]
        })
        .collect();
    rows.push(vec![
        Button::new(messages::EDIT_BUTTON, EDIT_BOOKMARKS),
        Button::new(messages::CANCEL_BUTTON, CANCEL),
    ]);
    Keyboard { rows }
}

pub fn edit_keyboard(book: &Book, pages: &[usize], preview_chars: usize) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = sorted(pages)
        .into_iter()
        .map(|page| {
            let text = format!(
                "{} {} - {}",
                messages::DELETE_MARK,
                page,
                excerpt(book, page, preview_chars)
            );
            vec![Button::new(text, format!("{}{}", page, DELETE_SUFFIX))]
        })
        .collect();
    rows.push(vec![Button::new(messages::CANCEL_BUTTON, CANCEL)]);
    Keyboard { rows }
}

fn sorted(pages: &[usize]) -> Vec<usize> {
    let mut pages = pages.to_vec();
    pages.sort_unstable();
    pages.dedup();
    pages
}

fn excerpt(book: &Book, page: usize, preview_chars: usize) -> String {
    book.preview(page, preview_chars).unwrap_or_default()
}
