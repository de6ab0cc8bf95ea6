use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PaginateError;
use crate::source::TextSource;

/// Characters a page is allowed to end on.
pub const BOUNDARY_CHARS: [char; 6] = [',', '.', '!', ':', ';', '?'];

/// Only these are stripped from the start of a page; trailing text is kept.
const LEADING_TRIM: [char; 3] = [' ', '\t', '\n'];

/// Page size used when nothing is configured.
pub const DEFAULT_PAGE_SIZE: usize = 1050;

pub fn is_boundary(c: char) -> bool {
    BOUNDARY_CHARS.contains(&c)
}

/// What to do when no boundary exists within a page-sized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Cut at exactly `page_size` characters, possibly mid-word.
    #[default]
    HardCut,
    /// Refuse to build the book.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateOptions {
    pub page_size: usize,
    pub overflow: OverflowPolicy,
}

impl PaginateOptions {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            overflow: OverflowPolicy::default(),
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// How a page came to end where it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageEnd {
    /// Right after a single boundary character.
    Boundary,
    /// The remaining text fit into one page.
    EndOfText,
    /// No boundary was found; cut at the page size.
    HardCut,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub number: usize,
    pub text: Arc<str>,
    /// Char offset of the untrimmed page within the source.
    pub offset: usize,
    /// Untrimmed length in chars.
    pub len: usize,
    pub end: PageEnd,
}

/// An immutable, 1-indexed sequence of pages.
#[derive(Debug, Clone)]
pub struct Book {
    pages: Vec<Page>,
    page_size: usize,
}

impl Book {
    pub fn build(text: &str, page_size: usize) -> Result<Self, PaginateError> {
        Self::build_with(text, &PaginateOptions::new(page_size))
    }

    pub fn build_with(text: &str, options: &PaginateOptions) -> Result<Self, PaginateError> {
        let page_size = options.page_size;
        if page_size == 0 {
            return Err(PaginateError::InvalidPageSize);
        }
        if text.is_empty() {
            return Err(PaginateError::EmptyDocument);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut pages = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let (end, kind) = match next_page_end(&chars, start, page_size) {
                Some(found) => found,
                None => match options.overflow {
                    OverflowPolicy::HardCut => {
                        warn!(offset = start, page_size, "no boundary in window, cutting page");
                        (start + page_size, PageEnd::HardCut)
                    }
                    OverflowPolicy::Fail => {
                        return Err(PaginateError::UnboundedScan { offset: start });
                    }
                },
            };

            let raw = &chars[start..end];
            let skip = raw.iter().take_while(|c| LEADING_TRIM.contains(c)).count();
            if skip < raw.len() {
                pages.push(Page {
                    number: pages.len() + 1,
                    text: Arc::from(raw[skip..].iter().collect::<String>()),
                    offset: start,
                    len: raw.len(),
                    end: kind,
                });
            }
            start = end;
        }

        if pages.is_empty() {
            return Err(PaginateError::EmptyDocument);
        }

        let book = Self { pages, page_size };
        info!(
            pages = book.page_count(),
            hard_cuts = book.hard_cuts(),
            page_size,
            "book paginated"
        );
        Ok(book)
    }

    /// Reads the whole source and paginates it.
    pub async fn load_with<S: TextSource + ?Sized>(
        source: &S,
        options: &PaginateOptions,
    ) -> anyhow::Result<Self> {
        let text = source.read_text().await?;
        Ok(Self::build_with(&text, options)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|idx| self.pages.get(idx))
    }

    pub fn text(&self, number: usize) -> Option<&Arc<str>> {
        self.page(number).map(|page| &page.text)
    }

    pub fn contains(&self, number: usize) -> bool {
        (1..=self.page_count()).contains(&number)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pages.iter().map(|page| (page.number, &*page.text))
    }

    pub fn hard_cuts(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| page.end == PageEnd::HardCut)
            .count()
    }

    /// First `chars` characters of a page, used for bookmark listings.
    pub fn preview(&self, number: usize, chars: usize) -> Option<String> {
        self.page(number)
            .map(|page| page.text.chars().take(chars).collect())
    }
}

/// Finds where the page starting at `start` ends. `None` means the backward
/// scan reached `start` without meeting a usable boundary.
fn next_page_end(chars: &[char], start: usize, page_size: usize) -> Option<(usize, PageEnd)> {
    let target = start + page_size;
    if target >= chars.len() {
        return Some((chars.len(), PageEnd::EndOfText));
    }
    (start + 1..=target)
        .rev()
        .find(|&end| is_break_at(chars, end))
        .map(|end| (end, PageEnd::Boundary))
}

/// `chars[end - 1]` closes a clause, the char before it does not, and the
/// char after it does not continue the punctuation run.
fn is_break_at(chars: &[char], end: usize) -> bool {
    let closes = is_boundary(chars[end - 1]);
    let single = end < 2 || !is_boundary(chars[end - 2]);
    let followed = chars.get(end).map_or(false, |&c| is_boundary(c));
    closes && single && !followed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(book: &Book) -> Vec<&str> {
        book.iter().map(|(_, text)| text).collect()
    }

    #[test]
    fn rejects_zero_page_size() {
        assert_eq!(
            Book::build("Hello.", 0).unwrap_err(),
            PaginateError::InvalidPageSize
        );
    }

    #[test]
    fn rejects_empty_and_blank_text() {
        assert_eq!(Book::build("", 10).unwrap_err(), PaginateError::EmptyDocument);
        assert_eq!(
            Book::build(" \n\t ", 10).unwrap_err(),
            PaginateError::EmptyDocument
        );
    }

    #[test]
    fn short_text_is_a_single_page() {
        let book = Book::build("No punctuation here", 100).unwrap();
        assert_eq!(book.page_count(), 1);
        assert_eq!(book.page(1).unwrap().end, PageEnd::EndOfText);
        assert_eq!(&**book.text(1).unwrap(), "No punctuation here");
    }

    #[test]
    fn splits_hello_world_on_clause_boundaries() {
        let source = "Hello, world. This is a test! Another sentence.";
        let book = Book::build(source, 18).unwrap();

        assert_eq!(
            texts(&book),
            vec!["Hello, world.", "This is a test!", "Another sentence."]
        );
        for page in &book.pages()[..book.page_count() - 1] {
            assert!(page.len <= 18);
            assert_eq!(page.end, PageEnd::Boundary);
        }
    }

    #[test]
    fn tight_page_size_still_covers_the_source() {
        let source = "Hello, world. This is a test! Another sentence.";
        let book = Book::build(source, 15).unwrap();

        assert!(book.page_count() >= 2);
        assert_eq!(&**book.text(1).unwrap(), "Hello, world.");
        let rebuilt: String = book
            .pages()
            .iter()
            .map(|page| source.chars().skip(page.offset).take(page.len).collect::<String>())
            .collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn trims_only_leading_tabs_newlines_and_spaces() {
        let book = Book::build("One.\n\t Two, \rsix. ", 7).unwrap();
        assert_eq!(texts(&book), vec!["One.", "Two,", "\rsix. "]);
    }

    #[test]
    fn punctuation_runs_are_never_split_points() {
        let book = Book::build("Yes, so... done", 10).unwrap();
        assert_eq!(&**book.text(1).unwrap(), "Yes,");

        let book = Book::build("So... it. Done.", 6).unwrap();
        assert_eq!(texts(&book), vec!["So... ", "it.", "Done."]);
        assert_eq!(book.page(1).unwrap().end, PageEnd::HardCut);
        assert_eq!(book.page(2).unwrap().end, PageEnd::Boundary);
    }

    #[test]
    fn boundary_free_text_is_hard_cut() {
        let book = Book::build("abcdefghij", 4).unwrap();
        assert_eq!(texts(&book), vec!["abcd", "efgh", "ij"]);
        assert_eq!(book.hard_cuts(), 2);
    }

    #[test]
    fn fail_policy_reports_unbounded_scan() {
        let options = PaginateOptions::new(4).with_overflow(OverflowPolicy::Fail);
        assert_eq!(
            Book::build_with("ab. cdefghij", &options).unwrap_err(),
            PaginateError::UnboundedScan { offset: 3 }
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let source = "Привет, мир. Это тест! Ещё одно предложение.";
        let book = Book::build(source, 13).unwrap();
        assert_eq!(&**book.text(1).unwrap(), "Привет, мир.");
        for page in book.pages() {
            assert!(page.len <= 13);
        }
    }

    #[test]
    fn page_lookup_is_one_based() {
        let book = Book::build("A. B. C.", 3).unwrap();
        assert_eq!(texts(&book), vec!["A.", "B.", "C."]);
        assert!(book.page(0).is_none());
        assert_eq!(&**book.text(1).unwrap(), "A.");
        assert!(book.contains(book.page_count()));
        assert!(!book.contains(book.page_count() + 1));
        assert_eq!(book.preview(1, 1).as_deref(), Some("A"));
    }

    fn book_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                8 => prop::char::range('a', 'z'),
                3 => Just(' '),
                1 => Just('\n'),
                1 => Just('\t'),
                2 => prop::sample::select(BOUNDARY_CHARS.to_vec()),
                1 => Just('ё'),
            ],
            1..400,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_pages_cover_the_source(text in book_text(), size in 1usize..60) {
            let chars: Vec<char> = text.chars().collect();
            let book = match Book::build(&text, size) {
                Ok(book) => book,
                Err(err) => {
                    prop_assert_eq!(err, PaginateError::EmptyDocument);
                    prop_assert!(chars.iter().all(|c| LEADING_TRIM.contains(c)));
                    return Ok(());
                }
            };

            let mut cursor = 0;
            for (idx, page) in book.pages().iter().enumerate() {
                prop_assert_eq!(page.number, idx + 1);
                prop_assert!(chars[cursor..page.offset].iter().all(|c| LEADING_TRIM.contains(c)));
                let raw: String = chars[page.offset..page.offset + page.len].iter().collect();
                prop_assert_eq!(raw.trim_start_matches(&LEADING_TRIM[..]), &*page.text);
                prop_assert!(!page.text.is_empty());
                cursor = page.offset + page.len;
            }
            prop_assert!(chars[cursor..].iter().all(|c| LEADING_TRIM.contains(c)));
        }

        #[test]
        fn prop_pages_respect_size_and_boundaries(text in book_text(), size in 1usize..60) {
            let chars: Vec<char> = text.chars().collect();
            if let Ok(book) = Book::build(&text, size) {
                for page in book.pages() {
                    prop_assert!(page.len <= size);
                    let end = page.offset + page.len;
                    if page.end == PageEnd::Boundary {
                        prop_assert!(is_boundary(chars[end - 1]));
                        prop_assert!(end < 2 || !is_boundary(chars[end - 2]));
                        prop_assert!(end == chars.len() || !is_boundary(chars[end]));
                    }
                    if page.end == PageEnd::EndOfText {
                        prop_assert_eq!(end, chars.len());
                    }
                }
            }
        }
    }
}
