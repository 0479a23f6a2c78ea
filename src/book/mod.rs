//! Books, chapters and annotations as normalized from source records.
//!
//! Chapters have no identity of their own in the source data; two records
//! name the same chapter when they agree on book, URL and title. That triple
//! is made explicit as [`ChapterKey`] and used for grouping and ordering.

use crate::error::{Error, Result};

/// A book that owns annotated chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub identifier: String,
    pub title: String,
    pub cover_url: String,
}

impl Book {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        cover_url: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            cover_url: cover_url.into(),
        }
    }
}

/// A chapter of a book, as named by an annotation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub url: String,
    pub book_identifier: String,
}

impl Chapter {
    pub fn new(
        book_identifier: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            book_identifier: book_identifier.into(),
        }
    }

    /// Chapters are referred to by URL from their annotations.
    pub fn identifier(&self) -> &str {
        &self.url
    }

    /// Grouping and ordering key: (book identifier, URL, title).
    pub fn key(&self) -> ChapterKey {
        ChapterKey {
            book_identifier: self.book_identifier.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
        }
    }
}

/// Composite chapter identity.
///
/// Field order matters: the derived `Ord` compares book, then URL, then title,
/// and that order is the order chapters appear in a rebuilt tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterKey {
    pub book_identifier: String,
    pub url: String,
    pub title: String,
}

/// Recorded start position of an annotation in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Structural path of the element the range starts in.
    pub start: String,
    /// Character offset within that element.
    pub start_offset: u64,
}

impl Range {
    pub fn new(start: impl Into<String>, start_offset: u64) -> Self {
        Self {
            start: start.into(),
            start_offset,
        }
    }
}

/// A highlight, optionally carrying a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub identifier: String,
    pub quote: String,
    pub text: Option<String>,
    pub last_modified_time: String,
    pub user_identifier: String,
    /// URL of the owning chapter.
    pub chapter_identifier: String,
    /// Never empty.
    ranges: Vec<Range>,
}

/// Sort key putting annotations in reading order within a chapter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadingKey {
    /// Lowercased start path.
    pub path: String,
    pub offset: u64,
}

impl Annotation {
    /// Create an annotation. Fails with [`Error::MissingRanges`] when `ranges`
    /// is empty, since such an annotation has no place in the document.
    pub fn new(
        identifier: impl Into<String>,
        quote: impl Into<String>,
        ranges: Vec<Range>,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if ranges.is_empty() {
            return Err(Error::MissingRanges(identifier));
        }
        Ok(Self {
            identifier,
            quote: quote.into(),
            text: None,
            last_modified_time: String::new(),
            user_identifier: String::new(),
            chapter_identifier: String::new(),
            ranges,
        })
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_last_modified_time(mut self, time: impl Into<String>) -> Self {
        self.last_modified_time = time.into();
        self
    }

    pub fn with_user(mut self, user_identifier: impl Into<String>) -> Self {
        self.user_identifier = user_identifier.into();
        self
    }

    pub fn with_chapter(mut self, chapter_identifier: impl Into<String>) -> Self {
        self.chapter_identifier = chapter_identifier.into();
        self
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// The range used for placement and ordering.
    pub fn first_range(&self) -> &Range {
        &self.ranges[0]
    }

    /// Start path as used for placement in the tree.
    pub fn placement_path(&self) -> String {
        self.first_range().start.to_lowercase()
    }

    pub fn reading_key(&self) -> ReadingKey {
        ReadingKey {
            path: self.placement_path(),
            offset: self.first_range().start_offset,
        }
    }
}
