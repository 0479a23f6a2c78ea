//! Raw record shapes as served by the annotations API.

use serde::{Deserialize, Serialize};

use crate::book::{Annotation, Book, Chapter, Range};
use crate::error::Result;

/// One page of the paginated annotations listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPage {
    pub results: Vec<RawRecord>,
    /// URL of the following page, absent on the last one.
    #[serde(default)]
    pub next: Option<String>,
}

/// A flat annotation record. Fields not listed here are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub epub_identifier: String,
    pub epub_title: String,
    #[serde(default)]
    pub cover_url: String,
    pub chapter_title: String,
    pub chapter_url: String,
    pub identifier: String,
    pub quote: String,
    #[serde(default)]
    pub text: Option<String>,
    pub last_modified_time: String,
    #[serde(default)]
    pub user_identifier: String,
    #[serde(default)]
    pub ranges: Vec<RawRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRange {
    pub start: String,
    #[serde(rename = "startOffset")]
    pub start_offset: u64,
}

/// Split a raw record into its book, chapter and annotation.
///
/// Fails with [`Error::MissingRanges`](crate::Error::MissingRanges) when the
/// record carries no ranges.
pub fn normalize(raw: RawRecord) -> Result<(Book, Chapter, Annotation)> {
    let ranges = raw
        .ranges
        .into_iter()
        .map(|r| Range::new(r.start, r.start_offset))
        .collect();

    let mut annotation = Annotation::new(raw.identifier, raw.quote, ranges)?
        .with_last_modified_time(raw.last_modified_time)
        .with_user(raw.user_identifier)
        .with_chapter(raw.chapter_url.clone());
    annotation.text = raw.text;

    let book = Book::new(raw.epub_identifier.clone(), raw.epub_title, raw.cover_url);
    let chapter = Chapter::new(raw.epub_identifier, raw.chapter_url, raw.chapter_title);

    Ok((book, chapter, annotation))
}
