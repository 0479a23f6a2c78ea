//! Loading and grouping annotation records.
//!
//! Records arrive as a flat list, pages of it in fact, in whatever order the
//! API returned them. A [`Library`] groups them by book and by chapter key so
//! the tree builder can work one book at a time.

mod record;

pub use record::{ApiPage, RawRange, RawRecord, normalize};

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::book::{Annotation, Book, Chapter, ChapterKey};
use crate::error::Result;

/// All annotations of one chapter, in the order they were encountered.
#[derive(Debug, Clone)]
pub struct ChapterEntry {
    pub chapter: Chapter,
    pub annotations: Vec<Annotation>,
}

/// A book and its chapters, keyed (and therefore ordered) by chapter key.
#[derive(Debug, Clone)]
pub struct BookEntry {
    pub book: Book,
    pub chapters: BTreeMap<ChapterKey, ChapterEntry>,
}

impl BookEntry {
    pub fn annotation_count(&self) -> usize {
        self.chapters.values().map(|c| c.annotations.len()).sum()
    }
}

/// Records grouped as book → chapter → annotations.
///
/// Books keep the order in which they were first seen.
#[derive(Debug, Clone, Default)]
pub struct Library {
    books: Vec<BookEntry>,
    index: HashMap<String, usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group every record of every page.
    pub fn from_pages(pages: impl IntoIterator<Item = ApiPage>) -> Result<Self> {
        let mut library = Self::new();
        for page in pages {
            for record in page.results {
                library.insert(record)?;
            }
        }
        tracing::debug!(books = library.len(), "grouped annotation records");
        Ok(library)
    }

    /// Normalize one record and file it under its book and chapter.
    ///
    /// The first record for a book decides its title and cover; later ones
    /// are trusted to agree.
    pub fn insert(&mut self, raw: RawRecord) -> Result<()> {
        let (book, chapter, annotation) = normalize(raw)?;

        let slot = match self.index.get(&book.identifier) {
            Some(&slot) => slot,
            None => {
                let slot = self.books.len();
                self.index.insert(book.identifier.clone(), slot);
                self.books.push(BookEntry {
                    book,
                    chapters: BTreeMap::new(),
                });
                slot
            }
        };

        self.books[slot]
            .chapters
            .entry(chapter.key())
            .or_insert_with(|| ChapterEntry {
                chapter,
                annotations: Vec::new(),
            })
            .annotations
            .push(annotation);

        Ok(())
    }

    /// Keep only the listed books. An empty list keeps everything.
    pub fn retain_books(&mut self, identifiers: &[String]) {
        if identifiers.is_empty() {
            return;
        }
        self.books
            .retain(|entry| identifiers.contains(&entry.book.identifier));
        self.index = self
            .books
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.book.identifier.clone(), slot))
            .collect();
    }

    pub fn get(&self, identifier: &str) -> Option<&BookEntry> {
        self.index.get(identifier).map(|&slot| &self.books[slot])
    }

    pub fn books(&self) -> &[BookEntry] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Read a dump file holding a JSON array of API pages.
pub fn load_dump(path: &Path) -> Result<Vec<ApiPage>> {
    let reader = BufReader::new(File::open(path)?);
    let pages: Vec<ApiPage> = serde_json::from_reader(reader)?;
    tracing::debug!(path = %path.display(), pages = pages.len(), "loaded dump");
    Ok(pages)
}

/// Write pages as a JSON array, the layout [`load_dump`] reads back.
pub fn write_dump<T: Serialize>(path: &Path, pages: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, pages)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), pages = pages.len(), "wrote dump");
    Ok(())
}
