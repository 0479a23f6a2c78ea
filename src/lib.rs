//! # annotree
//!
//! Rebuild the reading order of ebook highlights from a flat annotations dump
//! and export them.
//!
//! The annotations API returns highlights as unordered records. Apart from the
//! book and chapter they belong to, the only hint of where a highlight sits is
//! a structural path such as `/section[2]/p[4]` plus a character offset.
//! annotree replays those paths into one tree per book, so that walking the
//! tree top to bottom visits highlights in the order they appear in the book.
//!
//! ## Features
//!
//! - Path resolution that builds missing elements on demand ([`tree::resolve`])
//! - Deterministic chapter and annotation ordering regardless of input order
//! - CSV, raw XML and Org-mode exporters
//! - Paginated fetching of the dump itself (`fetch` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use annotree::export::ExportFormat;
//! use annotree::{Library, build_library, load_dump};
//!
//! let pages = load_dump(Path::new("annotations.json"))?;
//! let library = Library::from_pages(pages)?;
//! let forest = build_library(&library);
//! ExportFormat::Csv.export(&forest, &mut std::io::stdout())?;
//! # Ok::<(), annotree::Error>(())
//! ```
//!
//! ## Working with Trees
//!
//! ```
//! use annotree::build::{ANNOTATION_TAG, CHAPTER_TAG};
//! use annotree::{Library, RawRecord, build_library};
//!
//! let record: RawRecord = serde_json::from_str(r#"{
//!     "epub_identifier": "9781000000001",
//!     "epub_title": "Some Book",
//!     "cover_url": "",
//!     "chapter_title": "Intro",
//!     "chapter_url": "https://example.com/book/ch01.html",
//!     "identifier": "a1",
//!     "quote": "highlighted words",
//!     "text": "a note",
//!     "last_modified_time": "2024-01-01T00:00:00Z",
//!     "user_identifier": "u1",
//!     "ranges": [{"start": "/section[1]/p[3]", "startOffset": 12}]
//! }"#)?;
//!
//! let mut library = Library::new();
//! library.insert(record)?;
//! let forest = build_library(&library);
//!
//! let tree = forest.get("9781000000001").unwrap();
//! let chapter = tree.children_named(tree.root(), CHAPTER_TAG).next().unwrap();
//! let annotation = tree.descendants_named(chapter, ANNOTATION_TAG).next().unwrap();
//! assert_eq!(tree.attr(annotation, "startOffset"), Some("12"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod book;
pub mod build;
pub mod error;
pub mod export;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod import;
pub mod tree;

pub use book::{Annotation, Book, Chapter, ChapterKey, Range};
pub use build::{Forest, build_book, build_library};
pub use error::{Error, Result};
pub use import::{ApiPage, Library, RawRecord, load_dump, write_dump};
pub use tree::{NodeId, Tree};
