//! CSV exporter.
//!
//! Writes one row per annotation, chapters in tree order and annotations in
//! document order within each chapter, using the same columns as the
//! publisher's own highlights download.

use std::io::Write;

use crate::build::{ANNOTATION_TAG, CHAPTER_TAG, Forest};
use crate::error::Result;

use super::Exporter;

const HEADER: [&str; 8] = [
    "Book Title",
    "Chapter Title",
    "Date of Highlight",
    "Book URL",
    "Chapter URL",
    "Annotation URL",
    "Highlight",
    "Personal Note",
];

/// Configuration for CSV export.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Emit the header row.
    pub header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { header: true }
    }
}

/// Exporter for CSV output.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvConfig,
}

impl CsvExporter {
    /// Create a new CsvExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CsvExporter with the specified configuration.
    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        if self.config.header {
            csv.write_record(HEADER)?;
        }

        for tree in forest.trees() {
            let book_title = tree.attr(tree.root(), "title").unwrap_or_default();

            for chapter in tree.children_named(tree.root(), CHAPTER_TAG) {
                let chapter_title = tree.attr(chapter, "title").unwrap_or_default();
                let chapter_url = tree.attr(chapter, "url").unwrap_or_default();
                let book_url = parent_url(chapter_url);

                for annotation in tree.descendants_named(chapter, ANNOTATION_TAG) {
                    let attr = |name: &str| tree.attr(annotation, name).unwrap_or_default();
                    let annotation_url = format!("{chapter_url}#{}", attr("identifier"));

                    csv.write_record([
                        book_title,
                        chapter_title,
                        highlight_date(attr("lastModifiedTime")),
                        book_url,
                        chapter_url,
                        annotation_url.as_str(),
                        attr("quote"),
                        attr("text"),
                    ])?;
                }
            }
        }

        csv.flush()?;
        Ok(())
    }
}

/// Date part of an ISO-8601 timestamp.
fn highlight_date(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or_default()
}

/// Everything before the last `/` of a URL, or empty when there is none.
fn parent_url(url: &str) -> &str {
    url.rsplit_once('/').map(|(parent, _)| parent).unwrap_or_default()
}
