//! Export module for writing rebuilt annotation trees.
//!
//! Provides the `Exporter` trait and format-specific implementations. All
//! exporters read the finished [`Forest`] only through tree attributes and
//! child iteration.
//!
//! # Architecture
//!
//! The `Exporter` trait uses a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write` destination
//!
//! [`ExportFormat`] selects an exporter by name, which is how the CLI picks
//! one.
//!
//! # Example
//!
//! ```
//! use annotree::Forest;
//! use annotree::export::{CsvExporter, Exporter};
//!
//! let forest = Forest::new();
//! let mut out = Vec::new();
//! CsvExporter::new().export(&forest, &mut out)?;
//! assert!(out.starts_with(b"Book Title,"));
//! # Ok::<(), annotree::Error>(())
//! ```

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::build::Forest;
use crate::error::{Error, Result};

mod org;
mod table;
mod xml;

pub use org::OrgExporter;
pub use table::{CsvConfig, CsvExporter};
pub use xml::{XmlConfig, XmlExporter};

/// Trait for exporting rebuilt trees to specific formats.
///
/// Exporters use a builder pattern where configuration is held in the struct,
/// and the `export` method writes to any `Write` destination.
pub trait Exporter {
    /// Export every tree of the forest to the provided writer.
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> Result<()>;
}

/// Output formats selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One row per annotation, in the layout of the publisher's own export.
    #[default]
    Csv,
    /// The rebuilt trees as indented XML.
    RawXml,
    /// Org-mode outline with quote blocks.
    Org,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::RawXml, ExportFormat::Org];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::RawXml => "raw_xml",
            ExportFormat::Org => "org",
        }
    }

    /// Export with the default configuration of the selected exporter.
    pub fn export<W: Write>(self, forest: &Forest, writer: &mut W) -> Result<()> {
        match self {
            ExportFormat::Csv => CsvExporter::new().export(forest, writer),
            ExportFormat::RawXml => XmlExporter::new().export(forest, writer),
            ExportFormat::Org => OrgExporter::new().export(forest, writer),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.name() == name)
            .ok_or_else(|| Error::UnsupportedFormat(name.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
