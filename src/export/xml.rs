//! Raw XML exporter.
//!
//! Dumps the rebuilt trees as they are, wrapped in a single `<exported>`
//! element. Useful for checking where annotations landed.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::build::Forest;
use crate::error::Result;
use crate::tree::{NodeId, Tree};

use super::Exporter;

/// Configuration for XML export.
#[derive(Debug, Clone)]
pub struct XmlConfig {
    /// Spaces per nesting level (0 = no indentation).
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

/// Exporter for raw XML output.
#[derive(Debug, Clone, Default)]
pub struct XmlExporter {
    config: XmlConfig,
}

impl XmlExporter {
    /// Create a new XmlExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an XmlExporter with the specified configuration.
    pub fn with_config(config: XmlConfig) -> Self {
        Self { config }
    }
}

impl Exporter for XmlExporter {
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> Result<()> {
        let mut xml = if self.config.indent > 0 {
            Writer::new_with_indent(&mut *writer, b' ', self.config.indent)
        } else {
            Writer::new(&mut *writer)
        };

        if self.config.declaration {
            xml.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        }

        if forest.is_empty() {
            xml.write_event(Event::Empty(BytesStart::new("exported")))?;
        } else {
            xml.write_event(Event::Start(BytesStart::new("exported")))?;
            for tree in forest.trees() {
                write_node(&mut xml, tree, tree.root())?;
            }
            xml.write_event(Event::End(BytesEnd::new("exported")))?;
        }

        xml.into_inner().write_all(b"\n")?;
        Ok(())
    }
}

fn write_node<W: Write>(xml: &mut Writer<W>, tree: &Tree, id: NodeId) -> Result<()> {
    let Some(node) = tree.node(id) else {
        return Ok(());
    };

    let mut start = BytesStart::new(node.tag.as_str());
    for (name, value) in &node.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if node.is_leaf() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    for child in tree.children(id) {
        write_node(xml, tree, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forest() -> Forest {
        let mut tree = Tree::new("epub");
        tree.set_attr(tree.root(), "title", "Tom & Jerry");
        let chapter = tree.append_element(tree.root(), "chapter");
        tree.set_attr(chapter, "title", "Intro");
        let p = tree.append_element(chapter, "p");
        let anno = tree.append_element(p, "annotation");
        tree.set_attr(anno, "quote", "a \"quoted\" <b>");

        let mut forest = Forest::new();
        forest.insert("b1", tree);
        forest
    }

    #[test]
    fn test_indented_output() {
        let mut out = Vec::new();
        XmlExporter::new().export(&sample_forest(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\"?>"));
        assert!(text.contains("\n<exported>\n  <epub title=\"Tom &amp; Jerry\">\n"));
        assert!(text.contains("\n    <chapter title=\"Intro\">\n      <p>\n"));
        assert!(text.contains("<annotation quote=\"a &quot;quoted&quot; &lt;b&gt;\"/>"));
        assert!(text.ends_with("</exported>\n"));
    }

    #[test]
    fn test_compact_output() {
        let exporter = XmlExporter::with_config(XmlConfig {
            indent: 0,
            declaration: false,
        });
        let mut out = Vec::new();
        exporter.export(&sample_forest(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<exported><epub title=\"Tom &amp; Jerry\"><chapter title=\"Intro\"><p>\
             <annotation quote=\"a &quot;quoted&quot; &lt;b&gt;\"/></p></chapter></epub></exported>\n"
        );
    }

    #[test]
    fn test_empty_forest() {
        let exporter = XmlExporter::with_config(XmlConfig {
            indent: 2,
            declaration: false,
        });
        let mut out = Vec::new();
        exporter.export(&Forest::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<exported/>\n");
    }
}
