//! Org-mode outline exporter.
//!
//! One top-level heading per book, a second-level heading per chapter and a
//! `#+begin_quote` block per highlight, in reading order.

use std::io::Write;

use crate::build::{ANNOTATION_TAG, CHAPTER_TAG, Forest};
use crate::error::Result;

use super::Exporter;

/// Exporter for Org-mode output.
#[derive(Debug, Clone, Default)]
pub struct OrgExporter;

impl OrgExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for OrgExporter {
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> Result<()> {
        for tree in forest.trees() {
            let root = tree.root();
            writeln!(writer, "* {}", tree.attr(root, "title").unwrap_or_default())?;
            writeln!(writer)?;

            for chapter in tree.children_named(root, CHAPTER_TAG) {
                writeln!(writer, "** {}", tree.attr(chapter, "title").unwrap_or_default())?;
                writeln!(writer)?;

                for annotation in tree.descendants_named(chapter, ANNOTATION_TAG) {
                    let quote = tree.attr(annotation, "quote").unwrap_or_default();
                    writeln!(writer, "#+begin_quote")?;
                    writeln!(writer, "{}", flow_quote(quote))?;
                    writeln!(writer, "#+end_quote")?;
                    writeln!(writer)?;
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Join the lines of a highlight with spaces, keeping blank lines as breaks.
fn flow_quote(quote: &str) -> String {
    quote
        .split('\n')
        .map(|line| if line.is_empty() { "\n" } else { line })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn test_flow_quote() {
        assert_eq!(flow_quote("one line"), "one line");
        assert_eq!(flow_quote("wrapped\nline"), "wrapped line");
        assert_eq!(flow_quote("first\n\nsecond"), "first \n second");
    }

    #[test]
    fn test_outline_layout() {
        let mut tree = Tree::new("epub");
        tree.set_attr(tree.root(), "title", "Book");
        let chapter = tree.append_element(tree.root(), "chapter");
        tree.set_attr(chapter, "title", "Intro");
        let p = tree.append_element(chapter, "p");
        let anno = tree.append_element(p, "annotation");
        tree.set_attr(anno, "quote", "Highlighted");
        tree.append_element(tree.root(), "chapter");

        let mut forest = Forest::new();
        forest.insert("b1", tree);

        let mut out = Vec::new();
        OrgExporter::new().export(&forest, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "* Book\n\n** Intro\n\n#+begin_quote\nHighlighted\n#+end_quote\n\n** \n\n\n"
        );
    }
}
