//! Rebuilding book trees from grouped annotations.
//!
//! Each book becomes a [`Tree`] rooted at an `epub` element. Chapters are laid
//! out as `chapter[1]`, `chapter[2]`, ... in [`ChapterKey`] order, and every
//! annotation is placed below its chapter at the structural path its first
//! range records, in reading order. Because all ordering comes from sorting
//! rather than from input order, shuffling the input never changes the result.
//!
//! [`ChapterKey`]: crate::book::ChapterKey

use std::collections::{BTreeMap, HashMap};

use crate::book::{Annotation, Book, ChapterKey};
use crate::import::{ChapterEntry, Library};
use crate::tree::{NodeId, Tree, resolve};

/// Tag of the root element of a book tree.
pub const BOOK_TAG: &str = "epub";
/// Tag of chapter elements directly below the root.
pub const CHAPTER_TAG: &str = "chapter";
/// Tag of annotation leaves.
pub const ANNOTATION_TAG: &str = "annotation";

/// Rebuild one book.
pub fn build_book(book: &Book, chapters: &BTreeMap<ChapterKey, ChapterEntry>) -> Tree {
    let mut tree = Tree::new(BOOK_TAG);
    let root = tree.root();
    tree.set_attr(root, "title", book.title.as_str());
    tree.set_attr(root, "identifier", book.identifier.as_str());
    tree.set_attr(root, "cover_url", book.cover_url.as_str());

    // BTreeMap iteration is already in chapter key order
    for (position, entry) in chapters.values().enumerate() {
        let chapter_node = resolve(
            &mut tree,
            root,
            &format!("/{CHAPTER_TAG}[{}]", position + 1),
        );
        tree.set_attr(chapter_node, "title", entry.chapter.title.as_str());
        tree.set_attr(chapter_node, "url", entry.chapter.url.as_str());

        place_annotations(&mut tree, chapter_node, &entry.annotations);

        tracing::debug!(
            book = %book.identifier,
            chapter = %entry.chapter.title,
            annotations = entry.annotations.len(),
            "placed chapter"
        );
    }

    tree
}

/// Place annotations below a chapter node in reading order.
///
/// Every annotation gets its own `annotation` element, appended after any
/// already at the same container, so annotations sharing a start path end up
/// as siblings ordered by offset.
fn place_annotations(tree: &mut Tree, chapter_node: NodeId, annotations: &[Annotation]) {
    let mut ordered: Vec<&Annotation> = annotations.iter().collect();
    ordered.sort_by_cached_key(|a| a.reading_key());

    for annotation in ordered {
        let container = resolve(tree, chapter_node, &annotation.placement_path());
        let next = tree.children_named(container, ANNOTATION_TAG).count() + 1;
        let node = resolve(tree, container, &format!("{ANNOTATION_TAG}[{next}]"));

        tree.set_attr(node, "identifier", annotation.identifier.as_str());
        tree.set_attr(node, "quote", annotation.quote.as_str());
        tree.set_attr(
            node,
            "startOffset",
            annotation.first_range().start_offset.to_string(),
        );
        tree.set_attr(node, "text", annotation.text.as_deref().unwrap_or_default());
        tree.set_attr(
            node,
            "lastModifiedTime",
            annotation.last_modified_time.as_str(),
        );
    }
}

/// Rebuilt trees keyed by book identifier, in first-seen book order.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    trees: Vec<(String, Tree)>,
    index: HashMap<String, usize>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, tree: Tree) {
        let identifier = identifier.into();
        match self.index.get(&identifier) {
            Some(&slot) => self.trees[slot].1 = tree,
            None => {
                self.index.insert(identifier.clone(), self.trees.len());
                self.trees.push((identifier, tree));
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Tree> {
        self.index.get(identifier).map(|&slot| &self.trees[slot].1)
    }

    /// Iterate over `(book identifier, tree)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.trees.iter().map(|(id, tree)| (id.as_str(), tree))
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter().map(|(_, tree)| tree)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Rebuild every book of a library.
pub fn build_library(library: &Library) -> Forest {
    let mut forest = Forest::new();
    for entry in library.books() {
        let tree = build_book(&entry.book, &entry.chapters);
        tracing::info!(
            book = %entry.book.identifier,
            chapters = entry.chapters.len(),
            annotations = entry.annotation_count(),
            nodes = tree.node_count(),
            "rebuilt book"
        );
        forest.insert(entry.book.identifier.clone(), tree);
    }
    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Chapter, Range};

    fn annotation(id: &str, path: &str, offset: u64) -> Annotation {
        Annotation::new(id, format!("quote {id}"), vec![Range::new(path, offset)]).unwrap()
    }

    fn chapters(entries: Vec<(Chapter, Vec<Annotation>)>) -> BTreeMap<ChapterKey, ChapterEntry> {
        entries
            .into_iter()
            .map(|(chapter, annotations)| {
                (
                    chapter.key(),
                    ChapterEntry {
                        chapter,
                        annotations,
                    },
                )
            })
            .collect()
    }

    fn annotation_ids(tree: &Tree, from: NodeId) -> Vec<String> {
        tree.descendants_named(from, ANNOTATION_TAG)
            .map(|id| tree.attr(id, "identifier").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_root_attributes() {
        let book = Book::new("b1", "A Book", "https://example.com/c.jpg");
        let tree = build_book(&book, &BTreeMap::new());

        assert_eq!(tree.tag(tree.root()), Some(BOOK_TAG));
        assert_eq!(tree.attr(tree.root(), "title"), Some("A Book"));
        assert_eq!(tree.attr(tree.root(), "identifier"), Some("b1"));
        assert_eq!(tree.attr(tree.root(), "cover_url"), Some("https://example.com/c.jpg"));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_chapters_follow_key_order() {
        let book = Book::new("b1", "A Book", "");
        let grouped = chapters(vec![
            (Chapter::new("b1", "/c2", "Appendix"), vec![annotation("x", "/p", 0)]),
            (Chapter::new("b1", "/c1", "Intro"), vec![annotation("y", "/p", 0)]),
        ]);
        let tree = build_book(&book, &grouped);

        let urls: Vec<_> = tree
            .children_named(tree.root(), CHAPTER_TAG)
            .map(|id| tree.attr(id, "url").unwrap())
            .collect();
        assert_eq!(urls, vec!["/c1", "/c2"]);
    }

    #[test]
    fn test_offsets_order_within_same_path() {
        let book = Book::new("b1", "A Book", "");
        let grouped = chapters(vec![(
            Chapter::new("b1", "/c1", "Intro"),
            vec![annotation("late", "/p/p[2]", 50), annotation("early", "/p/p[2]", 10)],
        )]);
        let tree = build_book(&book, &grouped);

        assert_eq!(annotation_ids(&tree, tree.root()), vec!["early", "late"]);

        let chapter = tree.children_named(tree.root(), CHAPTER_TAG).next().unwrap();
        let outer = tree.children_named(chapter, "p").next().unwrap();
        let inner: Vec<_> = tree.children_named(outer, "p").collect();
        assert_eq!(inner.len(), 2);
        assert_eq!(tree.children_named(inner[1], ANNOTATION_TAG).count(), 2);
        assert_eq!(tree.children_named(inner[0], ANNOTATION_TAG).count(), 0);
    }

    #[test]
    fn test_annotation_attributes() {
        let book = Book::new("b1", "A Book", "");
        let with_note = annotation("n1", "/P[1]", 3)
            .with_text("my note")
            .with_last_modified_time("2024-02-03T04:05:06Z");
        let grouped = chapters(vec![(
            Chapter::new("b1", "/c1", "Intro"),
            vec![with_note, annotation("n2", "/p[1]", 9)],
        )]);
        let tree = build_book(&book, &grouped);

        let ids: Vec<_> = tree.descendants_named(tree.root(), ANNOTATION_TAG).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(tree.attr(ids[0], "quote"), Some("quote n1"));
        assert_eq!(tree.attr(ids[0], "startOffset"), Some("3"));
        assert_eq!(tree.attr(ids[0], "text"), Some("my note"));
        assert_eq!(tree.attr(ids[0], "lastModifiedTime"), Some("2024-02-03T04:05:06Z"));
        assert_eq!(tree.attr(ids[1], "text"), Some(""));

        // Upper-case path placed under the lowercased element
        assert_eq!(tree.tag(tree.node(ids[0]).unwrap().parent.unwrap()), Some("p"));
    }

    #[test]
    fn test_identical_keys_are_both_kept_in_input_order() {
        let book = Book::new("b1", "A Book", "");
        let grouped = chapters(vec![(
            Chapter::new("b1", "/c1", "Intro"),
            vec![annotation("first", "/p", 4), annotation("second", "/p", 4)],
        )]);
        let tree = build_book(&book, &grouped);

        assert_eq!(annotation_ids(&tree, tree.root()), vec!["first", "second"]);
    }

    #[test]
    fn test_annotation_on_chapter_itself() {
        let book = Book::new("b1", "A Book", "");
        let grouped = chapters(vec![(
            Chapter::new("b1", "/c1", "Intro"),
            vec![annotation("top", "", 0), annotation("p", "/p", 0)],
        )]);
        let tree = build_book(&book, &grouped);

        let chapter = tree.children_named(tree.root(), CHAPTER_TAG).next().unwrap();
        let tags: Vec<_> = tree.children(chapter).map(|id| tree.tag(id).unwrap()).collect();
        assert_eq!(tags, vec![ANNOTATION_TAG, "p"]);
    }

    #[test]
    fn test_forest_lookup_and_order() {
        let mut forest = Forest::new();
        forest.insert("zz", Tree::new(BOOK_TAG));
        forest.insert("aa", Tree::new(BOOK_TAG));

        let ids: Vec<_> = forest.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zz", "aa"]);
        assert!(forest.get("aa").is_some());
        assert!(forest.get("bb").is_none());
        assert_eq!(forest.len(), 2);
    }
}
