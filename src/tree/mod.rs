//! Arena tree for reconstructed annotation documents.
//!
//! Every book is rebuilt into one [`Tree`]: a root element, one `chapter`
//! child per chapter, and below each chapter whatever structural elements the
//! recorded location paths name, with `annotation` leaves in reading order.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`], so the
//! tree is strictly tree-shaped and cheap to walk. New nodes only ever come from
//! [`Tree::append_element`], which is what the [`path`] resolver calls when it
//! needs to extend the tree.
//!
//! # Example
//!
//! ```
//! use annotree::tree::{Tree, resolve};
//!
//! let mut tree = Tree::new("epub");
//! let p = resolve(&mut tree, Tree::ROOT_ID, "/chapter[2]/p");
//! assert_eq!(tree.tag(p), Some("p"));
//! assert_eq!(tree.children_named(Tree::ROOT_ID, "chapter").count(), 2);
//! ```

mod node;
pub mod path;

pub use node::{Node, NodeId};
pub use path::{Step, parse_path, resolve};

/// A reconstructed document as an arena of nodes.
///
/// The tree uses a parent-pointer / first-child / next-sibling representation,
/// with a last-child pointer so that appending stays O(1).
#[derive(Debug, Clone)]
pub struct Tree {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
}

impl Tree {
    /// ID of the root node of every tree.
    pub const ROOT_ID: NodeId = NodeId::ROOT;

    /// Create a tree holding only a root element with the given tag.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_tag)],
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Tag name of a node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    /// Attribute value of a node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    /// Set an attribute on a node. A later set of the same name wins.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.set_attr(name, value);
        }
    }

    /// Allocate a new element and append it as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(tag);
        node.parent = Some(parent);
        self.nodes.push(node);

        let previous_last = self.node(parent).and_then(|p| p.last_child);
        match previous_last {
            Some(last) => {
                if let Some(last_node) = self.node_mut(last) {
                    last_node.next_sibling = Some(id);
                }
            }
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = Some(id);
                }
            }
        }
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.last_child = Some(id);
        }

        id
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let first_child = self.node(parent).and_then(|n| n.first_child);
        ChildIter {
            tree: self,
            current: first_child,
        }
    }

    /// Iterate over the children of a node that carry the given tag.
    pub fn children_named<'a>(
        &'a self,
        parent: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&id| self.tag(id) == Some(tag))
    }

    /// Iterate over all nodes in depth-first (document) order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        self.iter_dfs_from(NodeId::ROOT)
    }

    /// Iterate over a subtree in document order, starting with `start` itself.
    pub fn iter_dfs_from(&self, start: NodeId) -> DfsIter<'_> {
        let stack = if self.node(start).is_some() {
            vec![start]
        } else {
            Vec::new()
        };
        DfsIter { tree: self, stack }
    }

    /// Iterate over every node with the given tag in a subtree, in document order.
    pub fn descendants_named<'a>(
        &'a self,
        start: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.iter_dfs_from(start)
            .filter(move |&id| self.tag(id) == Some(tag))
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over the nodes of a subtree.
pub struct DfsIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.tree.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}
