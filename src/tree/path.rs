//! Structural path resolution.
//!
//! Annotation ranges record their position as a simplified, single-axis path
//! such as `/section[2]/div/p[position()=4]`. Resolving a path against a
//! [`Tree`] walks down from a starting node, one step per segment, and creates
//! whatever nodes are missing along the way. Resolution only appends; existing
//! nodes are never reordered or removed, so resolving the same path twice gives
//! back the same node.
//!
//! Index parsing is lenient: a bracket expression that isn't a positive integer
//! (`chapter[x]`, `p[0]`, `p[]`) falls back to index 1 on the tag before the
//! bracket. Malformed paths are never reported.

use super::{NodeId, Tree};

/// One parsed path segment: a tag and its 1-based position among same-tag
/// siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub tag: &'a str,
    pub index: usize,
}

impl<'a> Step<'a> {
    pub fn new(tag: &'a str, index: usize) -> Self {
        Self { tag, index }
    }
}

/// Parse a path into steps, skipping empty segments.
///
/// # Examples
///
/// ```
/// use annotree::tree::{Step, parse_path};
///
/// assert_eq!(
///     parse_path("/body/p[position()=3]"),
///     vec![Step::new("body", 1), Step::new("p", 3)]
/// );
/// assert_eq!(parse_path("chapter[x]"), vec![Step::new("chapter", 1)]);
/// ```
pub fn parse_path(path: &str) -> Vec<Step<'_>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Step<'_> {
    let Some(open) = segment.find('[') else {
        return Step::new(segment, 1);
    };

    let tag = &segment[..open];
    if tag.is_empty() {
        return Step::new(segment, 1);
    }

    let index = segment[open + 1..]
        .strip_suffix(']')
        .and_then(parse_index)
        .unwrap_or(1);
    Step::new(tag, index)
}

/// Parse the inside of `[...]`: `n`, `position()=n`, or any run of letters and
/// parentheses followed by an optional `=` and the digits.
fn parse_index(expr: &str) -> Option<usize> {
    let rest = expr.trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '(' || c == ')');
    let digits = rest.strip_prefix('=').unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&n| n > 0)
}

/// Drop the leading segment when it is empty (absolute path) or names the
/// node the path is resolved from.
fn strip_context<'p>(path: &'p str, context_tag: &str) -> &'p str {
    let (first, rest) = path.split_once('/').unwrap_or((path, ""));
    if first.is_empty() || first == context_tag {
        rest
    } else {
        path
    }
}

/// Resolve `path` starting at `from`, extending the tree as needed.
///
/// For each step, the `index`-th child carrying the step's tag is taken. When
/// fewer exist, new empty children are appended until there are `index` of
/// them, and the last one appended is taken. A path without steps resolves to
/// `from` itself.
pub fn resolve(tree: &mut Tree, from: NodeId, path: &str) -> NodeId {
    let relative = strip_context(path, tree.tag(from).unwrap_or_default());

    parse_path(relative)
        .into_iter()
        .fold(from, |current, step| resolve_step(tree, current, step))
}

fn resolve_step(tree: &mut Tree, current: NodeId, step: Step<'_>) -> NodeId {
    let mut seen = 0;
    for id in tree.children_named(current, step.tag) {
        seen += 1;
        if seen == step.index {
            return id;
        }
    }

    if step.index - seen > 1 {
        tracing::trace!(
            tag = step.tag,
            existing = seen,
            index = step.index,
            "synthesizing placeholder siblings"
        );
    }

    let mut last = current;
    for _ in seen..step.index {
        last = tree.append_element(current, step.tag);
    }
    last
}
