use crate::constants::{NEGATIVE_LABEL, POSITIVE_LABEL};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A node of a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node holding the predicted class.
    Leaf { label: bool },
    /// Split on a single attribute, one child per observed bin label.
    Internal {
        attribute: String,
        children: IndexMap<String, Node>,
        /// Training examples routed to this node.
        index: Vec<usize>,
        positives: usize,
        negatives: usize,
    },
}

impl Node {
    pub fn leaf(label: bool) -> Self {
        Node::Leaf { label }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The class of a leaf.
    pub fn leaf_label(&self) -> Option<bool> {
        match self {
            Node::Leaf { label } => Some(*label),
            Node::Internal { .. } => None,
        }
    }

    /// The attribute an internal node splits on.
    pub fn split_attribute(&self) -> Option<&str> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { attribute, .. } => Some(attribute.as_str()),
        }
    }

    /// Outgoing edges as `(edge label, child)`, empty for a leaf.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        let children = match self {
            Node::Leaf { .. } => None,
            Node::Internal { children, .. } => Some(children),
        };
        children
            .into_iter()
            .flat_map(|c| c.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Child reached through the edge labelled `label`.
    pub fn child(&self, label: &str) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { children, .. } => children.get(label),
        }
    }

    /// Training examples that reached an internal node.
    pub fn examples(&self) -> &[usize] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Internal { index, .. } => index.as_slice(),
        }
    }

    pub fn n_nodes(&self) -> usize {
        1 + self.children().map(|(_, c)| c.n_nodes()).sum::<usize>()
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { .. } => self.children().map(|(_, c)| c.n_leaves()).sum(),
        }
    }

    pub fn n_internal(&self) -> usize {
        self.n_nodes() - self.n_leaves()
    }

    /// Number of edges on the longest root to leaf path.
    pub fn depth(&self) -> usize {
        self.children().map(|(_, c)| 1 + c.depth()).max().unwrap_or(0)
    }

    fn write_outline(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let indent = "      ".repeat(depth);
        for (edge, child) in self.children() {
            writeln!(f, "{}[{}] {}", indent, edge, child)?;
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }

    /// Indented outline of the subtree, one line per edge.
    pub fn outline(&self) -> String {
        struct Outline<'a>(&'a Node);
        impl Display for Outline<'_> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                writeln!(f, "{}", self.0)?;
                self.0.write_outline(f, 1)
            }
        }
        Outline(self).to_string()
    }
}

impl Display for Node {
    /// `+`/`-` for a leaf, the split attribute otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf { label: true } => write!(f, "{}", POSITIVE_LABEL),
            Node::Leaf { label: false } => write!(f, "{}", NEGATIVE_LABEL),
            Node::Internal {
                attribute,
                positives,
                negatives,
                ..
            } => write!(f, "{} (+{}/-{})", attribute, positives, negatives),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Node {
        let mut children = IndexMap::new();
        children.insert("Sunny".to_string(), Node::leaf(true));
        children.insert("Rain".to_string(), Node::leaf(false));
        Node::Internal {
            attribute: "Weather".to_string(),
            children,
            index: vec![0, 1, 2, 3],
            positives: 2,
            negatives: 2,
        }
    }

    #[test]
    fn test_accessors() {
        let node = stump();
        assert!(!node.is_leaf());
        assert_eq!(node.split_attribute(), Some("Weather"));
        assert_eq!(node.leaf_label(), None);
        let edges: Vec<(&str, Option<bool>)> = node.children().map(|(l, c)| (l, c.leaf_label())).collect();
        assert_eq!(edges, vec![("Sunny", Some(true)), ("Rain", Some(false))]);
        assert_eq!(node.child("Rain"), Some(&Node::leaf(false)));
        assert_eq!(node.child("Snow"), None);
        assert_eq!(node.examples(), &[0, 1, 2, 3]);

        let leaf = Node::leaf(true);
        assert_eq!(leaf.children().count(), 0);
        assert_eq!(leaf.split_attribute(), None);
    }

    #[test]
    fn test_counts() {
        let node = stump();
        assert_eq!(node.n_nodes(), 3);
        assert_eq!(node.n_leaves(), 2);
        assert_eq!(node.n_internal(), 1);
        assert_eq!(node.depth(), 1);
        assert_eq!(Node::leaf(false).depth(), 0);
    }

    #[test]
    fn test_outline() {
        let outline = stump().outline();
        assert_eq!(outline, "Weather (+2/-2)\n      [Sunny] +\n      [Rain] -\n");
    }
}
