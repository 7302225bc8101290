//! Parse-tree arena.
//!
//! Nodes live in a flat table keyed by integer id and reference their
//! children by id, so the tree is acyclic by construction and serializes
//! directly.

use compact_str::CompactString;
use serde::Serialize;

/// Whether a node came from shifting a terminal or reducing a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Terminal,
    NonTerminal,
}

/// One parse-tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: usize,
    pub symbol: CompactString,
    pub kind: NodeKind,
    /// Children left-to-right in source order; empty for leaves and for
    /// ε-reductions.
    pub children: Vec<usize>,
    /// The production reduced to create this node; `None` for leaves.
    pub production: Option<usize>,
}

/// The tree built during one parse, owned by the parse outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
}

impl ParseTree {
    pub(crate) fn push_leaf(&mut self, symbol: CompactString) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            id,
            symbol,
            kind: NodeKind::Terminal,
            children: Vec::new(),
            production: None,
        });
        id
    }

    pub(crate) fn push_internal(
        &mut self,
        symbol: CompactString,
        production: usize,
        children: Vec<usize>,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            id,
            symbol,
            kind: NodeKind::NonTerminal,
            children,
            production: Some(production),
        });
        id
    }

    pub(crate) fn set_root(&mut self, id: usize) {
        self.root = Some(id);
    }

    /// All nodes in creation order; ids are indices into this slice.
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// The root node id; `None` unless the parse accepted.
    #[must_use]
    pub const fn root(&self) -> Option<usize> {
        self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The terminal frontier of the subtree at `id`, left to right.
    #[must_use]
    pub fn leaf_yield(&self, id: usize) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, id: usize, leaves: &mut Vec<&'a str>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.children.is_empty() {
            if node.kind == NodeKind::Terminal {
                leaves.push(node.symbol.as_str());
            }
            return;
        }
        for &child in &node.children {
            self.collect_leaves(child, leaves);
        }
    }

    /// Render the frontier of the subtree at `id` as a space-joined string,
    /// the way derivations are displayed.
    #[must_use]
    pub fn render(&self, id: usize) -> String {
        self.leaf_yield(id).join(" ")
    }
}
