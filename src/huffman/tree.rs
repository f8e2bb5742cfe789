//! Huffman tree construction.
//!
//! Nodes live in an arena and refer to their children by index. Parent links are stored in a
//! separate table that only code derivation reads, so the tree has a single owner and no
//! reference cycles.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::huffman::{BitString, CodeTable, FrequencyTable, Symbol};

if_tracing! {
    use tracing::debug;
}

/// Index of a node inside a [`HuffmanTree`].
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Symbol),
    /// `left` is reached with bit `0`, `right` with bit `1`.
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub kind: NodeKind,
}

impl Node {
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub const fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ParentLink {
    parent: NodeId,
    /// Bit on the edge from the parent down to this node.
    bit: bool,
}

/// Heap entry. Ties on weight fall back to node id, which is the first-occurrence order for
/// leaves and creation order for merged nodes, so a given input always builds the same tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    weight: u64,
    node: NodeId,
}

/// A Huffman tree built once from a [`FrequencyTable`] and immutable afterwards.
#[derive(Clone, Debug, Default)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    parents: Vec<Option<ParentLink>>,
    leaves: Vec<NodeId>,
    root: Option<NodeId>,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes until one root remains.
    ///
    /// An empty table gives a tree without a root. A table with a single symbol gives a tree
    /// whose root is that symbol's leaf.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut tree = Self::default();
        let mut queue = BinaryHeap::with_capacity(frequencies.len());

        for (symbol, weight) in frequencies.iter().filter(|&(_, weight)| weight > 0) {
            let node = tree.push_node(Node {
                weight,
                kind: NodeKind::Leaf(symbol),
            });
            tree.leaves.push(node);
            queue.push(Reverse(QueueEntry { weight, node }));
        }

        loop {
            let Some(Reverse(first)) = queue.pop() else {
                break;
            };
            let Some(Reverse(second)) = queue.pop() else {
                tree.root = Some(first.node);
                break;
            };
            let parent = tree.merge(first.node, second.node);
            queue.push(Reverse(QueueEntry {
                weight: tree.nodes[parent].weight,
                node: parent,
            }));
        }

        if_tracing! {
            debug!(target: "tree", leaves = tree.leaves.len(), nodes = tree.nodes.len(), "huffman tree built");
        }

        tree
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.parents.push(None);
        self.nodes.len() - 1
    }

    /// Creates a parent over `left` (bit `0`) and `right` (bit `1`) weighing their sum.
    fn merge(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let weight = self.nodes[left].weight + self.nodes[right].weight;
        let parent = self.push_node(Node {
            weight,
            kind: NodeKind::Internal { left, right },
        });
        self.parents[left] = Some(ParentLink { parent, bit: false });
        self.parents[right] = Some(ParentLink { parent, bit: true });
        parent
    }

    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Leaf ids in first-occurrence order of their symbols.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Total number of nodes, leaves and internal nodes together.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied().flatten().map(|link| link.parent)
    }

    /// The code of leaf `id`, read root to leaf.
    ///
    /// Walks parent links up from the leaf, collecting the edge bits, then reverses them.
    /// Returns `None` for internal nodes and unknown ids. A leaf that is also the root (a
    /// single-symbol alphabet) gets the one-bit code `0`.
    pub fn code_of(&self, id: NodeId) -> Option<BitString> {
        if !self.nodes.get(id)?.is_leaf() {
            return None;
        }
        if self.root == Some(id) {
            return Some(BitString::from_iter([false]));
        }

        let mut code = BitString::new();
        let mut current = id;
        while let Some(link) = self.parents[current] {
            code.push(link.bit);
            current = link.parent;
        }
        code.reverse();
        Some(code)
    }

    /// The full symbol-to-code mapping.
    pub fn codes(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    /// `(symbol, code)` for every leaf, in first-occurrence order.
    ///
    /// This is enough to rebuild a decoding tree, weights are not needed.
    pub fn serialize(&self) -> Vec<(Symbol, BitString)> {
        self.leaves
            .iter()
            .filter_map(|&id| Some((self.nodes[id].symbol()?, self.code_of(id)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(tree: &HuffmanTree, symbol: Symbol) -> String {
        tree.codes().get(symbol).unwrap().to_string()
    }

    #[test]
    fn builds_expected_codes_for_small_input() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("aabbbcc"));
        assert_eq!(code(&tree, 'b'), "0");
        assert_eq!(code(&tree, 'a'), "10");
        assert_eq!(code(&tree, 'c'), "11");
    }

    #[test]
    fn root_weight_is_total_weight() {
        let frequencies = FrequencyTable::from_text("abracadabra");
        let tree = HuffmanTree::build(&frequencies);
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).unwrap().weight, frequencies.total());
    }

    #[test]
    fn structural_invariants_hold() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("the quick brown fox jumps over the lazy dog"));
        let root = tree.root().unwrap();
        let mut child_count = vec![0usize; tree.len()];

        for id in 0..tree.len() {
            match tree.node(id).unwrap().kind {
                NodeKind::Leaf(_) => {}
                NodeKind::Internal { left, right } => {
                    assert_ne!(left, right);
                    assert_eq!(tree.parent(left), Some(id));
                    assert_eq!(tree.parent(right), Some(id));
                    child_count[left] += 1;
                    child_count[right] += 1;
                }
            }
            if id == root {
                assert_eq!(tree.parent(id), None);
            } else {
                assert!(tree.parent(id).is_some(), "node {} has no parent", id);
            }
        }

        assert_eq!(child_count[root], 0);
        assert!(child_count.iter().enumerate().all(|(id, &count)| id == root || count == 1));
        // n leaves need exactly n - 1 merges
        assert_eq!(tree.len(), 2 * tree.leaves().len() - 1);
    }

    #[test]
    fn single_symbol_gets_one_bit_code() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("aaaa"));
        assert_eq!(tree.root(), Some(tree.leaves()[0]));
        assert_eq!(code(&tree, 'a'), "0");
    }

    #[test]
    fn empty_table_builds_rootless_tree() {
        let tree = HuffmanTree::build(&FrequencyTable::new());
        assert_eq!(tree.root(), None);
        assert!(tree.is_empty());
        assert!(tree.codes().is_empty());
        assert!(tree.serialize().is_empty());
    }

    #[test]
    fn internal_nodes_have_no_code() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("abc"));
        assert_eq!(tree.code_of(tree.root().unwrap()), None);
        assert_eq!(tree.code_of(tree.len() + 10), None);
    }

    #[test]
    fn zero_weight_symbols_are_left_out() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([('a', 3), ('z', 0), ('b', 1)]));
        assert_eq!(tree.leaves().len(), 2);
        assert!(tree.codes().get('z').is_none());
    }

    #[test]
    fn serialize_follows_first_occurrence_order() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text("aabbbcc"));
        let pairs: Vec<(Symbol, String)> = tree.serialize().into_iter().map(|(s, c)| (s, c.to_string())).collect();
        assert_eq!(
            pairs,
            vec![('a', "10".to_string()), ('b', "0".to_string()), ('c', "11".to_string())]
        );
    }

    #[test]
    fn same_input_builds_same_codes() {
        let text = "mississippi river banks";
        let first = HuffmanTree::build(&FrequencyTable::from_text(text)).codes();
        let second = HuffmanTree::build(&FrequencyTable::from_text(text)).codes();
        assert_eq!(first, second);
    }
}
