use std::collections::{BTreeMap, HashMap};

use crate::error::{HuffmanError, Result};
use crate::huffman::{BitString, FrequencyTable, HuffmanTree, Symbol};

/// Symbol-to-code mapping derived from a Huffman tree.
///
/// No code is a prefix of another. Tables built from a tree get this from the leaf structure;
/// tables read back from pairs are checked for it by [`CodeTable::from_pairs`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, BitString>,
}

impl CodeTable {
    /// Derives the code of every leaf of `tree`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        for &leaf in tree.leaves() {
            if let (Some(symbol), Some(code)) = (tree.node(leaf).and_then(|node| node.symbol()), tree.code_of(leaf)) {
                codes.insert(symbol, code);
            }
        }
        Self { codes }
    }

    /// Rebuilds a table from persisted `(symbol, code)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::CorruptArtifact`] on an empty code, a repeated symbol, or two codes
    /// where one is a prefix of (or equal to) the other.
    pub fn from_pairs(pairs: &[(Symbol, BitString)]) -> Result<Self> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in pairs {
            if code.is_empty() {
                return Err(HuffmanError::CorruptArtifact(format!("symbol {:?} has an empty code", symbol)));
            }
            if codes.insert(*symbol, code.clone()).is_some() {
                return Err(HuffmanError::CorruptArtifact(format!("symbol {:?} appears more than once", symbol)));
            }
        }

        let table = Self { codes };
        if let Some(((short_symbol, short), (long_symbol, long))) = table.find_prefix_collision() {
            return Err(HuffmanError::CorruptArtifact(format!(
                "code {} for {:?} collides with code {} for {:?}",
                short, short_symbol, long, long_symbol
            )));
        }
        Ok(table)
    }

    pub(crate) fn from_map(codes: BTreeMap<Symbol, BitString>) -> Self {
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitString> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitString)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(BitString::len).max().unwrap_or(0)
    }

    /// The code-to-symbol mapping used by table-driven decoding.
    pub fn inverse(&self) -> HashMap<BitString, Symbol> {
        self.codes.iter().map(|(&symbol, code)| (code.clone(), symbol)).collect()
    }

    pub fn to_pairs(&self) -> Vec<(Symbol, BitString)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.clone())).collect()
    }

    pub fn is_prefix_free(&self) -> bool {
        self.find_prefix_collision().is_none()
    }

    /// After sorting, a code that prefixes any other code also prefixes its direct successor,
    /// so comparing neighbours is enough.
    fn find_prefix_collision(&self) -> Option<((Symbol, &BitString), (Symbol, &BitString))> {
        let mut sorted: Vec<(Symbol, &BitString)> = self.iter().collect();
        sorted.sort_by(|a, b| a.1.cmp(b.1));
        sorted
            .windows(2)
            .find(|pair| pair[1].1.starts_with(pair[0].1))
            .map(|pair| (pair[0], pair[1]))
    }

    /// Number of bits needed to encode an input with the given symbol counts.
    ///
    /// Symbols missing from the table are ignored.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, weight)| Some(weight * self.get(symbol)?.len() as u64))
            .sum()
    }
}
