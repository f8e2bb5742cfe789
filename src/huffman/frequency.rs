use std::collections::HashMap;

use crate::huffman::Symbol;

/// Occurrence counts for every distinct symbol of an input, kept in first-occurrence order.
///
/// Every stored weight is at least 1. Looking a symbol up never inserts it, so symbols that
/// were only queried can never reach the tree builder with a zero weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(Symbol, u64)>,
    index: HashMap<Symbol, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every `char` of `text`.
    pub fn from_text(text: &str) -> Self {
        text.chars().collect()
    }

    /// Builds a table from externally supplied counts.
    ///
    /// Zero counts are dropped and repeated symbols are summed.
    pub fn from_counts<I: IntoIterator<Item = (Symbol, u64)>>(counts: I) -> Self {
        let mut table = Self::new();
        for (symbol, count) in counts {
            if count == 0 {
                continue;
            }
            *table.entry(symbol) += count;
        }
        table
    }

    /// Lookup-or-insert: the weight slot for `symbol`, created at zero if unseen.
    fn entry(&mut self, symbol: Symbol) -> &mut u64 {
        let slot = match self.index.get(&symbol) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push((symbol, 0));
                self.index.insert(symbol, slot);
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub fn increment(&mut self, symbol: Symbol) {
        *self.entry(symbol) += 1;
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.index.get(&symbol).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights, i.e. the length of the counted input in symbols.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// `(symbol, weight)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.entries.iter().copied()
    }
}

impl FromIterator<Symbol> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Extend<Symbol> for FrequencyTable {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, iter: I) {
        for symbol in iter {
            self.increment(symbol);
        }
    }
}
