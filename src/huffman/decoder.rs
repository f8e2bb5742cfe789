//! Decoding strategies.
//!
//! [`TableDecoder`] matches accumulated bits against the inverted code table. [`DecodingTree`]
//! rebuilds a tree from the persisted `(symbol, code)` pairs and walks it bit by bit. Both
//! stop after the expected number of symbols, so padding bits are never interpreted.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{HuffmanError, Result};
use crate::huffman::{BitString, CodeTable, Symbol};

if_tracing! {
    use tracing::{debug, warn};
}

/// Turns a stream of bits into symbols, one bit at a time.
pub trait SymbolDecoder {
    /// Decoding progress carried between bits, reset after each emitted symbol.
    type Cursor: Default;

    /// Consumes one bit. Returns the symbol once `bit` completes a code.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::CorruptArtifact`] if the bits read so far cannot be the start of
    /// any code.
    fn feed(&self, cursor: &mut Self::Cursor, bit: bool) -> Result<Option<Symbol>>;
}

/// Decodes exactly `expected_symbols` symbols from the front of `bits`.
///
/// Bits left over after the last symbol are ignored.
///
/// # Errors
///
/// Returns [`HuffmanError::TruncatedPayload`] if `bits` runs out first, or whatever the decoder
/// reports for a bit sequence that matches no code.
pub fn decode<D: SymbolDecoder>(bits: &BitString, decoder: &D, expected_symbols: usize) -> Result<String> {
    decode_prefix(bits, decoder, expected_symbols).map(|(text, _)| text)
}

/// Like [`decode`], but also returns how many bits the symbols occupied.
pub fn decode_prefix<D: SymbolDecoder>(bits: &BitString, decoder: &D, expected_symbols: usize) -> Result<(String, usize)> {
    let mut text = String::with_capacity(expected_symbols);
    let mut cursor = D::Cursor::default();
    let mut produced = 0;
    let mut consumed = 0;

    for bit in bits.iter() {
        if produced == expected_symbols {
            break;
        }
        consumed += 1;
        if let Some(symbol) = decoder.feed(&mut cursor, bit)? {
            text.push(symbol);
            produced += 1;
        }
    }

    if produced < expected_symbols {
        if_tracing! {
            warn!(target: "decoder", produced, expected = expected_symbols, bit_len = bits.len(), "bit stream ended early");
        }
        return Err(HuffmanError::TruncatedPayload(format!(
            "decoded {} of {} symbols before the bit stream ended",
            produced, expected_symbols
        )));
    }

    if_tracing! {
        debug!(target: "decoder", symbols = produced, consumed, bit_len = bits.len(), "decode complete");
    }

    Ok((text, consumed))
}

/// Greedy matching against the inverted code table.
#[derive(Clone, Debug)]
pub struct TableDecoder {
    inverse: HashMap<BitString, Symbol>,
    max_code_len: usize,
}

impl TableDecoder {
    pub fn new(table: &CodeTable) -> Self {
        Self {
            inverse: table.inverse(),
            max_code_len: table.max_code_len(),
        }
    }
}

impl SymbolDecoder for TableDecoder {
    type Cursor = BitString;

    fn feed(&self, pending: &mut BitString, bit: bool) -> Result<Option<Symbol>> {
        pending.push(bit);
        if let Some(&symbol) = self.inverse.get(&*pending) {
            pending.clear();
            return Ok(Some(symbol));
        }
        if pending.len() >= self.max_code_len {
            return Err(HuffmanError::CorruptArtifact(format!("bit sequence {} matches no code", pending)));
        }
        Ok(None)
    }
}

const ROOT: usize = 0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct DecodeNode {
    /// Indexed by bit: `[0]` is left, `[1]` is right.
    children: [Option<usize>; 2],
    symbol: Option<Symbol>,
}

/// A weightless tree rebuilt from `(symbol, code)` pairs, used for tree-walk decoding.
///
/// The root is synthetic and never holds a symbol, so even a one-symbol alphabet decodes
/// through a real edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodingTree {
    nodes: Vec<DecodeNode>,
}

impl Default for DecodingTree {
    fn default() -> Self {
        Self {
            nodes: vec![DecodeNode::default()],
        }
    }
}

impl DecodingTree {
    /// Rebuilds the tree from persisted pairs, creating internal nodes along each code.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::CorruptArtifact`] if a code is empty, a symbol repeats, or a code
    /// ends on or passes through a node another code already claimed.
    pub fn deserialize(pairs: &[(Symbol, BitString)]) -> Result<Self> {
        let mut tree = Self::default();
        let mut seen = HashSet::with_capacity(pairs.len());
        for (symbol, code) in pairs {
            if !seen.insert(*symbol) {
                return Err(HuffmanError::CorruptArtifact(format!("symbol {:?} appears more than once", symbol)));
            }
            tree.insert(*symbol, code)?;
        }

        if_tracing! {
            debug!(target: "decoder", symbols = pairs.len(), nodes = tree.nodes.len(), "decoding tree rebuilt");
        }

        Ok(tree)
    }

    pub fn from_table(table: &CodeTable) -> Result<Self> {
        Self::deserialize(&table.to_pairs())
    }

    fn insert(&mut self, symbol: Symbol, code: &BitString) -> Result<()> {
        if code.is_empty() {
            return Err(HuffmanError::CorruptArtifact(format!("symbol {:?} has an empty code", symbol)));
        }

        let mut current = ROOT;
        for bit in code.iter() {
            if let Some(other) = self.nodes[current].symbol {
                return Err(HuffmanError::CorruptArtifact(format!(
                    "code {} for {:?} passes through the leaf of {:?}",
                    code, symbol, other
                )));
            }
            current = match self.nodes[current].children[usize::from(bit)] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DecodeNode::default());
                    self.nodes[current].children[usize::from(bit)] = Some(child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if let Some(other) = node.symbol {
            return Err(HuffmanError::CorruptArtifact(format!(
                "code {} for {:?} collides with the leaf of {:?}",
                code, symbol, other
            )));
        }
        if node.children.iter().any(Option::is_some) {
            return Err(HuffmanError::CorruptArtifact(format!(
                "code {} for {:?} is a prefix of another code",
                code, symbol
            )));
        }
        node.symbol = Some(symbol);
        Ok(())
    }

    /// Number of symbols (leaves) in the tree.
    pub fn symbol_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.symbol.is_some()).count()
    }

    /// Reads every root-to-leaf path back into a code table.
    pub fn codes(&self) -> CodeTable {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(ROOT, BitString::new())];
        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(symbol) = node.symbol {
                codes.insert(symbol, path);
                continue;
            }
            for (bit, child) in node.children.iter().enumerate() {
                if let Some(child) = *child {
                    let mut next = path.clone();
                    next.push(bit == 1);
                    stack.push((child, next));
                }
            }
        }
        CodeTable::from_map(codes)
    }
}

impl SymbolDecoder for DecodingTree {
    type Cursor = usize;

    fn feed(&self, at: &mut usize, bit: bool) -> Result<Option<Symbol>> {
        let next = self.nodes[*at].children[usize::from(bit)]
            .ok_or_else(|| HuffmanError::CorruptArtifact("bit stream leads outside the code tree".to_string()))?;
        match self.nodes[next].symbol {
            Some(symbol) => {
                *at = ROOT;
                Ok(Some(symbol))
            }
            None => {
                *at = next;
                Ok(None)
            }
        }
    }
}
