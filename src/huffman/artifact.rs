//! The persisted form of a compression run.
//!
//! An [`Artifact`] is the JSON metadata record: the `(symbol, code)` pairs, the original
//! symbol count, the payload bit length and the location of the payload. The payload itself
//! is raw bytes, written and read through a [`PayloadStore`].

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};
use crate::huffman::{BitString, CodeTable, DecodingTree, Symbol};

if_tracing! {
    use tracing::{debug, warn};
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Where the packed payload lives, as understood by the [`PayloadStore`] that wrote it.
    pub encoded_data_location: String,

    /// `(symbol, code)` for every leaf of the tree.
    pub huffman_tree: Vec<(Symbol, BitString)>,

    /// Number of symbols in the original text.
    pub original_length: usize,

    /// Number of meaningful bits in the payload. Anything after them is padding.
    pub bit_length: usize,
}

impl Artifact {
    pub fn new(
        encoded_data_location: impl Into<String>,
        huffman_tree: Vec<(Symbol, BitString)>,
        original_length: usize,
        bit_length: usize,
    ) -> Self {
        Self {
            encoded_data_location: encoded_data_location.into(),
            huffman_tree,
            original_length,
            bit_length,
        }
    }

    /// Checks the record for internal consistency and returns its code table.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::CorruptArtifact`] if the pair list is empty, the codes are not a
    /// valid prefix-free table, or `bit_length` cannot hold `original_length` symbols of the
    /// table's code lengths.
    pub fn validate(&self) -> Result<CodeTable> {
        if self.huffman_tree.is_empty() {
            return Err(HuffmanError::CorruptArtifact("the code table is empty".to_string()));
        }
        let table = CodeTable::from_pairs(&self.huffman_tree)?;

        let shortest = table.iter().map(|(_, code)| code.len()).min().unwrap_or(0);
        let min_bits = self.original_length.saturating_mul(shortest);
        let max_bits = self.original_length.saturating_mul(table.max_code_len());
        if self.bit_length < min_bits || self.bit_length > max_bits {
            if_tracing! {
                warn!(target: "artifact", bit_len = self.bit_length, min_bits, max_bits, "declared bit length out of range");
            }
            return Err(HuffmanError::CorruptArtifact(format!(
                "{} bits cannot encode {} symbols with codes of {} to {} bits",
                self.bit_length,
                self.original_length,
                shortest,
                table.max_code_len()
            )));
        }

        Ok(table)
    }

    /// Rebuilds the weightless tree for tree-walk decoding.
    pub fn decoding_tree(&self) -> Result<DecodingTree> {
        DecodingTree::deserialize(&self.huffman_tree)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(malformed)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(malformed)
    }

    /// Fetches the payload this artifact points at.
    pub fn load_payload<S: PayloadStore + ?Sized>(&self, store: &S) -> Result<Vec<u8>> {
        store.load(&self.encoded_data_location)
    }
}

/// I/O failures stay I/O errors, anything else about the JSON means the record is malformed.
fn malformed(error: serde_json::Error) -> HuffmanError {
    if error.is_io() {
        HuffmanError::Io(error.into())
    } else {
        HuffmanError::CorruptArtifact(error.to_string())
    }
}

/// Somewhere packed payloads can be written to and read back from by location.
pub trait PayloadStore {
    fn store(&mut self, location: &str, payload: &[u8]) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`HuffmanError::CorruptArtifact`] if nothing readable exists at `location`.
    fn load(&self, location: &str) -> Result<Vec<u8>>;
}

/// Payloads as files. Relative locations resolve against `base`.
#[derive(Clone, Debug)]
pub struct FsStore {
    base: PathBuf,
}

impl FsStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() { path.to_path_buf() } else { self.base.join(path) }
    }
}

impl PayloadStore for FsStore {
    fn store(&mut self, location: &str, payload: &[u8]) -> Result<()> {
        let path = self.resolve(location);
        fs::write(&path, payload)?;
        if_tracing! {
            debug!(target: "artifact", path = %path.display(), byte_len = payload.len(), "payload stored");
        }
        Ok(())
    }

    fn load(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.resolve(location);
        fs::read(&path).map_err(|e| {
            HuffmanError::CorruptArtifact(format!("payload {} is missing or unreadable: {}", path.display(), e))
        })
    }
}

/// Payloads kept in memory, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    payloads: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayloadStore for MemoryStore {
    fn store(&mut self, location: &str, payload: &[u8]) -> Result<()> {
        self.payloads.insert(location.to_string(), payload.to_vec());
        Ok(())
    }

    fn load(&self, location: &str) -> Result<Vec<u8>> {
        self.payloads
            .get(location)
            .cloned()
            .ok_or_else(|| HuffmanError::CorruptArtifact(format!("payload {:?} is missing", location)))
    }
}
