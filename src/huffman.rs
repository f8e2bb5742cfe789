//! The Huffman coding core: frequency counting, tree construction, code derivation, bit
//! packing, encoding, decoding and the persisted artifact.

pub mod artifact;
pub mod bits;
pub mod code_table;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod tree;

/// One unit of the input alphabet.
pub type Symbol = char;

pub use artifact::{Artifact, FsStore, MemoryStore, PayloadStore};
pub use bits::{BitString, pack_bits, unpack_bits};
pub use code_table::CodeTable;
pub use decoder::{DecodingTree, SymbolDecoder, TableDecoder, decode, decode_prefix};
pub use encoder::encode;
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;
