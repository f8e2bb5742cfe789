//! # huffpack
//!
//! Huffman coding for text. A run counts symbol frequencies, builds a Huffman tree, derives a
//! prefix-free code table, and packs the encoded bit stream MSB-first into bytes. The code
//! table and the bookkeeping needed to decode are persisted as a small JSON [`Artifact`], kept
//! separate from the raw payload bytes.
//!
//! ```
//! use huffpack::{Compressor, HuffmanCodec};
//!
//! let codec = HuffmanCodec::default();
//! let compressed = codec.compress_text("aabbbcc", "sample.huff")?;
//! let text = codec.decompress_text(&compressed.artifact, &compressed.payload)?;
//! assert_eq!(text, "aabbbcc");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

/// Expands its body only when the `tracing` feature is enabled.
#[macro_export]
macro_rules! if_tracing {
    {$($body:tt)*} => {
        ::cfg_if::cfg_if! {
            if #[cfg(feature = "tracing")] {
                $($body)*
            }
        }
    };
}

pub mod cli;
pub mod codec;
pub mod compressor;
pub mod error;
pub mod huffman;


pub use codec::{Compressed, DecodeStrategy, HuffmanCodec};
pub use compressor::{Compressor, RoundTripTestResult};
pub use error::{HuffmanError, Result};
pub use huffman::{
    Artifact, BitString, CodeTable, DecodingTree, FrequencyTable, FsStore, HuffmanTree, MemoryStore, PayloadStore, Symbol,
    SymbolDecoder, TableDecoder, decode, decode_prefix, encode, pack_bits, unpack_bits,
};
