//! The full compress/decompress pipeline behind the [`Compressor`] trait.

use crate::compressor::Compressor;
use crate::error::{HuffmanError, Result};
use crate::huffman::{Artifact, FrequencyTable, HuffmanTree, TableDecoder, decode_prefix, encode, pack_bits, unpack_bits};

if_tracing! {
    use tracing::{Level, info, span};
}

/// Which decoder [`HuffmanCodec`] uses to turn payload bits back into text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DecodeStrategy {
    /// Greedy matching against the inverted code table.
    #[default]
    Table,
    /// Walking a tree rebuilt from the persisted codes.
    Tree,
}

/// Output of one compression run: the metadata record and the packed payload it describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compressed {
    pub artifact: Artifact,
    pub payload: Vec<u8>,
}

/// Huffman coding of text, one independent tree per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct HuffmanCodec {
    strategy: DecodeStrategy,
}

impl HuffmanCodec {
    pub const fn new(strategy: DecodeStrategy) -> Self {
        Self { strategy }
    }
}

impl Compressor for HuffmanCodec {
    fn compress_text(&self, text: &str, location: &str) -> Result<Compressed> {
        if_tracing! {
            let span = span!(Level::INFO, "compress", input_len = text.len());
            let _enter = span.enter();
        }

        if text.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let frequencies = FrequencyTable::from_text(text);
        let tree = HuffmanTree::build(&frequencies);
        let bits = encode(text, &tree.codes())?;
        let payload = pack_bits(&bits);
        let original_length = text.chars().count();

        if_tracing! {
            info!(symbols = original_length, distinct = frequencies.len(), bit_len = bits.len(), payload_len = payload.len(), "compress finished");
        }

        Ok(Compressed {
            artifact: Artifact::new(location, tree.serialize(), original_length, bits.len()),
            payload,
        })
    }

    fn decompress_text(&self, artifact: &Artifact, payload: &[u8]) -> Result<String> {
        if_tracing! {
            let span = span!(Level::INFO, "decompress", strategy = ?self.strategy, payload_len = payload.len());
            let _enter = span.enter();
        }

        let table = artifact.validate()?;
        let bits = unpack_bits(payload, artifact.bit_length)?;
        let (text, consumed) = match self.strategy {
            DecodeStrategy::Table => decode_prefix(&bits, &TableDecoder::new(&table), artifact.original_length)?,
            DecodeStrategy::Tree => decode_prefix(&bits, &artifact.decoding_tree()?, artifact.original_length)?,
        };
        if consumed != artifact.bit_length {
            return Err(HuffmanError::CorruptArtifact(format!(
                "{} symbols occupy {} bits but the record declares {}",
                artifact.original_length, consumed, artifact.bit_length
            )));
        }

        if_tracing! {
            info!(symbols = artifact.original_length, output_len = text.len(), "decompress finished");
        }

        Ok(text)
    }

    fn compressor_name(&self) -> String {
        format!("huffman ({:?} decoding)", self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_tests_table() {
        crate::tests::roundtrip_test(HuffmanCodec::new(DecodeStrategy::Table));
    }

    #[test]
    fn roundtrip_tests_tree() {
        crate::tests::roundtrip_test(HuffmanCodec::new(DecodeStrategy::Tree));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = HuffmanCodec::default().compress_text("", "x.huff").unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput), "{:?}", err);
    }

    #[test]
    fn artifact_describes_the_payload() {
        let compressed = HuffmanCodec::default().compress_text("aabbbcc", "out.huff").unwrap();
        assert_eq!(compressed.artifact.encoded_data_location, "out.huff");
        assert_eq!(compressed.artifact.original_length, 7);
        assert_eq!(compressed.artifact.bit_length, 11);
        // 10 10 0 0 0 11 11, zero padded
        assert_eq!(compressed.payload, vec![0b1010_0001, 0b1110_0000]);
    }

    #[test]
    fn single_symbol_text_survives() {
        let codec = HuffmanCodec::new(DecodeStrategy::Tree);
        let compressed = codec.compress_text("aaaa", "a.huff").unwrap();
        assert_eq!(compressed.artifact.bit_length, 4);
        assert_eq!(compressed.payload, vec![0]);
        assert_eq!(codec.decompress_text(&compressed.artifact, &compressed.payload).unwrap(), "aaaa");
    }

    #[test]
    fn truncated_payload_is_detected() {
        for strategy in [DecodeStrategy::Table, DecodeStrategy::Tree] {
            let codec = HuffmanCodec::new(strategy);
            let compressed = codec.compress_text("the quick brown fox", "fox.huff").unwrap();
            let short = &compressed.payload[..compressed.payload.len() - 1];
            let err = codec.decompress_text(&compressed.artifact, short).unwrap_err();
            assert!(matches!(err, HuffmanError::TruncatedPayload(_)), "{:?}", err);
        }
    }

    #[test]
    fn overstated_bit_length_is_malformed() {
        for strategy in [DecodeStrategy::Table, DecodeStrategy::Tree] {
            let codec = HuffmanCodec::new(strategy);
            let mut compressed = codec.compress_text("aabbbcc", "out.huff").unwrap();
            for declared in [12, 14] {
                // still within 7 symbols of 1 to 2 bits, and within the two payload bytes
                compressed.artifact.bit_length = declared;
                assert!(compressed.artifact.validate().is_ok());
                let err = codec.decompress_text(&compressed.artifact, &compressed.payload).unwrap_err();
                assert!(matches!(err, HuffmanError::CorruptArtifact(_)), "{:?} with {}: {:?}", strategy, declared, err);
            }
        }
    }

    #[test]
    fn understated_bit_length_is_malformed() {
        let codec = HuffmanCodec::default();
        let mut compressed = codec.compress_text("aabbbcc", "out.huff").unwrap();
        // 10 bits end mid-code for the final "c"
        compressed.artifact.bit_length = 10;
        assert!(codec.decompress_text(&compressed.artifact, &compressed.payload).is_err());
    }

    #[test]
    fn artifact_survives_json_between_runs() {
        let codec = HuffmanCodec::default();
        let compressed = codec.compress_text("peter piper picked a peck", "peck.huff").unwrap();
        let json = compressed.artifact.to_json().unwrap();
        let artifact = Artifact::from_json(&json).unwrap();

        let text = HuffmanCodec::new(DecodeStrategy::Tree)
            .decompress_text(&artifact, &compressed.payload)
            .unwrap();
        assert_eq!(text, "peter piper picked a peck");
    }

    #[test]
    fn huffman_beats_fixed_width_on_skewed_text() {
        let text = "aaaaaaaaaaaaaaaaaaaabbbbbbbbccccdde";
        let compressed = HuffmanCodec::default().compress_text(text, "x").unwrap();
        let distinct = FrequencyTable::from_text(text).len();
        let fixed_width = (usize::BITS - (distinct - 1).leading_zeros()) as usize;
        assert!(compressed.artifact.bit_length <= fixed_width * text.len());
    }
}
