//! Bit strings and MSB-first byte packing.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::{HuffmanError, Result};

if_tracing! {
    use tracing::debug;
}

/// The number of bits in a byte.
const BITS_PER_BYTE: usize = 8;

/// An ordered sequence of bits.
///
/// Displays and parses as text over `{0,1}`, most significant (first) bit on the left. This is
/// also how codes appear in the persisted artifact.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub const fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends every bit of `other`.
    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn reverse(&mut self) {
        self.bits.reverse();
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn starts_with(&self, prefix: &BitString) -> bool {
        self.bits.starts_with(&prefix.bits)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use core::fmt::Write;
        for &bit in &self.bits {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(\"{}\")", self)
    }
}

impl FromStr for BitString {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(HuffmanError::CorruptArtifact(format!(
                    "invalid bit character {:?} in code {:?}",
                    other, s
                ))),
            })
            .collect()
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Packs `bits` into bytes, 8 bits per byte, MSB first.
///
/// The final byte is zero-padded on the right. The bit count is not recorded in the output, so
/// callers must keep it alongside the bytes to know where the padding begins.
pub fn pack_bits(bits: &BitString) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(BITS_PER_BYTE)];
    for (index, bit) in bits.iter().enumerate() {
        if bit {
            bytes[index / BITS_PER_BYTE] |= 1 << (BITS_PER_BYTE - 1 - index % BITS_PER_BYTE);
        }
    }

    if_tracing! {
        debug!(target: "bits", bit_len = bits.len(), byte_len = bytes.len(), "packed bit string");
    }

    bytes
}

/// Reads the first `bit_length` bits back out of `bytes`, ignoring any padding after them.
///
/// # Errors
///
/// Returns [`HuffmanError::TruncatedPayload`] if `bytes` holds fewer than `bit_length` bits.
pub fn unpack_bits(bytes: &[u8], bit_length: usize) -> Result<BitString> {
    let available = bytes.len().saturating_mul(BITS_PER_BYTE);
    if bit_length > available {
        if_tracing! {
            tracing::warn!(target: "bits", bit_len = bit_length, available, "payload shorter than declared");
        }
        return Err(HuffmanError::TruncatedPayload(format!(
            "declared {} bits but the payload holds only {}",
            bit_length, available
        )));
    }

    Ok((0..bit_length)
        .map(|index| ((bytes[index / BITS_PER_BYTE] >> (BITS_PER_BYTE - 1 - index % BITS_PER_BYTE)) & 1) != 0)
        .collect())
}
