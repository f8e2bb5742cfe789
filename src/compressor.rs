use crate::codec::Compressed;
use crate::error::Result;
use crate::huffman::Artifact;

/// Location recorded in artifacts produced by [`Compressor::test_roundtrip`], which never
/// leave memory.
const ROUNDTRIP_LOCATION: &str = "roundtrip.huff";

/// Represents shared behavior for text compressors that persist a metadata [`Artifact`] next to
/// a raw payload.
///
/// Provides [`compress_text`](Compressor::compress_text) to encode text and
/// [`decompress_text`](Compressor::decompress_text) to decode it again.
pub trait Compressor {
    /// Compresses `text`, recording `location` as the place the payload will be stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be represented, e.g. it is empty.
    fn compress_text(&self, text: &str, location: &str) -> Result<Compressed>;

    /// Reconstructs the original text from an artifact and the payload it refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact is malformed or the payload is shorter than it declares.
    fn decompress_text(&self, artifact: &Artifact, payload: &[u8]) -> Result<String>;

    /// Returns the name of the compressor.
    /// Use for debugging purposes.
    ///
    /// Defaults to the type name of the compressor.
    fn compressor_name(&self) -> String {
        core::any::type_name::<Self>().to_string()
    }

    /// Performs a round-trip test on the compressor.
    ///
    /// Use for sanity checking the compressor and decompressor.
    fn test_roundtrip<'orig>(&self, text: &'orig str) -> Result<RoundTripTestResult<'orig>> {
        let compressed = self.compress_text(text, ROUNDTRIP_LOCATION)?;
        let decompressed = self.decompress_text(&compressed.artifact, &compressed.payload)?;
        let equal = text == decompressed;

        Ok(RoundTripTestResult {
            equal,
            original: text,
            compressed,
            decompressed,
        })
    }
}

/// Represents the result of a round-trip test.
///
/// Use accessor methods to retrieve the [`result`][RoundTripTestResult::is_successful],
/// the [`original text`][RoundTripTestResult::get_original],
/// the [`compressed form`][RoundTripTestResult::get_compressed],
/// and the [`decompressed text`][RoundTripTestResult::get_decompressed].
#[derive(Clone, Debug)]
pub struct RoundTripTestResult<'orig> {
    pub(crate) equal: bool,
    pub(crate) original: &'orig str,
    pub(crate) compressed: Compressed,
    pub(crate) decompressed: String,
}

impl<'orig> RoundTripTestResult<'orig> {
    /// Whether the original and decompressed text were equal.
    pub const fn is_successful(&self) -> bool {
        self.equal
    }

    /// The original text before any action was taken.
    pub const fn get_original(&self) -> &'orig str {
        self.original
    }

    /// The artifact and payload produced by the compressor.
    pub const fn get_compressed(&self) -> &Compressed {
        &self.compressed
    }

    /// The text after it has been decoded by the decompressor.
    pub fn get_decompressed(&self) -> &str {
        self.decompressed.as_str()
    }
}
