use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::cli::EncodeArgs;
use crate::codec::HuffmanCodec;
use crate::compressor::Compressor;
use crate::huffman::{FsStore, PayloadStore};

/// Sizes of one encode run, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeReport {
    pub original_size: u64,
    pub payload_size: u64,
    pub metadata_size: u64,
}

impl EncodeReport {
    pub const fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.payload_size as i64
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent_saved = if self.original_size == 0 {
            0.0
        } else {
            self.bytes_saved() as f64 / self.original_size as f64 * 100.0
        };
        write!(
            f,
            "\toriginal: {} bytes\n\tpayload: {} bytes\n\tmetadata: {} bytes\n\tsaved: {:+} bytes ({:+.1}%)",
            self.original_size,
            self.payload_size,
            self.metadata_size,
            self.bytes_saved(),
            percent_saved
        )
    }
}

pub fn encode(args: EncodeArgs) -> Result<EncodeReport> {
    let text = fs::read_to_string(&args.input).with_context(|| format!("failed to read input file {}", args.input.display()))?;

    let metadata_dir = args.metadata.parent().unwrap_or(Path::new("")).to_path_buf();
    let payload_path = args.payload.clone().unwrap_or_else(|| default_payload_path(&args.metadata));
    let location = payload_location(&metadata_dir, &payload_path)?;

    let compressed = HuffmanCodec::default()
        .compress_text(&text, &location)
        .with_context(|| format!("failed to compress {}", args.input.display()))?;

    let mut store = FsStore::new(metadata_dir.clone());
    store
        .store(&location, &compressed.payload)
        .with_context(|| format!("failed to write payload {}", payload_path.display()))?;

    let json = compressed.artifact.to_json()?;
    fs::write(&args.metadata, &json).with_context(|| format!("failed to write metadata {}", args.metadata.display()))?;

    let report = EncodeReport {
        original_size: text.len() as u64,
        payload_size: compressed.payload.len() as u64,
        metadata_size: json.len() as u64,
    };

    if_tracing! {
        tracing::info!(event = "encode_complete", input = %args.input.display(), metadata = %args.metadata.display(), payload = %payload_path.display(), payload_len = report.payload_size, "encode finished");
    }

    Ok(report)
}

/// `{metadata stem}.huff`, next to the metadata file.
fn default_payload_path(metadata: &Path) -> PathBuf {
    let stem = metadata.file_stem().and_then(|s| s.to_str()).unwrap_or("payload");
    metadata.with_file_name(format!("{}.huff", stem))
}

/// The location to record for `payload`: relative to the metadata directory when it lives under
/// it, absolute otherwise, so decoding can resolve it against the metadata directory.
fn payload_location(metadata_dir: &Path, payload: &Path) -> Result<String> {
    let location = match payload.strip_prefix(metadata_dir) {
        Ok(relative) => relative.to_path_buf(),
        _ if payload.is_absolute() => payload.to_path_buf(),
        _ => std::env::current_dir().context("failed to resolve the current directory")?.join(payload),
    };
    location
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("payload path {} is not valid UTF-8", location.display()))
}
