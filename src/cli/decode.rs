use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::DecodeArgs;
use crate::codec::HuffmanCodec;
use crate::compressor::Compressor;
use crate::huffman::{Artifact, FsStore};

pub fn decode(args: DecodeArgs) -> Result<()> {
    let metadata_path = &args.metadata;
    let output_path = &args.output;

    let json = fs::read_to_string(metadata_path)
        .with_context(|| format!("failed to read metadata file {}", metadata_path.display()))?;
    let artifact = Artifact::from_json(&json).with_context(|| format!("failed to parse {}", metadata_path.display()))?;

    let store = FsStore::new(metadata_path.parent().unwrap_or(Path::new("")));
    let payload = artifact.load_payload(&store)?;

    let text = HuffmanCodec::new(args.strategy)
        .decompress_text(&artifact, &payload)
        .with_context(|| format!("failed to decode {}", metadata_path.display()))?;

    if_tracing! {
        tracing::info!(event = "decode_complete", metadata = %metadata_path.display(), output = %output_path.display(), strategy = ?args.strategy, decoded_len = text.len(), "decode finished");
    }

    fs::write(output_path, text).with_context(|| format!("failed to write output file {}", output_path.display()))?;
    Ok(())
}
