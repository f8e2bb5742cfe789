use std::fs;

use anyhow::{Context, Result};

use crate::cli::TestArgs;
use crate::codec::HuffmanCodec;
use crate::compressor::{Compressor, RoundTripTestResult};

/// Runs an in-memory roundtrip of the input file and prints a report.
///
/// Returns whether the decoded text matched the input.
pub fn test(args: TestArgs) -> Result<bool> {
    let input = fs::read_to_string(&args.input).with_context(|| format!("failed to read input file {}", args.input.display()))?;
    let codec = HuffmanCodec::new(args.strategy);

    let result = codec.test_roundtrip(&input);
    let passed = matches!(&result, Ok(eq) if eq.is_successful());
    let passed_string = if passed { "PASSED" } else { "FAILED" };

    eprintln!("======== {} {} ({}) ========", passed_string, args.input.display(), codec.compressor_name());
    match result {
        Ok(eq) => eprintln!("{}", describe(&eq)),
        Err(e) => eprintln!("\terror: {}", e),
    }

    Ok(passed)
}

fn describe(eq: &RoundTripTestResult<'_>) -> String {
    let original_size = eq.get_original().len();
    let compressed_size = eq.get_compressed().payload.len();
    let decompressed_size = eq.get_decompressed().len();
    let ratio = if original_size == 0 {
        1.0
    } else {
        compressed_size as f64 / original_size as f64
    };

    format!(
        "\toriginal: {} bytes\n\tcompressed: {} bytes ({} bits)\n\tdecompressed: {} bytes\n\tratio: {:.1}% (compressed/original)",
        original_size,
        compressed_size,
        eq.get_compressed().artifact.bit_length,
        decompressed_size,
        ratio * 100.0
    )
}
