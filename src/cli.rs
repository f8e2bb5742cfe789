//! cli component of the huffpack project.
//!
//! `$exename` stands for the executable name, which is `huffpack` in linux or `huffpack.exe` on
//! windows. `<description>` denotes a required argument, while `[description]` denotes an
//! optional argument.
//!
//! # Compression
//!
//! > `$exename enc <path to text file> <metadata output path> [--payload <payload output path>]`
//!
//! the input is read as UTF-8 text and compressed with a huffman code built from its own symbol
//! frequencies. two files are written: the raw bit-packed payload, and a json metadata file
//! holding the `(symbol, code)` table, the original symbol count, the payload bit length and the
//! payload location. if `--payload` is omitted the payload goes next to the metadata file as
//! `{metadata stem}.huff`. the payload location is stored relative to the metadata file's
//! directory whenever possible, so the pair can be moved together.
//!
//! # Decompression
//!
//! > `$exename dec <path to metadata file> <output path> [--strategy table|tree]`
//!
//! the metadata is read and validated, the payload is loaded from the recorded location
//! (relative locations resolve against the metadata file's directory), and the text is decoded
//! either by greedy matching against the code table (`table`, the default) or by walking a tree
//! rebuilt from the codes (`tree`).
//!
//! # Testing
//!
//! > `$exename test <path to text file> [--strategy table|tree]`
//!
//! compresses and immediately decompresses the file in memory, then reports whether the
//! roundtrip reproduced the input along with the sizes involved.
//!
//! # Inspecting codes
//!
//! > `$exename codes <path to text file>`
//!
//! prints every symbol with its weight and code, most frequent first.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::codec::DecodeStrategy;

pub mod codes;
pub mod decode;
pub mod encode;
pub mod test;

/// CLI arguments for the huffpack application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands for huffpack
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode (compress) a text file into a payload and a json metadata file
    #[command(alias = "enc")]
    Encode(EncodeArgs),

    /// Decode (decompress) a payload described by a json metadata file
    #[command(alias = "dec")]
    Decode(DecodeArgs),

    /// Test compression/decompression roundtrip
    Test(TestArgs),

    /// Print the code table built for a text file
    Codes(CodesArgs),
}

/// Arguments specific to the encode command
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Path to the input text file
    pub input: PathBuf,

    /// Path for the json metadata file
    pub metadata: PathBuf,

    /// Path for the packed payload (defaults to `{metadata stem}.huff` next to the metadata)
    #[arg(long)]
    pub payload: Option<PathBuf>,
}

/// Arguments specific to the decode command
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Path to the json metadata file
    pub metadata: PathBuf,

    /// Path for the decoded text
    pub output: PathBuf,

    /// Decoding strategy
    #[arg(long, value_enum, default_value_t = DecodeStrategy::Table)]
    pub strategy: DecodeStrategy,
}

/// Arguments specific to the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Path to the input text file
    pub input: PathBuf,

    /// Decoding strategy
    #[arg(long, value_enum, default_value_t = DecodeStrategy::Table)]
    pub strategy: DecodeStrategy,
}

/// Arguments specific to the codes command
#[derive(Args, Debug)]
pub struct CodesArgs {
    /// Path to the input text file
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!("huffpack-cli-{}-{}", std::process::id(), name));
            let _ = fs::remove_dir_all(&path);
            fs::create_dir_all(&path).unwrap();
            TempDir(path)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    const TEXT: &str = "It was the best of times, it was the worst of times.\n";

    #[test]
    fn parses_subcommands_and_aliases() {
        let cli = Cli::parse_from(["huffpack", "dec", "meta.json", "out.txt", "--strategy", "tree"]);
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.metadata, PathBuf::from("meta.json"));
                assert_eq!(args.strategy, DecodeStrategy::Tree);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["huffpack", "enc", "in.txt", "meta.json"]);
        assert!(matches!(cli.command, Command::Encode(EncodeArgs { payload: None, .. })));
    }

    #[test]
    fn encode_then_decode_through_files() {
        let dir = TempDir::new("roundtrip");
        let input = dir.path().join("input.txt");
        let metadata = dir.path().join("input.json");
        let output = dir.path().join("output.txt");
        fs::write(&input, TEXT).unwrap();

        let report = super::encode::encode(EncodeArgs {
            input: input.clone(),
            metadata: metadata.clone(),
            payload: None,
        })
        .unwrap();
        assert_eq!(report.original_size, TEXT.len() as u64);
        assert!(report.payload_size < report.original_size);
        assert!(dir.path().join("input.huff").exists());

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&metadata).unwrap()).unwrap();
        assert_eq!(json["encoded_data_location"], "input.huff");

        for strategy in [DecodeStrategy::Table, DecodeStrategy::Tree] {
            super::decode::decode(DecodeArgs {
                metadata: metadata.clone(),
                output: output.clone(),
                strategy,
            })
            .unwrap();
            assert_eq!(fs::read_to_string(&output).unwrap(), TEXT);
        }
    }

    #[test]
    fn payload_in_another_directory_is_found() {
        let dir = TempDir::new("elsewhere");
        fs::create_dir_all(dir.path().join("meta")).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        let input = dir.path().join("input.txt");
        let metadata = dir.path().join("meta").join("input.json");
        let payload = dir.path().join("data").join("input.bin");
        let output = dir.path().join("output.txt");
        fs::write(&input, TEXT).unwrap();

        super::encode::encode(EncodeArgs {
            input,
            metadata: metadata.clone(),
            payload: Some(payload.clone()),
        })
        .unwrap();
        assert!(payload.exists());

        super::decode::decode(DecodeArgs {
            metadata,
            output: output.clone(),
            strategy: DecodeStrategy::Table,
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), TEXT);
    }

    #[test]
    fn decode_fails_when_payload_is_missing() {
        let dir = TempDir::new("missing");
        let input = dir.path().join("input.txt");
        let metadata = dir.path().join("input.json");
        fs::write(&input, TEXT).unwrap();

        super::encode::encode(EncodeArgs {
            input,
            metadata: metadata.clone(),
            payload: None,
        })
        .unwrap();
        fs::remove_file(dir.path().join("input.huff")).unwrap();

        let err = super::decode::decode(DecodeArgs {
            metadata,
            output: dir.path().join("output.txt"),
            strategy: DecodeStrategy::Table,
        })
        .unwrap_err();
        assert!(
            matches!(err.downcast_ref::<crate::HuffmanError>(), Some(crate::HuffmanError::CorruptArtifact(_))),
            "{:#}",
            err
        );
    }

    #[test]
    fn encode_rejects_empty_files() {
        let dir = TempDir::new("empty");
        let input = dir.path().join("empty.txt");
        fs::write(&input, "").unwrap();

        let err = super::encode::encode(EncodeArgs {
            input,
            metadata: dir.path().join("empty.json"),
            payload: None,
        })
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<crate::HuffmanError>(), Some(crate::HuffmanError::EmptyInput)));
    }

    #[test]
    fn test_and_codes_commands_succeed() {
        let dir = TempDir::new("test-codes");
        let input = dir.path().join("input.txt");
        fs::write(&input, TEXT).unwrap();

        assert!(
            super::test::test(TestArgs {
                input: input.clone(),
                strategy: DecodeStrategy::Tree,
            })
            .unwrap()
        );
        let rows = super::codes::codes(CodesArgs { input }).unwrap();
        assert_eq!(rows.first().map(|row| row.symbol), Some(' '));
    }
}
