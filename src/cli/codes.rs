use std::fs;

use anyhow::{Context, Result};

use crate::cli::CodesArgs;
use crate::huffman::{BitString, FrequencyTable, HuffmanTree, Symbol};

/// One line of the printed code table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeRow {
    pub symbol: Symbol,
    pub weight: u64,
    pub code: BitString,
}

/// Prints the code of every symbol of the input, most frequent first, and returns the rows.
pub fn codes(args: CodesArgs) -> Result<Vec<CodeRow>> {
    let text = fs::read_to_string(&args.input).with_context(|| format!("failed to read input file {}", args.input.display()))?;
    let frequencies = FrequencyTable::from_text(&text);
    let table = HuffmanTree::build(&frequencies).codes();

    let mut rows: Vec<CodeRow> = frequencies
        .iter()
        .filter_map(|(symbol, weight)| {
            Some(CodeRow {
                symbol,
                weight,
                code: table.get(symbol)?.clone(),
            })
        })
        .collect();
    // stable, so equal weights keep first-occurrence order
    rows.sort_by(|a, b| b.weight.cmp(&a.weight));

    for row in &rows {
        println!("{:?}\t{}\t{}", row.symbol, row.weight, row.code);
    }
    println!(
        "{} symbols, {} distinct, {} bits encoded",
        frequencies.total(),
        frequencies.len(),
        table.encoded_bit_len(&frequencies)
    );

    Ok(rows)
}
