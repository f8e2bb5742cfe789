use crate::error::{HuffmanError, Result};
use crate::huffman::{BitString, CodeTable};

if_tracing! {
    use tracing::debug;
}

/// Concatenates the code of every symbol of `text`, in order.
///
/// The bit length of the result is [`BitString::len`]; pack it with
/// [`pack_bits`](crate::huffman::pack_bits).
///
/// # Errors
///
/// Returns [`HuffmanError::SymbolNotInTable`] for the first symbol `table` has no code for.
pub fn encode(text: &str, table: &CodeTable) -> Result<BitString> {
    let mut bits = BitString::with_capacity(text.len());
    for symbol in text.chars() {
        let code = table.get(symbol).ok_or(HuffmanError::SymbolNotInTable(symbol))?;
        bits.extend_from(code);
    }

    if_tracing! {
        debug!(target: "encoder", input_len = text.len(), bit_len = bits.len(), "encode complete");
    }

    Ok(bits)
}
