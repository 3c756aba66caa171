// Bytes to hex and back, for the wire framing.

use std::fmt::Write;

use crate::error_types::protocol::HexError;

/// Lowercase hex, two digits per byte, no separators.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decode a hex payload. Embedded whitespace is ignored, case is not
/// significant. The digit count after stripping whitespace must be even.
pub(crate) fn hex_to_bytes(text: &str) -> Result<Vec<u8>, HexError> {
    let mut digits = Vec::with_capacity(text.len());
    for character in text.chars() {
        if character.is_whitespace() {
            continue;
        }
        let value = character.to_digit(16).ok_or(HexError::BadDigit(character))?;
        digits.push(value as u8);
    }

    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }

    Ok(digits.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}
