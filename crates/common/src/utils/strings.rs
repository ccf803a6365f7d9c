use eyre::{eyre, Result};
use std::fmt::Write;

/// Decodes a hex string into a vector of bytes
///
/// ```
/// use hugin_common::utils::strings::decode_hex;
///
/// let hex = "6080604052"; // a typical Solidity prologue
/// let result = decode_hex(hex).expect("should decode hex");
/// assert_eq!(result, vec![0x60, 0x80, 0x60, 0x40, 0x52]);
/// ```
pub fn decode_hex(mut s: &str) -> Result<Vec<u8>> {
    // normalize
    s = s.trim_start_matches("0x").trim();

    if s.is_empty() {
        return Ok(vec![]);
    }

    if s.len() % 2 != 0 {
        return Err(eyre!("odd-length hex string: {}", s));
    }

    // walk raw byte pairs; indexing the str would abort on multi-byte text
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(eyre!("invalid hex string: {}", s)),
        })
        .collect()
}

fn hex_digit(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Encodes a vector of bytes into a lowercase hex string
///
/// ```
/// use hugin_common::utils::strings::encode_hex;
///
/// let bytes = vec![0xa9, 0x05, 0x9c, 0xbb];
/// let result = encode_hex(&bytes);
/// assert_eq!(result, "a9059cbb");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::new(), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}
