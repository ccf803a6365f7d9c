//! Detection of the Solidity compiler's trailing metadata blob.
//!
//! solc appends a CBOR-encoded blob to runtime bytecode, terminated by a
//! big-endian u16 length. The blob is data, not code, so skeleton and
//! n-gram comparisons are more stable when it is sliced off first.

/// CBOR map headers that open the metadata blob (maps of 1..3 entries).
const CBOR_MAP_MARKERS: [u8; 3] = [0xa1, 0xa2, 0xa3];

/// Plausible range for the encoded metadata length. Real solc output sits
/// well inside it; values outside are treated as coincidental trailing
/// bytes.
const METADATA_LEN_RANGE: std::ops::RangeInclusive<usize> = 32..=100;

/// Minimum bytecode size worth inspecting for a trailer.
const MIN_BYTECODE_LEN: usize = 43;

/// Returns the byte offset where the trailing metadata blob begins, or
/// `None` when no plausible trailer is found.
///
/// Two strategies, tried in order: the CBOR length trailer (the last two
/// bytes encode the blob length, and the byte at the implied start must be
/// a CBOR map header), then a scan for the legacy `bzzr` swarm-hash key in
/// the final 64 bytes.
pub fn detect_metadata_offset(bytecode: &[u8]) -> Option<usize> {
    if bytecode.len() < MIN_BYTECODE_LEN {
        return None;
    }

    let trailer_len =
        u16::from_be_bytes([bytecode[bytecode.len() - 2], bytecode[bytecode.len() - 1]]) as usize;
    if METADATA_LEN_RANGE.contains(&trailer_len) && trailer_len + 2 <= bytecode.len() {
        let start = bytecode.len() - trailer_len - 2;
        if CBOR_MAP_MARKERS.contains(&bytecode[start]) {
            return Some(start);
        }
    }

    // legacy solc (< 0.5.9) blobs open with the "bzzr" swarm hash key
    let tail_start = bytecode.len().saturating_sub(64);
    let tail = &bytecode[tail_start..];
    tail.windows(4)
        .rposition(|window| window == b"bzzr")
        // back up over the CBOR map header and key prefix
        .map(|pos| (tail_start + pos).saturating_sub(2))
}
