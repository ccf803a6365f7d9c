//! Opportunistic extraction of function selectors and event topic prefixes
//! from a decoded instruction stream.
//!
//! Both extractors are deliberately permissive: a false positive costs one
//! spurious set entry that downstream scoring weighs against other signals,
//! while a false negative loses real evidence. The dispatcher heuristic
//! therefore accepts several overlapping comparison shapes that different
//! compiler generations emitted.

use hashbrown::HashSet;
use hugin_common::{
    opcodes::{is_push, DUP2, DUP3, EQ, JUMPI, LOG1, LOG4, PUSH32, PUSH4},
    utils::strings::encode_hex,
};
use tracing::trace;

use super::Instruction;

/// Values that show up as PUSH4 immediates far too often to be selectors.
const SELECTOR_SENTINELS: [&str; 2] = ["00000000", "ffffffff"];

/// How many instructions before a LOG to scan for a PUSH32 topic. Bounding
/// the lookback keeps the whole scan linear.
const EVENT_TOPIC_LOOKBACK: usize = 10;

/// Extract the selector set and the event-topic-prefix set in one pass.
pub(crate) fn extract(instructions: &[Instruction]) -> (HashSet<String>, HashSet<String>) {
    let selectors = extract_selectors(instructions);
    let event_topics = extract_event_topics(instructions);
    trace!(
        "extracted {} selectors and {} event topic prefixes",
        selectors.len(),
        event_topics.len()
    );
    (selectors, event_topics)
}

/// Find 4-byte immediates that look like function dispatch comparisons.
///
/// A PUSH4 counts as a selector when the following few instructions form
/// any of the comparison shapes seen in dispatchers: an `EQ` directly
/// followed by a jump-target push and `JUMPI`, an `EQ` preceded by a
/// `DUP2`/`DUP3`, or a bare `EQ` right after the push. The shapes overlap;
/// the union is kept as-is since each hedges against a different compiler
/// output.
pub(crate) fn extract_selectors(instructions: &[Instruction]) -> HashSet<String> {
    let mut selectors = HashSet::new();

    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != PUSH4 {
            continue;
        }
        let immediate = match instruction.immediate.as_deref() {
            Some(imm) if imm.len() == 4 => imm,
            _ => continue,
        };

        let window: Vec<u8> =
            instructions[i + 1..].iter().take(3).map(|next| next.opcode).collect();

        let eq_push_jumpi =
            matches!(window.as_slice(), [EQ, target, JUMPI] if is_push(*target));
        let dup_then_eq = matches!(window.as_slice(), [DUP2 | DUP3, EQ, ..]);
        let bare_eq = window.first() == Some(&EQ);

        if eq_push_jumpi || dup_then_eq || bare_eq {
            let selector = encode_hex(immediate);
            if !SELECTOR_SENTINELS.contains(&selector.as_str()) {
                selectors.insert(selector);
            }
        }
    }

    selectors
}

/// Find topic prefixes for LOG1..LOG4 instructions.
///
/// For each LOG, the nearest PUSH32 within the bounded lookback window is
/// assumed to carry the event topic; its first 4 bytes become the prefix.
pub(crate) fn extract_event_topics(instructions: &[Instruction]) -> HashSet<String> {
    let mut topics = HashSet::new();

    for (i, instruction) in instructions.iter().enumerate() {
        if !(LOG1..=LOG4).contains(&instruction.opcode) {
            continue;
        }

        let window_start = i.saturating_sub(EVENT_TOPIC_LOOKBACK);
        if let Some(push32) =
            instructions[window_start..i].iter().rev().find(|prev| prev.opcode == PUSH32)
        {
            if let Some(imm) = push32.immediate.as_deref() {
                if imm.len() == 32 {
                    topics.insert(encode_hex(&imm[..4]));
                }
            }
        }
    }

    topics
}
