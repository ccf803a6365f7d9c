//! Coarse shape metrics over a decoded instruction stream.
//!
//! These are intentionally crude aggregates. They survive compiler version
//! churn better than exact opcode sequences, which makes them useful as a
//! low-weight similarity signal and as human-readable summary fields.

use hashbrown::HashSet;
use hugin_common::opcodes::{JUMPDEST, JUMPI};
use serde::Serialize;

use super::Instruction;

/// Maximum instruction distance between a JUMPDEST and a following JUMPI
/// for the pair to count as a loop.
const LOOP_BACKEDGE_RANGE: usize = 50;

/// Aggregate structural metrics for one contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CodeShape {
    /// Total number of decoded instructions.
    pub opcode_count: usize,
    /// Number of distinct opcodes used.
    pub unique_opcodes: usize,
    /// `unique_opcodes / opcode_count`, or 0 for empty input.
    pub unique_ratio: f64,
    /// Fraction of instructions that are conditional jumps.
    pub branch_density: f64,
    /// Estimated loop count from JUMPDEST/JUMPI proximity.
    pub estimated_loops: usize,
}

/// Measure the shape of an instruction stream.
pub(crate) fn measure(instructions: &[Instruction]) -> CodeShape {
    let opcode_count = instructions.len();
    if opcode_count == 0 {
        return CodeShape::default();
    }

    let unique_opcodes =
        instructions.iter().map(|i| i.opcode).collect::<HashSet<u8>>().len();
    let jumpi_count = instructions.iter().filter(|i| i.opcode == JUMPI).count();

    CodeShape {
        opcode_count,
        unique_opcodes,
        unique_ratio: unique_opcodes as f64 / opcode_count as f64,
        branch_density: jumpi_count as f64 / opcode_count as f64,
        estimated_loops: estimate_loops(instructions),
    }
}

/// Count JUMPDESTs with a conditional jump shortly after them.
///
/// A loop body compiles to a JUMPDEST with its guard's JUMPI a short
/// distance downstream, so each such pair is treated as one back edge.
/// Dispatch tables produce JUMPDESTs too, but their JUMPIs precede the
/// destination, so they rarely inflate the count.
fn estimate_loops(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .enumerate()
        .filter(|(_, instruction)| instruction.opcode == JUMPDEST)
        .filter(|(i, _)| {
            let end = (i + 1 + LOOP_BACKEDGE_RANGE).min(instructions.len());
            instructions[i + 1..end].iter().any(|next| next.opcode == JUMPI)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decode;
    use hugin_common::utils::strings::decode_hex;

    fn shape_of(hex: &str) -> CodeShape {
        measure(&decode(&decode_hex(hex).expect("invalid hex")))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(measure(&[]), CodeShape::default());
    }

    #[test]
    fn test_counts_and_ratios() {
        // PUSH1 01 PUSH1 02 ADD STOP: 4 instructions, 3 distinct opcodes
        let shape = shape_of("600160020100");
        assert_eq!(shape.opcode_count, 4);
        assert_eq!(shape.unique_opcodes, 3);
        assert!((shape.unique_ratio - 0.75).abs() < f64::EPSILON);
        assert_eq!(shape.estimated_loops, 0);
    }

    #[test]
    fn test_branch_density() {
        // JUMPI STOP POP POP
        let shape = shape_of("57005050");
        assert!((shape.branch_density - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_loop_detected() {
        // JUMPDEST PUSH1 00 JUMPI
        let shape = shape_of("5b600057");
        assert_eq!(shape.estimated_loops, 1);
    }

    #[test]
    fn test_jumpdest_without_backedge() {
        let shape = shape_of("5b00");
        assert_eq!(shape.estimated_loops, 0);
    }
}
