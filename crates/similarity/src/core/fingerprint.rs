//! Per-contract feature extraction.
//!
//! A fingerprint is derived once per contract and reused across every
//! pairwise comparison it participates in, which is what keeps index
//! building at O(n·k) instead of re-walking bytecode per pair.

use hashbrown::HashSet;
use hugin_common::opcodes::{
    is_external_call, is_log, skeleton_label, JUMP, JUMPDEST, JUMPI, RETURN, REVERT, SLOAD,
    SSTORE,
};
use hugin_disassemble::{analyze, CodeShape, EvmAnalysis, Instruction};
use serde::Serialize;
use tracing::trace;

/// Width of the skeleton n-grams used for sequence comparison.
const NGRAM_WIDTH: usize = 4;

/// Fixed-order opcode census over one contract's instruction stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StructuralFeatures {
    pub jumps: u32,
    pub jumpdests: u32,
    pub sloads: u32,
    pub sstores: u32,
    pub external_calls: u32,
    pub logs: u32,
    pub returns: u32,
    pub reverts: u32,
}

impl StructuralFeatures {
    pub(crate) fn measure(instructions: &[Instruction]) -> Self {
        let mut features = Self::default();
        for instruction in instructions {
            match instruction.opcode {
                JUMP | JUMPI => features.jumps += 1,
                JUMPDEST => features.jumpdests += 1,
                SLOAD => features.sloads += 1,
                SSTORE => features.sstores += 1,
                RETURN => features.returns += 1,
                REVERT => features.reverts += 1,
                opcode if is_external_call(opcode) => features.external_calls += 1,
                opcode if is_log(opcode) => features.logs += 1,
                _ => {}
            }
        }
        features
    }

    /// The census as a fixed-order dense vector for cosine comparison.
    pub fn as_vector(&self) -> [f64; 8] {
        [
            f64::from(self.jumps),
            f64::from(self.jumpdests),
            f64::from(self.sloads),
            f64::from(self.sstores),
            f64::from(self.external_calls),
            f64::from(self.logs),
            f64::from(self.returns),
            f64::from(self.reverts),
        ]
    }
}

/// The comparison-ready feature bundle for one contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractFingerprint {
    pub address: String,
    /// Ordered opcode categories with PUSH/DUP/SWAP/LOG variants collapsed,
    /// truncated before any trailing compiler metadata.
    pub skeleton: Vec<&'static str>,
    /// N-grams over the skeleton, precomputed so pairwise comparison is one
    /// set intersection.
    pub skeleton_ngrams: HashSet<String>,
    pub selectors: HashSet<String>,
    pub structural: StructuralFeatures,
    pub byte_size: usize,
    pub shape: CodeShape,
}

impl ContractFingerprint {
    /// Derive a fingerprint from an existing analysis.
    pub fn from_analysis(address: &str, analysis: &EvmAnalysis) -> Self {
        // metadata is data, not code; keep it out of sequence comparison
        let code_end = analysis.metadata_offset.unwrap_or(usize::MAX);
        let skeleton: Vec<&'static str> = analysis
            .instructions
            .iter()
            .filter(|instruction| instruction.offset < code_end)
            .map(|instruction| skeleton_label(instruction.opcode))
            .collect();
        trace!(
            "fingerprinting {}: {} skeleton labels, {} selectors",
            address,
            skeleton.len(),
            analysis.selectors.len()
        );

        Self {
            address: address.to_lowercase(),
            skeleton_ngrams: ngrams(&skeleton),
            selectors: analysis.selectors.clone(),
            structural: StructuralFeatures::measure(&analysis.instructions),
            byte_size: analysis.byte_size,
            shape: analysis.shape,
            skeleton,
        }
    }

    /// Analyze a hex bytecode string and fingerprint the result.
    pub fn from_bytecode(address: &str, bytecode: &str) -> Self {
        Self::from_analysis(address, &analyze(bytecode))
    }
}

fn ngrams(skeleton: &[&'static str]) -> HashSet<String> {
    skeleton.windows(NGRAM_WIDTH).map(|window| window.join("|")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_collapses_variants() {
        // PUSH1 00 PUSH32 <32 bytes> DUP3 SWAP1 LOG1
        let hex = format!("60007f{}8290a1", "00".repeat(32));
        let fingerprint = ContractFingerprint::from_bytecode("0xAB", &hex);
        assert_eq!(fingerprint.skeleton, vec!["PUSH", "PUSH", "DUP", "SWAP", "LOG"]);
        assert_eq!(fingerprint.address, "0xab");
    }

    #[test]
    fn test_ngrams_are_joined_windows() {
        let fingerprint = ContractFingerprint::from_bytecode("0xab", "6000600060006000");
        // four PUSH labels yield exactly one 4-gram
        assert_eq!(fingerprint.skeleton_ngrams.len(), 1);
        assert!(fingerprint.skeleton_ngrams.contains("PUSH|PUSH|PUSH|PUSH"));
    }

    #[test]
    fn test_structural_census() {
        // JUMP JUMPDEST SLOAD SSTORE CALL LOG0 RETURN REVERT
        let fingerprint = ContractFingerprint::from_bytecode("0xab", "565b5455f1a0f3fd");
        assert_eq!(
            fingerprint.structural,
            StructuralFeatures {
                jumps: 1,
                jumpdests: 1,
                sloads: 1,
                sstores: 1,
                external_calls: 1,
                logs: 1,
                returns: 1,
                reverts: 1,
            }
        );
        assert_eq!(fingerprint.structural.as_vector(), [1.0; 8]);
    }

    #[test]
    fn test_fingerprint_reusable_and_deterministic() {
        let first = ContractFingerprint::from_bytecode("0xab", "6080604052");
        let second = ContractFingerprint::from_bytecode("0xab", "6080604052");
        assert_eq!(first, second);
    }
}
