//! The Similarity module derives comparison-ready fingerprints from
//! bytecode analyses and scores fingerprint pairs.
//!
//! Fingerprinting is independent per contract, so a population can be
//! fingerprinted in parallel and each fingerprint reused across many
//! pairwise comparisons. Scoring is a pure function over two fingerprints
//! with a cheap size gate in front of the set operations.

/// Error types for the similarity module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    fingerprint::{ContractFingerprint, StructuralFeatures},
    score::{
        score, size_similarity, ScoreComponents, SimilarityClass, SimilarityResult,
        MIN_MATCH_SCORE, THRESHOLD_EXACT, THRESHOLD_STRUCTURAL, THRESHOLD_WEAK,
    },
};
pub use error::Error;
pub use interfaces::{CompareArgs, CompareArgsBuilder};
