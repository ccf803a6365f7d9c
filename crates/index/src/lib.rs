//! The Index module builds an approximate similarity graph over a contract
//! population without full pairwise comparison.
//!
//! Each contract is compared against a locality window of nearby indices
//! plus seeded-random samples up to a fixed cap, bounding total work to
//! O(n·k). Rows are directional and persisted through an idempotent
//! insert-ignore-conflicts store, so a restarted build never errors on
//! overlap with a previous run.

/// Error types for the index module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    build_fingerprints, build_index, build_reference_index,
    store::{MemoryStore, SimilarityStore},
    ContractRecord, IndexConfig, IndexStats, SimilarityRow,
};
pub use error::Error;
pub use interfaces::{IndexArgs, IndexArgsBuilder};
