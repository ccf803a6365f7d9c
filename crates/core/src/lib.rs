//! The Core module serves as the central integration point for all of
//! Hugin's functionality, providing access to the bytecode analysis engine
//! for early-era Ethereum contracts.
//!
//! This module re-exports the public interfaces of all the tool-specific
//! crates, making it easier to use Hugin's capabilities in other projects.

/// Error types for the core module
pub mod error;

// Re-export all tool-specific modules
pub use hugin_classify;
pub use hugin_disassemble;
pub use hugin_index;
pub use hugin_similarity;
