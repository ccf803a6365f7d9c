//! The Classifier module turns bytecode analysis and free-text evidence
//! into namespaced capability assertions.
//!
//! Classification is a pure function over its inputs. The central policy is
//! the evidence asymmetry: behavior proven by decoded bytecode may reach
//! `present`, while keyword-only evidence is always capped at `probable`,
//! no matter how many keywords corroborate it.

/// Error types for the classifier module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    classify, CapabilityRow, CapabilityStatus, EvidenceType, HeuristicHints,
};
pub use error::Error;
pub use interfaces::{
    ClassifyArgs, ClassifyArgsBuilder, LowercasedText, NoText, TextEvidenceSource,
};
