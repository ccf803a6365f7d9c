//! The Disassembler module decodes EVM bytecode into instructions and
//! derives structural evidence from the decoded stream.
//!
//! Decoding never fails: unassigned opcode bytes are emitted as `UNKNOWN`
//! instructions and a truncated trailing PUSH is simply not emitted, since
//! deployed bytecode routinely carries non-executable trailing metadata.
//! On top of the instruction list this module extracts function selectors,
//! event topic prefixes, and the sliding-window behavioral patterns the
//! classifier consumes.

/// Error types for the disassembler module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{
    analyze, analyze_bytes, decode, decode_hex_lossy, disassemble,
    metadata::detect_metadata_offset,
    patterns::Patterns,
    shape::CodeShape,
    EvmAnalysis, Instruction,
};
pub use error::Error;
pub use interfaces::{DisassemblerArgs, DisassemblerArgsBuilder};
