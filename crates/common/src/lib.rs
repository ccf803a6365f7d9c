//! Common utilities, constants, and resources used across the hugin codebase.
//!
//! This crate provides shared functionality for the hugin toolkit, including
//! the EVM opcode tables every analysis module decodes against and general
//! utility functions.

/// EVM opcode tables and helpers for the historical mainnet instruction set.
pub mod opcodes;

/// Well-known function selectors and event topic prefixes.
pub mod selectors;

/// General utility functions and types for common tasks.
pub mod utils;
