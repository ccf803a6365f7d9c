use std::time::Instant;

use crate::{error::Error, interfaces::DisassemblerArgs};
use hashbrown::HashSet;
use hugin_common::{
    opcodes::{
        self, opcode_name, BLOCKHASH, CALLVALUE, DELEGATECALL, SELFDESTRUCT, TIMESTAMP,
    },
    utils::strings::encode_hex,
};
use serde::Serialize;
use tracing::{debug, info};

pub(crate) mod metadata;
pub(crate) mod patterns;
pub(crate) mod selectors;
pub(crate) mod shape;

use patterns::Patterns;
use shape::CodeShape;

/// A single decoded EVM instruction.
///
/// Instructions are produced once per bytecode string and never mutated;
/// byte offsets are strictly increasing and the final instruction always
/// fits within the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Byte offset of the opcode within the bytecode.
    pub offset: usize,
    /// The raw opcode byte.
    pub opcode: u8,
    /// The symbolic name of the opcode, or `UNKNOWN(0xXX)` for unassigned bytes.
    pub mnemonic: String,
    /// Immediate bytes following the opcode. Populated only for PUSH1..PUSH32.
    pub immediate: Option<Vec<u8>>,
}

impl Instruction {
    /// Total encoded length of the instruction in bytes.
    pub fn encoded_len(&self) -> usize {
        1 + self.immediate.as_ref().map_or(0, |imm| imm.len())
    }
}

/// The aggregate result of disassembling and analyzing one contract.
///
/// This is a pure derivation of the input bytecode: identical input always
/// yields an identical analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvmAnalysis {
    /// The decoded instruction stream.
    pub instructions: Vec<Instruction>,
    /// Function selectors found via dispatcher-comparison heuristics.
    /// A best-effort signal, not ground truth.
    pub selectors: HashSet<String>,
    /// First 4 bytes of 32-byte log topics pushed near LOG instructions.
    pub event_topics: HashSet<String>,
    /// Whether the bytecode contains SELFDESTRUCT.
    pub has_selfdestruct: bool,
    /// Whether the bytecode contains DELEGATECALL.
    pub has_delegatecall: bool,
    /// Whether the bytecode reads the message value.
    pub has_callvalue: bool,
    /// Whether the bytecode reads BLOCKHASH or TIMESTAMP.
    pub has_blockhash_or_timestamp: bool,
    /// Behavioral idioms detected by the sliding-window analyzer.
    pub patterns: Patterns,
    /// Size of the raw bytecode in bytes.
    pub byte_size: usize,
    /// Offset of the trailing Solidity metadata blob, if detected.
    pub metadata_offset: Option<usize>,
    /// Coarse shape metrics over the instruction stream.
    pub shape: CodeShape,
}

/// Decodes a hex string into bytes, keeping as much as is well-formed.
///
/// Decoding stops silently at the first malformed or partial byte pair
/// rather than failing; on-chain bytecode is immutable, so whatever prefix
/// decodes cleanly is still worth analyzing.
pub fn decode_hex_lossy(mut s: &str) -> Vec<u8> {
    s = s.trim_start_matches("0x").trim();

    // walk raw byte pairs; indexing the str would abort on multi-byte text
    let mut bytes = Vec::with_capacity(s.len() / 2);
    for pair in s.as_bytes().chunks_exact(2) {
        match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => bytes.push((hi << 4) | lo),
            _ => break,
        }
    }
    bytes
}

fn hex_digit(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Decodes raw bytecode into an ordered instruction list.
///
/// PUSH1..PUSH32 consume their immediate bytes; every other opcode advances
/// the cursor by one. Unassigned bytes are emitted as `UNKNOWN(0xXX)`
/// instructions, and a trailing PUSH whose immediate runs past the end of
/// the input is not emitted at all.
pub fn decode(contract_bytecode: &[u8]) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut program_counter = 0;

    while program_counter < contract_bytecode.len() {
        let opcode = contract_bytecode[program_counter];
        let offset = program_counter;

        let immediate = if opcodes::is_push(opcode) {
            let width = opcodes::push_size(opcode);
            match contract_bytecode.get(program_counter + 1..program_counter + 1 + width) {
                Some(bytes) => Some(bytes.to_vec()),
                // a truncated trailing PUSH is dropped, not an error
                None => break,
            }
        } else {
            None
        };

        let mnemonic = match opcode_name(opcode) {
            Some(name) => name.to_string(),
            None => format!("UNKNOWN(0x{opcode:02x})"),
        };

        program_counter += 1 + immediate.as_ref().map_or(0, |imm| imm.len());
        instructions.push(Instruction { offset, opcode, mnemonic, immediate });
    }

    instructions
}

/// Analyzes a hex-encoded bytecode string, optionally `0x`-prefixed.
///
/// This is the main entry point for one contract: it decodes the
/// instruction stream and derives all structural evidence from it. Never
/// fails; malformed input degrades to whatever prefix decodes cleanly.
pub fn analyze(bytecode: &str) -> EvmAnalysis {
    analyze_bytes(&decode_hex_lossy(bytecode))
}

/// Analyzes raw bytecode bytes. See [`analyze`].
pub fn analyze_bytes(contract_bytecode: &[u8]) -> EvmAnalysis {
    let instructions = decode(contract_bytecode);
    let metadata_offset = metadata::detect_metadata_offset(contract_bytecode);
    let (selectors, event_topics) = selectors::extract(&instructions);
    let patterns = patterns::detect(&instructions);
    let shape = shape::measure(&instructions);

    EvmAnalysis {
        has_selfdestruct: instructions.iter().any(|i| i.opcode == SELFDESTRUCT),
        has_delegatecall: instructions.iter().any(|i| i.opcode == DELEGATECALL),
        has_callvalue: instructions.iter().any(|i| i.opcode == CALLVALUE),
        has_blockhash_or_timestamp: instructions
            .iter()
            .any(|i| i.opcode == BLOCKHASH || i.opcode == TIMESTAMP),
        instructions,
        selectors,
        event_topics,
        patterns,
        byte_size: contract_bytecode.len(),
        metadata_offset,
        shape,
    }
}

/// Disassembles EVM bytecode into readable assembly instructions
///
/// This function takes the bytecode of a contract and converts it into a
/// string representation of the equivalent EVM assembly code. It handles
/// special cases like PUSH operations which consume additional bytes as
/// data.
///
/// # Arguments
///
/// * `args` - Arguments specifying the target and disassembly options
///
/// # Returns
///
/// A string containing the disassembled bytecode in assembly format
pub fn disassemble(args: DisassemblerArgs) -> Result<String, Error> {
    let start_time = Instant::now();
    let contract_bytecode = args.get_bytecode()?;

    let instructions = decode(&contract_bytecode);
    let mut asm = String::new();
    for instruction in &instructions {
        asm.push_str(
            format!(
                "{} {} {}\n",
                if args.decimal_counter {
                    instruction.offset.to_string()
                } else {
                    format!("{:06x}", instruction.offset)
                },
                instruction.mnemonic,
                instruction.immediate.as_ref().map(|imm| encode_hex(imm)).unwrap_or_default()
            )
            .as_str(),
        );
    }

    info!("disassembled {} instructions successfully", instructions.len());
    debug!("disassembly took {:?}", start_time.elapsed());
    Ok(asm)
}
