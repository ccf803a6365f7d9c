//! Sliding-window detectors for behavioral idioms in decoded bytecode.
//!
//! Each detector is an independent bounded scan anchored at a trigger
//! opcode, with no shared scan state, so results are reproducible
//! regardless of evaluation order. False positives are accepted by design:
//! a pattern is one signal among several for the classifier, never proof
//! on its own.

use hugin_common::opcodes::{
    ADD, CALLER, CALLVALUE, EQ, GT, ISZERO, JUMPI, LT, PUSH1, SGT, SHA3, SLOAD, SLT, SSTORE,
    SUB, TIMESTAMP,
};
use serde::Serialize;

use super::Instruction;

const TRANSFER_WINDOW: usize = 30;
const MINT_WINDOW: usize = 15;
const OWNER_WINDOW: usize = 8;
const ROLE_WINDOW: usize = 12;
const MUTEX_WINDOW: usize = 8;
const NESTED_MAPPING_GAP: usize = 15;
const SUPPLY_CAP_RADIUS: usize = 10;
const TIMESTAMP_WINDOW: usize = 8;

/// Behavioral idioms detected by the sliding-window analyzer.
///
/// Every field is heuristic evidence except where it merely restates an
/// opcode fact (payability).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Patterns {
    /// Debit-then-credit storage updates after a balance read.
    pub transfer: bool,
    /// Balance credit with no matching debit.
    pub mint: bool,
    /// Balance debit with no matching credit.
    pub burn: bool,
    /// Caller compared against a stored address.
    pub owner_check: bool,
    /// Caller hashed into a mapping key and the result tested.
    pub role_mapping: bool,
    /// Boolean storage flag read, tested, and flipped.
    pub mutex: bool,
    /// Two mapping-key hashes close together (nested mapping access).
    pub nested_mapping: bool,
    /// Bound comparison near the mint site. Only meaningful when `mint` is set.
    pub supply_cap: bool,
    /// The contract reads its message value anywhere.
    pub payable: bool,
    /// Block timestamp fed into a comparison and branch.
    pub timestamp_comparison: bool,
}

/// Run every detector over one immutable instruction list.
pub(crate) fn detect(instructions: &[Instruction]) -> Patterns {
    let transfer = has_transfer_pattern(instructions);
    // mint/burn only make sense where the full debit+credit pair is absent
    let mint_site = if transfer { None } else { find_mint_site(instructions) };
    let mint = mint_site.is_some();
    let burn = !transfer && has_burn_pattern(instructions);

    Patterns {
        transfer,
        mint,
        burn,
        owner_check: has_owner_check(instructions),
        role_mapping: has_role_mapping_check(instructions),
        mutex: has_mutex_pattern(instructions),
        nested_mapping: has_nested_mapping(instructions),
        supply_cap: mint_site.is_some_and(|site| has_supply_cap(instructions, site)),
        payable: instructions.iter().any(|i| i.opcode == CALLVALUE),
        timestamp_comparison: has_timestamp_comparison(instructions),
    }
}

fn window_after(instructions: &[Instruction], anchor: usize, size: usize) -> &[Instruction] {
    let start = anchor + 1;
    let end = (start + size).min(instructions.len());
    &instructions[start.min(end)..end]
}

/// Debit sender, then credit receiver: after an SLOAD, a SUB followed by an
/// SSTORE, then an ADD followed by its own SSTORE, with the debit store
/// strictly before the credit store.
fn has_transfer_pattern(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != SLOAD {
            continue;
        }
        let window = window_after(instructions, i, TRANSFER_WINDOW);

        let Some(sub_pos) = window.iter().position(|w| w.opcode == SUB) else { continue };
        let Some(debit_store) = window[sub_pos..]
            .iter()
            .position(|w| w.opcode == SSTORE)
            .map(|p| sub_pos + p)
        else {
            continue;
        };

        let Some(add_pos) = window[sub_pos..]
            .iter()
            .position(|w| w.opcode == ADD)
            .map(|p| sub_pos + p)
        else {
            continue;
        };
        let credit_store = window[add_pos..]
            .iter()
            .position(|w| w.opcode == SSTORE)
            .map(|p| add_pos + p);

        if let Some(credit_store) = credit_store {
            if debit_store < credit_store {
                return true;
            }
        }
    }
    false
}

/// Credit without debit: an ADD followed by an SSTORE shortly after an
/// SLOAD, with no SUB anywhere before that store. Returns the anchor index
/// so the supply-cap check can inspect the surrounding area.
fn find_mint_site(instructions: &[Instruction]) -> Option<usize> {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != SLOAD {
            continue;
        }
        let window = window_after(instructions, i, MINT_WINDOW);

        let Some(add_pos) = window.iter().position(|w| w.opcode == ADD) else { continue };
        let Some(store_pos) = window[add_pos..]
            .iter()
            .position(|w| w.opcode == SSTORE)
            .map(|p| add_pos + p)
        else {
            continue;
        };

        if !window[..store_pos].iter().any(|w| w.opcode == SUB) {
            return Some(i);
        }
    }
    None
}

/// Debit without credit: a SUB followed by an SSTORE shortly after an
/// SLOAD, with no ADD-then-SSTORE following in the same window.
fn has_burn_pattern(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != SLOAD {
            continue;
        }
        let window = window_after(instructions, i, MINT_WINDOW);

        let Some(sub_pos) = window.iter().position(|w| w.opcode == SUB) else { continue };
        let Some(store_pos) = window[sub_pos..]
            .iter()
            .position(|w| w.opcode == SSTORE)
            .map(|p| sub_pos + p)
        else {
            continue;
        };

        let credit_after = window[store_pos..]
            .iter()
            .position(|w| w.opcode == ADD)
            .map(|p| store_pos + p)
            .is_some_and(|add_pos| {
                window[add_pos..].iter().any(|w| w.opcode == SSTORE)
            });

        if !credit_after {
            return true;
        }
    }
    false
}

/// Caller compared against a stored address: after CALLER, either an EQ
/// with a JUMPI, or an SLOAD with an EQ.
fn has_owner_check(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != CALLER {
            continue;
        }
        let window = window_after(instructions, i, OWNER_WINDOW);

        let has_eq = window.iter().any(|w| w.opcode == EQ);
        let has_jumpi = window.iter().any(|w| w.opcode == JUMPI);
        let has_sload = window.iter().any(|w| w.opcode == SLOAD);

        if (has_eq && has_jumpi) || (has_sload && has_eq) {
            return true;
        }
    }
    false
}

/// `mapping(address => bool) hasRole` style check: after CALLER, a mapping
/// key is hashed, loaded, and tested.
fn has_role_mapping_check(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != CALLER {
            continue;
        }
        let window = window_after(instructions, i, ROLE_WINDOW);

        let has_sha3 = window.iter().any(|w| w.opcode == SHA3);
        let has_sload = window.iter().any(|w| w.opcode == SLOAD);
        let has_iszero = window.iter().any(|w| w.opcode == ISZERO);

        if has_sha3 && has_sload && has_iszero {
            return true;
        }
    }
    false
}

/// Reentrancy-guard flag flip: a loaded flag tested with ISZERO and stored
/// back, with a PUSH1 of 0 or 1 nearby.
fn has_mutex_pattern(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != SLOAD {
            continue;
        }
        let window = window_after(instructions, i, MUTEX_WINDOW);

        let has_iszero = window.iter().any(|w| w.opcode == ISZERO);
        let has_sstore = window.iter().any(|w| w.opcode == SSTORE);
        let has_bool_push = window.iter().any(|w| {
            w.opcode == PUSH1 && matches!(w.immediate.as_deref(), Some([0x00]) | Some([0x01]))
        });

        if has_iszero && has_sstore && has_bool_push {
            return true;
        }
    }
    false
}

/// `mapping(K1 => mapping(K2 => V))` access: two SHA3s close together.
fn has_nested_mapping(instructions: &[Instruction]) -> bool {
    let sha3_positions: Vec<usize> = instructions
        .iter()
        .enumerate()
        .filter(|(_, instruction)| instruction.opcode == SHA3)
        .map(|(i, _)| i)
        .collect();

    sha3_positions.windows(2).any(|pair| pair[1] - pair[0] <= NESTED_MAPPING_GAP)
}

/// Bound check near a mint site: an LT/GT together with SLOAD and ADD
/// within a fixed radius of the anchor.
fn has_supply_cap(instructions: &[Instruction], mint_site: usize) -> bool {
    let start = mint_site.saturating_sub(SUPPLY_CAP_RADIUS);
    let end = (mint_site + SUPPLY_CAP_RADIUS + 1).min(instructions.len());
    let area = &instructions[start..end];

    let has_bound = area.iter().any(|w| w.opcode == LT || w.opcode == GT);
    let has_sload = area.iter().any(|w| w.opcode == SLOAD);
    let has_add = area.iter().any(|w| w.opcode == ADD);

    has_bound && has_sload && has_add
}

/// Block timestamp fed into a comparison and a conditional jump.
fn has_timestamp_comparison(instructions: &[Instruction]) -> bool {
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != TIMESTAMP {
            continue;
        }
        let window = window_after(instructions, i, TIMESTAMP_WINDOW);

        let has_comparison =
            window.iter().any(|w| matches!(w.opcode, LT | GT | SLT | SGT));
        let has_jumpi = window.iter().any(|w| w.opcode == JUMPI);

        if has_comparison && has_jumpi {
            return true;
        }
    }
    false
}
