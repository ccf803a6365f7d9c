//! Three-tier rule-based classification: contract types, standard
//! compliance, then features, with dependent detectors threaded through
//! explicit locals and a trailing hint-reconciliation step.

use hugin_common::{
    selectors::{ERC20_CORE_SELECTORS, TRANSFER_EVENT_PREFIX},
    utils::version::detector_version,
};
use hugin_disassemble::EvmAnalysis;
use serde::Serialize;
use tracing::debug;

use crate::interfaces::TextEvidenceSource;

pub(crate) mod keywords;
pub(crate) mod standards;

use keywords::*;

/// Whether a capability is confirmed by bytecode or merely suggested by
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityStatus {
    /// Behavior confirmed via decoded bytecode evidence.
    Present,
    /// Evidence is text or keyword only, unconfirmed.
    Probable,
}

/// The strongest kind of evidence behind an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceType {
    Selector,
    Opcode,
    Keyword,
    DbHeuristic,
}

/// One capability assertion for one contract at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityRow {
    pub contract_address: String,
    /// Namespaced key, e.g. `type:token`, `standard:erc20`, `feature:pausable`.
    pub capability_key: String,
    pub status: CapabilityStatus,
    pub confidence: f64,
    pub primary_evidence_type: EvidenceType,
    /// Rule-set version that produced this row, so re-classification under a
    /// newer rule set never collides with prior runs.
    pub detector_version: String,
}

/// Pre-existing external flags, usable only as a last-resort fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicHints {
    pub has_selfdestruct: bool,
    pub erc20_like: bool,
}

/// One detector's verdict before it is attached to a key and address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Detection {
    pub(crate) status: CapabilityStatus,
    pub(crate) confidence: f64,
    pub(crate) evidence: EvidenceType,
}

impl Detection {
    pub(crate) fn new(status: CapabilityStatus, confidence: f64, evidence: EvidenceType) -> Self {
        Self { status, confidence, evidence }
    }

    /// A keyword-only verdict. Confidence grows with corroborating matches
    /// but the status is always capped at `probable`.
    fn keyword_only(matches: usize) -> Option<Self> {
        if matches == 0 {
            return None;
        }
        let confidence = (0.5 + 0.1 * (matches - 1) as f64).min(0.75);
        Some(Self::new(CapabilityStatus::Probable, confidence, EvidenceType::Keyword))
    }
}

/// Classify one contract from its bytecode analysis, free-text evidence,
/// and externally supplied fallback hints.
///
/// Returns an empty list when both bytecode and text are absent. Otherwise
/// at least one `type:` row is always emitted, falling back to
/// `type:unclassified` when nothing fires.
pub fn classify(
    address: &str,
    analysis: Option<&EvmAnalysis>,
    text: &dyn TextEvidenceSource,
    hints: &HeuristicHints,
) -> Vec<CapabilityRow> {
    // no evidence at all means no assertions, not a guess
    if analysis.is_none() && text.is_empty() {
        return Vec::new();
    }

    let version = detector_version();
    let mut rows = Vec::new();
    let mut push = |rows: &mut Vec<CapabilityRow>, key: &str, detection: Detection| {
        rows.push(CapabilityRow {
            contract_address: address.to_string(),
            capability_key: key.to_string(),
            status: detection.status,
            confidence: detection.confidence,
            primary_evidence_type: detection.evidence,
            detector_version: version.clone(),
        });
    };

    // tier 1: contract types
    let mut type_asserted = false;
    for (key, detection) in type_detections(analysis, text) {
        type_asserted = true;
        push(&mut rows, key, detection);
    }

    // tier 2: standard compliance, purely selector based
    if let Some(analysis) = analysis {
        if let Some(detection) = standards::detect_erc20(analysis) {
            push(&mut rows, "standard:erc20", detection);
        }
        if let Some(detection) = standards::detect_erc721(analysis) {
            push(&mut rows, "standard:erc721", detection);
        }
        if let Some(detection) = standards::detect_erc165(analysis) {
            push(&mut rows, "standard:erc165", detection);
        }
    }

    // tier 3: features, each a pattern boolean against a keyword boolean
    let mut mintable_asserted = false;
    for (key, detection) in feature_detections(analysis, text) {
        if key == "feature:mintable" {
            mintable_asserted = true;
        }
        push(&mut rows, key, detection);
    }

    // dependent detectors fire only under an asserted parent
    if mintable_asserted {
        if let Some(analysis) = analysis {
            for (key, detection) in mint_qualifiers(analysis) {
                push(&mut rows, key, detection);
            }
        }
    }

    // a contract with any input always gets a type
    if !type_asserted {
        push(
            &mut rows,
            "type:unclassified",
            Detection::new(CapabilityStatus::Present, 1.0, EvidenceType::DbHeuristic),
        );
    }

    reconcile_hints(address, &version, hints, &mut rows);

    debug!("classified {} into {} capability rows", address, rows.len());
    rows
}

/// Tier-1 detectors. Bytecode-proven behavior may reach `present`;
/// keyword-only evidence caps at `probable`.
fn type_detections(
    analysis: Option<&EvmAnalysis>,
    text: &dyn TextEvidenceSource,
) -> Vec<(&'static str, Detection)> {
    let mut detections = Vec::new();

    if let Some(detection) = detect_token(analysis, text) {
        detections.push(("type:token", detection));
    }
    if let Some(detection) = detect_nft(analysis, text) {
        detections.push(("type:nft", detection));
    }

    // the remaining types have no structural signature strong enough to
    // prove on its own, so they are keyword driven
    let keyword_types: [(&'static str, &[&str]); 7] = [
        ("type:dao", DAO_KEYWORDS),
        ("type:multisig", MULTISIG_KEYWORDS),
        ("type:crowdsale", CROWDSALE_KEYWORDS),
        ("type:exchange", EXCHANGE_KEYWORDS),
        ("type:gambling", GAMBLING_KEYWORDS),
        ("type:game", GAME_KEYWORDS),
        ("type:registry", REGISTRY_KEYWORDS),
    ];
    for (key, needles) in keyword_types {
        if let Some(detection) = Detection::keyword_only(text.match_count(needles)) {
            detections.push((key, detection));
        }
    }

    detections
}

/// Token detection reaches `present` only when the structural transfer
/// pattern is confirmed alongside a balance-tracking selector or the
/// Transfer event.
fn detect_token(
    analysis: Option<&EvmAnalysis>,
    text: &dyn TextEvidenceSource,
) -> Option<Detection> {
    if let Some(analysis) = analysis {
        let balance_surface = analysis.selectors.contains("70a08231") ||
            analysis.event_topics.contains(TRANSFER_EVENT_PREFIX);
        if analysis.patterns.transfer && balance_surface {
            return Some(Detection::new(CapabilityStatus::Present, 0.9, EvidenceType::Opcode));
        }

        let core_hits = ERC20_CORE_SELECTORS
            .iter()
            .filter(|selector| analysis.selectors.contains(**selector))
            .count();
        if core_hits >= 2 {
            return Some(Detection::new(CapabilityStatus::Probable, 0.7, EvidenceType::Selector));
        }
    }

    Detection::keyword_only(text.match_count(TOKEN_KEYWORDS))
}

fn detect_nft(
    analysis: Option<&EvmAnalysis>,
    text: &dyn TextEvidenceSource,
) -> Option<Detection> {
    if let Some(analysis) = analysis {
        // ownerOf is the one selector unique to the NFT surface
        if analysis.selectors.contains("6352211e") {
            return Some(Detection::new(CapabilityStatus::Probable, 0.7, EvidenceType::Selector));
        }
    }
    Detection::keyword_only(text.match_count(NFT_KEYWORDS))
}

/// Tier-3 detectors. Each prefers its structural or opcode signal and falls
/// back to keywords.
fn feature_detections(
    analysis: Option<&EvmAnalysis>,
    text: &dyn TextEvidenceSource,
) -> Vec<(&'static str, Detection)> {
    let mut detections = Vec::new();
    let mut add = |key: &'static str,
                   proven: bool,
                   proven_confidence: f64,
                   proven_evidence: EvidenceType,
                   needles: &[&str]| {
        let detection = if proven {
            Some(Detection::new(CapabilityStatus::Present, proven_confidence, proven_evidence))
        } else {
            Detection::keyword_only(text.match_count(needles))
        };
        if let Some(detection) = detection {
            detections.push((key, detection));
        }
    };

    let patterns = analysis.map(|a| a.patterns).unwrap_or_default();

    add("feature:mintable", patterns.mint, 0.85, EvidenceType::Opcode, MINT_KEYWORDS);
    add("feature:burnable", patterns.burn, 0.85, EvidenceType::Opcode, BURN_KEYWORDS);
    add("feature:ownable", patterns.owner_check, 0.85, EvidenceType::Opcode, OWNABLE_KEYWORDS);
    add("feature:pausable", false, 0.0, EvidenceType::Opcode, PAUSABLE_KEYWORDS);
    add("feature:role-based", patterns.role_mapping, 0.85, EvidenceType::Opcode, ROLE_KEYWORDS);
    add(
        "feature:upgradeable",
        analysis.is_some_and(|a| a.has_delegatecall),
        1.0,
        EvidenceType::Opcode,
        UPGRADEABLE_KEYWORDS,
    );
    add(
        "feature:self-destructible",
        analysis.is_some_and(|a| a.has_selfdestruct),
        1.0,
        EvidenceType::Opcode,
        SELFDESTRUCT_KEYWORDS,
    );
    add(
        "feature:payable",
        analysis.is_some_and(|a| a.has_callvalue),
        1.0,
        EvidenceType::Opcode,
        &[],
    );
    add(
        "feature:time-locked",
        patterns.timestamp_comparison,
        0.85,
        EvidenceType::Opcode,
        TIMELOCK_KEYWORDS,
    );
    add(
        "feature:reentrancy-guarded",
        patterns.mutex,
        0.85,
        EvidenceType::Opcode,
        REENTRANCY_KEYWORDS,
    );

    detections
}

/// Qualifiers that refine an asserted mintable capability.
fn mint_qualifiers(analysis: &EvmAnalysis) -> Vec<(&'static str, Detection)> {
    let mut detections = Vec::new();
    let patterns = &analysis.patterns;

    let gated = patterns.owner_check || patterns.role_mapping;
    if patterns.mint && gated {
        detections.push((
            "token:mint-controlled",
            Detection::new(CapabilityStatus::Present, 0.85, EvidenceType::Opcode),
        ));
    } else if patterns.mint {
        // no access check observed near any mint site, so the surface
        // looks open, but absence of evidence is not proof
        detections.push((
            "token:mint-open",
            Detection::new(CapabilityStatus::Probable, 0.6, EvidenceType::Opcode),
        ));
    }

    if patterns.supply_cap {
        detections.push((
            "token:supply-capped",
            Detection::new(CapabilityStatus::Present, 0.85, EvidenceType::Opcode),
        ));
    } else if patterns.mint {
        detections.push((
            "token:supply-uncapped",
            Detection::new(CapabilityStatus::Probable, 0.6, EvidenceType::Opcode),
        ));
    }

    detections
}

/// Fold in external hints as a last resort, and drop the unclassified
/// placeholder if a hint supplies a type.
fn reconcile_hints(
    address: &str,
    version: &str,
    hints: &HeuristicHints,
    rows: &mut Vec<CapabilityRow>,
) {
    let mut hint_row = |key: &str| CapabilityRow {
        contract_address: address.to_string(),
        capability_key: key.to_string(),
        status: CapabilityStatus::Probable,
        confidence: 0.5,
        primary_evidence_type: EvidenceType::DbHeuristic,
        detector_version: version.to_string(),
    };

    if hints.has_selfdestruct &&
        !rows.iter().any(|row| row.capability_key == "feature:self-destructible")
    {
        rows.push(hint_row("feature:self-destructible"));
    }

    if hints.erc20_like && !rows.iter().any(|row| row.capability_key == "type:token") {
        rows.push(hint_row("type:token"));
        rows.retain(|row| row.capability_key != "type:unclassified");
    }
}
