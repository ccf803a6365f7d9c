//! Pairwise fingerprint scoring.
//!
//! Component weights and thresholds were tuned against a labeled set of
//! early-era token deployments; the dead `None` classification arm is kept
//! so the enum is total over the score range.

use hashbrown::HashSet;
use hugin_common::selectors::{ERC20_CORE_SELECTORS, WELL_KNOWN_SELECTORS};
use serde::Serialize;

use super::fingerprint::ContractFingerprint;

const WEIGHT_SELECTOR: f64 = 0.4;
const WEIGHT_SKELETON: f64 = 0.35;
const WEIGHT_STRUCTURAL: f64 = 0.15;
const WEIGHT_SIZE: f64 = 0.1;

/// Size ratio below which a pair is rejected before any set operations.
const SIZE_GATE: f64 = 0.2;

/// Minimum combined score for a pair to count as a match at all.
pub const MIN_MATCH_SCORE: f64 = 0.35;

/// Combined score at or above which a pair is an exact match.
pub const THRESHOLD_EXACT: f64 = 0.90;

/// Combined score at or above which a pair is structurally similar.
pub const THRESHOLD_STRUCTURAL: f64 = 0.65;

/// Combined score at or above which a pair is weakly similar.
pub const THRESHOLD_WEAK: f64 = 0.40;

/// Per-component explanation thresholds.
const EXPLAIN_SELECTOR: f64 = 0.8;
const EXPLAIN_SKELETON: f64 = 0.7;
const EXPLAIN_STRUCTURAL: f64 = 0.8;

/// How strong a pairwise match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityClass {
    Exact,
    Structural,
    Weak,
    None,
}

/// The four component scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponents {
    pub selector: f64,
    pub skeleton: f64,
    pub structural: f64,
    pub size: f64,
}

/// The outcome of scoring one fingerprint pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub components: ScoreComponents,
    pub combined_score: f64,
    pub classification: SimilarityClass,
    pub explanation: String,
    /// Recognized shared interface tags, sorted for stable output.
    pub shared_patterns: Vec<String>,
}

/// `min/max` of the two byte sizes. Symmetric by construction.
pub fn size_similarity(a: usize, b: usize) -> f64 {
    let (min, max) = if a < b { (a, b) } else { (b, a) };
    if max == 0 {
        return 1.0;
    }
    min as f64 / max as f64
}

/// Jaccard index, with both-empty defined as identical.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = (a.len() + b.len()) as f64 - intersection;
    intersection / union
}

fn cosine(a: &[f64; 8], b: &[f64; 8]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    dot / (magnitude_a * magnitude_b)
}

fn classify_score(combined: f64) -> SimilarityClass {
    if combined >= THRESHOLD_EXACT {
        SimilarityClass::Exact
    } else if combined >= THRESHOLD_STRUCTURAL {
        SimilarityClass::Structural
    } else if combined >= THRESHOLD_WEAK {
        SimilarityClass::Weak
    } else {
        SimilarityClass::None
    }
}

/// Score one fingerprint pair.
///
/// Returns `None` when the size gate rejects the pair or the combined score
/// falls below [`MIN_MATCH_SCORE`].
pub fn score(a: &ContractFingerprint, b: &ContractFingerprint) -> Option<SimilarityResult> {
    let size = size_similarity(a.byte_size, b.byte_size);
    if size < SIZE_GATE {
        return None;
    }

    let components = ScoreComponents {
        selector: jaccard(&a.selectors, &b.selectors),
        skeleton: jaccard(&a.skeleton_ngrams, &b.skeleton_ngrams),
        structural: cosine(&a.structural.as_vector(), &b.structural.as_vector()),
        size,
    };

    let combined = WEIGHT_SELECTOR * components.selector +
        WEIGHT_SKELETON * components.skeleton +
        WEIGHT_STRUCTURAL * components.structural +
        WEIGHT_SIZE * components.size;

    if combined < MIN_MATCH_SCORE {
        return None;
    }

    let shared_patterns = shared_patterns(a, b);
    Some(SimilarityResult {
        explanation: build_explanation(&components, &shared_patterns),
        components,
        combined_score: combined,
        classification: classify_score(combined),
        shared_patterns,
    })
}

fn build_explanation(components: &ScoreComponents, shared_patterns: &[String]) -> String {
    let mut parts = Vec::new();

    if components.selector >= EXPLAIN_SELECTOR {
        parts.push("nearly identical function interfaces".to_string());
    }
    if components.skeleton >= EXPLAIN_SKELETON {
        parts.push("very similar code structure".to_string());
    }
    if components.structural >= EXPLAIN_STRUCTURAL {
        parts.push("matching control-flow profile".to_string());
    }
    if !shared_patterns.is_empty() {
        parts.push(format!("{} shared interface patterns", shared_patterns.len()));
    }
    if parts.is_empty() {
        parts.push("partial bytecode overlap".to_string());
    }

    parts.join(", ")
}

/// Recognized interface surface both contracts expose: canonical signatures
/// of shared well-known selectors, plus an `erc20_like` tag when both sides
/// carry most of the core token interface.
fn shared_patterns(a: &ContractFingerprint, b: &ContractFingerprint) -> Vec<String> {
    let mut patterns: Vec<String> = a
        .selectors
        .intersection(&b.selectors)
        .filter_map(|selector| WELL_KNOWN_SELECTORS.get(selector.as_str()))
        .map(|signature| (*signature).to_string())
        .collect();
    patterns.sort_unstable();

    let core_hits = |fingerprint: &ContractFingerprint| {
        ERC20_CORE_SELECTORS
            .iter()
            .filter(|selector| fingerprint.selectors.contains(**selector))
            .count()
    };
    if core_hits(a) >= 2 && core_hits(b) >= 2 {
        patterns.push("erc20_like".to_string());
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(address: &str, bytecode: &str) -> ContractFingerprint {
        ContractFingerprint::from_bytecode(address, bytecode)
    }

    /// A dispatcher comparing against the three core token selectors.
    fn core_token_hex() -> String {
        let mut hex = String::new();
        for selector in ERC20_CORE_SELECTORS {
            hex.push_str("63");
            hex.push_str(selector);
            hex.push_str("1461004057");
        }
        hex
    }

    #[test]
    fn test_identical_fingerprints_are_exact() {
        let a = fingerprint("0xaa", &core_token_hex());
        let b = fingerprint("0xbb", &core_token_hex());
        let result = score(&a, &b).expect("no match");
        assert_eq!(result.classification, SimilarityClass::Exact);
        assert!((result.combined_score - 1.0).abs() < 1e-9);
        assert!(result.shared_patterns.contains(&"erc20_like".to_string()));
    }

    #[test]
    fn test_size_gate_short_circuit() {
        // identical selectors but a 10x size mismatch
        let mut a = fingerprint("0xaa", &core_token_hex());
        let mut b = fingerprint("0xbb", &core_token_hex());
        a.byte_size = 10;
        b.byte_size = 1000;
        assert!(score(&a, &b).is_none());
    }

    #[test]
    fn test_size_similarity_symmetric() {
        assert_eq!(size_similarity(10, 1000), size_similarity(1000, 10));
        assert!((size_similarity(10, 1000) - 0.01).abs() < 1e-12);
        assert!((size_similarity(0, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_bounds_and_identity() {
        let empty = HashSet::new();
        let mut set = HashSet::new();
        set.insert("a9059cbb".to_string());

        assert!((jaccard(&empty, &empty) - 1.0).abs() < f64::EPSILON);
        assert!((jaccard(&set, &empty)).abs() < f64::EPSILON);
        assert!((jaccard(&set, &set.clone()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_boundary_is_inclusive() {
        // selector 1.0, skeleton 0.5, structural 0.5, size 1.0 combine to
        // exactly 0.9
        let components = ScoreComponents { selector: 1.0, skeleton: 0.5, structural: 0.5, size: 1.0 };
        let combined = WEIGHT_SELECTOR * components.selector +
            WEIGHT_SKELETON * components.skeleton +
            WEIGHT_STRUCTURAL * components.structural +
            WEIGHT_SIZE * components.size;
        assert!((combined - 0.9).abs() < 1e-12);
        assert_eq!(classify_score(combined), SimilarityClass::Exact);
    }

    #[test]
    fn test_below_floor_is_no_match() {
        let a = fingerprint("0xaa", &core_token_hex());
        // same byte size, entirely different content
        let b = fingerprint("0xbb", &"5b".repeat(a.byte_size));
        assert!(score(&a, &b).is_none());
    }

    #[test]
    fn test_explanation_mentions_interfaces() {
        let a = fingerprint("0xaa", &core_token_hex());
        let b = fingerprint("0xbb", &core_token_hex());
        let result = score(&a, &b).expect("no match");
        assert!(result.explanation.contains("nearly identical function interfaces"));
        assert!(result.explanation.contains("very similar code structure"));
    }

    #[test]
    fn test_scoring_deterministic() {
        let a = fingerprint("0xaa", &core_token_hex());
        let b = fingerprint("0xbb", &core_token_hex());
        assert_eq!(score(&a, &b), score(&a, &b));
    }
}
