//! Index construction over a contract population.
//!
//! Fingerprinting is farmed out to a worker pool since it is independent
//! per contract. The comparison phase walks the population in its given
//! stable order, so locality sampling and the seeded random top-up
//! reproduce exactly across runs with the same seed.

use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashSet;
use hugin_common::utils::{threading::task_pool, version::detector_version};
use hugin_similarity::{
    score, ContractFingerprint, SimilarityClass, SimilarityResult, MIN_MATCH_SCORE,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Error;

pub(crate) mod store;

use store::SimilarityStore;

/// One contract in the population, as supplied by the enumeration
/// collaborator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractRecord {
    pub address: String,
    pub runtime_bytecode: String,
}

/// Tunables for one index build.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// How far around each contract's index to sample (±window).
    pub locality_window: usize,
    /// Total comparisons per contract, locality plus random top-up.
    pub comparison_cap: usize,
    /// Minimum combined score for a row to be emitted.
    pub min_score: f64,
    /// Maximum emitted rows per contract, best matches first. Zero means
    /// unlimited.
    pub max_matches: usize,
    /// Seed for the random top-up sampler. Same seed, same comparisons.
    pub seed: u64,
    /// Rows per persistence batch.
    pub batch_size: usize,
    /// Worker threads for the fingerprinting phase.
    pub num_threads: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            locality_window: 50,
            comparison_cap: 200,
            min_score: MIN_MATCH_SCORE,
            max_matches: 10,
            seed: 0,
            batch_size: 100,
            num_threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }
}

/// One directional similarity edge, shaped for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityRow {
    pub contract_address: String,
    pub matched_address: String,
    pub combined_score: f64,
    pub selector_similarity: f64,
    pub skeleton_similarity: f64,
    pub structural_similarity: f64,
    pub size_similarity: f64,
    pub similarity_type: String,
    pub explanation: String,
    /// Shared pattern tags, serialized as a JSON array string.
    pub shared_patterns: String,
    pub detector_version: String,
}

/// Counters describing one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub contracts: usize,
    pub fingerprinted: usize,
    pub comparisons: u64,
    pub rows_emitted: usize,
    pub failed_batches: usize,
    pub cancelled: bool,
}

/// Fingerprint a population in parallel, preserving input order.
///
/// Contracts with empty or unparsable bytecode yield `None` and keep their
/// slot, so indices into the result line up with the input.
pub fn build_fingerprints(
    records: &[ContractRecord],
    num_threads: usize,
) -> Vec<Option<ContractFingerprint>> {
    let items: Vec<(usize, ContractRecord)> =
        records.iter().cloned().enumerate().map(|(i, record)| (i, record)).collect();

    let mut results = task_pool(items, num_threads.max(1), |(i, record)| {
        (i, fingerprint_record(&record))
    });
    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, fingerprint)| fingerprint).collect()
}

fn fingerprint_record(record: &ContractRecord) -> Option<ContractFingerprint> {
    if record.runtime_bytecode.is_empty() || record.runtime_bytecode == "0x" {
        return None;
    }
    let fingerprint = ContractFingerprint::from_bytecode(&record.address, &record.runtime_bytecode);
    if fingerprint.skeleton.is_empty() {
        debug!("no opcodes parsed for {}", record.address);
        return None;
    }
    Some(fingerprint)
}

/// Build the approximate similarity index for one population.
///
/// Emitted rows are directional: contract `i` is compared against its own
/// sample set, which need not contain any given `j` that sampled `i`.
/// Cancellation is honored between contracts; batch persistence failures
/// are logged and skipped, never fatal.
pub fn build_index(
    records: &[ContractRecord],
    config: &IndexConfig,
    store: &mut dyn SimilarityStore,
    cancelled: &AtomicBool,
) -> Result<IndexStats, Error> {
    let version = detector_version();
    let fingerprints = build_fingerprints(records, config.num_threads);

    let mut stats = IndexStats {
        contracts: records.len(),
        fingerprinted: fingerprints.iter().flatten().count(),
        ..Default::default()
    };
    info!("fingerprinted {}/{} contracts", stats.fingerprinted, stats.contracts);

    // one generator for the whole build keeps the draw sequence a pure
    // function of the seed and the population
    let mut rng = StdRng::seed_from_u64(config.seed);

    for (i, fingerprint) in fingerprints.iter().enumerate() {
        if cancelled.load(Ordering::Relaxed) {
            stats.cancelled = true;
            info!("index build cancelled after {} contracts", i);
            break;
        }
        let Some(fingerprint) = fingerprint else { continue };

        let candidates = sample_candidates(i, fingerprints.len(), config, &mut rng);
        let mut matches: Vec<SimilarityRow> = Vec::new();

        for j in candidates {
            let Some(other) = &fingerprints[j] else { continue };
            stats.comparisons += 1;

            if let Some(result) = score(fingerprint, other) {
                if result.combined_score >= config.min_score {
                    matches.push(to_row(fingerprint, other, &result, &version));
                }
            }
        }

        // best matches first, bounded per contract
        matches.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.matched_address.cmp(&b.matched_address))
        });
        if config.max_matches > 0 {
            matches.truncate(config.max_matches);
        }

        stats.rows_emitted += persist(&matches, config.batch_size, store, &mut stats.failed_batches);
    }

    info!(
        "index build complete: {} comparisons, {} rows emitted",
        stats.comparisons, stats.rows_emitted
    );
    Ok(stats)
}

/// Compare every contract against a fixed reference set instead of the
/// population itself, for tracking template descendants of known contracts.
pub fn build_reference_index(
    records: &[ContractRecord],
    references: &[ContractRecord],
    config: &IndexConfig,
    store: &mut dyn SimilarityStore,
    cancelled: &AtomicBool,
) -> Result<IndexStats, Error> {
    let version = detector_version();
    let reference_fingerprints: Vec<ContractFingerprint> =
        references.iter().filter_map(fingerprint_record).collect();
    if reference_fingerprints.is_empty() {
        warn!("no reference fingerprints could be derived");
        return Ok(IndexStats { contracts: records.len(), ..Default::default() });
    }

    let fingerprints = build_fingerprints(records, config.num_threads);
    let mut stats = IndexStats {
        contracts: records.len(),
        fingerprinted: fingerprints.iter().flatten().count(),
        ..Default::default()
    };

    for (i, fingerprint) in fingerprints.iter().enumerate() {
        if cancelled.load(Ordering::Relaxed) {
            stats.cancelled = true;
            info!("reference index build cancelled after {} contracts", i);
            break;
        }
        let Some(fingerprint) = fingerprint else { continue };

        let mut matches: Vec<SimilarityRow> = Vec::new();
        for reference in &reference_fingerprints {
            stats.comparisons += 1;
            if let Some(result) = score(fingerprint, reference) {
                if result.combined_score >= config.min_score {
                    matches.push(to_row(fingerprint, reference, &result, &version));
                }
            }
        }

        matches.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.matched_address.cmp(&b.matched_address))
        });
        if config.max_matches > 0 {
            matches.truncate(config.max_matches);
        }

        stats.rows_emitted += persist(&matches, config.batch_size, store, &mut stats.failed_batches);
    }

    Ok(stats)
}

/// The locality window around `i` plus seeded-random top-up to the cap.
fn sample_candidates(
    i: usize,
    population: usize,
    config: &IndexConfig,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut seen: HashSet<usize> = HashSet::new();
    let mut candidates = Vec::new();

    let start = i.saturating_sub(config.locality_window);
    let end = (i + config.locality_window + 1).min(population);
    for j in start..end {
        if j != i && seen.insert(j) {
            candidates.push(j);
        }
    }

    // bounded attempts so a tiny population cannot spin forever
    let mut attempts = 0;
    let max_attempts = config.comparison_cap * 4;
    while candidates.len() < config.comparison_cap &&
        attempts < max_attempts &&
        seen.len() + 1 < population
    {
        attempts += 1;
        let j = rng.gen_range(0..population);
        if j != i && seen.insert(j) {
            candidates.push(j);
        }
    }

    candidates
}

fn to_row(
    a: &ContractFingerprint,
    b: &ContractFingerprint,
    result: &SimilarityResult,
    version: &str,
) -> SimilarityRow {
    SimilarityRow {
        contract_address: a.address.clone(),
        matched_address: b.address.clone(),
        combined_score: result.combined_score,
        selector_similarity: result.components.selector,
        skeleton_similarity: result.components.skeleton,
        structural_similarity: result.components.structural,
        size_similarity: result.components.size,
        similarity_type: class_name(result.classification).to_string(),
        explanation: result.explanation.clone(),
        shared_patterns: serde_json::to_string(&result.shared_patterns)
            .unwrap_or_else(|_| "[]".to_string()),
        detector_version: version.to_string(),
    }
}

fn class_name(class: SimilarityClass) -> &'static str {
    match class {
        SimilarityClass::Exact => "exact",
        SimilarityClass::Structural => "structural",
        SimilarityClass::Weak => "weak",
        SimilarityClass::None => "none",
    }
}

/// Insert rows batch by batch. A failed batch is logged and dropped, the
/// build continues.
fn persist(
    rows: &[SimilarityRow],
    batch_size: usize,
    store: &mut dyn SimilarityStore,
    failed_batches: &mut usize,
) -> usize {
    let mut emitted = 0;
    for batch in rows.chunks(batch_size.max(1)) {
        match store.insert_rows(batch) {
            Ok(inserted) => emitted += inserted,
            Err(err) => {
                warn!("failed to persist batch of {} rows: {}", batch.len(), err);
                *failed_batches += 1;
            }
        }
    }
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn record(address: &str, bytecode: &str) -> ContractRecord {
        ContractRecord { address: address.to_string(), runtime_bytecode: bytecode.to_string() }
    }

    /// A small ERC-20-ish dispatcher with a parameterized body.
    fn token_bytecode(salt: u8) -> String {
        format!(
            "63a9059cbb14610040576370a08231146100805763{:08x}145403550155",
            u32::from(salt)
        )
    }

    fn population(size: usize) -> Vec<ContractRecord> {
        (0..size)
            .map(|i| record(&format!("0x{i:040x}"), &token_bytecode((i % 7) as u8)))
            .collect()
    }

    fn test_config() -> IndexConfig {
        IndexConfig { comparison_cap: 20, locality_window: 5, num_threads: 2, ..Default::default() }
    }

    #[test]
    fn test_fingerprints_preserve_order_and_gaps() {
        let records = vec![
            record("0xa", &token_bytecode(1)),
            record("0xb", ""),
            record("0xc", "0x"),
            record("0xd", &token_bytecode(2)),
        ];
        let fingerprints = build_fingerprints(&records, 3);
        assert_eq!(fingerprints.len(), 4);
        assert!(fingerprints[0].is_some());
        assert!(fingerprints[1].is_none());
        assert!(fingerprints[2].is_none());
        assert_eq!(fingerprints[3].as_ref().map(|f| f.address.as_str()), Some("0xd"));
    }

    #[test]
    fn test_same_seed_reproduces_rows() {
        let records = population(60);
        let config = test_config();

        let mut first = MemoryStore::new();
        let stats_a =
            build_index(&records, &config, &mut first, &AtomicBool::new(false))
                .expect("build failed");
        let mut second = MemoryStore::new();
        let stats_b =
            build_index(&records, &config, &mut second, &AtomicBool::new(false))
                .expect("build failed");

        assert_eq!(stats_a, stats_b);
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_rerun_into_same_store_never_duplicates() {
        let records = population(30);
        let config = test_config();
        let mut store = MemoryStore::new();

        let stats_a = build_index(&records, &config, &mut store, &AtomicBool::new(false))
            .expect("build failed");
        let after_first = store.rows().len();
        let stats_b = build_index(&records, &config, &mut store, &AtomicBool::new(false))
            .expect("build failed");

        assert_eq!(store.rows().len(), after_first);
        assert_eq!(stats_a.comparisons, stats_b.comparisons);
        assert_eq!(stats_b.rows_emitted, 0);
    }

    #[test]
    fn test_cancellation_between_contracts() {
        let records = population(30);
        let mut store = MemoryStore::new();
        let cancelled = AtomicBool::new(true);

        let stats = build_index(&records, &test_config(), &mut store, &cancelled)
            .expect("build failed");
        assert!(stats.cancelled);
        assert_eq!(stats.comparisons, 0);
        assert!(store.rows().is_empty());
    }

    #[test]
    fn test_max_matches_cap() {
        let records = population(40);
        let config = IndexConfig { max_matches: 3, ..test_config() };
        let mut store = MemoryStore::new();

        build_index(&records, &config, &mut store, &AtomicBool::new(false))
            .expect("build failed");
        for fingerprint_rows in
            store.rows().chunk_by(|a, b| a.contract_address == b.contract_address)
        {
            assert!(fingerprint_rows.len() <= 3);
        }
    }

    #[test]
    fn test_sample_respects_cap_and_excludes_self() {
        let config =
            IndexConfig { locality_window: 5, comparison_cap: 20, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = sample_candidates(100, 1000, &config, &mut rng);

        assert_eq!(candidates.len(), 20);
        assert!(!candidates.contains(&100));
        let unique: HashSet<usize> = candidates.iter().copied().collect();
        assert_eq!(unique.len(), candidates.len());
    }

    #[test]
    fn test_reference_index_emits_rows_toward_references() {
        let references = vec![record("0xref", &token_bytecode(1))];
        let records = population(10);
        let mut store = MemoryStore::new();

        let stats = build_reference_index(
            &records,
            &references,
            &test_config(),
            &mut store,
            &AtomicBool::new(false),
        )
        .expect("build failed");

        assert!(stats.rows_emitted > 0);
        assert!(store.rows().iter().all(|row| row.matched_address == "0xref"));
    }
}
