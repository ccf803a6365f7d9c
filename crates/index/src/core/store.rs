//! Persistence seam for similarity rows.
//!
//! The builder only depends on the insert-ignore-conflicts contract here,
//! so a database-backed store, a file exporter, and the in-memory store
//! used in tests are interchangeable.

use eyre::Result;
use hashbrown::HashSet;

use super::SimilarityRow;

/// Destination for emitted similarity rows.
///
/// `insert_rows` must be idempotent over the (contract, matched) pair: rows
/// that conflict with already-persisted ones are skipped, never an error.
/// Repeated or restarted index builds rely on this.
pub trait SimilarityStore {
    /// Insert a batch, ignoring conflicting rows. Returns how many rows
    /// were newly inserted.
    fn insert_rows(&mut self, rows: &[SimilarityRow]) -> Result<usize>;
}

/// In-memory store keyed on the directional (contract, matched) pair.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<SimilarityRow>,
    seen: HashSet<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows inserted so far, in insertion order.
    pub fn rows(&self) -> &[SimilarityRow] {
        &self.rows
    }
}

impl SimilarityStore for MemoryStore {
    fn insert_rows(&mut self, rows: &[SimilarityRow]) -> Result<usize> {
        let mut inserted = 0;
        for row in rows {
            let key = (row.contract_address.clone(), row.matched_address.clone());
            if self.seen.insert(key) {
                self.rows.push(row.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(from: &str, to: &str) -> SimilarityRow {
        SimilarityRow {
            contract_address: from.to_string(),
            matched_address: to.to_string(),
            combined_score: 0.5,
            selector_similarity: 0.5,
            skeleton_similarity: 0.5,
            structural_similarity: 0.5,
            size_similarity: 1.0,
            similarity_type: "weak".to_string(),
            explanation: String::new(),
            shared_patterns: "[]".to_string(),
            detector_version: "hugin/0.0.0".to_string(),
        }
    }

    #[test]
    fn test_conflicting_rows_ignored() {
        let mut store = MemoryStore::new();
        assert_eq!(store.insert_rows(&[row("0xa", "0xb")]).expect("insert failed"), 1);
        assert_eq!(store.insert_rows(&[row("0xa", "0xb")]).expect("insert failed"), 0);
        assert_eq!(store.rows().len(), 1);
    }

    #[test]
    fn test_rows_are_directional() {
        let mut store = MemoryStore::new();
        store.insert_rows(&[row("0xa", "0xb"), row("0xb", "0xa")]).expect("insert failed");
        assert_eq!(store.rows().len(), 2);
    }
}
