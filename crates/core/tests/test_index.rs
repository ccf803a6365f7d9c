//! Integration tests for index-build functionality.

#[cfg(test)]
mod integration_tests {
    use std::sync::atomic::AtomicBool;

    use hugin_index::{build_index, ContractRecord, IndexConfig, MemoryStore};

    fn population(size: usize) -> Vec<ContractRecord> {
        (0..size)
            .map(|i| ContractRecord {
                address: format!("0x{i:040x}"),
                runtime_bytecode: format!(
                    "63a9059cbb14610040576370a08231146100805763000000{:02x}145403550155",
                    (i % 5) as u8
                ),
            })
            .collect()
    }

    fn config() -> IndexConfig {
        IndexConfig {
            locality_window: 5,
            comparison_cap: 25,
            num_threads: 2,
            seed: 42,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_is_idempotent() {
        let records = population(60);

        let mut first = MemoryStore::new();
        let stats_a = build_index(&records, &config(), &mut first, &AtomicBool::new(false))
            .expect("index build failed");

        let mut second = MemoryStore::new();
        let stats_b = build_index(&records, &config(), &mut second, &AtomicBool::new(false))
            .expect("index build failed");

        assert_eq!(stats_a, stats_b);
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_restarted_build_never_duplicates_rows() {
        let records = population(40);
        let mut store = MemoryStore::new();

        build_index(&records, &config(), &mut store, &AtomicBool::new(false))
            .expect("index build failed");
        let rows_after_first = store.rows().len();

        let stats = build_index(&records, &config(), &mut store, &AtomicBool::new(false))
            .expect("index build failed");
        assert_eq!(store.rows().len(), rows_after_first);
        assert_eq!(stats.rows_emitted, 0);
    }

    #[test]
    fn test_rows_meet_threshold_and_carry_version() {
        let records = population(30);
        let mut store = MemoryStore::new();
        let config = IndexConfig { min_score: 0.5, ..config() };

        build_index(&records, &config, &mut store, &AtomicBool::new(false))
            .expect("index build failed");

        assert!(!store.rows().is_empty());
        for row in store.rows() {
            assert!(row.combined_score >= 0.5);
            assert!(row.detector_version.starts_with("hugin/"));
            assert!(row.shared_patterns.starts_with('['));
        }
    }

    #[test]
    fn test_cancellation_stops_between_contracts() {
        let records = population(30);
        let mut store = MemoryStore::new();

        let stats = build_index(&records, &config(), &mut store, &AtomicBool::new(true))
            .expect("index build failed");
        assert!(stats.cancelled);
        assert!(store.rows().is_empty());
    }

    #[test]
    fn test_empty_bytecode_contracts_are_skipped() {
        let mut records = population(10);
        records.push(ContractRecord {
            address: "0xdead".to_string(),
            runtime_bytecode: "0x".to_string(),
        });

        let mut store = MemoryStore::new();
        let stats = build_index(&records, &config(), &mut store, &AtomicBool::new(false))
            .expect("index build failed");

        assert_eq!(stats.contracts, 11);
        assert_eq!(stats.fingerprinted, 10);
        assert!(!store.rows().iter().any(|row| row.contract_address == "0xdead"));
    }
}
