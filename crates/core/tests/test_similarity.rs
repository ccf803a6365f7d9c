//! Integration tests for similarity functionality.

#[cfg(test)]
mod integration_tests {
    use hugin_similarity::{score, size_similarity, ContractFingerprint, SimilarityClass};

    /// A dispatcher over the three core token selectors with a storage body.
    fn token_bytecode() -> String {
        "63a9059cbb14610040576370a0823114610080576318160ddd146100c0575b5403550155"
            .to_string()
    }

    #[test]
    fn test_identical_bytecode_scores_exact() {
        let a = ContractFingerprint::from_bytecode("0xaa", &token_bytecode());
        let b = ContractFingerprint::from_bytecode("0xbb", &token_bytecode());

        let result = score(&a, &b).expect("expected a match");
        assert_eq!(result.classification, SimilarityClass::Exact);
        assert!((result.components.selector - 1.0).abs() < 1e-9);
        assert!((result.components.skeleton - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_similarity_is_symmetric() {
        assert_eq!(size_similarity(123, 45678), size_similarity(45678, 123));
        assert_eq!(size_similarity(500, 500), 1.0);
    }

    #[test]
    fn test_size_gate_rejects_regardless_of_selectors() {
        let mut a = ContractFingerprint::from_bytecode("0xaa", &token_bytecode());
        let mut b = ContractFingerprint::from_bytecode("0xbb", &token_bytecode());
        a.byte_size = 10;
        b.byte_size = 1000;

        assert!(score(&a, &b).is_none());
    }

    #[test]
    fn test_component_scores_within_bounds() {
        let a = ContractFingerprint::from_bytecode("0xaa", &token_bytecode());
        let b = ContractFingerprint::from_bytecode(
            "0xbb",
            "63a9059cbb14610040575b54015560016000f3",
        );

        if let Some(result) = score(&a, &b) {
            for component in [
                result.components.selector,
                result.components.skeleton,
                result.components.structural,
                result.components.size,
            ] {
                assert!((0.0..=1.0).contains(&component));
            }
            assert!((0.0..=1.0).contains(&result.combined_score));
        }
    }

    #[test]
    fn test_shared_patterns_tag_token_interfaces() {
        let a = ContractFingerprint::from_bytecode("0xaa", &token_bytecode());
        let b = ContractFingerprint::from_bytecode("0xbb", &token_bytecode());

        let result = score(&a, &b).expect("expected a match");
        assert!(result.shared_patterns.contains(&"erc20_like".to_string()));
        assert!(result
            .shared_patterns
            .contains(&"transfer(address,uint256)".to_string()));
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = ContractFingerprint::from_bytecode("0xaa", &token_bytecode());
        let b = ContractFingerprint::from_bytecode("0xbb", &token_bytecode());
        assert_eq!(score(&a, &b), score(&a, &b));
    }
}
