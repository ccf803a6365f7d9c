//! Line-oriented export of analysis results.
//!
//! The CSV layouts match the `contract_similarity` and
//! `contract_capability` table schemas so the files can be loaded with a
//! plain COPY, and the JSONL variant is one complete object per line for
//! streaming consumers.

use hugin_core::{
    hugin_classify::CapabilityRow, hugin_index::SimilarityRow, hugin_similarity::ContractFingerprint,
};

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Similarity rows as CSV lines, header first.
pub fn similarity_rows_csv(rows: &[SimilarityRow]) -> Vec<String> {
    let mut lines = vec![String::from(
        "contract_address,matched_address,combined_score,selector_similarity,skeleton_similarity,structural_similarity,size_similarity,similarity_type,explanation,shared_patterns,detector_version",
    )];

    for row in rows {
        lines.push(format!(
            "{},{},{:.10},{:.10},{:.10},{:.10},{:.10},{},{},{},{}",
            row.contract_address,
            row.matched_address,
            row.combined_score,
            row.selector_similarity,
            row.skeleton_similarity,
            row.structural_similarity,
            row.size_similarity,
            row.similarity_type,
            csv_escape(&row.explanation),
            csv_escape(&row.shared_patterns),
            row.detector_version
        ));
    }

    lines
}

/// Similarity rows as JSON Lines.
pub fn similarity_rows_jsonl(rows: &[SimilarityRow]) -> Result<Vec<String>, serde_json::Error> {
    rows.iter().map(serde_json::to_string).collect()
}

/// Per-contract fingerprint summaries as CSV lines, header first. Contracts
/// that could not be fingerprinted are skipped.
pub fn fingerprint_rows_csv(fingerprints: &[Option<ContractFingerprint>]) -> Vec<String> {
    let mut lines = vec![String::from(
        "contract_address,byte_size,opcode_count,unique_opcodes,unique_ratio,branch_density,estimated_loops,jumps,jumpdests,sloads,sstores,external_calls,logs,selector_count",
    )];

    for fingerprint in fingerprints.iter().flatten() {
        let shape = &fingerprint.shape;
        let structural = &fingerprint.structural;
        lines.push(format!(
            "{},{},{},{},{:.6},{:.6},{},{},{},{},{},{},{},{}",
            fingerprint.address,
            fingerprint.byte_size,
            shape.opcode_count,
            shape.unique_opcodes,
            shape.unique_ratio,
            shape.branch_density,
            shape.estimated_loops,
            structural.jumps,
            structural.jumpdests,
            structural.sloads,
            structural.sstores,
            structural.external_calls,
            structural.logs,
            fingerprint.selectors.len()
        ));
    }

    lines
}

/// Capability rows as CSV lines, header first.
pub fn capability_rows_csv(rows: &[CapabilityRow]) -> Vec<String> {
    let mut lines = vec![String::from(
        "contract_address,capability_key,status,confidence,primary_evidence_type,detector_version",
    )];

    for row in rows {
        lines.push(format!(
            "{},{},{},{:.4},{},{}",
            row.contract_address,
            row.capability_key,
            serde_plain(&row.status),
            row.confidence,
            serde_plain(&row.primary_evidence_type),
            row.detector_version
        ));
    }

    lines
}

/// Render a unit enum through its serde name.
fn serde_plain<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default().trim_matches('"').to_string()
}
