//! Standard-compliance detection from the extracted selector set.
//!
//! Purely selector-driven. The count of matched required selectors decides
//! between `present` (full interface plus the canonical event) and
//! `probable` (most of the interface).

use hashbrown::HashSet;
use hugin_common::selectors::{
    APPROVAL_EVENT_PREFIX, ERC165_SELECTOR, ERC20_REQUIRED_SELECTORS, ERC721_EXTENDED_SELECTORS,
    ERC721_REQUIRED_SELECTORS, TRANSFER_EVENT_PREFIX,
};
use hugin_disassemble::EvmAnalysis;

use super::{CapabilityStatus, Detection, EvidenceType};

/// Minimum matched ERC-20 selectors for a `probable` assertion.
const ERC20_PROBABLE_FLOOR: usize = 4;

/// Minimum matched ERC-721 selectors for a `probable` assertion.
const ERC721_PROBABLE_FLOOR: usize = 3;

fn matched(required: &[&str], selectors: &HashSet<String>) -> usize {
    required.iter().filter(|selector| selectors.contains(**selector)).count()
}

/// ERC-20: all six required selectors plus the Transfer event reaches
/// `present`; most of the interface is `probable`, strengthened when the
/// Approval event is also emitted.
pub(crate) fn detect_erc20(analysis: &EvmAnalysis) -> Option<Detection> {
    let hits = matched(ERC20_REQUIRED_SELECTORS, &analysis.selectors);

    if hits == ERC20_REQUIRED_SELECTORS.len() &&
        analysis.event_topics.contains(TRANSFER_EVENT_PREFIX)
    {
        return Some(Detection::new(CapabilityStatus::Present, 0.95, EvidenceType::Selector));
    }
    if hits >= ERC20_PROBABLE_FLOOR {
        let confidence = if analysis.event_topics.contains(APPROVAL_EVENT_PREFIX) {
            0.75
        } else {
            0.7
        };
        return Some(Detection::new(CapabilityStatus::Probable, confidence, EvidenceType::Selector));
    }
    None
}

/// ERC-721: the four required selectors plus the Transfer event reaches
/// `present`; most of the interface is `probable`, strengthened when the
/// optional approval/enumeration surface is also present.
pub(crate) fn detect_erc721(analysis: &EvmAnalysis) -> Option<Detection> {
    let hits = matched(ERC721_REQUIRED_SELECTORS, &analysis.selectors);

    if hits == ERC721_REQUIRED_SELECTORS.len() &&
        analysis.event_topics.contains(TRANSFER_EVENT_PREFIX)
    {
        return Some(Detection::new(CapabilityStatus::Present, 0.9, EvidenceType::Selector));
    }
    if hits >= ERC721_PROBABLE_FLOOR {
        let confidence = if matched(ERC721_EXTENDED_SELECTORS, &analysis.selectors) >= 2 {
            0.75
        } else {
            0.65
        };
        return Some(Detection::new(CapabilityStatus::Probable, confidence, EvidenceType::Selector));
    }
    None
}

/// ERC-165: the `supportsInterface` selector alone is the whole interface.
pub(crate) fn detect_erc165(analysis: &EvmAnalysis) -> Option<Detection> {
    if analysis.selectors.contains(ERC165_SELECTOR) {
        return Some(Detection::new(CapabilityStatus::Present, 0.9, EvidenceType::Selector));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hugin_disassemble::analyze;

    /// Builds bytecode whose dispatcher compares against the given
    /// selectors, optionally logging the given 32-byte topic.
    fn dispatcher(selectors: &[&str], topic: Option<&str>) -> String {
        let mut hex = String::new();
        for selector in selectors {
            // PUSH4 <selector> EQ PUSH2 0040 JUMPI
            hex.push_str("63");
            hex.push_str(selector);
            hex.push_str("1461004057");
        }
        if let Some(topic) = topic {
            hex.push_str("7f");
            hex.push_str(topic);
            hex.push_str("a1");
        }
        hex
    }

    const TRANSFER_TOPIC: &str =
        "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

    #[test]
    fn test_full_erc20_present() {
        let hex = dispatcher(ERC20_REQUIRED_SELECTORS, Some(TRANSFER_TOPIC));
        let detection = detect_erc20(&analyze(&hex)).expect("no detection");
        assert_eq!(detection.status, CapabilityStatus::Present);
    }

    #[test]
    fn test_partial_erc20_probable() {
        let hex = dispatcher(&ERC20_REQUIRED_SELECTORS[..4], None);
        let detection = detect_erc20(&analyze(&hex)).expect("no detection");
        assert_eq!(detection.status, CapabilityStatus::Probable);
    }

    #[test]
    fn test_full_interface_without_event_is_probable() {
        let hex = dispatcher(ERC20_REQUIRED_SELECTORS, None);
        let detection = detect_erc20(&analyze(&hex)).expect("no detection");
        assert_eq!(detection.status, CapabilityStatus::Probable);
    }

    #[test]
    fn test_too_few_selectors_no_assertion() {
        let hex = dispatcher(&ERC20_REQUIRED_SELECTORS[..2], None);
        assert!(detect_erc20(&analyze(&hex)).is_none());
    }

    const APPROVAL_TOPIC: &str =
        "8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925";

    #[test]
    fn test_partial_erc20_with_approval_event_scores_higher() {
        let plain = detect_erc20(&analyze(&dispatcher(&ERC20_REQUIRED_SELECTORS[..4], None)))
            .expect("no detection");
        let with_approval =
            detect_erc20(&analyze(&dispatcher(&ERC20_REQUIRED_SELECTORS[..4], Some(APPROVAL_TOPIC))))
                .expect("no detection");

        assert_eq!(plain.status, CapabilityStatus::Probable);
        assert_eq!(with_approval.status, CapabilityStatus::Probable);
        assert!(with_approval.confidence > plain.confidence);
    }

    #[test]
    fn test_partial_erc721_with_extended_surface_scores_higher() {
        let plain = detect_erc721(&analyze(&dispatcher(&ERC721_REQUIRED_SELECTORS[..3], None)))
            .expect("no detection");

        let mut selectors: Vec<&str> = ERC721_REQUIRED_SELECTORS[..3].to_vec();
        selectors.extend(&ERC721_EXTENDED_SELECTORS[..2]);
        let extended =
            detect_erc721(&analyze(&dispatcher(&selectors, None))).expect("no detection");

        assert_eq!(plain.status, CapabilityStatus::Probable);
        assert_eq!(extended.status, CapabilityStatus::Probable);
        assert!(extended.confidence > plain.confidence);
    }

    #[test]
    fn test_erc165() {
        let hex = dispatcher(&[ERC165_SELECTOR], None);
        let detection = detect_erc165(&analyze(&hex)).expect("no detection");
        assert_eq!(detection.status, CapabilityStatus::Present);
    }
}
