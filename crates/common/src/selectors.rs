//! Well-known 4-byte selectors and event topic prefixes from the early
//! token era, shared by the classifier and the similarity scorer.
//!
//! Selector strings are 8 lowercase hex characters, no `0x` prefix.

use hashbrown::HashMap;
use lazy_static::lazy_static;

/// The three selectors every recognizable ERC-20 carries. Matching two or
/// more of these is treated as strong token evidence.
pub const ERC20_CORE_SELECTORS: &[&str] = &["a9059cbb", "70a08231", "18160ddd"];

/// The full required ERC-20 interface.
pub const ERC20_REQUIRED_SELECTORS: &[&str] =
    &["18160ddd", "70a08231", "a9059cbb", "095ea7b3", "23b872dd", "dd62ed3e"];

/// The core required ERC-721 interface as deployed in the era.
pub const ERC721_REQUIRED_SELECTORS: &[&str] =
    &["6352211e", "70a08231", "095ea7b3", "23b872dd"];

/// Optional ERC-721 surface used to strengthen a probable match.
pub const ERC721_EXTENDED_SELECTORS: &[&str] =
    &["42842e0e", "081812fc", "a22cb465", "e985e9c5"];

/// `supportsInterface(bytes4)`.
pub const ERC165_SELECTOR: &str = "01ffc9a7";

/// First 4 bytes of `keccak("Transfer(address,address,uint256)")`.
pub const TRANSFER_EVENT_PREFIX: &str = "ddf252ad";

/// First 4 bytes of `keccak("Approval(address,address,uint256)")`.
pub const APPROVAL_EVENT_PREFIX: &str = "8c5be1e5";

lazy_static! {
    /// Maps well-known selectors to their canonical signatures, used to tag
    /// shared interface surface in similarity explanations.
    pub static ref WELL_KNOWN_SELECTORS: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("a9059cbb", "transfer(address,uint256)");
        map.insert("70a08231", "balanceOf(address)");
        map.insert("18160ddd", "totalSupply()");
        map.insert("095ea7b3", "approve(address,uint256)");
        map.insert("23b872dd", "transferFrom(address,address,uint256)");
        map.insert("dd62ed3e", "allowance(address,address)");
        map.insert("40c10f19", "mint(address,uint256)");
        map.insert("42966c68", "burn(uint256)");
        map.insert("8da5cb5b", "owner()");
        map.insert("f2fde38b", "transferOwnership(address)");
        map.insert("d0e30db0", "deposit()");
        map.insert("2e1a7d4d", "withdraw(uint256)");
        map.insert("01ffc9a7", "supportsInterface(bytes4)");
        map.insert("6352211e", "ownerOf(uint256)");
        map.insert("06fdde03", "name()");
        map.insert("95d89b41", "symbol()");
        map.insert("313ce567", "decimals()");
        map
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_lookup() {
        assert_eq!(WELL_KNOWN_SELECTORS.get("a9059cbb"), Some(&"transfer(address,uint256)"));
        assert_eq!(WELL_KNOWN_SELECTORS.get("deadbeef"), None);
    }

    #[test]
    fn test_core_selectors_are_required() {
        for selector in ERC20_CORE_SELECTORS {
            assert!(ERC20_REQUIRED_SELECTORS.contains(selector));
        }
    }
}
