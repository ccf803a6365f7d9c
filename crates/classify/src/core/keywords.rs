//! Keyword tables for text-based evidence.
//!
//! All needles are lowercase; the text source lowercases its input once.
//! Trailing `(` anchors a needle to a call or declaration site, which cuts
//! down on matches inside comments and identifiers.

// contract-type keywords

pub(crate) const TOKEN_KEYWORDS: &[&str] = &["token", "transfer(", "balanceof", "totalsupply"];
pub(crate) const NFT_KEYWORDS: &[&str] = &["nft", "erc721", "tokenuri", "ownerof"];
pub(crate) const DAO_KEYWORDS: &[&str] = &["proposal", "vote(", "execute(", "quorum"];
pub(crate) const MULTISIG_KEYWORDS: &[&str] =
    &["multisig", "confirmtransaction", "requiredconfirmations", "submittransaction"];
pub(crate) const CROWDSALE_KEYWORDS: &[&str] =
    &["crowdsale", "buytokens(", "softcap", "hardcap", "presale"];
pub(crate) const EXCHANGE_KEYWORDS: &[&str] =
    &["exchange", "orderbook", "swap(", "filled", "makerfee"];
pub(crate) const GAMBLING_KEYWORDS: &[&str] =
    &["lottery", "jackpot", "bet(", "roll(", "wager"];
pub(crate) const GAME_KEYWORDS: &[&str] = &["game", "player", "level(", "score"];
pub(crate) const REGISTRY_KEYWORDS: &[&str] =
    &["registry", "register(", "resolver", "records["];

// feature keywords

pub(crate) const MINT_KEYWORDS: &[&str] = &["mint("];
pub(crate) const BURN_KEYWORDS: &[&str] = &["burn("];
pub(crate) const OWNABLE_KEYWORDS: &[&str] = &["onlyowner", "ownable", "transferownership"];
pub(crate) const PAUSABLE_KEYWORDS: &[&str] = &["pause(", "unpause(", "whennotpaused"];
pub(crate) const ROLE_KEYWORDS: &[&str] = &["hasrole", "accesscontrol", "grantrole"];
pub(crate) const UPGRADEABLE_KEYWORDS: &[&str] =
    &["upgradeto", "implementation", "proxy", "delegatecall"];
pub(crate) const SELFDESTRUCT_KEYWORDS: &[&str] = &["selfdestruct", "suicide("];
pub(crate) const TIMELOCK_KEYWORDS: &[&str] = &["timelock", "unlocktime", "deadline", "vesting"];
pub(crate) const REENTRANCY_KEYWORDS: &[&str] = &["nonreentrant", "reentrancyguard", "mutex"];
