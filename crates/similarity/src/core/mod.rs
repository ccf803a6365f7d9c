pub(crate) mod fingerprint;
pub(crate) mod score;
