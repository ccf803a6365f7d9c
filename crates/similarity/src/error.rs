/// Error type for the Similarity module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic internal error that may occur during similarity scoring
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
