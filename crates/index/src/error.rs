/// Error type for the Index module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic internal error that may occur during index building
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
