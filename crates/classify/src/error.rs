/// Error type for the Classifier module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic internal error that may occur during classification
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
