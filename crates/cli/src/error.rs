#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Disassemble error: {0}")]
    DisassembleError(#[from] hugin_core::hugin_disassemble::Error),
    #[error("Classify error: {0}")]
    ClassifyError(#[from] hugin_core::hugin_classify::Error),
    #[error("Index error: {0}")]
    IndexError(#[from] hugin_core::hugin_index::Error),
}
