/// Error type for the Core module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error when disassembling bytecode
    #[error("DisassemblerError: {0}")]
    DisassemblerError(#[from] hugin_disassemble::Error),
    /// Error when classifying a contract
    #[error("ClassifierError: {0}")]
    ClassifierError(#[from] hugin_classify::Error),
    /// Error when scoring similarity
    #[error("SimilarityError: {0}")]
    SimilarityError(#[from] hugin_similarity::Error),
    /// Error when building a similarity index
    #[error("IndexError: {0}")]
    IndexError(#[from] hugin_index::Error),
}
