mod args;
mod text;

// re-export the public interface
pub use args::{ClassifyArgs, ClassifyArgsBuilder};
pub use text::{LowercasedText, NoText, TextEvidenceSource};
