//! Text evidence abstraction.
//!
//! Keyword matching is substring search over lowercased free text (verified
//! source or decompiled pseudocode). It lives behind a trait so that
//! bytecode-only callers and tests never touch a text backend.

/// A source of keyword evidence for one contract.
pub trait TextEvidenceSource {
    /// Whether the text contains the given lowercase keyword.
    fn contains(&self, keyword: &str) -> bool;

    /// Whether there is any text at all.
    fn is_empty(&self) -> bool;

    /// How many of the given keywords match.
    fn match_count(&self, keywords: &[&str]) -> usize {
        keywords.iter().filter(|keyword| self.contains(keyword)).count()
    }
}

/// Free text lowercased once at construction.
pub struct LowercasedText {
    text: String,
}

impl LowercasedText {
    /// Create a new text source from source code or decompiled pseudocode.
    pub fn new(text: &str) -> Self {
        Self { text: text.to_lowercase() }
    }
}

impl TextEvidenceSource for LowercasedText {
    fn contains(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The absent-text case. Matches nothing.
pub struct NoText;

impl TextEvidenceSource for NoText {
    fn contains(&self, _keyword: &str) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercased_matching() {
        let text = LowercasedText::new("function Transfer(address TO) public");
        assert!(text.contains("transfer("));
        assert!(!text.contains("mint("));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_match_count() {
        let text = LowercasedText::new("proposal vote( execute(");
        assert_eq!(text.match_count(&["proposal", "vote(", "execute(", "veto"]), 3);
    }

    #[test]
    fn test_no_text() {
        assert!(NoText.is_empty());
        assert!(!NoText.contains("anything"));
        assert_eq!(NoText.match_count(&["a", "b"]), 0);
    }
}
