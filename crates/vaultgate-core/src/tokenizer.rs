//! Token counting for answer-generation context management.
//!
//! Uses the tiktoken library for counts compatible with common LLM
//! tokenization schemes, plus a fast estimation helper for quick checks.

use crate::error::{Error, Result};
use crate::models::MessageRecord;

/// Trait for token counting operations.
///
/// Implementations must be thread-safe; the answer orchestrator shares one
/// tokenizer across concurrent requests.
pub trait Tokenizer: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Get the name/identifier of this tokenizer.
    fn name(&self) -> &str;
}

/// Tiktoken-based tokenizer implementation.
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
    name: String,
}

impl TiktokenTokenizer {
    /// Create a tokenizer for the specified model.
    pub fn new(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| Error::Config(format!("Failed to initialize tokenizer: {}", e)))?;

        Ok(Self {
            bpe,
            name: model.to_string(),
        })
    }

    /// Create the default cl100k_base tokenizer.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| Error::Config(format!("Failed to initialize cl100k_base: {}", e)))?;

        Ok(Self {
            bpe,
            name: "cl100k_base".to_string(),
        })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Quickly estimate token count without full tokenization.
///
/// Uses a heuristic ratio of ~3.7 characters per token for English text.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f32 / 3.7).ceil() as usize
}

/// Keep the most recent history entries whose content fits the token budget.
///
/// Walks from the newest entry backward accumulating token counts. The entry
/// that crosses the budget is excluded along with everything older; if the
/// whole history fits, all of it is kept.
pub fn truncate_history<'a>(
    messages: &'a [MessageRecord],
    tokenizer: &dyn Tokenizer,
    max_tokens: usize,
) -> &'a [MessageRecord] {
    let mut tokens = 0;
    for i in (0..messages.len()).rev() {
        tokens += tokenizer.count_tokens(&messages[i].content);
        if tokens >= max_tokens {
            return &messages[i + 1..];
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts whitespace-separated words; keeps truncation tests independent
    /// of the BPE vocabulary.
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn count_tokens(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }

        fn name(&self) -> &str {
            "words"
        }
    }

    fn message(content: &str) -> MessageRecord {
        MessageRecord::user(content)
    }

    #[test]
    fn test_cl100k_initialization() {
        let tokenizer = TiktokenTokenizer::cl100k().unwrap();
        assert_eq!(tokenizer.name(), "cl100k_base");
        assert!(tokenizer.count_tokens("The quick brown fox") > 0);
    }

    #[test]
    fn test_count_tokens_empty_string() {
        let tokenizer = TiktokenTokenizer::cl100k().unwrap();
        assert_eq!(tokenizer.count_tokens(""), 0);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        // 44 chars / 3.7 = 11.89 -> 12
        assert_eq!(estimate_tokens("The quick brown fox jumps over the lazy dog."), 12);
    }

    #[test]
    fn test_truncate_keeps_all_under_budget() {
        let history = vec![message("one two"), message("three"), message("four five")];
        let kept = truncate_history(&history, &WordTokenizer, 100);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_truncate_drops_crossing_entry() {
        // Newest-backward: "five six" (2) then "three four" (2) crosses a
        // budget of 4, so only the newest entry survives.
        let history = vec![
            message("one two"),
            message("three four"),
            message("five six"),
        ];
        let kept = truncate_history(&history, &WordTokenizer, 4);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content, "five six");
    }

    #[test]
    fn test_truncate_exact_budget_excludes_boundary() {
        // Accumulated count reaching the budget exactly still drops the entry.
        let history = vec![message("a b c"), message("d e f")];
        let kept = truncate_history(&history, &WordTokenizer, 6);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content, "d e f");
    }

    #[test]
    fn test_truncate_empty_history() {
        let history: Vec<MessageRecord> = vec![];
        assert!(truncate_history(&history, &WordTokenizer, 10).is_empty());
    }

    #[test]
    fn test_truncate_single_oversized_entry() {
        let history = vec![message("one two three four five")];
        let kept = truncate_history(&history, &WordTokenizer, 3);
        assert!(kept.is_empty());
    }
}
