//! The guess/answer pair handled by one request

/// One user guess paired with the round's answer word.
///
/// Created per request, never mutated, never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    /// The word the player typed
    pub input: String,
    /// The hidden answer word
    pub answer: String,
}

impl WordPair {
    /// Create a new pair
    pub fn new(input: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            answer: answer.into(),
        }
    }
}
