//! Text tokenization
//!
//! Page text is split on whitespace, each candidate is trimmed of non-word
//! characters at both ends and lowercased. Internal punctuation survives, so
//! `it's`, `well-being`, `10,000` and `j.m` stay single tokens. Candidates
//! that trim down to nothing are dropped and do not consume a position.

/// Returns true for characters that may start or end a token
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits document text into its ordered sequence of normalized tokens
///
/// # Examples
///
/// ```
/// use quarry::tokenize;
///
/// let tokens = tokenize("“The world as we have created it...” (Einstein)");
/// assert_eq!(tokens, vec!["the", "world", "as", "we", "have", "created", "it", "einstein"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !is_word_char(c)))
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_lowercase)
        .collect()
}
