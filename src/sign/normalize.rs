//! Text normalisation: upper-case and split translated text into words.

/// Split `text` on runs of whitespace and upper-case every token.
///
/// Punctuation is kept as-is.  Empty or whitespace-only input yields no words.
///
/// ```
/// use speech_to_sign::sign::normalize;
///
/// assert_eq!(normalize("  good   morning!\n"), vec!["GOOD", "MORNING!"]);
/// assert!(normalize(" \t ").is_empty());
/// ```
pub fn normalize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_uppercase).collect()
}
