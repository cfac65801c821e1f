//! Phrase resolver: exact or closest animation label for a phrase.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::similarity::SequenceMatcher;

/// Minimum similarity ratio a fuzzy candidate must reach.
pub const MATCH_CUTOFF: f64 = 0.8;

/// How a [`PhraseMatch`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The upper-cased phrase is itself a label.
    Exact,
    /// Best label by similarity ratio, at or above [`MATCH_CUTOFF`].
    Fuzzy,
}

/// A resolved animation label.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseMatch {
    pub label: String,
    /// Similarity ratio in `[0, 1]`; `1.0` for exact matches.
    pub score: f64,
    pub kind: MatchKind,
}

/// Resolve `phrase` against the animation mapping.
///
/// 1. Exact: the upper-cased phrase is a key.
/// 2. Fuzzy: the label with the highest similarity ratio, if it reaches
///    [`MATCH_CUTOFF`].  Equal scores keep the label seen first in the
///    mapping's (sorted) iteration order.
/// 3. Otherwise `None`, which is a normal outcome.
///
/// ```
/// use std::collections::BTreeMap;
/// use std::path::PathBuf;
/// use speech_to_sign::sign::{resolve, MatchKind};
///
/// let mut gifs = BTreeMap::new();
/// gifs.insert("THANK YOU".to_string(), PathBuf::from("gifs/thank you.gif"));
///
/// let m = resolve("thankyou", &gifs).unwrap();
/// assert_eq!(m.label, "THANK YOU");
/// assert_eq!(m.kind, MatchKind::Fuzzy);
/// ```
pub fn resolve(phrase: &str, animations: &BTreeMap<String, PathBuf>) -> Option<PhraseMatch> {
    let key = phrase.to_uppercase();

    if animations.contains_key(&key) {
        return Some(PhraseMatch {
            label: key,
            score: 1.0,
            kind: MatchKind::Exact,
        });
    }

    let matcher = SequenceMatcher::new(&key);
    let mut best: Option<(&str, f64)> = None;

    for label in animations.keys() {
        let score = matcher.ratio(label);
        if score < MATCH_CUTOFF {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((label, score));
        }
    }

    best.map(|(label, score)| PhraseMatch {
        label: label.to_string(),
        score,
        kind: MatchKind::Fuzzy,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::similarity_ratio;

    fn gifs(labels: &[&str]) -> BTreeMap<String, PathBuf> {
        labels
            .iter()
            .map(|l| (l.to_string(), PathBuf::from(format!("gifs/{l}.gif"))))
            .collect()
    }

    #[test]
    fn exact_match_wins() {
        let map = gifs(&["HELLO", "HELL", "HELLO!"]);
        let m = resolve("HELLO", &map).expect("match");
        assert_eq!(m.label, "HELLO");
        assert_eq!(m.kind, MatchKind::Exact);
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn exact_match_is_case_insensitive_on_input() {
        let map = gifs(&["GOOD MORNING"]);
        let m = resolve("Good Morning", &map).expect("match");
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn missing_space_resolves_fuzzily() {
        let map = gifs(&["THANK YOU", "YES"]);
        let m = resolve("THANKYOU", &map).expect("match");
        assert_eq!(m.label, "THANK YOU");
        assert_eq!(m.kind, MatchKind::Fuzzy);
        assert!(m.score >= MATCH_CUTOFF);
    }

    #[test]
    fn nothing_close_enough_is_none() {
        let map = gifs(&["HELLO", "THANK YOU"]);
        assert!(resolve("XYZQ", &map).is_none());
    }

    #[test]
    fn empty_mapping_is_none() {
        assert!(resolve("HELLO", &BTreeMap::new()).is_none());
    }

    #[test]
    fn highest_score_wins() {
        // "HELLOS" vs HELLO → 10/11, vs HELL → 8/10
        let map = gifs(&["HELL", "HELLO"]);
        let m = resolve("HELLOS", &map).expect("match");
        assert_eq!(m.label, "HELLO");
    }

    #[test]
    fn ties_keep_first_label_in_order() {
        // "ABCDX" and "ABCDY" both score 8/10 against "ABCDZ".
        let map = gifs(&["ABCDY", "ABCDX"]);
        let m = resolve("ABCDZ", &map).expect("match");
        assert_eq!(m.label, "ABCDX");
    }

    #[test]
    fn fuzzy_results_never_fall_below_cutoff() {
        let map = gifs(&["HELLO", "HELP", "GOODBYE", "GOOD MORNING", "PLEASE"]);
        for word in ["HELO", "HALP", "GOODBY", "MORNING", "PLZ", "GOOD MOURNING"] {
            if let Some(m) = resolve(word, &map) {
                assert!(
                    similarity_ratio(&m.label, word) >= MATCH_CUTOFF,
                    "{word} resolved to {} below cutoff",
                    m.label
                );
            }
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let map = gifs(&["THANK YOU", "THANKS", "HELLO"]);
        let first = resolve("THANKYOU", &map);
        for _ in 0..5 {
            assert_eq!(resolve("THANKYOU", &map), first);
        }
    }
}
