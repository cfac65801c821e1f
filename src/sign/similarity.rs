//! Sequence-similarity ratio with `difflib.SequenceMatcher` semantics.
//!
//! The ratio is `2·M / T` where `M` is the total size of the matching blocks
//! found by recursively taking the longest common run, and `T` is the combined
//! length of both sequences.  Strings are compared per Unicode scalar value.
//!
//! The "popular element" heuristic is reproduced too: when the second
//! sequence has 200 or more elements, any element occurring in more than
//! `len / 100 + 1` positions is ignored when seeding matches.  Labels and
//! phrases rarely reach that length, but the scores stay identical when they do.

use std::collections::HashMap;

/// Length from which the popular-element heuristic applies.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Matcher with a fixed second sequence `b`, compared against many `a`s.
///
/// Indexing `b` once and scoring every candidate against it is how the
/// resolver scans the whole animation mapping for one phrase.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    /// Positions of each (non-popular) element of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { b, b2j }
    }

    /// Similarity of `a` against this matcher's sequence, in `[0, 1]`.
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matching_chars(&a) as f64 / total as f64
    }

    /// Sum of the sizes of all matching blocks between `a` and `b`.
    fn matching_chars(&self, a: &[char]) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest matching block in `a[alo..ahi]` / `b[blo..bhi]`.
    ///
    /// Returns `(i, j, k)` such that `a[i..i+k] == b[j..j+k]`; among maximal
    /// blocks the one starting earliest in `a`, then earliest in `b`, wins.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.b;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a match but may still extend one.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

/// Similarity ratio between `a` and `b`.
///
/// ```
/// use speech_to_sign::sign::similarity_ratio;
///
/// assert_eq!(similarity_ratio("HELLO", "HELLO"), 1.0);
/// assert!((similarity_ratio("THANK YOU", "THANKYOU") - 16.0 / 17.0).abs() < 1e-12);
/// ```
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn close(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-12
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(close(similarity_ratio("GOOD MORNING", "GOOD MORNING"), 1.0));
    }

    #[test]
    fn both_empty_score_one() {
        assert!(close(similarity_ratio("", ""), 1.0));
    }

    #[test]
    fn one_empty_scores_zero() {
        assert!(close(similarity_ratio("", "ABC"), 0.0));
        assert!(close(similarity_ratio("ABC", ""), 0.0));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(close(similarity_ratio("ABC", "XYZ"), 0.0));
    }

    #[test]
    fn classic_difflib_example() {
        // SequenceMatcher(None, "abcd", "bcde").ratio() == 0.75
        assert!(close(similarity_ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn recursive_blocks_are_counted() {
        // Matching blocks "A" and "C" around a differing middle: 2*2/6
        assert!(close(similarity_ratio("AXC", "AYC"), 4.0 / 6.0));
    }

    #[test]
    fn order_of_arguments_can_matter() {
        // SequenceMatcher(None, "tide", "diet").ratio() == 0.25
        // SequenceMatcher(None, "diet", "tide").ratio() == 0.5
        assert!(close(similarity_ratio("tide", "diet"), 0.25));
        assert!(close(similarity_ratio("diet", "tide"), 0.5));
    }

    #[test]
    fn missing_space_is_still_similar() {
        let r = similarity_ratio("THANK YOU", "THANKYOU");
        assert!(r >= 0.8, "ratio {r}");
    }

    #[test]
    fn multibyte_characters_count_once() {
        assert!(close(similarity_ratio("CAFÉ", "CAFE"), 6.0 / 8.0));
    }

    #[test]
    fn popular_elements_only_extend_matches() {
        // 200 'A's followed by "XY": every 'A' is popular and cannot seed a
        // match, so only "XY" is found first and then extended backwards.
        let b = format!("{}XY", "A".repeat(200));
        let a = format!("{}XY", "A".repeat(10));
        let r = similarity_ratio(&a, &b);
        assert!(close(r, 2.0 * 12.0 / (12.0 + 202.0)), "ratio {r}");
    }
}
