//! Letter-sequence planner: finger-spelling layout for a single word.
//!
//! A word is cut into rows of at most [`MAX_LETTERS_PER_ROW`] characters,
//! left to right.  This is a fixed chunking rule: a 13-letter word always
//! becomes rows of 6, 6 and 1.

use std::path::PathBuf;

use super::inventory::AssetInventory;

/// Maximum number of characters shown side by side.
pub const MAX_LETTERS_PER_ROW: usize = 6;

/// Size (width, height) every resolved letter image is drawn at.
pub const LETTER_DISPLAY_SIZE: [u32; 2] = [150, 150];

// ---------------------------------------------------------------------------
// LetterCell / LetterRow
// ---------------------------------------------------------------------------

/// One character slot in a [`LetterRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterCell {
    /// An image asset exists for this letter.
    Resolved { letter: char, image: PathBuf },
    /// No asset; the presentation layer shows the raw character.
    Unresolved(char),
}

impl LetterCell {
    /// The character this cell stands for.
    pub fn character(&self) -> char {
        match self {
            LetterCell::Resolved { letter, .. } => *letter,
            LetterCell::Unresolved(c) => *c,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LetterCell::Resolved { .. })
    }
}

/// An ordered run of at most [`MAX_LETTERS_PER_ROW`] cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LetterRow {
    cells: Vec<LetterCell>,
}

impl LetterRow {
    pub fn cells(&self) -> &[LetterCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The row's characters as a string, resolved or not.
    pub fn text(&self) -> String {
        self.cells.iter().map(LetterCell::character).collect()
    }
}

// ---------------------------------------------------------------------------
// plan_letters
// ---------------------------------------------------------------------------

/// Lay out `word` into letter rows, resolving each character against the
/// inventory's letter images.
///
/// A character is resolved only when it is alphabetic *and* an image exists
/// under its single-character label.  Digits, punctuation and letters with no
/// asset stay unresolved.
pub fn plan_letters(word: &str, inventory: &AssetInventory) -> Vec<LetterRow> {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let width = chars.len().min(MAX_LETTERS_PER_ROW);

    chars
        .chunks(width)
        .map(|segment| LetterRow {
            cells: segment.iter().map(|&c| resolve_char(c, inventory)).collect(),
        })
        .collect()
}

fn resolve_char(c: char, inventory: &AssetInventory) -> LetterCell {
    if c.is_alphabetic() {
        let mut buf = [0u8; 4];
        if let Some(path) = inventory.letter(c.encode_utf8(&mut buf)) {
            return LetterCell::Resolved {
                letter: c,
                image: path.to_path_buf(),
            };
        }
    }
    LetterCell::Unresolved(c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn alphabet_inventory() -> AssetInventory {
        let letters: BTreeMap<String, PathBuf> = ('A'..='Z')
            .map(|c| (c.to_string(), PathBuf::from(format!("images/{c}.png"))))
            .collect();
        AssetInventory::from_maps(letters, BTreeMap::new())
    }

    fn widths(rows: &[LetterRow]) -> Vec<usize> {
        rows.iter().map(LetterRow::len).collect()
    }

    #[test]
    fn short_words_fit_one_row() {
        let inv = alphabet_inventory();
        for word in ["A", "HI", "CAT", "SIGN", "HELLO", "THANKS"] {
            let rows = plan_letters(word, &inv);
            assert_eq!(rows.len(), 1, "word {word}");
            assert_eq!(rows[0].text(), word);
        }
    }

    #[test]
    fn thirteen_letters_split_six_six_one() {
        let inv = alphabet_inventory();
        let word = "ABCDEFGHIJKLM";
        let rows = plan_letters(word, &inv);
        assert_eq!(widths(&rows), vec![6, 6, 1]);
        let rejoined: String = rows.iter().map(LetterRow::text).collect();
        assert_eq!(rejoined, word);
    }

    #[test]
    fn seven_letters_split_six_one() {
        let rows = plan_letters("EXAMPLE", &alphabet_inventory());
        assert_eq!(widths(&rows), vec![6, 1]);
        assert_eq!(rows[1].text(), "E");
    }

    #[test]
    fn non_letters_stay_unresolved() {
        let rows = plan_letters("A1!", &alphabet_inventory());
        let cells = rows[0].cells();
        assert!(cells[0].is_resolved());
        assert_eq!(cells[1], LetterCell::Unresolved('1'));
        assert_eq!(cells[2], LetterCell::Unresolved('!'));
    }

    #[test]
    fn letters_without_assets_stay_unresolved() {
        let mut letters = BTreeMap::new();
        letters.insert("X".to_string(), PathBuf::from("images/x.png"));
        let inv = AssetInventory::from_maps(letters, BTreeMap::new());

        let rows = plan_letters("XYZ", &inv);
        let cells = rows[0].cells();
        assert_eq!(
            cells[0],
            LetterCell::Resolved {
                letter: 'X',
                image: PathBuf::from("images/x.png"),
            }
        );
        assert_eq!(cells[1], LetterCell::Unresolved('Y'));
        assert_eq!(cells[2], LetterCell::Unresolved('Z'));
    }

    #[test]
    fn digit_label_is_not_used_for_digits() {
        let mut letters = BTreeMap::new();
        letters.insert("7".to_string(), PathBuf::from("images/7.png"));
        let inv = AssetInventory::from_maps(letters, BTreeMap::new());

        let rows = plan_letters("7", &inv);
        assert_eq!(rows[0].cells()[0], LetterCell::Unresolved('7'));
    }

    #[test]
    fn empty_word_has_no_rows() {
        assert!(plan_letters("", &alphabet_inventory()).is_empty());
    }
}
