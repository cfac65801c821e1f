//! Text-to-sign resolution.
//!
//! # Flow
//!
//! ```text
//! translated phrase
//!        │
//!        ├─ resolve(whole phrase, animations)  ── match ──▶ [Animation]
//!        │
//!        └─ no match ─▶ normalize ─▶ plan_letters(word) per word ─▶ [Letters, …]
//! ```
//!
//! [`AssetInventory`] is loaded once from the image and GIF directories;
//! everything else is a pure function of the phrase and the inventory.

pub mod inventory;
pub mod letters;
pub mod normalize;
pub mod plan;
pub mod resolver;
pub mod similarity;

pub use inventory::{AssetInventory, ResourceLoadError};
pub use letters::{plan_letters, LetterCell, LetterRow, LETTER_DISPLAY_SIZE, MAX_LETTERS_PER_ROW};
pub use normalize::normalize;
pub use plan::{build_render_plan, RenderPlan, RenderUnit};
pub use resolver::{resolve, MatchKind, PhraseMatch, MATCH_CUTOFF};
pub use similarity::{similarity_ratio, SequenceMatcher};
