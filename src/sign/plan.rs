//! Render plan: the ordered output handed to the presentation layer.
//!
//! [`build_render_plan`] prefers a single lexicalised sign for the whole
//! phrase and only finger-spells word by word when no animation matches.

use std::path::PathBuf;

use super::inventory::AssetInventory;
use super::letters::{plan_letters, LetterRow};
use super::normalize::normalize;
use super::resolver::{resolve, MatchKind};

// ---------------------------------------------------------------------------
// RenderUnit / RenderPlan
// ---------------------------------------------------------------------------

/// One atomic piece of the output plan.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit {
    /// A whole-word or whole-phrase animation.
    Animation {
        label: String,
        path: PathBuf,
        kind: MatchKind,
        score: f64,
    },
    /// A finger-spelled word.
    Letters { word: String, rows: Vec<LetterRow> },
}

/// Ordered sequence of [`RenderUnit`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPlan {
    units: Vec<RenderUnit>,
}

impl RenderPlan {
    pub fn units(&self) -> &[RenderUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// `true` when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// `true` when the plan is a single phrase animation.
    pub fn is_animation(&self) -> bool {
        matches!(self.units.as_slice(), [RenderUnit::Animation { .. }])
    }
}

// ---------------------------------------------------------------------------
// build_render_plan
// ---------------------------------------------------------------------------

/// Turn a translated phrase into a [`RenderPlan`].
///
/// * Blank phrase → empty plan.
/// * The whole phrase resolves to an animation → one `Animation` unit.
/// * Otherwise → one `Letters` unit per word, in order.
pub fn build_render_plan(phrase: &str, inventory: &AssetInventory) -> RenderPlan {
    let words = normalize(phrase);
    if words.is_empty() {
        return RenderPlan::default();
    }

    if let Some(found) = resolve(phrase.trim(), inventory.animations()) {
        if let Some(path) = inventory.animation(&found.label) {
            log::debug!(
                "plan: {:?} → animation {:?} ({:?}, score {:.3})",
                phrase,
                found.label,
                found.kind,
                found.score
            );
            return RenderPlan {
                units: vec![RenderUnit::Animation {
                    path: path.to_path_buf(),
                    label: found.label,
                    kind: found.kind,
                    score: found.score,
                }],
            };
        }
    }

    log::debug!("plan: {:?} → finger-spelling {} word(s)", phrase, words.len());

    let units = words
        .into_iter()
        .map(|word| RenderUnit::Letters {
            rows: plan_letters(&word, inventory),
            word,
        })
        .collect();

    RenderPlan { units }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
