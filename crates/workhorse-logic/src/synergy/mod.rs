//! Synergy rules - named productivity modifiers.
//!
//! Every rule exposes the same capability set through [`SynergyRule`]:
//! a self override, an adjacency multiplier, a total-team multiplier and an
//! activation predicate. A rule implements the subset it needs; the defaults
//! are identities (pass-through, ×1.0, ×1.0).
//!
//! The catalog is closed: [`AbilityRule`] covers the per-kind abilities and
//! [`BonusRule`] the additive global/adjacent/position bonuses.

mod ability;
mod bonus;

pub use ability::*;
pub use bonus::*;

use serde::{Deserialize, Serialize};

use crate::constants::WorkerKind;
use crate::layout::{Assignment, Layout};

/// Which family a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynergyCategory {
    Global,
    Adjacent,
    Position,
    Ability,
}

/// Display data for a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyDefinition {
    pub name: String,
    pub category: SynergyCategory,
    /// Additive percent for non-ability rules; display only for abilities.
    pub bonus_percent: f64,
    pub description: String,
}

/// Outcome of evaluating one rule against a snapshot. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyResult {
    pub definition: SynergyDefinition,
    pub is_active: bool,
}

impl SynergyResult {
    pub fn is_bonus(&self) -> bool {
        self.definition.category != SynergyCategory::Ability
    }
}

/// Count active results outside the Ability category.
pub fn count_active_bonuses(results: &[SynergyResult]) -> usize {
    results.iter().filter(|r| r.is_active && r.is_bonus()).count()
}

/// The modifier capability set.
pub trait SynergyRule {
    fn definition(&self) -> SynergyDefinition;

    fn category(&self) -> SynergyCategory;

    /// Worker kind that owns this rule, if any.
    fn owner_kind(&self) -> Option<WorkerKind> {
        None
    }

    /// Replacement output for `me`, in rate units (not yet scaled by the
    /// workspace multiplier). `None` passes the running value through.
    fn self_override(&self, _me: &Assignment, _layout: &Layout<'_>) -> Option<f64> {
        None
    }

    /// Multiplier `owner` contributes to an adjacent `target`.
    fn adjacency_multiplier(&self, _owner: &Assignment, _target: &Assignment) -> f64 {
        1.0
    }

    /// Multiplier applied to the whole team's output.
    fn total_multiplier(&self, _layout: &Layout<'_>) -> f64 {
        1.0
    }

    fn is_active(&self, layout: &Layout<'_>) -> bool;

    fn evaluate(&self, layout: &Layout<'_>) -> SynergyResult {
        SynergyResult {
            definition: self.definition(),
            is_active: self.is_active(layout),
        }
    }
}
