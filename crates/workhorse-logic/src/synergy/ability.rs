//! Per-kind ability rules.

use serde::{Deserialize, Serialize};

use super::{SynergyCategory, SynergyDefinition, SynergyRule};
use crate::constants::WorkerKind;
use crate::layout::{Assignment, Layout};

const SOLITARY_ALONE: f64 = 2.0;
const SOLITARY_CROWDED: f64 = 0.5;

const AMPLIFIER_BOOST: f64 = 1.5;
const DAMPENER_PENALTY: f64 = 0.7;

const ACCELERATOR_START: f64 = 0.5;
const ACCELERATOR_STEP: f64 = 0.5;
const ACCELERATOR_CAP: f64 = 2.5;

const DECAYER_START: f64 = 1.0;
const DECAYER_STEP: f64 = 0.3;
const DECAYER_FLOOR: f64 = -0.5;

const SABOTEUR_PENALTY: f64 = 0.85;
const SABOTEUR_FLOOR: f64 = 0.3;

/// Ability carried by a worker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityRule {
    /// 2.0 alone, 0.5 when any assigned worker is adjacent.
    Solitary,
    /// ×1.5 to every adjacent worker.
    Amplifier,
    /// 0.5 + 0.5 per round, capped at 2.5.
    Accelerator,
    /// ×0.7 to every adjacent worker.
    Dampener,
    /// 1.0 − 0.3 per round, floored at −0.5.
    Decayer,
    /// Team output ×0.85 per saboteur, floored at ×0.3.
    Saboteur,
}

impl AbilityRule {
    /// Registration order of the shipped catalog.
    pub const ALL: [AbilityRule; 6] = [
        Self::Solitary,
        Self::Amplifier,
        Self::Accelerator,
        Self::Dampener,
        Self::Decayer,
        Self::Saboteur,
    ];

    pub fn kind(self) -> WorkerKind {
        match self {
            AbilityRule::Solitary => WorkerKind::Solitary,
            AbilityRule::Amplifier => WorkerKind::Amplifier,
            AbilityRule::Accelerator => WorkerKind::Accelerator,
            AbilityRule::Dampener => WorkerKind::Dampener,
            AbilityRule::Decayer => WorkerKind::Decayer,
            AbilityRule::Saboteur => WorkerKind::Saboteur,
        }
    }

    pub fn for_kind(kind: WorkerKind) -> Option<AbilityRule> {
        Self::ALL.into_iter().find(|rule| rule.kind() == kind)
    }

    fn describe(self) -> (&'static str, f64) {
        match self {
            AbilityRule::Solitary => ("200 income alone, 50 if adjacent to others", 0.0),
            AbilityRule::Amplifier => ("+50% income to adjacent workers", 0.0),
            AbilityRule::Accelerator => ("+50 income each round (50 + 50n, max 250)", 0.0),
            AbilityRule::Dampener => ("-30% income to adjacent workers", 0.0),
            AbilityRule::Decayer => ("-30 income each round (100 - 30n, min -50)", 0.0),
            AbilityRule::Saboteur => ("-15% total team income (team keeps at least 30%)", -15.0),
        }
    }
}

/// Accelerator output after `rounds` turns, in rate units.
pub fn accelerator_rate(rounds: u32) -> f64 {
    (ACCELERATOR_START + ACCELERATOR_STEP * rounds as f64).min(ACCELERATOR_CAP)
}

/// Decayer output after `rounds` turns, in rate units.
pub fn decayer_rate(rounds: u32) -> f64 {
    (DECAYER_START - DECAYER_STEP * rounds as f64).max(DECAYER_FLOOR)
}

/// Team multiplier for `count` saboteurs.
pub fn saboteur_multiplier(count: usize) -> f64 {
    if count == 0 {
        return 1.0;
    }
    let exponent = i32::try_from(count).unwrap_or(i32::MAX);
    SABOTEUR_PENALTY.powi(exponent).max(SABOTEUR_FLOOR)
}

impl SynergyRule for AbilityRule {
    fn definition(&self) -> SynergyDefinition {
        let (description, bonus_percent) = self.describe();
        SynergyDefinition {
            name: self.kind().name().to_string(),
            category: SynergyCategory::Ability,
            bonus_percent,
            description: description.to_string(),
        }
    }

    fn category(&self) -> SynergyCategory {
        SynergyCategory::Ability
    }

    fn owner_kind(&self) -> Option<WorkerKind> {
        Some(self.kind())
    }

    fn self_override(&self, me: &Assignment, layout: &Layout<'_>) -> Option<f64> {
        if me.kind != self.kind() {
            return None;
        }
        match self {
            AbilityRule::Solitary => Some(if layout.has_adjacent_worker(me) {
                SOLITARY_CROWDED
            } else {
                SOLITARY_ALONE
            }),
            AbilityRule::Accelerator => Some(accelerator_rate(me.rounds_worked)),
            AbilityRule::Decayer => Some(decayer_rate(me.rounds_worked)),
            _ => None,
        }
    }

    fn adjacency_multiplier(&self, owner: &Assignment, _target: &Assignment) -> f64 {
        if owner.kind != self.kind() {
            return 1.0;
        }
        match self {
            AbilityRule::Amplifier => AMPLIFIER_BOOST,
            AbilityRule::Dampener => DAMPENER_PENALTY,
            _ => 1.0,
        }
    }

    fn total_multiplier(&self, layout: &Layout<'_>) -> f64 {
        match self {
            AbilityRule::Saboteur => saboteur_multiplier(layout.count_kind(WorkerKind::Saboteur)),
            _ => 1.0,
        }
    }

    fn is_active(&self, layout: &Layout<'_>) -> bool {
        layout.assignments.iter().any(|a| a.kind == self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accelerator_cap() {
        assert!((accelerator_rate(0) - 0.5).abs() < 1e-6);
        assert!((accelerator_rate(4) - 2.5).abs() < 1e-6);
        assert!((accelerator_rate(10) - 2.5).abs() < 1e-6);
        assert!((accelerator_rate(u32::MAX) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_decayer_floor() {
        assert!((decayer_rate(0) - 1.0).abs() < 1e-6);
        assert!((decayer_rate(3) - 0.1).abs() < 1e-5);
        assert!((decayer_rate(5) + 0.5).abs() < 1e-6);
        assert!((decayer_rate(1000) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_saboteur_floor() {
        assert_eq!(saboteur_multiplier(0), 1.0);
        assert!((saboteur_multiplier(1) - 0.85).abs() < 1e-6);
        assert!((saboteur_multiplier(2) - 0.7225).abs() < 1e-5);
        assert_eq!(saboteur_multiplier(10), 0.3);
        assert_eq!(saboteur_multiplier(usize::MAX), 0.3);
    }

    #[test]
    fn test_rule_kind_roundtrip() {
        for rule in AbilityRule::ALL {
            assert_eq!(AbilityRule::for_kind(rule.kind()), Some(rule));
        }
        assert!(AbilityRule::for_kind(WorkerKind::Regular).is_none());
    }
}
