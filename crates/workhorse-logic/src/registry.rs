//! Synergy registry - the immutable rule catalog partitioned by category.
//!
//! Activation evaluation here feeds UI display and synergy-count goals only;
//! the productivity pipeline queries the rules directly.

use serde::{Deserialize, Serialize};

use crate::layout::{Assignment, Layout, Workspace};
use crate::synergy::{AbilityRule, BonusRule, SynergyCategory, SynergyResult, SynergyRule};

/// Which rule generations are registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Ability rules only.
    #[default]
    Abilities,
    /// Ability rules plus the additive global/adjacent/position catalog.
    Full,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynergyRegistry {
    global: Vec<BonusRule>,
    adjacent: Vec<BonusRule>,
    position: Vec<BonusRule>,
    ability: Vec<AbilityRule>,
}

impl SynergyRegistry {
    /// Partition `bonus` by category. Ability order is registration order.
    pub fn from_rules(bonus: Vec<BonusRule>, ability: Vec<AbilityRule>) -> Self {
        let mut registry = Self {
            ability,
            ..Self::default()
        };
        for rule in bonus {
            match rule.category() {
                SynergyCategory::Global => registry.global.push(rule),
                SynergyCategory::Adjacent => registry.adjacent.push(rule),
                SynergyCategory::Position | SynergyCategory::Ability => registry.position.push(rule),
            }
        }
        registry
    }

    pub fn abilities_only() -> Self {
        Self::from_rules(Vec::new(), AbilityRule::ALL.to_vec())
    }

    pub fn full() -> Self {
        Self::from_rules(BonusRule::catalog(), AbilityRule::ALL.to_vec())
    }

    pub fn for_rule_set(rule_set: RuleSet) -> Self {
        match rule_set {
            RuleSet::Abilities => Self::abilities_only(),
            RuleSet::Full => Self::full(),
        }
    }

    pub fn global(&self) -> &[BonusRule] {
        &self.global
    }

    pub fn adjacent(&self) -> &[BonusRule] {
        &self.adjacent
    }

    pub fn position(&self) -> &[BonusRule] {
        &self.position
    }

    pub fn ability_rules(&self) -> &[AbilityRule] {
        &self.ability
    }

    /// Global, adjacent and position rules in that order.
    pub fn bonus_rules(&self) -> impl Iterator<Item = &BonusRule> {
        self.global.iter().chain(&self.adjacent).chain(&self.position)
    }

    /// Every rule: bonus rules first, then abilities in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn SynergyRule> {
        self.bonus_rules()
            .map(|r| r as &dyn SynergyRule)
            .chain(self.ability.iter().map(|r| r as &dyn SynergyRule))
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.adjacent.len() + self.position.len() + self.ability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn evaluate(&self, layout: &Layout<'_>) -> Vec<SynergyResult> {
        self.all().map(|rule| rule.evaluate(layout)).collect()
    }

    /// Every rule paired with whether it is active for this snapshot.
    pub fn active_synergies(
        &self,
        workspaces: &[Workspace],
        assignments: &[Assignment],
    ) -> Vec<SynergyResult> {
        self.evaluate(&Layout::new(workspaces, assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{WorkerKind, WorkspaceKind};
    use crate::grid::GridCell;
    use crate::ids::{WorkerId, WorkspaceId};
    use crate::synergy::count_active_bonuses;

    #[test]
    fn test_partitioning() {
        let registry = SynergyRegistry::full();
        assert_eq!(registry.global().len(), 2);
        assert_eq!(registry.adjacent().len(), 2);
        assert_eq!(registry.position().len(), 4);
        assert_eq!(registry.ability_rules().len(), 6);
        assert_eq!(registry.len(), 14);
        assert_eq!(registry.all().count(), 14);
    }

    #[test]
    fn test_default_is_abilities_only() {
        let registry = SynergyRegistry::for_rule_set(RuleSet::default());
        assert_eq!(registry.bonus_rules().count(), 0);
        assert_eq!(registry.ability_rules(), &AbilityRule::ALL);
    }

    #[test]
    fn test_active_synergies_reports_every_rule() {
        let workspaces = [Workspace::unit(
            WorkspaceId::from_u128(1),
            WorkspaceKind::Basic,
            GridCell::new(0, 1),
        )];
        let assignments = [Assignment {
            worker_id: WorkerId::from_u128(2),
            workspace_id: WorkspaceId::from_u128(1),
            kind: WorkerKind::Solitary,
            rounds_worked: 0,
        }];
        let registry = SynergyRegistry::full();
        let results = registry.active_synergies(&workspaces, &assignments);
        assert_eq!(results.len(), registry.len());

        let solitary = results
            .iter()
            .find(|r| r.definition.name == "Solitary")
            .unwrap();
        assert!(solitary.is_active);

        // A lone ground-row worker is centered, cornered, elevated and grounded.
        assert_eq!(count_active_bonuses(&results), 4);
    }
}
