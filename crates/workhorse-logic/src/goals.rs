//! Goals - ordered objectives with one-shot completion.
//!
//! Only the current goal is ever checked. Completing it advances the index,
//! so a completed goal can never fire again.

use serde::{Deserialize, Serialize};

use crate::registry::RuleSet;

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Cumulative turn output this level, in income units.
    TotalOutput,
    /// Workers currently on the roster.
    WorkerCount,
    /// Most non-ability synergies active in a single turn.
    MaxSynergyCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: GoalKind,
    pub target: f64,
}

impl GoalDefinition {
    pub fn new(id: &str, name: &str, kind: GoalKind, target: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            kind,
            target,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Live values goals are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalMetrics {
    pub total_output: f64,
    pub worker_count: usize,
    pub max_synergies: usize,
}

impl GoalMetrics {
    pub fn value(&self, kind: GoalKind) -> f64 {
        match kind {
            GoalKind::TotalOutput => self.total_output,
            GoalKind::WorkerCount => self.worker_count as f64,
            GoalKind::MaxSynergyCount => self.max_synergies as f64,
        }
    }
}

/// Result of a check that completed the current goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalAdvance {
    pub completed: GoalDefinition,
    /// The goal that became current, if any remain.
    pub next: Option<GoalDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalTracker {
    goals: Vec<GoalDefinition>,
    current: usize,
}

impl GoalTracker {
    pub fn new(goals: Vec<GoalDefinition>) -> Self {
        Self { goals, current: 0 }
    }

    /// A tracker holding one goal, as used by a level.
    pub fn single(goal: GoalDefinition) -> Self {
        Self::new(vec![goal])
    }

    /// The free-play goal chain for `rule_set`. Synergy-count goals need
    /// the additive catalog, so the abilities-only chain leaves them out.
    pub fn campaign(rule_set: RuleSet) -> Self {
        let mut tracker = Self::default_campaign();
        if rule_set == RuleSet::Abilities {
            tracker
                .goals
                .retain(|g| g.kind != GoalKind::MaxSynergyCount);
        }
        tracker
    }

    /// The full free-play goal chain.
    pub fn default_campaign() -> Self {
        Self::new(vec![
            GoalDefinition::new("first_steps", "First Steps", GoalKind::TotalOutput, 1000.0)
                .with_description("Generate 1000 total productivity"),
            GoalDefinition::new("growing_team", "Growing Team", GoalKind::WorkerCount, 4.0)
                .with_description("Have 4 workers"),
            GoalDefinition::new(
                "productivity_boost",
                "Productivity Boost",
                GoalKind::TotalOutput,
                5000.0,
            )
            .with_description("Generate 5000 total productivity"),
            GoalDefinition::new(
                "synergy_master",
                "Synergy Master",
                GoalKind::MaxSynergyCount,
                3.0,
            )
            .with_description("Activate 3 synergies in one turn"),
            GoalDefinition::new("powerhouse", "Powerhouse", GoalKind::TotalOutput, 10000.0)
                .with_description("Generate 10000 total productivity"),
        ])
    }

    pub fn goals(&self) -> &[GoalDefinition] {
        &self.goals
    }

    pub fn current(&self) -> Option<&GoalDefinition> {
        self.goals.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Goals before the current index have been completed.
    pub fn is_completed(&self, index: usize) -> bool {
        index < self.current.min(self.goals.len())
    }

    pub fn completed_count(&self) -> usize {
        self.current.min(self.goals.len())
    }

    pub fn all_completed(&self) -> bool {
        self.current >= self.goals.len()
    }

    /// Whether the goal with `id` is in this list and already completed.
    pub fn is_goal_completed(&self, id: &str) -> bool {
        self.goals
            .iter()
            .position(|g| g.id == id)
            .is_some_and(|index| self.is_completed(index))
    }

    /// Skip past leading goals that `previous` already completed.
    pub fn carry_completed(&mut self, previous: &GoalTracker) {
        while let Some(goal) = self.current() {
            if !previous.is_goal_completed(&goal.id) {
                break;
            }
            self.current += 1;
        }
    }

    /// Complete the current goal if its metric has reached the target.
    pub fn check(&mut self, metrics: &GoalMetrics) -> Option<GoalAdvance> {
        let goal = self.current()?;
        if metrics.value(goal.kind) < goal.target {
            return None;
        }
        let completed = goal.clone();
        self.current += 1;
        Some(GoalAdvance {
            completed,
            next: self.current().cloned(),
        })
    }

    /// Current metric over target, clamped to [0, 1]. 1.0 once every goal
    /// is done.
    pub fn progress(&self, metrics: &GoalMetrics) -> f64 {
        let Some(goal) = self.current() else {
            return 1.0;
        };
        if goal.target <= 0.0 {
            return 1.0;
        }
        (metrics.value(goal.kind) / goal.target).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(total: f64) -> GoalMetrics {
        GoalMetrics {
            total_output: total,
            ..GoalMetrics::default()
        }
    }

    #[test]
    fn test_completes_once() {
        let mut tracker =
            GoalTracker::single(GoalDefinition::new("t", "Ten", GoalKind::TotalOutput, 10.0));
        assert!(tracker.check(&output(9.0)).is_none());

        let advance = tracker.check(&output(10.0)).expect("should complete");
        assert_eq!(advance.completed.id, "t");
        assert!(advance.next.is_none());
        assert!(tracker.all_completed());

        assert!(tracker.check(&output(500.0)).is_none());
        assert_eq!(tracker.completed_count(), 1);
    }

    #[test]
    fn test_only_current_goal_checked() {
        let mut tracker = GoalTracker::default_campaign();
        // Enough workers for goal 2, but goal 1 is still current.
        let metrics = GoalMetrics {
            total_output: 0.0,
            worker_count: 10,
            max_synergies: 0,
        };
        assert!(tracker.check(&metrics).is_none());

        let advance = tracker.check(&GoalMetrics {
            total_output: 1000.0,
            ..metrics
        });
        assert_eq!(advance.and_then(|a| a.next).map(|g| g.id), Some("growing_team".into()));
        assert!(tracker.is_completed(0));
        assert!(!tracker.is_completed(1));
    }

    #[test]
    fn test_progress_clamped() {
        let tracker = GoalTracker::default_campaign();
        assert_eq!(tracker.progress(&output(0.0)), 0.0);
        assert!((tracker.progress(&output(500.0)) - 0.5).abs() < 1e-6);
        assert_eq!(tracker.progress(&output(5000.0)), 1.0);
        assert_eq!(GoalTracker::default().progress(&output(0.0)), 1.0);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut tracker = GoalTracker::default_campaign();
        tracker.check(&output(1000.0));
        assert_eq!(tracker.current_index(), 1);
        tracker.reset();
        assert_eq!(tracker.current().map(|g| g.id.as_str()), Some("first_steps"));
    }

    #[test]
    fn test_abilities_campaign_has_no_synergy_goal() {
        let abilities = GoalTracker::campaign(RuleSet::Abilities);
        assert!(abilities
            .goals()
            .iter()
            .all(|g| g.kind != GoalKind::MaxSynergyCount));
        assert_eq!(abilities.goals().len(), 4);
        assert_eq!(GoalTracker::campaign(RuleSet::Full), GoalTracker::default_campaign());
    }

    #[test]
    fn test_carry_completed_skips_done_goals() {
        let mut full = GoalTracker::campaign(RuleSet::Full);
        full.check(&output(1000.0));
        assert!(full.is_goal_completed("first_steps"));
        assert!(!full.is_goal_completed("growing_team"));
        assert!(!full.is_goal_completed("missing"));

        let mut abilities = GoalTracker::campaign(RuleSet::Abilities);
        abilities.carry_completed(&full);
        assert_eq!(abilities.current().map(|g| g.id.as_str()), Some("growing_team"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&GoalKind::MaxSynergyCount).unwrap();
        assert_eq!(json, "\"max_synergy_count\"");
    }
}
