//! Additive bonus rules: global, adjacent-pair and position synergies.
//!
//! These only implement the activation predicate. While active, each adds
//! its `bonus_percent` to the team bonus factor.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{SynergyCategory, SynergyDefinition, SynergyRule};
use crate::constants::{WorkerKind, GROUND_ROW};
use crate::grid;
use crate::layout::Layout;

/// Two worker kinds that earn a bonus when placed side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRule {
    pub name: String,
    pub first: WorkerKind,
    pub second: WorkerKind,
    pub bonus_percent: f64,
}

/// Non-ability synergy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BonusRule {
    /// At least `min_kinds` distinct worker kinds assigned.
    DiverseTeam { min_kinds: usize },
    /// At least `min_workers` workers assigned.
    FullHouse { min_workers: usize },
    AdjacentPair(PairRule),
    /// An occupied workspace centre within one cell of the mean centre.
    Centered,
    /// An occupied workspace touching two or more bounding-box edges.
    Cornered,
    /// An occupied workspace on the top row.
    Elevated,
    /// An occupied workspace on the ground row.
    Grounded,
}

impl BonusRule {
    /// The full shipped catalog, grouped Global, Adjacent, Position.
    pub fn catalog() -> Vec<BonusRule> {
        vec![
            BonusRule::DiverseTeam { min_kinds: 3 },
            BonusRule::FullHouse { min_workers: 5 },
            BonusRule::AdjacentPair(PairRule {
                name: "Mentorship".into(),
                first: WorkerKind::Senior,
                second: WorkerKind::Intern,
                bonus_percent: 20.0,
            }),
            BonusRule::AdjacentPair(PairRule {
                name: "Odd Couple".into(),
                first: WorkerKind::Solitary,
                second: WorkerKind::Amplifier,
                bonus_percent: 25.0,
            }),
            BonusRule::Centered,
            BonusRule::Cornered,
            BonusRule::Elevated,
            BonusRule::Grounded,
        ]
    }

    pub fn bonus_percent(&self) -> f64 {
        match self {
            BonusRule::DiverseTeam { .. } => 15.0,
            BonusRule::FullHouse { .. } => 10.0,
            BonusRule::AdjacentPair(pair) => pair.bonus_percent,
            BonusRule::Centered => 15.0,
            BonusRule::Cornered => 20.0,
            BonusRule::Elevated => 15.0,
            BonusRule::Grounded => 10.0,
        }
    }

    fn pair_active(pair: &PairRule, layout: &Layout<'_>) -> bool {
        let mut firsts = layout.assignments.iter().filter(|a| a.kind == pair.first);
        firsts.any(|a| {
            layout
                .assignments
                .iter()
                .filter(|b| b.kind == pair.second && b.worker_id != a.worker_id)
                .any(|b| layout.workers_adjacent(a, b))
        })
    }

    fn centered(layout: &Layout<'_>) -> bool {
        if layout.workspaces.is_empty() {
            return false;
        }
        let n = layout.workspaces.len() as f64;
        let (sum_x, sum_y) = layout
            .workspaces
            .iter()
            .map(|w| w.footprint.center())
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
        let (cx, cy) = (sum_x / n, sum_y / n);
        layout.occupied_workspaces().iter().any(|w| {
            let (x, y) = w.footprint.center();
            ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() <= 1.0
        })
    }
}

impl SynergyRule for BonusRule {
    fn definition(&self) -> SynergyDefinition {
        let (name, description) = match self {
            BonusRule::DiverseTeam { min_kinds } => {
                ("Diverse Team".to_string(), format!("{}+ different worker types", min_kinds))
            }
            BonusRule::FullHouse { min_workers } => {
                ("Full House".to_string(), format!("{}+ workers assigned", min_workers))
            }
            BonusRule::AdjacentPair(pair) => (
                pair.name.clone(),
                format!("{} + {} adjacent", pair.first, pair.second),
            ),
            BonusRule::Centered => ("Centered".into(), "Worker near the geometric center".into()),
            BonusRule::Cornered => ("Cornered".into(), "Worker in a corner (2+ edges)".into()),
            BonusRule::Elevated => ("Elevated".into(), "Worker on the top row".into()),
            BonusRule::Grounded => ("Grounded".into(), "Worker on the bottom row".into()),
        };
        SynergyDefinition {
            name,
            category: self.category(),
            bonus_percent: self.bonus_percent(),
            description,
        }
    }

    fn category(&self) -> SynergyCategory {
        match self {
            BonusRule::DiverseTeam { .. } | BonusRule::FullHouse { .. } => SynergyCategory::Global,
            BonusRule::AdjacentPair(_) => SynergyCategory::Adjacent,
            BonusRule::Centered
            | BonusRule::Cornered
            | BonusRule::Elevated
            | BonusRule::Grounded => SynergyCategory::Position,
        }
    }

    fn is_active(&self, layout: &Layout<'_>) -> bool {
        if layout.assignments.is_empty() {
            return false;
        }
        match self {
            BonusRule::DiverseTeam { min_kinds } => {
                let kinds: HashSet<WorkerKind> = layout.assignments.iter().map(|a| a.kind).collect();
                kinds.len() >= *min_kinds
            }
            BonusRule::FullHouse { min_workers } => layout.assignments.len() >= *min_workers,
            BonusRule::AdjacentPair(pair) => Self::pair_active(pair, layout),
            BonusRule::Centered => Self::centered(layout),
            BonusRule::Cornered => {
                let Some(b) = grid::bounds(layout.workspaces.iter().map(|w| &w.footprint)) else {
                    return false;
                };
                layout
                    .occupied_workspaces()
                    .iter()
                    .any(|w| b.edges_touched(&w.footprint) >= 2)
            }
            BonusRule::Elevated => {
                let Some(b) = grid::bounds(layout.workspaces.iter().map(|w| &w.footprint)) else {
                    return false;
                };
                layout
                    .occupied_workspaces()
                    .iter()
                    .any(|w| w.footprint.top() == b.max_y)
            }
            BonusRule::Grounded => layout
                .occupied_workspaces()
                .iter()
                .any(|w| w.footprint.anchor.y == GROUND_ROW),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WorkspaceKind;
    use crate::grid::GridCell;
    use crate::ids::{WorkerId, WorkspaceId};
    use crate::layout::{Assignment, Workspace};

    fn ws(n: u128, x: i32, y: i32) -> Workspace {
        Workspace::unit(WorkspaceId::from_u128(n), WorkspaceKind::Basic, GridCell::new(x, y))
    }

    fn on(n: u128, ws: u128, kind: WorkerKind) -> Assignment {
        Assignment {
            worker_id: WorkerId::from_u128(n),
            workspace_id: WorkspaceId::from_u128(ws),
            kind,
            rounds_worked: 0,
        }
    }

    #[test]
    fn test_diverse_team() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 2, 1)];
        let two = [on(10, 1, WorkerKind::Intern), on(11, 2, WorkerKind::Regular)];
        let three = [
            on(10, 1, WorkerKind::Intern),
            on(11, 2, WorkerKind::Regular),
            on(12, 3, WorkerKind::Senior),
        ];
        let rule = BonusRule::DiverseTeam { min_kinds: 3 };
        assert!(!rule.is_active(&Layout::new(&workspaces, &two)));
        assert!(rule.is_active(&Layout::new(&workspaces, &three)));
    }

    #[test]
    fn test_adjacent_pair_requires_touching() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 3, 1)];
        let rule = BonusRule::catalog()
            .into_iter()
            .find(|r| matches!(r, BonusRule::AdjacentPair(p) if p.name == "Mentorship"))
            .unwrap();

        let apart = [on(10, 1, WorkerKind::Senior), on(11, 3, WorkerKind::Intern)];
        assert!(!rule.is_active(&Layout::new(&workspaces, &apart)));

        let touching = [on(10, 1, WorkerKind::Senior), on(11, 2, WorkerKind::Intern)];
        assert!(rule.is_active(&Layout::new(&workspaces, &touching)));
    }

    #[test]
    fn test_position_rules_on_l_shape() {
        // L shape: (0,1) (1,1) (1,2)
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 1, 2)];
        let top = [on(10, 3, WorkerKind::Regular)];
        let layout = Layout::new(&workspaces, &top);
        assert!(BonusRule::Elevated.is_active(&layout));
        assert!(!BonusRule::Grounded.is_active(&layout));
        assert!(BonusRule::Cornered.is_active(&layout));

        let ground = [on(10, 1, WorkerKind::Regular)];
        let layout = Layout::new(&workspaces, &ground);
        assert!(BonusRule::Grounded.is_active(&layout));
        assert!(!BonusRule::Elevated.is_active(&layout));
    }

    #[test]
    fn test_centered() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 2, 1), ws(4, 6, 1)];
        let far = [on(10, 4, WorkerKind::Regular)];
        assert!(!BonusRule::Centered.is_active(&Layout::new(&workspaces, &far)));
        let near = [on(10, 3, WorkerKind::Regular)];
        assert!(BonusRule::Centered.is_active(&Layout::new(&workspaces, &near)));
    }

    #[test]
    fn test_empty_never_active() {
        let workspaces = [ws(1, 0, 1)];
        let layout = Layout::new(&workspaces, &[]);
        for rule in BonusRule::catalog() {
            assert!(!rule.is_active(&layout), "{:?}", rule);
        }
    }
}
