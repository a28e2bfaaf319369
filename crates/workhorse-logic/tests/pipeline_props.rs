use proptest::prelude::*;
use workhorse_logic::constants::{WorkerKind, WorkspaceKind};
use workhorse_logic::grid::{GridCell, GridSize};
use workhorse_logic::ids::{WorkerId, WorkspaceId};
use workhorse_logic::layout::{workspaces_adjacent, Assignment, Workspace};
use workhorse_logic::productivity;
use workhorse_logic::registry::SynergyRegistry;

fn arb_worker_kind() -> impl Strategy<Value = WorkerKind> {
    prop::sample::select(WorkerKind::ALL.to_vec())
}

fn arb_workspace_kind() -> impl Strategy<Value = WorkspaceKind> {
    prop::sample::select(WorkspaceKind::ALL.to_vec())
}

prop_compose! {
    // Non-overlapping 1×1 workspaces on a small board.
    fn arb_workspaces()(
        cells in prop::collection::btree_set((0..6i32, 1..5i32), 1..14),
        kinds in prop::collection::vec(arb_workspace_kind(), 14),
    ) -> Vec<Workspace> {
        cells
            .into_iter()
            .zip(kinds)
            .enumerate()
            .map(|(i, ((x, y), kind))| {
                Workspace::unit(WorkspaceId::from_u128(i as u128 + 1), kind, GridCell::new(x, y))
            })
            .collect()
    }
}

prop_compose! {
    fn arb_layout()(workspaces in arb_workspaces())(
        occupants in prop::collection::vec(
            prop::option::of((arb_worker_kind(), 0..12u32)),
            workspaces.len(),
        ),
        workspaces in Just(workspaces),
    ) -> (Vec<Workspace>, Vec<Assignment>) {
        let assignments = workspaces
            .iter()
            .zip(occupants)
            .enumerate()
            .filter_map(|(i, (ws, occupant))| {
                occupant.map(|(kind, rounds_worked)| Assignment {
                    worker_id: WorkerId::from_u128(1000 + i as u128),
                    workspace_id: ws.id,
                    kind,
                    rounds_worked,
                })
            })
            .collect();
        (workspaces, assignments)
    }
}

prop_compose! {
    fn arb_rect()(x in -3..4i32, y in 1..5i32, w in 1..4i32, h in 1..3i32) -> Workspace {
        Workspace::new(WorkspaceId::new(), WorkspaceKind::Basic, GridCell::new(x, y), GridSize::new(w, h))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_breakdown_sums_to_total((workspaces, assignments) in arb_layout()) {
        for registry in [SynergyRegistry::abilities_only(), SynergyRegistry::full()] {
            let total = productivity::calculate(&workspaces, &assignments, &registry);
            let sum: f64 = productivity::breakdown(&workspaces, &assignments, &registry)
                .values()
                .sum();
            prop_assert!((total - sum).abs() < 1e-4, "total {} vs sum {}", total, sum);
        }
    }

    #[test]
    fn test_calculate_is_deterministic((workspaces, assignments) in arb_layout()) {
        let registry = SynergyRegistry::full();
        let first = productivity::calculate(&workspaces, &assignments, &registry);
        for _ in 0..3 {
            prop_assert_eq!(productivity::calculate(&workspaces, &assignments, &registry), first);
        }
    }

    #[test]
    fn test_adjacency_is_symmetric(a in arb_rect(), b in arb_rect()) {
        prop_assert_eq!(workspaces_adjacent(&a, &b), workspaces_adjacent(&b, &a));
    }

    #[test]
    fn test_saboteur_floor_never_crossed(count in 0usize..40) {
        let m = workhorse_logic::synergy::saboteur_multiplier(count);
        prop_assert!(m >= 0.3 && m <= 1.0);
    }
}
