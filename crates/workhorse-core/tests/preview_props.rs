use proptest::prelude::*;
use workhorse_core::prelude::*;

fn arb_kind() -> impl Strategy<Value = WorkerKind> {
    prop::sample::select(WorkerKind::ALL.to_vec())
}

prop_compose! {
    fn arb_row()(kinds in prop::collection::vec(arb_kind(), 1..7), dragging in any::<u8>()) -> (Vec<WorkerKind>, u8) {
        (kinds, dragging)
    }
}

/// A ground row of Basic workspaces, one worker each, some of them dragging.
fn build(kinds: &[WorkerKind], dragging: u8) -> SimulationEngine {
    let mut engine = SimulationEngine::new();
    for (x, &kind) in kinds.iter().enumerate() {
        let ws = engine.spawn_workspace(GridCell::new(x as i32, 1), GridSize::UNIT, WorkspaceKind::Basic);
        let worker = engine.spawn_worker(kind);
        engine.assign_to_workspace(worker, ws);
        if dragging & (1 << x) != 0 {
            engine.set_dragging(worker, true);
        }
    }
    engine.drain_events();
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_preview_has_no_side_effects((kinds, dragging) in arb_row()) {
        let engine = build(&kinds, dragging);
        let first = engine.preview_productivity();
        let second = engine.preview_productivity();
        prop_assert_eq!(first, second);
        prop_assert_eq!(engine.preview_synergies(), engine.preview_synergies());
        prop_assert_eq!(engine.current_turn(), 1);
        prop_assert_eq!(engine.balance(), 50);
        prop_assert!(engine.pending_events().is_empty());
    }

    #[test]
    fn test_end_turn_matches_preview((kinds, dragging) in arb_row()) {
        let mut engine = build(&kinds, dragging);
        let preview = engine.preview_productivity();
        let report = engine.end_turn().unwrap();
        prop_assert_eq!(report.productivity, preview);
        prop_assert_eq!(report.currency_earned, if preview > 0.0 { preview.round() as i64 } else { 0 });
        prop_assert_eq!(engine.balance(), 50 + report.currency_earned);
    }

    #[test]
    fn test_breakdown_sums_to_total((kinds, dragging) in arb_row()) {
        let mut engine = build(&kinds, dragging);
        engine.set_rule_set(RuleSet::Full);
        let total = engine.preview_productivity();
        let sum: f64 = engine.preview_breakdown().values().sum();
        prop_assert!((total - sum).abs() < 1e-4, "total {} vs sum {}", total, sum);
    }
}
