//! Workhorse Headless Simulation Harness
//!
//! Validates rule tables, level data and the full turn loop in-process,
//! with no rendering and no input.
//!
//! Usage:
//!   cargo run -p workhorse-simtest
//!   cargo run -p workhorse-simtest -- --verbose

use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use workhorse_core::config::{self, SimConfig};
use workhorse_core::prelude::*;
use workhorse_logic::constants::base_output;
use workhorse_logic::layout::{Assignment, Layout, Workspace};
use workhorse_logic::level::LevelCatalog;
use workhorse_logic::productivity;
use workhorse_logic::registry::SynergyRegistry;

// ── Level data (same JSON the engine embeds) ────────────────────────────
const LEVELS_JSON: &str = include_str!("../../../data/levels.json");

const RANDOM_LAYOUTS: usize = 500;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Workhorse Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Level catalog validation
    results.extend(validate_level_catalog(verbose));

    // 2. Base output table
    results.extend(validate_rate_table(verbose));

    // 3. Ability rule examples
    results.extend(validate_abilities(verbose));

    // 4. Randomized layout sweep
    results.extend(validate_random_layouts(verbose));

    // 5. Scripted level playthrough
    results.extend(validate_level_run(verbose));

    // 6. Save / load
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn unit(n: u128, x: i32, y: i32) -> Workspace {
    Workspace::unit(WorkspaceId::from_u128(n), WorkspaceKind::Basic, GridCell::new(x, y))
}

fn on(n: u128, ws: u128, kind: WorkerKind, rounds_worked: u32) -> Assignment {
    Assignment {
        worker_id: WorkerId::from_u128(n),
        workspace_id: WorkspaceId::from_u128(ws),
        kind,
        rounds_worked,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ── 1. Level Catalog ────────────────────────────────────────────────────

fn validate_level_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Level Catalog ---");
    let mut results = Vec::new();

    let catalog: LevelCatalog = match serde_json::from_str(LEVELS_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "levels_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "levels_not_empty".into(),
        passed: !catalog.is_empty(),
        detail: format!("{} levels loaded", catalog.len()),
    });

    let default_config = SimConfig {
        levels: catalog.clone(),
        ..SimConfig::default()
    };
    results.push(TestResult {
        name: "levels_validate".into(),
        passed: default_config.validate().is_ok(),
        detail: match default_config.validate() {
            Ok(()) => "ids unique, turn limits positive".into(),
            Err(e) => e.to_string(),
        },
    });

    let bad_targets: Vec<_> = catalog
        .levels()
        .iter()
        .filter(|l| l.goal.target <= 0.0)
        .map(|l| l.id.as_str())
        .collect();
    results.push(TestResult {
        name: "levels_positive_targets".into(),
        passed: bad_targets.is_empty(),
        detail: if bad_targets.is_empty() {
            "all goals have positive targets".into()
        } else {
            format!("non-positive targets: {:?}", bad_targets)
        },
    });

    // Starting roster needs two hireable kinds
    let short_roster: Vec<_> = catalog
        .levels()
        .iter()
        .filter(|l| l.starting_kinds().len() < 2)
        .map(|l| l.id.as_str())
        .collect();
    results.push(TestResult {
        name: "levels_starting_roster".into(),
        passed: short_roster.is_empty(),
        detail: if short_roster.is_empty() {
            "every level starts with two workers".into()
        } else {
            format!("short rosters: {:?}", short_roster)
        },
    });

    // next_after walks the whole list once
    let mut seen = HashSet::new();
    let mut cursor = catalog.first().map(|l| l.id.clone());
    while let Some(id) = cursor {
        if !seen.insert(id.clone()) {
            break;
        }
        cursor = catalog.next_after(&id).map(|l| l.id.clone());
    }
    results.push(TestResult {
        name: "levels_chain_complete".into(),
        passed: seen.len() == catalog.len(),
        detail: format!("{} of {} levels reachable", seen.len(), catalog.len()),
    });

    let builtin = config::builtin_levels();
    results.push(TestResult {
        name: "levels_builtin_matches".into(),
        passed: builtin == catalog,
        detail: format!("engine embeds {} levels", builtin.len()),
    });

    if verbose {
        for level in catalog.levels() {
            println!(
                "  {} '{}': {} turns, target {:.0}, reward {}, {} kinds",
                level.id,
                level.name,
                level.turn_limit,
                level.goal.target,
                level.project_reward,
                level.available_kinds.len()
            );
        }
    }

    results
}

// ── 2. Rate Table ───────────────────────────────────────────────────────

fn validate_rate_table(verbose: bool) -> Vec<TestResult> {
    println!("--- Base Output ---");
    let mut results = Vec::new();

    let expected = [
        (WorkspaceKind::Basic, WorkerKind::Regular, 100.0),
        (WorkspaceKind::Basic, WorkerKind::Intern, 50.0),
        (WorkspaceKind::Advanced, WorkerKind::Senior, 225.0),
        (WorkspaceKind::Elite, WorkerKind::Regular, 200.0),
        (WorkspaceKind::Elite, WorkerKind::Saboteur, 0.0),
    ];
    for (ws, worker, value) in expected {
        let got = base_output(ws, worker);
        results.push(TestResult {
            name: format!("base_{:?}_{:?}", ws, worker).to_lowercase(),
            passed: close(got, value),
            detail: format!("{:.1} (expected {:.1})", got, value),
        });
    }

    let ascending = WorkspaceKind::ALL
        .windows(2)
        .all(|w| w[0].multiplier() < w[1].multiplier());
    results.push(TestResult {
        name: "workspace_multipliers_ascend".into(),
        passed: ascending,
        detail: "Basic < Advanced < Elite".into(),
    });

    if verbose {
        for worker in WorkerKind::ALL {
            let row: Vec<String> = WorkspaceKind::ALL
                .iter()
                .map(|&ws| format!("{:>6.1}", base_output(ws, worker)))
                .collect();
            println!("  {:<12}{}", worker.name(), row.join(" "));
        }
    }

    results
}

// ── 3. Abilities ────────────────────────────────────────────────────────

fn validate_abilities(_verbose: bool) -> Vec<TestResult> {
    println!("--- Ability Rules ---");
    let mut results = Vec::new();
    let registry = SynergyRegistry::abilities_only();

    let mut check = |name: &str, workspaces: &[Workspace], assignments: &[Assignment], expected: f64| {
        let got = productivity::calculate(workspaces, assignments, &registry);
        results.push(TestResult {
            name: name.into(),
            passed: close(got, expected),
            detail: format!("{:.1} (expected {:.1})", got, expected),
        });
    };

    let row = [unit(1, 0, 1), unit(2, 1, 1), unit(3, 3, 1)];

    check("solitary_alone", &row, &[on(10, 1, WorkerKind::Solitary, 0)], 200.0);
    check(
        "solitary_crowded",
        &row,
        &[
            on(10, 1, WorkerKind::Solitary, 0),
            on(11, 2, WorkerKind::Saboteur, 0),
        ],
        50.0 * 0.85,
    );
    for (rounds, expected) in [(0, 50.0), (1, 100.0), (4, 250.0), (10, 250.0)] {
        check(
            &format!("accelerator_round_{}", rounds),
            &row,
            &[on(10, 3, WorkerKind::Accelerator, rounds)],
            expected,
        );
    }
    for (rounds, expected) in [(0, 100.0), (4, -20.0), (9, -50.0)] {
        check(
            &format!("decayer_round_{}", rounds),
            &row,
            &[on(10, 3, WorkerKind::Decayer, rounds)],
            expected,
        );
    }
    check(
        "amplifier_dampener_neighbours",
        &row,
        &[
            on(10, 1, WorkerKind::Amplifier, 0),
            on(11, 2, WorkerKind::Dampener, 0),
        ],
        50.0 * 0.7 + 100.0 * 1.5,
    );

    let saboteurs: Vec<Workspace> = (0..12).map(|i| unit(i + 1, i as i32, 1)).collect();
    let crew: Vec<Assignment> = (0..12)
        .map(|i| {
            let kind = if i == 0 { WorkerKind::Regular } else { WorkerKind::Saboteur };
            on(100 + i, i + 1, kind, 0)
        })
        .collect();
    check("saboteur_floor", &saboteurs, &crew, 100.0 * 0.3);

    results
}

// ── 4. Random Layouts ───────────────────────────────────────────────────

fn random_layout(rng: &mut StdRng) -> (Vec<Workspace>, Vec<Assignment>) {
    let mut cells = BTreeSet::new();
    let count = rng.gen_range(1..12);
    while cells.len() < count {
        cells.insert((rng.gen_range(0..6), rng.gen_range(1..5)));
    }
    let mut workspaces = Vec::new();
    let mut assignments = Vec::new();
    for (i, (x, y)) in cells.into_iter().enumerate() {
        let n = i as u128 + 1;
        let kind = WorkspaceKind::ALL[rng.gen_range(0..WorkspaceKind::ALL.len())];
        workspaces.push(Workspace::unit(WorkspaceId::from_u128(n), kind, GridCell::new(x, y)));
        if rng.gen_bool(0.7) {
            let worker = WorkerKind::ALL[rng.gen_range(0..WorkerKind::ALL.len())];
            assignments.push(on(1000 + n, n, worker, rng.gen_range(0..8)));
        }
    }
    (workspaces, assignments)
}

fn validate_random_layouts(verbose: bool) -> Vec<TestResult> {
    println!("--- Random Layouts ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let registries = [
        ("abilities", SynergyRegistry::abilities_only()),
        ("full", SynergyRegistry::full()),
    ];

    let mut worst_gap = 0.0_f64;
    let mut nondeterministic = 0;
    let mut asymmetric = 0;
    let mut min_total = f64::MAX;
    let mut max_total = f64::MIN;

    for _ in 0..RANDOM_LAYOUTS {
        let (workspaces, assignments) = random_layout(&mut rng);
        for (_, registry) in &registries {
            let total = productivity::calculate(&workspaces, &assignments, registry);
            let sum: f64 = productivity::breakdown(&workspaces, &assignments, registry)
                .values()
                .sum();
            worst_gap = worst_gap.max((total - sum).abs());
            if productivity::calculate(&workspaces, &assignments, registry) != total {
                nondeterministic += 1;
            }
            min_total = min_total.min(total);
            max_total = max_total.max(total);
        }

        let layout = Layout::new(&workspaces, &assignments);
        for a in &assignments {
            for b in &assignments {
                if layout.workers_adjacent(a, b) != layout.workers_adjacent(b, a) {
                    asymmetric += 1;
                }
            }
        }
    }

    results.push(TestResult {
        name: "breakdown_sums_to_total".into(),
        passed: worst_gap < 1e-4,
        detail: format!("worst gap {:.2e} over {} layouts", worst_gap, RANDOM_LAYOUTS),
    });
    results.push(TestResult {
        name: "calculate_deterministic".into(),
        passed: nondeterministic == 0,
        detail: format!("{} mismatches", nondeterministic),
    });
    results.push(TestResult {
        name: "adjacency_symmetric".into(),
        passed: asymmetric == 0,
        detail: format!("{} asymmetric pairs", asymmetric),
    });

    if verbose {
        println!(
            "  {} layouts x {} rule sets, totals in [{:.1}, {:.1}]",
            RANDOM_LAYOUTS,
            registries.len(),
            min_total,
            max_total
        );
    }

    results
}

// ── 5. Level Run ────────────────────────────────────────────────────────

fn staff_all(engine: &mut SimulationEngine) {
    let workspaces = engine.workspaces();
    let workers = engine.workers();
    for (worker, workspace) in workers.iter().zip(&workspaces) {
        engine.assign_to_workspace(worker.id, workspace.id);
    }
}

fn validate_level_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Level Run ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new();
    if let Err(e) = engine.start_campaign() {
        results.push(TestResult {
            name: "campaign_start".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }
    staff_all(&mut engine);

    let mut turns = 0;
    while engine.level_status() == Some(LevelStatus::InProgress) && turns < 20 {
        if let Some(report) = engine.end_turn() {
            turns += 1;
            if verbose {
                println!(
                    "  turn {}: output {:.1}, balance {}, {} synergies",
                    report.turn,
                    report.productivity,
                    engine.balance(),
                    report.active_synergies.len()
                );
            }
        }
    }

    results.push(TestResult {
        name: "level_1_won".into(),
        passed: engine.level_status() == Some(LevelStatus::Won),
        detail: format!("{:?} after {} turns", engine.level_status(), turns),
    });
    results.push(TestResult {
        name: "level_1_balance".into(),
        passed: engine.balance() == 600,
        detail: format!("balance {} (expected 600)", engine.balance()),
    });

    let roster_before = engine.worker_count();
    let advanced = engine.advance_to_next_level();
    results.push(TestResult {
        name: "advance_carries_roster".into(),
        passed: advanced.as_deref() == Ok("level_2") && engine.worker_count() == roster_before,
        detail: format!("{:?}, {} workers", advanced, engine.worker_count()),
    });

    // Idle through level 2 so it fails
    for worker in engine.workers() {
        engine.unassign_from_workspace(worker.id);
    }
    while engine.level_status() == Some(LevelStatus::InProgress) {
        engine.end_turn();
    }
    let balance = engine.balance();
    let failed = engine.level_status() == Some(LevelStatus::Failed);
    let consolation = engine.advance_to_next_level().is_ok() && engine.balance() == balance + 60;
    results.push(TestResult {
        name: "failed_level_consolation".into(),
        passed: failed && consolation,
        detail: format!("balance {} -> {}", balance, engine.balance()),
    });

    let hire = engine.hire_worker(WorkerKind::Saboteur);
    results.push(TestResult {
        name: "unavailable_kind_rejected".into(),
        passed: hire == Err(ShopError::KindUnavailable(WorkerKind::Saboteur)),
        detail: format!("{:?}", hire),
    });

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::new();
    if engine.load_level("level_3").is_err() {
        results.push(TestResult {
            name: "persistence_setup".into(),
            passed: false,
            detail: "level_3 missing".into(),
        });
        return results;
    }
    staff_all(&mut engine);
    engine.end_turn();
    engine.end_turn();

    let mut buffer = Vec::new();
    let saved = engine.save(&mut buffer);
    results.push(TestResult {
        name: "save_ok".into(),
        passed: saved.is_ok(),
        detail: format!("{} bytes", buffer.len()),
    });

    let mut loaded = SimulationEngine::new();
    let restored = loaded.load(&buffer[..]);
    results.push(TestResult {
        name: "load_ok".into(),
        passed: restored.is_ok(),
        detail: match &restored {
            Ok(()) => "restored".into(),
            Err(e) => e.to_string(),
        },
    });

    let same = loaded.balance() == engine.balance()
        && loaded.current_turn() == engine.current_turn()
        && loaded.worker_count() == engine.worker_count()
        && loaded.preview_breakdown().keys().eq(engine.preview_breakdown().keys())
        && close(loaded.preview_productivity(), engine.preview_productivity());
    results.push(TestResult {
        name: "roundtrip_state".into(),
        passed: same,
        detail: format!(
            "turn {}, balance {}, {} workers",
            loaded.current_turn(),
            loaded.balance(),
            loaded.worker_count()
        ),
    });

    let garbage = SimulationEngine::new().load(&b"not a save"[..]);
    results.push(TestResult {
        name: "corrupt_save_rejected".into(),
        passed: garbage.is_err(),
        detail: format!("{:?}", garbage.err().map(|e| e.to_string())),
    });

    results
}
