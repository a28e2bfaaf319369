//! Pure simulation logic for Workhorse.
//!
//! This crate contains all turn-resolution logic that is independent of any
//! ECS, renderer, or storage. Functions take plain data and return results,
//! making them unit-testable and reusable from the engine crate, the headless
//! harness, and benchmarks.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Worker/workspace kinds, base rates, income scale |
//! | [`economy`] | Currency ledger and cumulative player progress |
//! | [`goals`] | Goal definitions and one-shot completion tracking |
//! | [`grid`] | Grid cells, footprints, adjacency, placement rules |
//! | [`ids`] | Stable worker/workspace identifiers |
//! | [`layout`] | Workspace, Worker and Assignment records |
//! | [`level`] | Level configuration, turn budget, win/lose state |
//! | [`productivity`] | Ordered productivity pipeline and per-worker breakdown |
//! | [`registry`] | Categorized synergy catalog and activation evaluation |
//! | [`synergy`] | Modifier capability set and concrete rules |
//! | [`turn`] | Turn counter and re-entrancy guarded resolution phase |

pub mod constants;
pub mod economy;
pub mod goals;
pub mod grid;
pub mod ids;
pub mod layout;
pub mod level;
pub mod productivity;
pub mod registry;
pub mod synergy;
pub mod turn;
