//! Turn counter and resolution phase.
//!
//! The phase flag is the re-entrancy guard for turn resolution: a second
//! `begin_resolution` while one is in flight is refused, and the caller
//! treats that as a silent no-op.

use serde::{Deserialize, Serialize};

/// Where the turn lifecycle currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    Idle,
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    /// 1-based number of the turn currently being played.
    pub turn: u32,
    pub phase: TurnPhase,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self {
            turn: 1,
            phase: TurnPhase::Idle,
        }
    }
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolving(&self) -> bool {
        self.phase == TurnPhase::Resolving
    }

    /// Enter the resolving phase. Returns false if already resolving.
    pub fn begin_resolution(&mut self) -> bool {
        if self.is_resolving() {
            return false;
        }
        self.phase = TurnPhase::Resolving;
        true
    }

    /// Advance the counter. Only meaningful mid-resolution.
    pub fn advance(&mut self) -> u32 {
        self.turn = self.turn.saturating_add(1);
        self.turn
    }

    /// Leave the resolving phase.
    pub fn finish(&mut self) {
        self.phase = TurnPhase::Idle;
    }

    /// Back to turn 1, idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_turn_one() {
        let clock = TurnClock::new();
        assert_eq!(clock.turn, 1);
        assert!(!clock.is_resolving());
    }

    #[test]
    fn test_nested_resolution_refused() {
        let mut clock = TurnClock::new();
        assert!(clock.begin_resolution());
        assert!(!clock.begin_resolution());
        assert_eq!(clock.advance(), 2);
        clock.finish();
        assert!(clock.begin_resolution());
    }

    #[test]
    fn test_reset() {
        let mut clock = TurnClock::new();
        clock.begin_resolution();
        clock.advance();
        clock.reset();
        assert_eq!(clock, TurnClock::default());
    }
}
