//! Game invariants: sanity checks that detect engine bugs.
//!
//! None of these can be broken by a plan. If one triggers, the rules
//! implementation is wrong.

use std::collections::HashMap;

use crate::game::{GameState, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut centers: HashMap<PlayerId, usize> = HashMap::new();

    for region in state.territory().regions() {
        let at = region.location;
        if !(0..=region.max_deposit()).contains(&region.deposit()) {
            violations.push(InvariantViolation {
                message: format!(
                    "Region at {at:?} has deposit {} outside [0, {}]",
                    region.deposit(),
                    region.max_deposit()
                ),
            });
        }
        if region.deposit() == 0 && region.owner.is_some() {
            violations.push(InvariantViolation {
                message: format!("Empty region at {at:?} is still owned"),
            });
        }
        if region.city_center {
            match region.owner {
                Some(owner) => *centers.entry(owner).or_default() += 1,
                None => violations.push(InvariantViolation {
                    message: format!("Neutral region at {at:?} is marked as city center"),
                }),
            }
        }
    }

    for (owner, count) in centers {
        if count > 1 {
            violations.push(InvariantViolation {
                message: format!("Player {owner} has {count} city centers"),
            });
        }
    }

    for player in state.players() {
        if player.budget() < 0 {
            violations.push(InvariantViolation {
                message: format!("Player {} has negative budget {}", player.id, player.budget()),
            });
        }
    }

    if let Some(winner) = state.winner() {
        if !state.is_over() {
            violations.push(InvariantViolation {
                message: format!("Player {winner} won but the game goes on"),
            });
        }
        if !state.player(winner).is_some_and(|p| p.alive) {
            violations.push(InvariantViolation {
                message: format!("Winner {winner} is not alive"),
            });
        }
    }

    if state.turn() < 1 {
        violations.push(InvariantViolation {
            message: format!("Turn counter is {}", state.turn()),
        });
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
