//! Game layer for crewplan.
//!
//! Implements the rules the plan interpreter runs against:
//! - Hex territory of regions with depletable deposits
//! - Players with budgets and persistent identifier tables
//! - The city crew and its actions
//! - Turn sequencing, interest, eliminations and capture
//! - A* distances for relocation

mod invariants;
mod map;
mod pathfinding;
mod player;
mod setup;
mod state;

pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::{Direction, Point, Region, Territory};
pub use pathfinding::shortest_distance;
pub use player::{Player, PlayerId};
pub use setup::{new_game, place_city_centers, MAX_PLAYERS, MIN_PLAYERS};
pub use state::{GameState, ACTION_COST, SPECIAL_IDENTIFIERS};
