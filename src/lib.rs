// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! crewplan: a turn-based hex territory game driven by player-written plans.
//!
//! Each turn the acting player submits a plan in a small imperative
//! language. The plan is parsed in full, then interpreted against the live
//! game: the player's city crew moves over a hexagonal board, invests in
//! and collects from regions, and attacks its neighbors. Draining an
//! opponent's city center wins the game.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Match / Tournament Runner       │
//! ├─────────────────────────────────────┤
//! │   Game Engine  (rules, A*, setup)   │
//! ├─────────────────────────────────────┤
//! │  Plan Language (lex, parse, run)    │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod plan;
pub mod tournament;

pub use config::Config;
pub use error::{ConfigError, GameError, GameResult, SyntaxError};

// Re-export key game types at crate root for convenience
pub use game::{Direction, GameState, Player, PlayerId, Point, Region, Territory};
pub use plan::{parse, Flow, Plan};
