//! Match runner for crewplan games.
//!
//! Provides a pure function interface: `(seed, plans) -> MatchResult`.
//!
//! Every player submits the same plan on each of their turns. Identifier
//! tables persist between turns, so a single plan can still keep state and
//! change behavior over time.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{GameError, SyntaxError};
use crate::game::{assert_invariants, new_game, GameState, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::plan::{parse, Flow, Plan};

/// A named, parsed player plan.
#[derive(Debug, Clone)]
pub struct PlayerPlan {
    /// Display name.
    pub name: String,
    /// The plan run every turn.
    pub plan: Plan,
}

impl PlayerPlan {
    /// Parse `src` into a player plan.
    ///
    /// # Errors
    ///
    /// Returns the syntax error if `src` is not a valid plan.
    pub fn parse(name: impl Into<String>, src: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            name: name.into(),
            plan: parse(src)?,
        })
    }
}

/// Configuration for a match.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Rounds before an undecided match is called a draw.
    pub max_turns: i64,
    /// Game settings.
    pub game: Config,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            game: Config::default(),
        }
    }
}

/// Statistics for a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Budget at the end of the match.
    pub final_budget: i64,
    /// Regions owned at the end of the match.
    pub regions: usize,
    /// Total deposit of the owned regions at the end of the match.
    pub total_deposit: i64,
    /// Turns on which the plan stopped early.
    pub halted_turns: u32,
    /// Round the player was eliminated (None if survived).
    pub eliminated_turn: Option<i64>,
}

impl PlayerStats {
    /// Budget plus owned deposits.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.final_budget.saturating_add(self.total_deposit)
    }
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The winning player (None if drawn or undecided at the turn limit).
    pub winner: Option<PlayerId>,
    /// Last round played.
    pub turns_played: i64,
    /// Per-player statistics.
    pub player_stats: Vec<PlayerStats>,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<PlayerId>,
    /// The seed used for this match.
    pub seed: u64,
}

/// Error type for match setup.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Not enough players.
    #[error("too few players: {0} (minimum {MIN_PLAYERS})")]
    TooFewPlayers(usize),
    /// Too many players.
    #[error("too many players: {0} (maximum {MAX_PLAYERS})")]
    TooManyPlayers(usize),
    /// The game engine rejected the setup.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Run a complete match with the given seed and player plans.
///
/// The match ends when the game has a winner, when every player is
/// eliminated, or after `config.max_turns` rounds.
///
/// # Determinism
///
/// Given the same seed, plans and configuration, this function always
/// produces the same `MatchResult`.
///
/// # Errors
///
/// Returns an error if the number of players is outside `2..=8` or the
/// game cannot be set up on the configured board.
pub fn run_match(
    seed: u64,
    plans: &[PlayerPlan],
    config: &MatchConfig,
) -> Result<MatchResult, TournamentError> {
    let runner = MatchRunner::new(seed, plans, config)?;
    Ok(runner.run())
}

/// Drives one game and tracks per-player statistics.
struct MatchRunner<'a> {
    game: GameState,
    plans: &'a [PlayerPlan],
    max_turns: i64,
    seed: u64,
    halted_turns: Vec<u32>,
    eliminated_turn: Vec<Option<i64>>,
    elimination_order: Vec<PlayerId>,
}

impl<'a> MatchRunner<'a> {
    fn new(
        seed: u64,
        plans: &'a [PlayerPlan],
        config: &MatchConfig,
    ) -> Result<Self, TournamentError> {
        let num_players = plans.len();
        if num_players < MIN_PLAYERS {
            return Err(TournamentError::TooFewPlayers(num_players));
        }
        if num_players > MAX_PLAYERS {
            return Err(TournamentError::TooManyPlayers(num_players));
        }

        let names: Vec<String> = plans.iter().map(|p| p.name.clone()).collect();
        let game = new_game(config.game, &names, seed)?;

        Ok(Self {
            game,
            plans,
            max_turns: config.max_turns,
            seed,
            halted_turns: vec![0; num_players],
            eliminated_turn: vec![None; num_players],
            elimination_order: Vec::new(),
        })
    }

    fn run(mut self) -> MatchResult {
        info!(seed = self.seed, players = self.plans.len(), "match started");
        while !self.game.is_over() && self.game.turn() <= self.max_turns {
            self.execute_turn();
        }
        self.build_result()
    }

    /// Run the acting player's plan.
    fn execute_turn(&mut self) {
        let turn = self.game.turn();
        let idx = usize::from(self.game.current_player().id).saturating_sub(1);
        let Some(player_plan) = self.plans.get(idx) else {
            return;
        };

        match self.game.play_turn(&player_plan.plan) {
            Ok(Flow::Halt) => self.halted_turns[idx] += 1,
            Ok(Flow::Continue) => {}
            Err(err) => debug!(%err, "turn rejected"),
        }
        assert_invariants(&self.game);
        self.update_eliminations(turn);
    }

    /// Record players eliminated during `turn`.
    fn update_eliminations(&mut self, turn: i64) {
        for (idx, player) in self.game.players().iter().enumerate() {
            if !player.alive && self.eliminated_turn[idx].is_none() {
                self.eliminated_turn[idx] = Some(turn);
                self.elimination_order.push(player.id);
            }
        }
    }

    fn build_result(self) -> MatchResult {
        let territory = self.game.territory();
        let player_stats = self
            .game
            .players()
            .iter()
            .enumerate()
            .map(|(idx, player)| PlayerStats {
                player_id: player.id,
                final_budget: player.budget(),
                regions: territory.owned_by(player.id).count(),
                total_deposit: territory.total_deposit(player.id),
                halted_turns: self.halted_turns[idx],
                eliminated_turn: self.eliminated_turn[idx],
            })
            .collect();

        let winner = self.game.winner();
        info!(seed = self.seed, ?winner, turns = self.game.turn(), "match finished");

        MatchResult {
            winner,
            turns_played: self.game.turn().min(self.max_turns),
            player_stats,
            elimination_order: self.elimination_order,
            seed: self.seed,
        }
    }
}
