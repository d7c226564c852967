//! Output formatting utilities for CLI.

// Averages over game counts
#![allow(clippy::cast_precision_loss)]

use crewplan::tournament::MatchResult;
use crewplan::PlayerId;
use serde::Serialize;

/// Display name of player `id`.
fn name_of(names: &[String], id: PlayerId) -> &str {
    usize::from(id)
        .checked_sub(1)
        .and_then(|idx| names.get(idx))
        .map_or("Unknown", String::as_str)
}

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Winner player ID (null if draw).
    pub(super) winner: Option<PlayerId>,
    /// Last round played.
    pub(super) turns_played: i64,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player ID (1-8).
    pub(super) id: PlayerId,
    /// Plan file name.
    pub(super) plan: String,
    /// Final budget.
    pub(super) budget: i64,
    /// Regions owned at the end.
    pub(super) regions: usize,
    /// Deposit held in owned regions at the end.
    pub(super) deposit: i64,
    /// Turns on which the plan stopped early.
    pub(super) halted_turns: u32,
    /// Round eliminated (null if survived).
    pub(super) eliminated_turn: Option<i64>,
}

impl JsonMatchResult {
    /// Create from a `MatchResult`.
    pub(super) fn from_match_result(result: &MatchResult, names: &[String]) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            turns_played: result.turns_played,
            players: result
                .player_stats
                .iter()
                .map(|ps| JsonPlayerResult {
                    id: ps.player_id,
                    plan: name_of(names, ps.player_id).to_string(),
                    budget: ps.final_budget,
                    regions: ps.regions,
                    deposit: ps.total_deposit,
                    halted_turns: ps.halted_turns,
                    eliminated_turn: ps.eliminated_turn,
                })
                .collect(),
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", result.seed));
    if let Some(winner) = result.winner {
        output.push_str(&format!("  Winner: Player {winner} ({})\n", name_of(names, winner)));
    } else {
        output.push_str("  Winner: Draw\n");
    }
    output.push_str(&format!("  Turns: {}\n\n", result.turns_played));

    for stats in &result.player_stats {
        output.push_str(&format!(
            "  Player {}: budget {}, {} regions holding {} ({})",
            stats.player_id,
            stats.final_budget,
            stats.regions,
            stats.total_deposit,
            name_of(names, stats.player_id)
        ));
        if let Some(turn) = stats.eliminated_turn {
            output.push_str(&format!(" [eliminated turn {turn}]"));
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct TournamentStats {
    /// Total matches played.
    pub(super) games_played: u64,
    /// Win count per player.
    pub(super) wins: Vec<u64>,
    /// Draw count.
    pub(super) draws: u64,
    /// Total score per player.
    total_scores: Vec<f64>,
    /// Score sum of squares for std dev calculation.
    score_sq_sums: Vec<f64>,
    /// Total rounds across all matches.
    total_turns: u64,
}

impl TournamentStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            draws: 0,
            total_scores: vec![0.0; num_players],
            score_sq_sums: vec![0.0; num_players],
            total_turns: 0,
        }
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_turns += u64::try_from(result.turns_played).unwrap_or(0);

        match result.winner.and_then(|w| usize::from(w).checked_sub(1)) {
            Some(idx) if idx < self.wins.len() => self.wins[idx] += 1,
            _ => self.draws += 1,
        }

        for (i, stats) in result.player_stats.iter().enumerate() {
            if i < self.total_scores.len() {
                let score = stats.score() as f64;
                self.total_scores[i] += score;
                self.score_sq_sums[i] += score * score;
            }
        }
    }

    /// Fold another partial aggregate into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
        for (a, b) in self.score_sq_sums.iter_mut().zip(&other.score_sq_sums) {
            *a += b;
        }
    }

    /// Get win rate for a player (0.0-1.0).
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get the share of drawn matches (0.0-1.0).
    pub(super) fn draw_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.draws as f64 / self.games_played as f64
    }

    /// Get average score for a player.
    pub(super) fn avg_score(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(player_idx).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get score standard deviation for a player.
    pub(super) fn score_std_dev(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score(player_idx);
        let sq_sum = self.score_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 {
            0.0
        } else {
            variance.sqrt()
        }
    }

    /// Get average match length.
    pub(super) fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total matches played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Average match length in rounds.
    avg_turns: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player number (1-based).
    player: usize,
    /// Plan file name.
    plan: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and plan names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                player: i + 1,
                plan: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  Player {} ({name}): {rate:.1}% ({wins} wins)\n", i + 1));
    }
    output.push_str(&format!(
        "  Draws: {} ({:.1}%)\n\n",
        stats.draws,
        stats.draw_rate() * 100.0
    ));

    output.push_str("Average Scores (budget + deposits):\n");
    for (i, name) in names.iter().enumerate() {
        let avg = stats.avg_score(i);
        let std = stats.score_std_dev(i);
        output.push_str(&format!("  Player {} ({name}): {avg:.1} (+/- {std:.1})\n", i + 1));
    }

    output.push_str(&format!("\nAverage Match Length: {:.0} turns\n", stats.avg_turns()));

    output
}
