#![no_main]

//! Full game turn fuzzer.
//!
//! Builds plans out of fuzzer-chosen statements and plays them on a small
//! board, checking the engine invariants after every turn:
//! 1. Deposits stay within bounds
//! 2. Budgets never go negative
//! 3. A decided winner is final
//!
//! This catches integration bugs that the parser fuzzer misses.

use arbitrary::Arbitrary;
use crewplan::game::{check_invariants, new_game};
use crewplan::{Config, Direction, GameError};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated statement.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzStmt {
    Move(u8),
    Invest(i16),
    Collect(i16),
    Shoot(u8, i16),
    Relocate,
    AssignOpponent,
    AssignNearby(u8),
    Done,
}

impl FuzzStmt {
    fn render(&self) -> String {
        let dir = |d: &u8| Direction::ALL[usize::from(*d) % 6].keyword();
        match self {
            Self::Move(d) => format!("move {}", dir(d)),
            Self::Invest(n) => format!("invest {}", amount(*n)),
            Self::Collect(n) => format!("collect {}", amount(*n)),
            Self::Shoot(d, n) => format!("shoot {} {}", dir(d), amount(*n)),
            Self::Relocate => "relocate".to_string(),
            Self::AssignOpponent => "o = opponent".to_string(),
            Self::AssignNearby(d) => format!("n = nearby {}", dir(d)),
            Self::Done => "done".to_string(),
        }
    }
}

/// Negative amounts are written as a subtraction.
fn amount(n: i16) -> String {
    if n < 0 {
        format!("(0 - {})", n.unsigned_abs())
    } else {
        n.to_string()
    }
}

/// Structured input for full game turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Setup seed.
    seed: u64,
    /// Number of players, mapped into 2..=4.
    players: u8,
    /// One plan per turn.
    turns: Vec<Vec<FuzzStmt>>,
}

fuzz_target!(|input: GameTurnInput| {
    let config = Config {
        rows: 8,
        cols: 8,
        init_budget: 500,
        interest_pct: 3,
        ..Config::default()
    };
    let count = 2 + usize::from(input.players % 3);
    let names: Vec<String> = (0..count).map(|i| format!("p{i}")).collect();
    let mut game = match new_game(config, &names, input.seed) {
        Ok(game) => game,
        Err(_) => return,
    };

    let mut ended = false;
    let mut winner = None;
    for stmts in input.turns.iter().take(50) {
        if stmts.is_empty() {
            continue;
        }
        let src: Vec<String> = stmts.iter().take(20).map(FuzzStmt::render).collect();
        let result = game.submit_plan(&src.join("\n"));

        if ended {
            assert_eq!(result, Err(GameError::GameEnded));
            assert_eq!(game.winner(), winner);
        } else {
            assert!(result.is_ok(), "generated plan rejected: {result:?}");
            ended = game.is_over();
            winner = game.winner();
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
