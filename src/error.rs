//! Error types for plan parsing, configuration and the game engine.
//!
//! Only structural problems are errors. Rule violations during plan
//! execution (not enough budget, a blocked move, ...) are reported as
//! plain success flags by the engine and never surface here.

use thiserror::Error;

/// A malformed plan. Every variant carries the source line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The input contains no statement at all.
    #[error("line {line}: a plan needs at least one statement")]
    EmptyPlan {
        /// Line of the end of input.
        line: usize,
    },
    /// Tokens remain after a complete plan was parsed.
    #[error("line {line}: unexpected trailing token `{token}`")]
    LeftoverToken {
        /// The first unconsumed token.
        token: String,
        /// Line of that token.
        line: usize,
    },
    /// An identifier was not followed by `=`.
    #[error("line {line}: expected `=` after `{identifier}`")]
    MissingAssignment {
        /// The identifier that started the statement.
        identifier: String,
        /// Line of the statement.
        line: usize,
    },
    /// A reserved word was used where an identifier is required.
    #[error("line {line}: `{word}` is reserved and cannot be used as an identifier")]
    ReservedIdentifier {
        /// The offending word.
        word: String,
        /// Line of the word.
        line: usize,
    },
    /// A direction was expected but something else was found.
    #[error("line {line}: `{token}` is not a direction")]
    InvalidDirection {
        /// The offending token.
        token: String,
        /// Line of the token.
        line: usize,
    },
    /// An info expression (`opponent` / `nearby`) was malformed.
    #[error("line {line}: invalid info expression at `{token}`")]
    InvalidInfoExpression {
        /// The offending token.
        token: String,
        /// Line of the token.
        line: usize,
    },
    /// A statement did not start with a command or an identifier.
    #[error("line {line}: unknown command `{token}`")]
    UnknownCommand {
        /// The offending token.
        token: String,
        /// Line of the token.
        line: usize,
    },
    /// A specific token was required but another was found.
    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedToken {
        /// The token the grammar required.
        expected: String,
        /// The token actually present.
        found: String,
        /// Line of the found token.
        line: usize,
    },
    /// Input ended in the middle of a construct.
    #[error("line {line}: unexpected end of plan")]
    UnexpectedEnd {
        /// Line of the end of input.
        line: usize,
    },
    /// An integer literal does not fit in 64 bits.
    #[error("line {line}: number `{literal}` is out of range")]
    InvalidNumber {
        /// The literal as written.
        literal: String,
        /// Line of the literal.
        line: usize,
    },
    /// Blocks, parentheses or operator chains nest past the parser's limit.
    #[error("line {line}: nesting deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
        /// Line where the limit was crossed.
        line: usize,
    },
    /// The lexer met a character outside the plan alphabet.
    #[error("line {line}: unexpected character `{ch}`")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// Line of the character.
        line: usize,
    },
}

impl SyntaxError {
    /// Source line the error was reported on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::EmptyPlan { line }
            | Self::LeftoverToken { line, .. }
            | Self::MissingAssignment { line, .. }
            | Self::ReservedIdentifier { line, .. }
            | Self::InvalidDirection { line, .. }
            | Self::InvalidInfoExpression { line, .. }
            | Self::UnknownCommand { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEnd { line }
            | Self::InvalidNumber { line, .. }
            | Self::TooDeep { line, .. }
            | Self::UnexpectedCharacter { line, .. } => *line,
        }
    }
}

/// A configuration text that parses but does not describe a valid game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The text is not valid in the plan grammar.
    #[error("configuration syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// A statement other than an assignment was found.
    #[error("statement {position}: configuration may only contain assignments")]
    NotAnAssignment {
        /// 1-based position of the statement.
        position: usize,
    },
    /// A value refers to the board, which does not exist yet.
    #[error("line {line}: `{key}` cannot use `opponent` or `nearby`")]
    BoardQuery {
        /// The key being assigned.
        key: String,
        /// Line of the assignment.
        line: usize,
    },
    /// A seconds field is 60 or more.
    #[error("`{key}` must be below 60 seconds, got {value}")]
    SecondsOutOfRange {
        /// The configuration key.
        key: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A value is outside the range the game can work with.
    #[error("`{key}` is out of range: {value}")]
    OutOfRange {
        /// The configuration key.
        key: &'static str,
        /// The rejected value.
        value: i64,
    },
}

/// Errors surfaced by the game engine to its driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The submitted plan does not parse; the game state is untouched.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A plan was submitted after a winner was decided.
    #[error("game already ended")]
    GameEnded,
    /// The game could not be set up.
    #[error("game setup failed: {0}")]
    Setup(String),
}

/// Result alias for engine operations.
pub type GameResult<T> = Result<T, GameError>;
