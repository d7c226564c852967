//! Plan syntax tree.

use crate::game::Direction;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `^`, right-associative.
    Pow,
}

impl BinOp {
    /// Map an operator token to its operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "%" => Some(Self::Rem),
            "^" => Some(Self::Pow),
            _ => None,
        }
    }

    /// Apply the operator.
    ///
    /// Arithmetic wraps on overflow. Division and remainder by zero give 0.
    /// `^` is repeated multiplication, so a non-positive exponent gives 1.
    #[must_use]
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::Div => lhs.checked_div(rhs).unwrap_or(0),
            Self::Rem => lhs.checked_rem(rhs).unwrap_or(0),
            Self::Pow => {
                if rhs <= 0 {
                    1
                } else {
                    lhs.wrapping_pow(u32::try_from(rhs).unwrap_or(u32::MAX))
                }
            }
        }
    }
}

/// An expression: evaluates to an integer and never changes game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal.
    Number(i64),
    /// Identifier, resolved at evaluation time.
    Identifier(String),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `opponent`
    Opponent,
    /// `nearby <direction>`
    Nearby(Direction),
}

impl Expr {
    /// Build a binary node.
    #[must_use]
    pub fn binary(op: BinOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Whether the expression queries the board.
    #[must_use]
    pub fn uses_info(&self) -> bool {
        match self {
            Self::Opponent | Self::Nearby(_) => true,
            Self::Binary { lhs, rhs, .. } => lhs.uses_info() || rhs.uses_info(),
            Self::Number(_) | Self::Identifier(_) => false,
        }
    }
}

/// An executable statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `name = expr`
    Assign {
        /// Target identifier.
        name: String,
        /// Value.
        value: Expr,
        /// Source line of the statement.
        line: usize,
    },
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `if (cond) then a else b`
    If {
        /// Guard; true when positive.
        cond: Expr,
        /// Branch taken when the guard is positive.
        then_branch: Box<Stmt>,
        /// Branch taken otherwise.
        else_branch: Box<Stmt>,
    },
    /// `while (cond) body`
    While {
        /// Guard, re-evaluated before every iteration.
        cond: Expr,
        /// Loop body.
        body: Box<Stmt>,
    },
    /// `done`
    Done,
    /// `relocate`
    Relocate,
    /// `move <direction>`
    Move(Direction),
    /// `invest <expr>`
    Invest(Expr),
    /// `collect <expr>`
    Collect(Expr),
    /// `shoot <direction> <expr>`
    Shoot(Direction, Expr),
}

/// A parsed plan: the top-level statement sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Statements in execution order. Never empty.
    pub statements: Vec<Stmt>,
}
