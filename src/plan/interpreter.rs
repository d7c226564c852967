//! Tree-walking plan interpreter.
//!
//! The interpreter knows nothing about the board. It talks to the game
//! through two traits: [`Environment`] for everything an expression may
//! read, and [`Actions`] for everything a statement may do. The game
//! engine implements both; the configuration loader only the first.

use tracing::trace;

use crate::game::Direction;
use crate::plan::ast::{Expr, Plan, Stmt};

/// Maximum number of body executions for a single `while` statement.
pub const MAX_LOOP_ITERATIONS: u32 = 10_000;

/// Read-only view used to evaluate expressions.
pub trait Environment {
    /// Resolve an identifier. Unbound names evaluate to 0.
    fn lookup(&mut self, name: &str) -> i64;

    /// Encoded direction and distance of the closest opponent region.
    fn opponent(&mut self) -> i64;

    /// Encoded distance and deposit size of the first opponent region in
    /// `direction`.
    fn nearby(&mut self, direction: Direction) -> i64;
}

/// Effects a plan statement may have.
///
/// Each action returns whether the plan may go on. `false` halts the rest
/// of the plan for this turn; it is not an error.
pub trait Actions: Environment {
    /// Bind `name` to `value` in the acting player's identifier table.
    fn assign(&mut self, name: &str, value: i64);
    /// Move the city crew one region.
    fn move_crew(&mut self, direction: Direction) -> bool;
    /// Put `amount` into the crew's region.
    fn invest(&mut self, amount: i64) -> bool;
    /// Take `amount` out of the crew's region.
    fn collect(&mut self, amount: i64) -> bool;
    /// Make the crew's region the new city center.
    fn relocate(&mut self) -> bool;
    /// Spend `expenditure` against the adjacent region in `direction`.
    fn attack(&mut self, direction: Direction, expenditure: i64) -> bool;
}

/// Whether execution proceeds to the next statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Go on with the next statement.
    Continue,
    /// Stop the plan for this turn.
    Halt,
}

impl Flow {
    fn from_success(ok: bool) -> Self {
        if ok { Self::Continue } else { Self::Halt }
    }
}

/// Evaluate an expression against `env`.
pub fn eval<E: Environment + ?Sized>(expr: &Expr, env: &mut E) -> i64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Identifier(name) => env.lookup(name),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, env);
            let rhs = eval(rhs, env);
            op.apply(lhs, rhs)
        }
        Expr::Opponent => env.opponent(),
        Expr::Nearby(direction) => env.nearby(*direction),
    }
}

/// Execute a whole plan. Returns [`Flow::Halt`] if it stopped early.
pub fn run<A: Actions + ?Sized>(plan: &Plan, actions: &mut A) -> Flow {
    execute_all(&plan.statements, actions)
}

/// Execute statements in order, stopping at the first halt.
pub fn execute_all<A: Actions + ?Sized>(statements: &[Stmt], actions: &mut A) -> Flow {
    for stmt in statements {
        if execute(stmt, actions) == Flow::Halt {
            return Flow::Halt;
        }
    }
    Flow::Continue
}

/// Execute a single statement.
pub fn execute<A: Actions + ?Sized>(stmt: &Stmt, actions: &mut A) -> Flow {
    match stmt {
        Stmt::Assign { name, value, .. } => {
            let value = eval(value, actions);
            actions.assign(name, value);
            Flow::Continue
        }
        Stmt::Block(body) => execute_all(body, actions),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            if eval(cond, actions) > 0 {
                execute(then_branch, actions)
            } else {
                execute(else_branch, actions)
            }
        }
        Stmt::While { cond, body } => {
            let mut iterations = 0;
            while iterations < MAX_LOOP_ITERATIONS && eval(cond, actions) > 0 {
                iterations += 1;
                if execute(body, actions) == Flow::Halt {
                    return Flow::Halt;
                }
            }
            if iterations == MAX_LOOP_ITERATIONS {
                trace!("while loop stopped at iteration cap");
            }
            Flow::Continue
        }
        Stmt::Done => Flow::Halt,
        Stmt::Relocate => Flow::from_success(actions.relocate()),
        Stmt::Move(direction) => Flow::from_success(actions.move_crew(*direction)),
        Stmt::Invest(amount) => {
            let amount = eval(amount, actions);
            Flow::from_success(actions.invest(amount))
        }
        Stmt::Collect(amount) => {
            let amount = eval(amount, actions);
            Flow::from_success(actions.collect(amount))
        }
        Stmt::Shoot(direction, expenditure) => {
            let expenditure = eval(expenditure, actions);
            Flow::from_success(actions.attack(*direction, expenditure))
        }
    }
}
