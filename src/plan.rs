//! The plan language: tokenizer, parser, syntax tree and interpreter.
//!
//! A plan is parsed in full before anything runs, so a syntax error never
//! has a partial effect. Execution is fail-fast: the first statement that
//! reports failure, or an explicit `done`, ends the plan for the turn.

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use ast::{BinOp, Expr, Plan, Stmt};
pub use interpreter::{
    eval, execute, execute_all, run, Actions, Environment, Flow, MAX_LOOP_ITERATIONS,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{is_reserved, parse, Parser, MAX_NESTING_DEPTH, RESERVED};
