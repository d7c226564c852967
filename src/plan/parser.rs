//! Recursive-descent plan parser.
//!
//! ```text
//! Plan           → Statement+
//! Statement      → Command | "{" Statement* "}" | IfStatement | WhileStatement
//! Command        → <identifier> "=" Expression | ActionCommand
//! ActionCommand  → done | relocate | move Direction
//!                | invest Expression | collect Expression
//!                | shoot Direction Expression
//! IfStatement    → if "(" Expression ")" then Statement else Statement
//! WhileStatement → while "(" Expression ")" Statement
//! Expression     → Term (("+" | "-") Term)*
//! Term           → Factor (("*" | "/" | "%") Factor)*
//! Factor         → Power ("^" Factor)?
//! Power          → <number> | <identifier> | "(" Expression ")" | InfoExpression
//! InfoExpression → opponent | nearby Direction
//! ```

use crate::error::SyntaxError;
use crate::game::Direction;
use crate::plan::ast::{BinOp, Expr, Plan, Stmt};
use crate::plan::lexer::{Lexer, Token, TokenKind};

/// Deepest nesting a plan may use. Blocks, control statements,
/// parentheses and `^` chains each add a level, and so does every operator
/// on the path from an expression's root to its deepest operand.
pub const MAX_NESTING_DEPTH: usize = 128;

/// An expression with the height of its tree.
type Parsed = (Expr, usize);

/// Words that start an action command.
const COMMANDS: &[&str] = &["done", "relocate", "move", "invest", "collect", "shoot"];

/// Words that can never name a variable.
pub const RESERVED: &[&str] = &[
    "collect",
    "done",
    "down",
    "downleft",
    "downright",
    "else",
    "if",
    "invest",
    "move",
    "nearby",
    "opponent",
    "relocate",
    "shoot",
    "then",
    "up",
    "upleft",
    "upright",
    "while",
];

/// Whether `word` is a reserved word of the plan language.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Parse a complete plan.
///
/// Parsing is all-or-nothing: either the whole text is a valid plan or an
/// error describing the first problem is returned.
///
/// # Errors
///
/// Returns a [`SyntaxError`] carrying the offending line.
pub fn parse(src: &str) -> Result<Plan, SyntaxError> {
    Parser::new(Lexer::new(src)).parse()
}

/// Parser state over a token stream.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser reading from `lexer`.
    #[must_use]
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer, depth: 0 }
    }

    /// Parse the whole input as a plan.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if the input is empty, malformed, or has
    /// tokens left after the last statement.
    pub fn parse(mut self) -> Result<Plan, SyntaxError> {
        if !self.lexer.has_next() {
            return Err(SyntaxError::EmptyPlan {
                line: self.lexer.line(),
            });
        }

        let mut statements = vec![self.statement()?];
        self.statements(&mut statements)?;

        if let Some(token) = self.lexer.peek() {
            return Err(SyntaxError::LeftoverToken {
                token: token.text.clone(),
                line: token.line,
            });
        }

        Ok(Plan { statements })
    }

    /// Parse statements until `}` or end of input.
    fn statements(&mut self, out: &mut Vec<Stmt>) -> Result<(), SyntaxError> {
        while self.lexer.has_next() && !self.lexer.peek_is("}") {
            out.push(self.statement()?);
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.descend()?;
        let stmt = if self.lexer.peek_is("if") {
            self.if_statement()
        } else if self.lexer.peek_is("while") {
            self.while_statement()
        } else if self.lexer.peek_is("{") {
            self.block()
        } else {
            self.command()
        };
        self.ascend();
        stmt
    }

    fn block(&mut self) -> Result<Stmt, SyntaxError> {
        self.lexer.consume_expected("{")?;
        let mut body = Vec::new();
        self.statements(&mut body)?;
        self.lexer.consume_expected("}")?;
        Ok(Stmt::Block(body))
    }

    fn if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.lexer.consume_expected("if")?;
        let cond = self.guard()?;
        self.lexer.consume_expected("then")?;
        let then_branch = self.statement()?;
        self.lexer.consume_expected("else")?;
        let else_branch = self.statement()?;
        Ok(Stmt::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.lexer.consume_expected("while")?;
        let cond = self.guard()?;
        let body = self.statement()?;
        Ok(Stmt::While {
            cond,
            body: Box::new(body),
        })
    }

    /// `( Expression )`
    fn guard(&mut self) -> Result<Expr, SyntaxError> {
        self.lexer.consume_expected("(")?;
        let cond = self.expression()?;
        self.lexer.consume_expected(")")?;
        Ok(cond)
    }

    fn command(&mut self) -> Result<Stmt, SyntaxError> {
        let token = self.next_token()?;
        if COMMANDS.contains(&token.text.as_str()) {
            return self.action(&token);
        }
        self.assignment(token)
    }

    fn assignment(&mut self, target: Token) -> Result<Stmt, SyntaxError> {
        if target.kind != TokenKind::Word {
            return Err(SyntaxError::UnknownCommand {
                token: target.text,
                line: target.line,
            });
        }
        if is_reserved(&target.text) {
            return Err(SyntaxError::ReservedIdentifier {
                word: target.text,
                line: target.line,
            });
        }
        if !self.lexer.peek_is("=") {
            return Err(SyntaxError::MissingAssignment {
                identifier: target.text,
                line: self.lexer.line(),
            });
        }
        self.lexer.consume();
        let value = self.expression()?;
        Ok(Stmt::Assign {
            name: target.text,
            value,
            line: target.line,
        })
    }

    fn action(&mut self, command: &Token) -> Result<Stmt, SyntaxError> {
        match command.text.as_str() {
            "done" => Ok(Stmt::Done),
            "relocate" => Ok(Stmt::Relocate),
            "move" => Ok(Stmt::Move(self.direction()?)),
            "invest" => Ok(Stmt::Invest(self.expression()?)),
            "collect" => Ok(Stmt::Collect(self.expression()?)),
            "shoot" => {
                let direction = self.direction()?;
                let expenditure = self.expression()?;
                Ok(Stmt::Shoot(direction, expenditure))
            }
            _ => Err(SyntaxError::UnknownCommand {
                token: command.text.clone(),
                line: command.line,
            }),
        }
    }

    fn direction(&mut self) -> Result<Direction, SyntaxError> {
        let token = self.next_token()?;
        Direction::from_keyword(&token.text).ok_or(SyntaxError::InvalidDirection {
            token: token.text,
            line: token.line,
        })
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.sum().map(|(expr, _)| expr)
    }

    fn sum(&mut self) -> Result<Parsed, SyntaxError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.peek_operator(&[BinOp::Add, BinOp::Sub]) {
            self.lexer.consume();
            let rhs = self.term()?;
            lhs = self.join(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Parsed, SyntaxError> {
        let mut lhs = self.factor()?;
        while let Some(op) = self.peek_operator(&[BinOp::Mul, BinOp::Div, BinOp::Rem]) {
            self.lexer.consume();
            let rhs = self.factor()?;
            lhs = self.join(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Parsed, SyntaxError> {
        let base = self.power()?;
        if self.peek_operator(&[BinOp::Pow]).is_some() {
            self.lexer.consume();
            self.descend()?;
            let exponent = self.factor()?;
            self.ascend();
            return self.join(BinOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn power(&mut self) -> Result<Parsed, SyntaxError> {
        if self.lexer.peek_is("opponent") || self.lexer.peek_is("nearby") {
            return self.info_expression().map(|expr| (expr, 0));
        }
        if self.lexer.peek_is("(") {
            self.lexer.consume();
            self.descend()?;
            let inner = self.sum()?;
            self.ascend();
            self.lexer.consume_expected(")")?;
            return Ok(inner);
        }

        let token = self.next_token()?;
        let leaf = match token.kind {
            TokenKind::Number => token
                .text
                .parse::<i64>()
                .map(Expr::Number)
                .map_err(|_| SyntaxError::InvalidNumber {
                    literal: token.text,
                    line: token.line,
                }),
            TokenKind::Word if is_reserved(&token.text) => Err(SyntaxError::ReservedIdentifier {
                word: token.text,
                line: token.line,
            }),
            TokenKind::Word => Ok(Expr::Identifier(token.text)),
            TokenKind::Symbol | TokenKind::Invalid => Err(SyntaxError::UnexpectedToken {
                expected: "expression".to_string(),
                found: token.text,
                line: token.line,
            }),
        };
        leaf.map(|expr| (expr, 0))
    }

    /// Combine two operands, refusing trees taller than the nesting limit.
    fn join(&self, op: BinOp, lhs: Parsed, rhs: Parsed) -> Result<Parsed, SyntaxError> {
        let height = lhs.1.max(rhs.1) + 1;
        if height > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok((Expr::binary(op, lhs.0, rhs.0), height))
    }

    fn descend(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn too_deep(&self) -> SyntaxError {
        SyntaxError::TooDeep {
            limit: MAX_NESTING_DEPTH,
            line: self.lexer.line(),
        }
    }

    fn info_expression(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.next_token()?;
        match token.text.as_str() {
            "opponent" => Ok(Expr::Opponent),
            "nearby" => {
                let target = self.next_token()?;
                Direction::from_keyword(&target.text)
                    .map(Expr::Nearby)
                    .ok_or(SyntaxError::InvalidInfoExpression {
                        token: target.text,
                        line: target.line,
                    })
            }
            _ => Err(SyntaxError::InvalidInfoExpression {
                token: token.text,
                line: token.line,
            }),
        }
    }

    /// The operator at the head of the stream if it is one of `accepted`.
    fn peek_operator(&self, accepted: &[BinOp]) -> Option<BinOp> {
        let token = self.lexer.peek()?;
        if token.kind != TokenKind::Symbol {
            return None;
        }
        BinOp::from_symbol(&token.text).filter(|op| accepted.contains(op))
    }

    /// Consume the next token, rejecting end of input and invalid characters.
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let line = self.lexer.line();
        let token = self
            .lexer
            .consume()
            .ok_or(SyntaxError::UnexpectedEnd { line })?;
        if token.kind == TokenKind::Invalid {
            let ch = token.text.chars().next().unwrap_or_default();
            return Err(SyntaxError::UnexpectedCharacter {
                ch,
                line: token.line,
            });
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(src: &str) -> Stmt {
        let mut plan = parse(src).unwrap();
        assert_eq!(plan.statements.len(), 1);
        plan.statements.remove(0)
    }

    fn parse_expr(src: &str) -> Expr {
        match parse_one(&format!("x = {src}")) {
            Stmt::Assign { value, .. } => value,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    fn num(n: i64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn test_actions() {
        let plan = parse("done relocate move upleft invest 5 collect 6 shoot down 7").unwrap();
        assert_eq!(plan.statements, vec![
            Stmt::Done,
            Stmt::Relocate,
            Stmt::Move(Direction::UpLeft),
            Stmt::Invest(num(5)),
            Stmt::Collect(num(6)),
            Stmt::Shoot(Direction::Down, num(7)),
        ]);
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Expr::binary(BinOp::Add, num(1), Expr::binary(BinOp::Mul, num(2), num(3)))
        );
        // (1 + 2) * 3
        assert_eq!(
            parse_expr("(1 + 2) * 3"),
            Expr::binary(BinOp::Mul, Expr::binary(BinOp::Add, num(1), num(2)), num(3))
        );
    }

    #[test]
    fn test_left_associative_subtraction() {
        assert_eq!(
            parse_expr("8 - 4 - 2"),
            Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, num(8), num(4)), num(2))
        );
    }

    #[test]
    fn test_right_associative_power() {
        assert_eq!(
            parse_expr("2 ^ 3 ^ 2"),
            Expr::binary(BinOp::Pow, num(2), Expr::binary(BinOp::Pow, num(3), num(2)))
        );
    }

    #[test]
    fn test_info_expressions() {
        assert_eq!(parse_expr("opponent"), Expr::Opponent);
        assert_eq!(parse_expr("nearby downright"), Expr::Nearby(Direction::DownRight));
    }

    #[test]
    fn test_if_and_while() {
        let stmt = parse_one("while (deposit) { if (budget - 100) then collect 1 else done }");
        let Stmt::While { cond, body } = stmt else {
            panic!("expected while");
        };
        assert_eq!(cond, Expr::Identifier("deposit".into()));
        let Stmt::Block(inner) = *body else {
            panic!("expected block");
        };
        assert!(matches!(inner[0], Stmt::If { .. }));
    }

    #[test]
    fn test_empty_block_is_allowed() {
        assert_eq!(parse_one("{ }"), Stmt::Block(vec![]));
    }

    #[test]
    fn test_empty_plan() {
        assert_eq!(parse(""), Err(SyntaxError::EmptyPlan { line: 1 }));
        assert_eq!(parse("\n\n"), Err(SyntaxError::EmptyPlan { line: 3 }));
    }

    #[test]
    fn test_leftover_tokens() {
        assert_eq!(
            parse("done\n}"),
            Err(SyntaxError::LeftoverToken {
                token: "}".into(),
                line: 2
            })
        );
    }

    #[test]
    fn test_missing_assignment() {
        assert_eq!(
            parse("t 5"),
            Err(SyntaxError::MissingAssignment {
                identifier: "t".into(),
                line: 1
            })
        );
    }

    #[test]
    fn test_reserved_target() {
        assert_eq!(
            parse("\nup = 1"),
            Err(SyntaxError::ReservedIdentifier {
                word: "up".into(),
                line: 2
            })
        );
    }

    #[test]
    fn test_invalid_direction() {
        assert_eq!(
            parse("move left"),
            Err(SyntaxError::InvalidDirection {
                token: "left".into(),
                line: 1
            })
        );
    }

    #[test]
    fn test_nearby_without_direction() {
        assert_eq!(
            parse("x = nearby 3"),
            Err(SyntaxError::InvalidInfoExpression {
                token: "3".into(),
                line: 1
            })
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(parse("+ 1"), Err(SyntaxError::UnknownCommand { .. })));
        assert!(matches!(parse("5 = 1"), Err(SyntaxError::UnknownCommand { .. })));
    }

    #[test]
    fn test_if_requires_else() {
        assert!(matches!(
            parse("if (1) then done"),
            Err(SyntaxError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            parse("x = 1 < 2"),
            Err(SyntaxError::UnexpectedCharacter { ch: '<', line: 1 })
        );
        assert_eq!(
            parse("x = <"),
            Err(SyntaxError::UnexpectedCharacter { ch: '<', line: 1 })
        );
    }

    #[test]
    fn test_number_out_of_range() {
        assert!(matches!(
            parse("x = 99999999999999999999"),
            Err(SyntaxError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unclosed_block() {
        assert!(matches!(parse("{ done"), Err(SyntaxError::UnexpectedEnd { .. })));
    }

    fn too_deep(src: &str) -> bool {
        matches!(
            parse(src),
            Err(SyntaxError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                ..
            })
        )
    }

    #[test]
    fn test_nesting_within_limit() {
        let parens = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_expr(&parens), num(1));

        let braces = format!("{}done{}", "{ ".repeat(100), " }".repeat(100));
        assert!(parse(&braces).is_ok());

        let sum = vec!["1"; 100].join(" + ");
        assert!(parse(&format!("x = {sum}")).is_ok());

        let pow = vec!["2"; 100].join(" ^ ");
        assert!(parse(&format!("x = {pow}")).is_ok());
    }

    #[test]
    fn test_deep_parentheses_rejected() {
        let src = format!("x = {}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(too_deep(&src));
    }

    #[test]
    fn test_deep_blocks_rejected() {
        let src = format!("{}done{}", "{ ".repeat(20_000), " }".repeat(20_000));
        assert!(too_deep(&src));
        let ifs = format!("{}done{}", "if (1) then ".repeat(20_000), " else done".repeat(20_000));
        assert!(too_deep(&ifs));
    }

    #[test]
    fn test_long_operator_chains_rejected() {
        let sum = vec!["1"; 200_000].join("+");
        assert!(too_deep(&format!("x = {sum}")));
        let pow = vec!["2"; 20_000].join(" ^ ");
        assert!(too_deep(&format!("x = {pow}")));
    }

    #[test]
    fn test_depth_resets_between_statements() {
        let nested = format!("{}done{}", "{ ".repeat(100), " }".repeat(100));
        let src = vec![nested.as_str(); 50].join("\n");
        assert_eq!(parse(&src).unwrap().statements.len(), 50);
    }
}
