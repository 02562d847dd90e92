//! `@expr(...)@` evaluation — a narrow boolean expression escape hatch.
//!
//! The grammar is deliberately tiny: comparisons between the name `value`
//! (the actual scalar under test) and a literal, composed with `and` / `or`
//! (`&&` / `||` also accepted). This is not an expression-language
//! interpreter; anything beyond a comparison chain is rejected.
//!
//! ```text
//! expr       := conjunction (("or" | "||") conjunction)*
//! conjunction := comparison (("and" | "&&") comparison)*
//! comparison := operand op operand
//! operand    := "value" | number | 'string' | "string" | true | false | null
//! op         := == | != | < | <= | > | >=
//! ```
//!
//! An ill-formed expression is reported as a match failure by the caller,
//! not a panic and not a fatal error.

use crate::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// The name `value`, referring to the actual value under test.
    Actual,
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Op(CmpOp),
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Actual,
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Debug)]
enum Expr {
    Cmp(Operand, CmpOp, Operand),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Evaluate an expression against the actual scalar value.
///
/// # Errors
///
/// Returns a human-readable message when the expression is ill-formed or
/// the actual value is not a scalar.
pub(crate) fn evaluate(expr: &str, actual: &Value) -> Result<bool, String> {
    if actual.is_collection() {
        return Err(format!(
            "expression applied to non-scalar value of type {}",
            actual.type_name()
        ));
    }
    let tokens = tokenize(expr)?;
    let ast = Parser::new(tokens).parse()?;
    Ok(eval(&ast, actual))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tokenizer
// ═══════════════════════════════════════════════════════════════════════════════

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '\'' | '"' => {
                let quote = c;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, ch)) if ch == quote => break,
                        Some((_, ch)) => s.push(ch),
                        None => return Err(format!("unterminated string at offset {i}")),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '=' | '!' | '<' | '>' => {
                chars.next();
                let eq = chars.peek().map(|&(_, n)| n) == Some('=');
                if eq {
                    chars.next();
                }
                let op = match (c, eq) {
                    ('=', true) => CmpOp::Eq,
                    ('!', true) => CmpOp::Ne,
                    ('<', true) => CmpOp::Le,
                    ('>', true) => CmpOp::Ge,
                    ('<', false) => CmpOp::Lt,
                    ('>', false) => CmpOp::Gt,
                    _ => return Err(format!("unexpected character {c:?} at offset {i}")),
                };
                tokens.push(Token::Op(op));
            }
            '&' | '|' => {
                chars.next();
                if chars.peek().map(|&(_, n)| n) != Some(c) {
                    return Err(format!("unexpected character {c:?} at offset {i}"));
                }
                chars.next();
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut s = String::new();
                s.push(c);
                chars.next();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_ascii_digit() || n == '.' {
                        s.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let num = s
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number {s:?}"))?;
                tokens.push(Token::Num(num));
            }
            c if c.is_ascii_alphabetic() => {
                let mut s = String::new();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        s.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match s.as_str() {
                    "value" => tokens.push(Token::Actual),
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    "true" => tokens.push(Token::Bool(true)),
                    "false" => tokens.push(Token::Bool(false)),
                    "null" => tokens.push(Token::Null),
                    other => return Err(format!("unknown name {other:?}")),
                }
            }
            other => return Err(format!("unexpected character {other:?} at offset {i}")),
        }
    }

    Ok(tokens)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Parser
// ═══════════════════════════════════════════════════════════════════════════════

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Result<Expr, String> {
        let expr = self.parse_or()?;
        if self.pos < self.tokens.len() {
            return Err(format!("trailing tokens after expression (at token {})", self.pos));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_comparison()?;
        while self.eat(&Token::And) {
            let right = self.parse_comparison()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, String> {
        let left = self.parse_operand()?;
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => return Err(format!("expected comparison operator, got {other:?}")),
        };
        let right = self.parse_operand()?;
        Ok(Expr::Cmp(left, op, right))
    }

    fn parse_operand(&mut self) -> Result<Operand, String> {
        match self.next() {
            Some(Token::Actual) => Ok(Operand::Actual),
            Some(Token::Num(n)) => Ok(Operand::Num(n)),
            Some(Token::Str(s)) => Ok(Operand::Str(s)),
            Some(Token::Bool(b)) => Ok(Operand::Bool(b)),
            Some(Token::Null) => Ok(Operand::Null),
            other => Err(format!("expected operand, got {other:?}")),
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved operand: either a literal from the expression or the actual
/// value, viewed through the same lens.
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
}

fn resolve(operand: &Operand, actual: &Value) -> Resolved {
    match operand {
        Operand::Actual => match actual {
            Value::Integer(i) => Resolved::Num(*i as f64),
            Value::Double(d) => Resolved::Num(*d),
            Value::String(s) => Resolved::Str(s.clone()),
            Value::Bool(b) => Resolved::Bool(*b),
            // Collections are rejected before evaluation starts.
            Value::Null | Value::Sequence(_) | Value::Map(_) => Resolved::Null,
        },
        Operand::Num(n) => Resolved::Num(*n),
        Operand::Str(s) => Resolved::Str(s.clone()),
        Operand::Bool(b) => Resolved::Bool(*b),
        Operand::Null => Resolved::Null,
    }
}

fn eval(expr: &Expr, actual: &Value) -> bool {
    match expr {
        Expr::Cmp(left, op, right) => compare(&resolve(left, actual), *op, &resolve(right, actual)),
        Expr::And(a, b) => eval(a, actual) && eval(b, actual),
        Expr::Or(a, b) => eval(a, actual) || eval(b, actual),
    }
}

/// Type-mismatched comparisons are simply `false` (`!=` is `true`), never
/// an error: `@expr(value > 10)@` against a string is a mismatch, not a
/// broken fixture.
fn compare(left: &Resolved, op: CmpOp, right: &Resolved) -> bool {
    use std::cmp::Ordering;

    let ordering = match (left, right) {
        (Resolved::Num(a), Resolved::Num(b)) => a.partial_cmp(b),
        (Resolved::Str(a), Resolved::Str(b)) => Some(a.cmp(b)),
        (Resolved::Bool(a), Resolved::Bool(b)) => {
            if a == b {
                Some(Ordering::Equal)
            } else {
                None
            }
        }
        (Resolved::Null, Resolved::Null) => Some(Ordering::Equal),
        _ => None,
    };

    match op {
        CmpOp::Eq => ordering == Some(Ordering::Equal),
        CmpOp::Ne => ordering != Some(Ordering::Equal),
        CmpOp::Lt => ordering == Some(Ordering::Less),
        CmpOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        CmpOp::Gt => ordering == Some(Ordering::Greater),
        CmpOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
    }
}
