//! A small template evaluator for tests.
//!
//! Supports the subset of the template language the wait core's tests need:
//!
//! - `@path.to.value` looks a value up in the context; unknown roots are left
//!   as literal text
//! - `@(expr)` evaluates an expression with string and integer literals,
//!   `&` concatenation, `+ - * /`, parentheses and dotted lookups
//! - `@@` is a literal `@`
//!
//! A failing expression contributes nothing to the output and its error is
//! recorded; the rest of the template is still evaluated.

use crate::run::{Evaluated, TemplateEvaluator};
use serde_json::Value;
use std::fmt;

/// Evaluator for `@`-templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniTemplates;

impl MiniTemplates {
    /// Create an evaluator.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEvaluator for MiniTemplates {
    fn evaluate(&self, template: &str, context: &Value) -> Evaluated {
        let chars: Vec<char> = template.chars().collect();
        let mut out = Evaluated::default();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            if ch != '@' {
                out.text.push(ch);
                i += 1;
                continue;
            }

            match chars.get(i + 1) {
                Some('@') => {
                    out.text.push('@');
                    i += 2;
                }
                Some('(') => {
                    let Some(close) = matching_paren(&chars, i + 1) else {
                        out.errors
                            .push(format!("unclosed expression: {}", collect(&chars[i..])));
                        break;
                    };
                    let source = collect(&chars[i + 2..close]);
                    match evaluate_expression(&source, context) {
                        Ok(value) => out.text.push_str(&value.to_text()),
                        Err(e) => out
                            .errors
                            .push(format!("error evaluating @({source}): {e}")),
                    }
                    i = close + 1;
                }
                Some(c) if is_ident_start(*c) => {
                    let mut end = i + 1;
                    while end < chars.len() && (is_ident_char(chars[end]) || chars[end] == '.') {
                        end += 1;
                    }
                    while chars[end - 1] == '.' {
                        end -= 1;
                    }
                    let path = collect(&chars[i + 1..end]);
                    match lookup(context, &path) {
                        Ok(value) => out.text.push_str(&value.to_text()),
                        Err(_) if !has_root(context, &path) => {
                            out.text.push('@');
                            out.text.push_str(&path);
                        }
                        Err(e) => out.errors.push(format!("error evaluating @{path}: {e}")),
                    }
                    i = end;
                }
                _ => {
                    out.text.push('@');
                    i += 1;
                }
            }
        }

        out
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
enum Val {
    Text(String),
    Int(i64),
    Json(Value),
}

impl Val {
    fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Json(Value::Null) => String::new(),
            Self::Json(Value::String(s)) => s.clone(),
            Self::Json(other) => other.to_string(),
        }
    }

    fn to_int(&self) -> Result<i64, EvalError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Json(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| EvalError(format!("{n} is not an integer"))),
            other => {
                let text = other.to_text();
                text.trim()
                    .parse()
                    .map_err(|_| EvalError(format!("unable to convert \"{text}\" to a number")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct EvalError(String);

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Int(i64),
    Path(String),
    Op(char),
    Open,
    Close,
}

fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '"' => {
                let mut text = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(EvalError("unterminated string literal".to_string())),
                        Some('"') => break,
                        Some('\\') if i + 1 < chars.len() => {
                            text.push(chars[i + 1]);
                            i += 2;
                        }
                        Some(c) => {
                            text.push(*c);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Text(text));
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let digits = collect(&chars[start..i]);
                let n = digits
                    .parse()
                    .map_err(|_| EvalError(format!("{digits} is out of range")))?;
                tokens.push(Token::Int(n));
            }
            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == '.') {
                    i += 1;
                }
                tokens.push(Token::Path(collect(&chars[start..i])));
            }
            '&' | '+' | '-' | '*' | '/' => {
                tokens.push(Token::Op(ch));
                i += 1;
            }
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            other => return Err(EvalError(format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

/// Recursive-descent evaluation over a token stream.
struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    context: &'a Value,
}

impl Parser<'_> {
    fn peek_op(&self) -> Option<char> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn concat(&mut self) -> Result<Val, EvalError> {
        let mut left = self.additive()?;
        while self.peek_op() == Some('&') {
            self.pos += 1;
            let right = self.additive()?;
            left = Val::Text(left.to_text() + &right.to_text());
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Val, EvalError> {
        let mut left = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            let right = self.term()?;
            let (a, b) = (left.to_int()?, right.to_int()?);
            let sum = if op == '+' {
                a.checked_add(b)
            } else {
                a.checked_sub(b)
            };
            left = Val::Int(sum.ok_or_else(overflow)?);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Val, EvalError> {
        let mut left = self.unary()?;
        while let Some(op @ ('*' | '/')) = self.peek_op() {
            self.pos += 1;
            let right = self.unary()?;
            let (a, b) = (left.to_int()?, right.to_int()?);
            let product = if op == '*' {
                a.checked_mul(b)
            } else if b == 0 {
                return Err(EvalError("division by zero".to_string()));
            } else {
                a.checked_div(b)
            };
            left = Val::Int(product.ok_or_else(overflow)?);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Val, EvalError> {
        if self.peek_op() == Some('-') {
            self.pos += 1;
            let value = self.unary()?.to_int()?;
            return value.checked_neg().map(Val::Int).ok_or_else(overflow);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Val, EvalError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| EvalError("unexpected end of expression".to_string()))?;
        self.pos += 1;

        match token {
            Token::Text(s) => Ok(Val::Text(s)),
            Token::Int(n) => Ok(Val::Int(n)),
            Token::Path(path) => lookup(self.context, &path),
            Token::Open => {
                let value = self.concat()?;
                match self.tokens.get(self.pos) {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(EvalError("expected ')'".to_string())),
                }
            }
            Token::Op(op) => Err(EvalError(format!("unexpected operator '{op}'"))),
            Token::Close => Err(EvalError("unexpected ')'".to_string())),
        }
    }
}

fn overflow() -> EvalError {
    EvalError("integer overflow".to_string())
}

fn evaluate_expression(source: &str, context: &Value) -> Result<Val, EvalError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(EvalError("empty expression".to_string()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        context,
    };
    let value = parser.concat()?;
    if parser.pos != parser.tokens.len() {
        return Err(EvalError("unexpected trailing input".to_string()));
    }
    Ok(value)
}

fn lookup(context: &Value, path: &str) -> Result<Val, EvalError> {
    let mut current = context;
    for key in path.split('.') {
        current = current
            .get(key)
            .ok_or_else(|| EvalError(format!("unknown property '{path}'")))?;
    }
    Ok(Val::Json(current.clone()))
}

fn has_root(context: &Value, path: &str) -> bool {
    path.split('.')
        .next()
        .is_some_and(|root| context.get(root).is_some())
}

/// Index of the `)` closing the `(` at `open`, skipping string literals.
fn matching_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0;
    let mut in_string = false;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' if in_string => i += 1,
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}
