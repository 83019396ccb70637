//! Expression tree parsed from cleaned predicate-call text.

use std::fmt;

use crate::compare::Comparator;
use crate::descriptor::ProjectDescriptor;
use crate::predicate::{Keyword, Predicate};
use crate::{Error, Result};

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Or => write!(f, "||"),
        }
    }
}

/// A node of the boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Predicate(Predicate),
    BinaryOp {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Evaluate against one descriptor, short-circuiting left to right.
    pub fn evaluate(&self, descriptor: &ProjectDescriptor) -> Result<bool> {
        match self {
            Expression::Predicate(predicate) => predicate.evaluate(descriptor),
            Expression::BinaryOp { op: LogicalOp::And, left, right } => {
                Ok(left.evaluate(descriptor)? && right.evaluate(descriptor)?)
            }
            Expression::BinaryOp { op: LogicalOp::Or, left, right } => {
                Ok(left.evaluate(descriptor)? || right.evaluate(descriptor)?)
            }
        }
    }

    /// Leaves in left-to-right order.
    pub fn predicates(&self) -> Vec<&Predicate> {
        match self {
            Expression::Predicate(predicate) => vec![predicate],
            Expression::BinaryOp { left, right, .. } => {
                let mut leaves = left.predicates();
                leaves.extend(right.predicates());
                leaves
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Predicate(predicate) => write!(f, "{}", predicate),
            Expression::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

/// A compiled query. Immutable; evaluate it against as many descriptors as
/// needed, from any thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryExpression {
    normalized: String,
    predicate_calls: String,
    root: Option<Expression>,
}

impl QueryExpression {
    pub(crate) fn new(normalized: String, predicate_calls: String, root: Option<Expression>) -> Self {
        Self {
            normalized,
            predicate_calls,
            root,
        }
    }

    /// Whether the query selects anything at all. Callers should select
    /// nothing when this is false.
    pub fn contains_search(&self) -> bool {
        self.root.is_some()
    }

    /// The canonical query text.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The cleaned predicate-call text the tree was parsed from.
    pub fn predicate_calls(&self) -> &str {
        &self.predicate_calls
    }

    pub fn root(&self) -> Option<&Expression> {
        self.root.as_ref()
    }

    /// Evaluate against one descriptor. A query without a search is `false`.
    pub fn evaluate(&self, descriptor: &ProjectDescriptor) -> Result<bool> {
        match &self.root {
            Some(root) => root.evaluate(descriptor),
            None => Ok(false),
        }
    }
}

/// Evaluate `expression` against `descriptor`.
pub fn evaluate(expression: &QueryExpression, descriptor: &ProjectDescriptor) -> Result<bool> {
    expression.evaluate(descriptor)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Predicate(Predicate),
    And,
    Or,
    Open,
    Close,
    Word(String),
}

/// Parse cleaned predicate-call text. Returns `None` when the text holds no
/// predicate call.
pub(crate) fn parse_expression(calls: &str) -> Result<Option<Expression>> {
    let tokens = tokenize(calls)?;
    if !tokens.iter().any(|t| matches!(t, Token::Predicate(_))) {
        return Ok(None);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expression = parser.parse_expr()?;
    if let Some(token) = parser.peek() {
        return Err(Error::InvalidQuery(format!(
            "unexpected {} in '{}'",
            describe(token),
            calls
        )));
    }
    Ok(Some(expression))
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    loop {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            break;
        }

        if let Some((predicate, rest)) = try_parse_call(remaining)? {
            tokens.push(Token::Predicate(predicate));
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix("&&") {
            tokens.push(Token::And);
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix("||") {
            tokens.push(Token::Or);
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix('(') {
            tokens.push(Token::Open);
            remaining = rest;
        } else if let Some(rest) = remaining.strip_prefix(')') {
            tokens.push(Token::Close);
            remaining = rest;
        } else {
            let end = find_word_end(remaining);
            tokens.push(Token::Word(remaining[..end].to_string()));
            remaining = &remaining[end..];
        }
    }

    Ok(tokens)
}

/// Try to read `keyword(comparator,value)`.
fn try_parse_call(input: &str) -> Result<Option<(Predicate, &str)>> {
    let Some((keyword, after_open)) = Keyword::ALL.into_iter().find_map(|k| {
        input
            .strip_prefix(k.name())
            .and_then(|rest| rest.strip_prefix('('))
            .map(|rest| (k, rest))
    }) else {
        return Ok(None);
    };

    let Some(close) = after_open.find(')') else {
        return Err(Error::InvalidQuery(format!("unterminated {} call", keyword)));
    };
    let (arguments, rest) = (&after_open[..close], &after_open[close + 1..]);

    let Some((comparator_token, value)) = arguments.split_once(',') else {
        return Err(Error::InvalidQuery(format!(
            "{} call '{}' is missing a comparator",
            keyword, arguments
        )));
    };
    let comparator = Comparator::parse(comparator_token)
        .map_err(|_| Error::InvalidQuery(format!("unknown comparator '{}'", comparator_token)))?;

    Ok(Some((Predicate::new(keyword, comparator, value)?, rest)))
}

/// Find where a stray word ends. The tokenizer only calls this when the
/// first character is not whitespace or a parenthesis.
fn find_word_end(input: &str) -> usize {
    input
        .char_indices()
        .find(|&(_, c)| c.is_whitespace() || c == '(' || c == ')')
        .map_or(input.len(), |(i, _)| i)
}

fn describe(token: &Token) -> String {
    match token {
        Token::Predicate(p) => format!("predicate '{}'", p),
        Token::And => "'&&'".to_string(),
        Token::Or => "'||'".to_string(),
        Token::Open => "'('".to_string(),
        Token::Close => "')'".to_string(),
        Token::Word(w) => format!("word '{}'", w),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// term (op term)*, folded left.
    fn parse_expr(&mut self) -> Result<Expression> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(Token::And) => LogicalOp::And,
                Some(Token::Or) => LogicalOp::Or,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expression> {
        match self.next() {
            Some(Token::Predicate(predicate)) => Ok(Expression::Predicate(predicate)),
            Some(Token::Open) => {
                let inner = self.parse_expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    Some(token) => Err(Error::InvalidQuery(format!(
                        "expected ')' but found {}",
                        describe(&token)
                    ))),
                    None => Err(Error::InvalidQuery("unbalanced parenthesis: missing ')'".to_string())),
                }
            }
            Some(token) => Err(Error::InvalidQuery(format!(
                "expected a predicate or '(' but found {}",
                describe(&token)
            ))),
            None => Err(Error::InvalidQuery("query ends where a predicate was expected".to_string())),
        }
    }
}
