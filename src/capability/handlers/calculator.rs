//! Arithmetic parsing and evaluation for the `calculate` capability
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr  = term (("+" | "-") term)*
//! term  = unary (("*" | "/" | "%") unary)*
//! unary = ("-" | "+") unary | power
//! power = atom ("^" unary)?
//! atom  = number | "(" expr ")"
//! ```

use async_trait::async_trait;
use nom::branch::alt;
use nom::character::complete::{char, digit1, multispace0, one_of};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use serde_json::json;

use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Op {
    fn from_symbol(c: char) -> Self {
        match c {
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mul,
            '/' => Op::Div,
            '%' => Op::Rem,
            _ => Op::Pow,
        }
    }
}

/// Parsed arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Bin(Op, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self) -> Result<f64, String> {
        let value = match self {
            Expr::Num(n) => *n,
            Expr::Neg(e) => -e.eval()?,
            Expr::Bin(op, lhs, rhs) => {
                let (a, b) = (lhs.eval()?, rhs.eval()?);
                match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                    Op::Div | Op::Rem if b == 0.0 => return Err("division by zero".into()),
                    Op::Div => a / b,
                    Op::Rem => a % b,
                    Op::Pow => a.powf(b),
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err("result is not a finite number".into())
        }
    }
}

type PResult<'a, O> = IResult<&'a str, O>;

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn number(i: &str) -> PResult<'_, Expr> {
    map_res(
        ws(recognize(pair(digit1, opt(pair(char('.'), digit1))))),
        |s: &str| s.parse::<f64>().map(Expr::Num),
    )
    .parse(i)
}

fn parens(i: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), expr, ws(char(')'))).parse(i)
}

fn atom(i: &str) -> PResult<'_, Expr> {
    alt((number, parens)).parse(i)
}

fn power(i: &str) -> PResult<'_, Expr> {
    let (i, base) = atom(i)?;
    let (i, exponent) = opt(preceded(ws(char('^')), unary)).parse(i)?;
    let expr = match exponent {
        Some(e) => Expr::Bin(Op::Pow, Box::new(base), Box::new(e)),
        None => base,
    };
    Ok((i, expr))
}

fn unary(i: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |e| Expr::Neg(Box::new(e))),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(i)
}

fn fold(first: Expr, rest: Vec<(char, Expr)>) -> Expr {
    rest.into_iter().fold(first, |acc, (symbol, rhs)| {
        Expr::Bin(Op::from_symbol(symbol), Box::new(acc), Box::new(rhs))
    })
}

fn term(i: &str) -> PResult<'_, Expr> {
    let (i, first) = unary(i)?;
    let (i, rest) = many0(pair(ws(one_of("*/%")), unary)).parse(i)?;
    Ok((i, fold(first, rest)))
}

fn expr(i: &str) -> PResult<'_, Expr> {
    let (i, first) = term(i)?;
    let (i, rest) = many0(pair(ws(one_of("+-")), term)).parse(i)?;
    Ok((i, fold(first, rest)))
}

/// Spelled-out operators, longest first so "multiplied by" wins over "by"
const OPERATOR_WORDS: &[(&str, &str)] = &[
    ("to the power of", "^"),
    ("multiplied by", "*"),
    ("divided by", "/"),
    ("plus", "+"),
    ("minus", "-"),
    ("times", "*"),
    ("mod", "%"),
    ("زائد", "+"),
    ("ناقص", "-"),
    ("مضروب في", "*"),
    ("ضرب", "*"),
    ("تقسيم", "/"),
    ("مقسوم على", "/"),
    ("مقسوم علي", "/"),
    ("على", "/"),
    ("علي", "/"),
    ("أس", "^"),
    ("اس", "^"),
];

/// Rewrite spoken and typographic operators into the parser's symbols
pub fn normalize_expression(text: &str) -> String {
    let mut s: String = text
        .chars()
        .map(|c| match c {
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            '×' | 'x' | 'X' => '*',
            '÷' => '/',
            '٫' => '.',
            _ => c,
        })
        .collect();
    for (word, symbol) in OPERATOR_WORDS {
        s = s.replace(word, symbol);
    }
    s.trim().trim_end_matches(['?', '؟', '=']).trim().to_string()
}

/// Longest expression accepted, in characters
pub const MAX_EXPRESSION_LEN: usize = 256;

/// Deepest grouping accepted: open parentheses plus chained signs and exponents
pub const MAX_NESTING: usize = 32;

/// Upper bound on the parser's recursion for `s`
fn nesting_depth(s: &str) -> usize {
    let (mut parens, mut deepest, mut chained) = (0usize, 0usize, 0usize);
    let mut previous = '(';
    for c in s.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => {
                parens += 1;
                deepest = deepest.max(parens);
            }
            ')' => parens = parens.saturating_sub(1),
            '^' => chained += 1,
            // A sign right after an operator or "(" is unary
            '-' | '+' if matches!(previous, '(' | '+' | '-' | '*' | '/' | '%' | '^') => chained += 1,
            _ => {}
        }
        previous = c;
    }
    deepest + chained
}

pub fn parse_expression(text: &str) -> Result<Expr, String> {
    let normalized = normalize_expression(text);
    if normalized.is_empty() {
        return Err("empty expression".into());
    }
    if normalized.chars().count() > MAX_EXPRESSION_LEN {
        return Err("expression is too long".into());
    }
    if nesting_depth(&normalized) > MAX_NESTING {
        return Err("expression is nested too deeply".into());
    }
    let parsed = all_consuming(expr)
        .parse(normalized.as_str())
        .map(|(_, e)| e)
        .map_err(|_| format!("cannot parse expression: {}", text));
    parsed
}

/// True when the text is an arithmetic expression with at least one operator
pub fn looks_arithmetic(text: &str) -> bool {
    matches!(parse_expression(text), Ok(e) if !matches!(e, Expr::Num(_)))
}

pub fn evaluate(text: &str) -> Result<f64, String> {
    parse_expression(text)?.eval()
}

/// Render without a trailing ".0" for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.10}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub struct CalculatorHandler;

#[async_trait]
impl CapabilityHandler for CalculatorHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let expression = input.str_param("expression")?;
        let value = evaluate(expression).map_err(HandlerError::Failed)?;
        let rendered = format_number(value);
        Ok(HandlerOutput::new(format!("{} = {}", expression.trim(), rendered))
            .with_output("result", json!(value))
            .with_output("display", json!(rendered)))
    }
}
