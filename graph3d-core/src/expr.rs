/// Bundled polynomial expression evaluator
///
/// Parses single-variable polynomials such as `x^3`, `2*x^2 - 3*x + 1`, or
/// `3/2*x^2`, evaluates them by Horner's rule, and differentiates by the
/// power rule. This is a demo evaluator behind the [`CurveEvaluator`] trait
/// boundary, not a computer algebra system.
use std::fmt;

use nom::{
    branch::alt,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt},
    multi::many0,
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};

use crate::curve::{CurveEvaluator, EvalError};

/// A polynomial in one variable; `coeffs[i]` is the coefficient of `x^i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

struct Term {
    coeff: f64,
    power: u32,
}

impl Polynomial {
    pub fn from_coeffs(mut coeffs: Vec<f64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Self { coeffs }
    }

    pub fn parse(expr: &str) -> Result<Self, EvalError> {
        match all_consuming(polynomial)(expr) {
            Ok((_, poly)) => Ok(poly),
            Err(_) => Err(EvalError::Parse(expr.to_string())),
        }
    }

    /// Evaluates at `x` by Horner's rule.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Power-rule derivative.
    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Self::from_coeffs(coeffs)
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (power, &coeff) in self.coeffs.iter().enumerate().rev() {
            if coeff == 0.0 && !(first && power == 0) {
                continue;
            }
            let magnitude = coeff.abs();
            if first {
                if coeff < 0.0 {
                    write!(f, "-")?;
                }
                first = false;
            } else if coeff < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            match power {
                0 => write!(f, "{magnitude}")?,
                _ if magnitude == 1.0 => write!(f, "x")?,
                _ => write!(f, "{magnitude}*x")?,
            }
            if power > 1 {
                write!(f, "^{power}")?;
            }
        }
        Ok(())
    }
}

/// Evaluator over plain polynomial expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyEvaluator;

impl CurveEvaluator for PolyEvaluator {
    fn evaluate(&self, expr: &str, x: f64) -> Result<f64, EvalError> {
        Ok(Polynomial::parse(expr)?.eval(x))
    }

    fn derivative(&self, expr: &str) -> Result<String, EvalError> {
        Ok(Polynomial::parse(expr)?.derivative().to_string())
    }
}

fn uint(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

/// `x`, optionally raised to an unsigned power: `x`, `x^3`.
fn x_part(input: &str) -> IResult<&str, u32> {
    let (input, _) = char('x')(input)?;
    let (input, power) = opt(preceded(char('^'), uint))(input)?;
    Ok((input, power.unwrap_or(1)))
}

/// A numeric coefficient, optionally a fraction: `2`, `1.5`, `3/2`.
fn coefficient(input: &str) -> IResult<&str, f64> {
    let (input, numerator) = double(input)?;
    let (input, denominator) = opt(preceded(
        preceded(multispace0, char('/')),
        preceded(multispace0, double),
    ))(input)?;
    Ok((
        input,
        match denominator {
            Some(d) => numerator / d,
            None => numerator,
        },
    ))
}

/// One term: `2*x^3`, `3x`, `x^2`, `x`, or a bare constant.
fn term(input: &str) -> IResult<&str, Term> {
    let (input, _) = multispace0(input)?;
    let (input, coeff) = opt(coefficient)(input)?;
    match coeff {
        Some(coeff) => {
            let (input, power) = opt(preceded(
                opt(preceded(multispace0, char('*'))),
                preceded(multispace0, x_part),
            ))(input)?;
            Ok((
                input,
                Term {
                    coeff,
                    power: power.unwrap_or(0),
                },
            ))
        }
        None => {
            let (input, power) = x_part(input)?;
            Ok((input, Term { coeff: 1.0, power }))
        }
    }
}

/// `+` or `-` between terms (or leading), returned as a factor.
fn sign(input: &str) -> IResult<&str, f64> {
    let (input, _) = multispace0(input)?;
    let (input, c) = alt((char('+'), char('-')))(input)?;
    Ok((input, if c == '-' { -1.0 } else { 1.0 }))
}

fn polynomial(input: &str) -> IResult<&str, Polynomial> {
    let (input, leading) = opt(sign)(input)?;
    let (input, first) = term(input)?;
    let (input, rest) = many0(tuple((sign, term)))(input)?;
    let (input, _) = multispace0(input)?;

    let mut terms = vec![Term {
        coeff: leading.unwrap_or(1.0) * first.coeff,
        power: first.power,
    }];
    terms.extend(rest.into_iter().map(|(s, t)| Term {
        coeff: s * t.coeff,
        power: t.power,
    }));

    let top = terms.iter().map(|t| t.power as usize).max().unwrap_or(0);
    let mut coeffs = vec![0.0; top + 1];
    for t in terms {
        coeffs[t.power as usize] += t.coeff;
    }
    Ok((input, Polynomial::from_coeffs(coeffs)))
}
