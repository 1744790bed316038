/// Curve import boundary: sampling an external expression evaluator into
/// drawable objects, plus the derivative chain
use thiserror::Error;

use crate::geometry::{LabelAlign, Object, Point};

/// Failures from the external evaluator. Sampling recovers locally with a
/// sentinel value; parse failures of the whole expression propagate.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("failed to parse expression `{0}`")]
    Parse(String),
    #[error("could not evaluate `{expr}` at x = {x}")]
    Eval { expr: String, x: f64 },
}

/// The opaque symbolic/numeric evaluator. `derivative` returns the
/// derivative as a new expression string; its internal algebra is out of
/// scope here.
pub trait CurveEvaluator {
    fn evaluate(&self, expr: &str, x: f64) -> Result<f64, EvalError>;
    fn derivative(&self, expr: &str) -> Result<String, EvalError>;
}

/// Inclusive sampling range along X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SampleRange {
    fn default() -> Self {
        Self {
            min: -2.1,
            max: 2.1,
            step: 0.05,
        }
    }
}

/// Name given to the plotted equation object.
pub const GRAPH_NAME: &str = "Equation";

/// Samples `expr` over `range` into a drawable curve object. A failure at
/// any sample substitutes the sentinel `y = -1` and marks the whole curve:
/// it is drawn red instead of blue. Partial success is not supported.
pub fn build_graph(eval: &dyn CurveEvaluator, expr: &str, range: SampleRange) -> Object {
    let pretty = format!("y = {}", pretty_math(expr));
    let (points, errored) = sample(eval, expr, range, &format!(" Equation: {pretty} "));
    Object {
        color: if errored { "red" } else { "blue" }.to_string(),
        points,
        name: GRAPH_NAME.to_string(),
        equation: Some(pretty),
        ..Object::default()
    }
}

/// Differentiates and samples repeatedly until the sampled derivative is a
/// straight line, producing at least one derivative object. Each curve is
/// named by its order ("1st order derivative", ...), colored by
/// [`derivative_color`], or red if any of its samples failed.
pub fn build_derivatives(
    eval: &dyn CurveEvaluator,
    expr: &str,
    range: SampleRange,
) -> Result<Vec<Object>, EvalError> {
    let mut objects = Vec::new();
    let mut current = expr.to_string();
    let mut order = 1u32;
    loop {
        let deriv = eval.derivative(&current)?;
        let pretty = format!("y = {}", pretty_math(&deriv));
        let label = format!(" {} order derivative: {pretty} ", ordinal(order));
        let (points, errored) = sample(eval, &deriv, range, &label);
        let straight = is_straight_line(&points, range.step);
        objects.push(Object {
            color: if errored {
                "red".to_string()
            } else {
                derivative_color(order).to_string()
            },
            points,
            name: format!("{} order derivative", ordinal(order)),
            equation: Some(pretty),
            ..Object::default()
        });
        if straight {
            return Ok(objects);
        }
        current = deriv;
        order += 1;
    }
}

/// Samples one expression; the first point carries the legend label,
/// right-aligned. Returns the points and whether any sample failed.
fn sample(
    eval: &dyn CurveEvaluator,
    expr: &str,
    range: SampleRange,
    label: &str,
) -> (Vec<Point>, bool) {
    let mut points = Vec::new();
    let mut errored = false;
    let mut x = range.min;
    while x <= range.max {
        let y = match eval.evaluate(expr, x) {
            Ok(y) => y,
            Err(e) => {
                log::warn!("sample of `{expr}` failed at x = {x:.2}: {e}");
                errored = true;
                -1.0 // Sentinel; the whole curve is flagged via its colour.
            }
        };
        let mut p = Point::new(x, y, 0.0);
        if points.is_empty() {
            p.label = Some(label.to_string());
            p.align = LabelAlign::Right;
        }
        points.push(p);
        x += range.step;
    }
    (points, errored)
}

/// Numeric straight-line check: successive rise-over-run slopes, with values
/// rounded to four decimals to absorb sampling noise, must all agree.
fn is_straight_line(points: &[Point], step: f64) -> bool {
    let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
    let mut reference = None;
    let mut prev = None;
    for p in points {
        let y = round4(p.y);
        if let Some(prev_y) = prev {
            let slope = round4((y - prev_y) / step);
            match reference {
                None => reference = Some(slope),
                Some(r) if r != slope => return false,
                _ => {}
            }
        }
        prev = Some(y);
    }
    true
}

/// Pretty formatting of maths strings: `x^3` becomes `x³`.
pub fn pretty_math(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' && chars.peek().map_or(false, char::is_ascii_digit) {
            while let Some(sup) = chars.peek().and_then(|&d| superscript(d)) {
                out.push(sup);
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn superscript(d: char) -> Option<char> {
    Some(match d {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        _ => return None,
    })
}

/// `1st`, `2nd`, `3rd`, `4th`, ...
pub fn ordinal(n: u32) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{n}th"),
    }
}

/// Legend colour for the nth derivative.
pub fn derivative_color(n: u32) -> &'static str {
    match n {
        1 => "green",
        2 => "darkgoldenrod",
        3 => "chocolate",
        _ => "black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::PolyEvaluator;
    use approx::assert_relative_eq;

    struct FailingEvaluator;

    impl CurveEvaluator for FailingEvaluator {
        fn evaluate(&self, expr: &str, x: f64) -> Result<f64, EvalError> {
            Err(EvalError::Eval {
                expr: expr.to_string(),
                x,
            })
        }

        fn derivative(&self, expr: &str) -> Result<String, EvalError> {
            Ok(expr.to_string())
        }
    }

    #[test]
    fn graph_of_cubic() {
        let graph = build_graph(&PolyEvaluator, "x^3", SampleRange::default());
        assert_eq!(graph.name, "Equation");
        assert_eq!(graph.color, "blue");
        assert_eq!(graph.equation.as_deref(), Some("y = x³"));

        let first = &graph.points[0];
        assert_eq!(first.label.as_deref(), Some(" Equation: y = x³ "));
        assert_eq!(first.align, LabelAlign::Right);
        assert_relative_eq!(first.x, -2.1);
        assert_relative_eq!(first.y, -9.261, epsilon = 1e-9);
        assert!(graph.points.len() >= 84);
    }

    #[test]
    fn failed_samples_flag_whole_curve() {
        let graph = build_graph(&FailingEvaluator, "x^3", SampleRange::default());
        assert_eq!(graph.color, "red");
        assert!(graph.points.iter().all(|p| p.y == -1.0));
    }

    #[test]
    fn derivative_chain_stops_at_straight_line() {
        let derivs = build_derivatives(&PolyEvaluator, "x^3", SampleRange::default()).unwrap();
        assert_eq!(derivs.len(), 2);
        assert_eq!(derivs[0].name, "1st order derivative");
        assert_eq!(derivs[0].color, "green");
        assert_eq!(derivs[0].equation.as_deref(), Some("y = 3*x²"));
        assert_eq!(derivs[1].name, "2nd order derivative");
        assert_eq!(derivs[1].color, "darkgoldenrod");
        assert_eq!(derivs[1].equation.as_deref(), Some("y = 6*x"));
    }

    #[test]
    fn quartic_produces_three_derivatives() {
        let derivs = build_derivatives(&PolyEvaluator, "x^4", SampleRange::default()).unwrap();
        let colors: Vec<_> = derivs.iter().map(|o| o.color.as_str()).collect();
        assert_eq!(colors, ["green", "darkgoldenrod", "chocolate"]);
    }

    #[test]
    fn constant_still_gets_one_derivative() {
        let derivs = build_derivatives(&PolyEvaluator, "5", SampleRange::default()).unwrap();
        assert_eq!(derivs.len(), 1);
        assert!(derivs[0].points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn unparseable_expression_propagates() {
        let err = build_derivatives(&PolyEvaluator, "sin(x)", SampleRange::default()).unwrap_err();
        assert_eq!(err, EvalError::Parse("sin(x)".to_string()));
    }

    #[test]
    fn straight_line_detection() {
        let line: Vec<Point> = (0..20).map(|i| Point::new(i as f64, 6.0 * i as f64, 0.0)).collect();
        assert!(is_straight_line(&line, 1.0));

        let curve: Vec<Point> = (0..20).map(|i| Point::new(i as f64, (i * i) as f64, 0.0)).collect();
        assert!(!is_straight_line(&curve, 1.0));
    }

    #[test]
    fn pretty_math_superscripts() {
        assert_eq!(pretty_math("x^3"), "x³");
        assert_eq!(pretty_math("2*x^12 - 3"), "2*x¹² - 3");
        assert_eq!(pretty_math("x"), "x");
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
    }
}
