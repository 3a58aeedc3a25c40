//! Rewriting of calculator input into plain evaluator syntax.
//!
//! Two rewrites are applied, in this order:
//!
//! 1. the `sqrt` shorthand: `sqrt 4` and `sqrt4` become `sqrt(4)`;
//! 2. in degree mode only, every `sin(`, `cos(` and `tan(` gets a
//!    conversion factor injected after its opening parenthesis, so that
//!    `sin(90)` is evaluated as `sin(pi/180*90)`.
//!
//! Only the opening token is rewritten, the closing parenthesis is left to the
//! evaluator. The factor therefore multiplies the whole argument.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Conversion factor injected in degree mode
pub const DEGREE_FACTOR: &str = "pi/180*";

const TRIGONOMETRIC: [&str; 3] = ["sin", "cos", "tan"];

lazy_static! {
    static ref SQRT_SHORTHAND: Regex =
        Regex::new(r"sqrt\s*(\d+(?:\.\d+)?|\([^)]+\))").expect("sqrt shorthand pattern");
}

/// Unit in which the arguments of trigonometric functions are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// Arguments are in degrees, and converted before evaluation
    Degrees,
    /// Arguments are in radians, the native unit of the evaluator
    Radians,
}

impl AngleMode {
    /// Get the other mode
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }
}

impl Default for AngleMode {
    fn default() -> Self {
        Self::Degrees
    }
}

impl Display for AngleMode {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::Degrees => write!(fmt, "DEG"),
            Self::Radians => write!(fmt, "RAD"),
        }
    }
}

/// Normalize `raw` calculator input for evaluation with the given angle mode.
///
/// Malformed input is passed through, errors only show up at evaluation.
///
/// # Examples
///
/// ```
/// use scicalc::{normalize, AngleMode};
///
/// assert_eq!(normalize("sin(90)", AngleMode::Degrees), "sin(pi/180*90)");
/// assert_eq!(normalize("sin(90)", AngleMode::Radians), "sin(90)");
/// assert_eq!(normalize("sqrt 4", AngleMode::Radians), "sqrt(4)");
/// ```
#[must_use]
pub fn normalize(raw: &str, mode: AngleMode) -> String {
    let expression = expand_sqrt(raw);
    let expression = match mode {
        AngleMode::Degrees => inject_degrees(&expression),
        AngleMode::Radians => expression,
    };
    if expression != raw {
        log::debug!("normalized '{}' to '{}' ({})", raw, expression, mode);
    }
    expression
}

/// Give an explicit parenthesized argument to `sqrt` when it is followed by
/// a bare number. Parenthesized arguments are kept as they are.
fn expand_sqrt(raw: &str) -> String {
    SQRT_SHORTHAND
        .replace_all(raw, |caps: &Captures| {
            let operand = &caps[1];
            if operand.starts_with('(') {
                format!("sqrt{}", operand)
            } else {
                format!("sqrt({})", operand)
            }
        })
        .into_owned()
}

/// Inject the degree conversion factor at the start of every trigonometric
/// call. Names embedded in a longer identifier (`asin(`) are left alone.
fn inject_degrees(expression: &str) -> String {
    let mut output = String::with_capacity(expression.len() + DEGREE_FACTOR.len());
    let mut previous: Option<char> = None;
    let mut position = 0;

    while let Some(c) = expression[position..].chars().next() {
        let rest = &expression[position..];
        let at_boundary = previous.map_or(true, |p| !(p.is_ascii_alphabetic() || p == '_'));
        let call = TRIGONOMETRIC
            .iter()
            .find(|name| rest.starts_with(*name) && rest[name.len()..].starts_with('('));

        match call {
            Some(name) if at_boundary => {
                output.push_str(name);
                output.push('(');
                output.push_str(DEGREE_FACTOR);
                position += name.len() + 1;
                previous = Some('(');
            }
            _ => {
                output.push(c);
                position += c.len_utf8();
                previous = Some(c);
            }
        }
    }
    output
}
