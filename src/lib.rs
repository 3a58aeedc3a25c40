#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Scicalc, the engine of a scientific calculator with custom formulas.
//!
//! This crate turns what a user types on a calculator keypad into a result:
//! the input is normalized (degree mode, `sqrt` shorthand), evaluated, and
//! formatted for display. The easiest way to use it is through the
//! [`Calculator`](struct.Calculator.html) state:
//!
//! ```
//! use scicalc::Calculator;
//!
//! let mut calculator = Calculator::new();
//! calculator.set_input("7*8");
//! assert_eq!(calculator.evaluate(), "56");
//!
//! // the calculator starts in degree mode
//! calculator.set_input("sin(90)");
//! assert_eq!(calculator.evaluate(), "1");
//! assert_eq!(calculator.history().len(), 2);
//! ```
//!
//! Custom formulas are templates over named variables. Their values are
//! substituted in parentheses, longest names first:
//!
//! ```
//! use scicalc::{Calculator, CustomFormula, Variable};
//!
//! let mut calculator = Calculator::new();
//! let m = Variable::new("m").with_unit("kg");
//! let a = Variable::new("a").with_unit("m/s^2");
//! let (m_id, a_id) = (m.id.clone(), a.id.clone());
//!
//! let formula = CustomFormula::new("Force", "m * a")
//!     .with_variable(m)
//!     .with_variable(a)
//!     .with_result_unit("N");
//! let id = calculator.save_formula(formula).unwrap();
//!
//! calculator.set_variable_value(&id, &m_id, "2");
//! calculator.set_variable_value(&id, &a_id, "9.8");
//! assert_eq!(calculator.use_formula(&id).unwrap(), "19.6");
//! assert_eq!(calculator.result_unit(), Some("N"));
//! ```
//!
//! The building blocks are also usable on their own: [`normalize`],
//! [`substitute`], [`format_result`], and the expression evaluator
//! [`eval`] / [`Expr`].
//!
//! ```
//! use std::collections::HashMap;
//! use scicalc::{eval, format_result, normalize, AngleMode};
//!
//! let expression = normalize("cos(60)", AngleMode::Degrees);
//! let value = eval(&expression, &HashMap::new()).unwrap();
//! assert_eq!(format_result(value), "0.5");
//! ```
//!
//! # Language definition
//!
//! The evaluator understands the following elements:
//!
//! - float literal values: `12.456`, `.5`, `4.5e-3`, ...;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction and
//!   negation, `*` for multiplication, `/` for division and `^` for
//!   exponentiation (right associative, `-3^2 == -9`);
//! - implicit multiplication between operands: `2pi`, `(1)(2)`;
//! - the constants `pi` and `e`;
//! - variables. Variables names are ASCII only, start by a letter or `_`, and
//!   can contain letters, digits, `_` and `.`.
//! - function call: `sin(a)`, `atan(22.0)`. The following function are
//!   accessible, with the same meaning as the corresponding `std::f64`
//!   function: `sqrt`, `cbrt`, `sin`, `cos`, `tan`, `asin`, `acos`, `atan`,
//!   `sinh`, `cosh`, `tanh`, `asinh`, `acosh`, `atanh`, `floor`, `ceil`,
//!   `abs`, `exp`, `ln`, `log2`, `log10`.
//!
//! Any other symbol is forbidden in the input.
//!
//! # Technical details
//!
//! The evaluator is an AST interpreter, and uses a Shunting-Yard algorithm
//! for parsing the expressions. It works only with `f64` data, and performs a
//! simple constant propagation to optimize the expressions.

#[macro_use]
extern crate lazy_static;

mod ast;
mod calculator;
mod config;
mod error;
mod expr;
mod format;
mod formula;
mod history;
mod lexer;
mod normalize;
mod store;
mod token;
mod util;

pub use ast::{Ast, MAX_DEPTH};
pub use calculator::{Calculator, Key};
pub use config::CalculatorConfig;
pub use error::{Error, FormulaError};
pub use expr::{eval, Expr};
pub use format::{
    format_outcome, format_result, format_with_precision, DEFAULT_PRECISION, ERROR_SENTINEL,
};
pub use formula::{substitute, substitute_with, CustomFormula, Matching, Variable};
pub use history::{History, HistoryItem};
pub use lexer::is_variable;
pub use normalize::{normalize, AngleMode, DEGREE_FACTOR};
pub use store::VariableValues;
pub use util::{is_reserved, CONSTANTS, FUNCTIONS};
