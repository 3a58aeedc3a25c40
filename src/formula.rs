//! User-defined formulas and their variable substitution.
//!
//! A [`CustomFormula`] is an expression template whose free identifiers are
//! the names of its [`Variable`]s. Using a formula replaces every variable
//! name with the entered value wrapped in parentheses, giving a plain
//! expression that still has to go through [`normalize`](crate::normalize)
//! before evaluation.
//!
//! Names are replaced longest first, so that with variables `a` and `ab` the
//! template `ab+a` becomes `(10)+(1)` and not `(1)b+(1)`.
//!
//! # Matching
//!
//! With [`Matching::Substring`] a name is replaced anywhere it appears,
//! including inside longer identifiers (`a` in `cat`) and inside values
//! substituted by an earlier pass (`e` in `(1e5)`). [`Matching::Identifier`]
//! only replaces whole identifier tokens.

use crate::error::{Error, FormulaError};
use crate::expr::Expr;
use crate::lexer::{is_variable, is_variable_part, is_variable_start, number_length};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A named input of a custom formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Unique id, stable when the variable is renamed or reordered
    pub id: String,
    /// Name used in the formula template
    pub name: String,
    /// Unused at definition time, the entered values live in
    /// [`VariableValues`](crate::VariableValues)
    #[serde(default)]
    pub value: String,
    /// Display-only unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Variable {
    /// Create a variable with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            value: String::new(),
            unit: None,
        }
    }

    /// Set the display unit
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Label for display, `name (unit)` when a unit is set
    pub fn label(&self) -> String {
        match non_empty(&self.unit) {
            Some(unit) => format!("{} ({})", self.name, unit),
            None => self.name.clone(),
        }
    }
}

/// A named expression template with declared variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFormula {
    /// Unique id, empty until the formula is first saved
    pub id: String,
    /// Display name
    pub name: String,
    /// Template expression referencing variable names
    pub formula: String,
    /// Declared variables, in display order
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Display-only unit of the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_unit: Option<String>,
}

impl CustomFormula {
    /// Create a formula without variables. The id is assigned on save.
    pub fn new(name: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            formula: formula.into(),
            variables: Vec::new(),
            result_unit: None,
        }
    }

    /// Declare one more variable
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Set the unit of the result
    #[must_use]
    pub fn with_result_unit(mut self, unit: impl Into<String>) -> Self {
        self.result_unit = Some(unit.into());
        self
    }

    /// Find a declared variable by name
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    /// The unit of the result, if set and not blank
    pub fn unit(&self) -> Option<&str> {
        non_empty(&self.result_unit)
    }

    /// A formula can only be saved with a name and a template
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.formula.is_empty()
    }

    /// Identifiers of the template that are neither declared variables nor
    /// reserved by the evaluator. They would fail at evaluation.
    ///
    /// # Examples
    ///
    /// ```
    /// use scicalc::{CustomFormula, Variable};
    ///
    /// let formula = CustomFormula::new("Weight", "m * g")
    ///     .with_variable(Variable::new("m"));
    /// assert_eq!(formula.undeclared_identifiers().unwrap(), vec!["g"]);
    /// ```
    pub fn undeclared_identifiers(&self) -> Result<Vec<String>, Error> {
        let expr = Expr::parse(&self.formula)?;
        let mut undeclared: Vec<String> = expr
            .variables()
            .into_iter()
            .filter(|name| self.variable(name).is_none())
            .map(str::to_owned)
            .collect();
        undeclared.sort();
        Ok(undeclared)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// How variable names are found in a formula template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// Replace every occurrence of the name, even inside a longer identifier
    Substring,
    /// Replace only whole identifiers. Names that are not valid identifiers
    /// fall back to substring replacement.
    Identifier,
}

impl Default for Matching {
    fn default() -> Self {
        Self::Substring
    }
}

/// Substitute the entered `values` (variable id -> value) into `formula`,
/// matching names as substrings.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use scicalc::{substitute, CustomFormula, Variable};
///
/// let a = Variable::new("a");
/// let ab = Variable::new("ab");
/// let mut values = HashMap::new();
/// values.insert(a.id.clone(), "1".to_string());
/// values.insert(ab.id.clone(), "10".to_string());
///
/// let formula = CustomFormula::new("Sum", "ab+a").with_variable(a).with_variable(ab);
/// assert_eq!(substitute(&formula, &values).unwrap(), "(10)+(1)");
/// ```
pub fn substitute(
    formula: &CustomFormula,
    values: &HashMap<String, String>,
) -> Result<String, FormulaError> {
    substitute_with(formula, values, Matching::Substring)
}

/// Substitute the entered `values` (variable id -> value) into `formula`.
///
/// Every variable needs a non-blank value, checked before anything is
/// replaced. Values are trimmed and wrapped in parentheses.
pub fn substitute_with(
    formula: &CustomFormula,
    values: &HashMap<String, String>,
    matching: Matching,
) -> Result<String, FormulaError> {
    let mut bindings = Vec::with_capacity(formula.variables.len());
    for variable in &formula.variables {
        let value = values
            .get(&variable.id)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| FormulaError::MissingValue {
                formula: formula.name.clone(),
                variable: variable.name.clone(),
            })?;
        bindings.push((variable.name.as_str(), value));
    }

    // stable, so names of equal length keep their declaration order
    bindings.sort_by_key(|(name, _)| Reverse(name.chars().count()));

    let mut expression = formula.formula.clone();
    for (name, value) in bindings {
        // an empty pattern would match between every character
        if name.is_empty() {
            continue;
        }
        let replacement = format!("({})", value);
        expression = match matching {
            Matching::Identifier if is_variable(name) => {
                replace_identifier(&expression, name, &replacement)
            }
            _ => replace_literal(&expression, name, &replacement)?,
        };
    }

    log::debug!(
        "substituted formula '{}': '{}' -> '{}'",
        formula.name,
        formula.formula,
        expression
    );
    Ok(expression)
}

/// Replace every occurrence of `name`, taken literally
fn replace_literal(haystack: &str, name: &str, replacement: &str) -> Result<String, regex::Error> {
    let pattern = Regex::new(&regex::escape(name))?;
    Ok(pattern
        .replace_all(haystack, NoExpand(replacement))
        .into_owned())
}

/// Replace the identifier tokens equal to `name`. Numbers are skipped as a
/// whole, so the exponent of `1e5` is never taken for `e`.
fn replace_identifier(haystack: &str, name: &str, replacement: &str) -> String {
    let mut output = String::with_capacity(haystack.len());
    let mut position = 0;

    while let Some(c) = haystack[position..].chars().next() {
        let rest = &haystack[position..];
        let length = if c.is_ascii_digit() || c == '.' {
            number_length(rest).max(1)
        } else if is_variable_start(c) {
            rest.find(|c| !is_variable_part(c))
                .unwrap_or_else(|| rest.len())
        } else {
            c.len_utf8()
        };

        let piece = &rest[..length];
        output.push_str(if piece == name { replacement } else { piece });
        position += length;
    }
    output
}
