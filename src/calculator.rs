//! Application state of the calculator.
//!
//! Every change goes through a method of [`Calculator`]: keypad presses,
//! evaluation, formula management and history recall. Evaluation never fails:
//! errors show up as [`ERROR_SENTINEL`] in the result display.

use crate::config::CalculatorConfig;
use crate::error::FormulaError;
use crate::expr::eval;
use crate::format::{format_with_precision, ERROR_SENTINEL};
use crate::formula::{substitute_with, CustomFormula};
use crate::history::{History, HistoryItem};
use crate::normalize::{normalize, AngleMode};
use crate::store::VariableValues;
use crate::util::is_reserved;
use std::collections::HashMap;
use uuid::Uuid;

/// A key of the calculator keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Digits, `.`, parentheses, and the `+`, `-` and `^` operators
    Char(char),
    /// `×`
    Multiply,
    /// `÷`
    Divide,
    /// `π`
    Pi,
    /// Euler's number
    E,
    /// Square root
    Sqrt,
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Remove the last character
    Delete,
    /// Clear input and result
    Clear,
    /// Switch between degrees and radians
    ToggleAngle,
    /// Evaluate the input
    Equals,
}

impl Key {
    /// Get the key for a keypad button label
    ///
    /// # Examples
    ///
    /// ```
    /// use scicalc::Key;
    ///
    /// assert_eq!(Key::from_label("×"), Some(Key::Multiply));
    /// assert_eq!(Key::from_label("7"), Some(Key::Char('7')));
    /// assert_eq!(Key::from_label(""), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let key = match label {
            "×" => Self::Multiply,
            "÷" => Self::Divide,
            "π" => Self::Pi,
            "e" => Self::E,
            "sqrt" => Self::Sqrt,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "DEL" => Self::Delete,
            "C" => Self::Clear,
            "DEG" => Self::ToggleAngle,
            "=" => Self::Equals,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || ".()+-^".contains(c) => {
                        Self::Char(c)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Text appended to the input by the key, if any
    fn text(self) -> Option<&'static str> {
        match self {
            Self::Multiply => Some("*"),
            Self::Divide => Some("/"),
            Self::Pi => Some("pi"),
            Self::E => Some("e"),
            Self::Sqrt => Some("sqrt"),
            Self::Sin => Some("sin("),
            Self::Cos => Some("cos("),
            Self::Tan => Some("tan("),
            _ => None,
        }
    }
}

/// The calculator: input buffer, result display, history and custom formulas
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: CalculatorConfig,
    angle_mode: AngleMode,
    input: String,
    result: String,
    result_unit: Option<String>,
    history: History,
    formulas: Vec<CustomFormula>,
    values: VariableValues,
}

impl Calculator {
    /// Create a calculator with the default configuration
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    /// Create a calculator with the given configuration
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            angle_mode: config.angle_mode,
            config,
            ..Self::default()
        }
    }

    /// Restore the entered variable values, as loaded from storage
    #[must_use]
    pub fn with_values(mut self, values: VariableValues) -> Self {
        self.values = values;
        self
    }

    /// Settings the calculator was created with
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// The input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the whole input buffer
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// The result display, empty before the first calculation
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Unit of the displayed result, set by formulas
    pub fn result_unit(&self) -> Option<&str> {
        self.result_unit.as_deref()
    }

    /// Current angle mode
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Switch to the given angle mode
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        log::debug!("angle mode {} -> {}", self.angle_mode, mode);
        self.angle_mode = mode;
    }

    /// Successful calculations, oldest first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Saved custom formulas
    pub fn formulas(&self) -> &[CustomFormula] {
        &self.formulas
    }

    /// Find a saved formula by id
    pub fn formula(&self, id: &str) -> Option<&CustomFormula> {
        self.formulas.iter().find(|formula| formula.id == id)
    }

    /// Entered variable values, for persistence
    pub fn values(&self) -> &VariableValues {
        &self.values
    }

    /// Handle a keypad press
    pub fn press(&mut self, key: Key) {
        if let Some(text) = key.text() {
            self.input.push_str(text);
            return;
        }
        match key {
            Key::Char(c) => self.input.push(c),
            Key::Delete => {
                self.input.pop();
            }
            Key::Clear => {
                self.input.clear();
                self.result.clear();
                self.result_unit = None;
            }
            Key::ToggleAngle => self.set_angle_mode(self.angle_mode.toggle()),
            Key::Equals => {
                self.evaluate();
            }
            _ => {}
        }
    }

    /// Evaluate the input buffer and return the displayed result. Does nothing
    /// when the input is empty.
    pub fn evaluate(&mut self) -> &str {
        if self.input.is_empty() {
            return &self.result;
        }
        let expression = self.input.clone();
        self.calculate(expression, None)
    }

    /// Normalize, evaluate and display `expression`. Successful calculations
    /// are appended to the history.
    fn calculate(&mut self, expression: String, unit: Option<String>) -> &str {
        let normalized = normalize(&expression, self.angle_mode);
        match eval(&normalized, &HashMap::new()) {
            Ok(value) if value.is_finite() => {
                let formatted = format_with_precision(value, self.config.precision);
                self.result = formatted.clone();
                self.result_unit = unit.clone();
                self.history
                    .push(HistoryItem::new(expression, formatted, unit));
            }
            Ok(value) => {
                log::warn!("'{}' evaluated to {}", normalized, value);
                self.show_error();
            }
            Err(error) => {
                log::warn!("failed to evaluate '{}': {}", normalized, error);
                self.show_error();
            }
        }
        &self.result
    }

    fn show_error(&mut self) {
        self.result = ERROR_SENTINEL.to_owned();
        self.result_unit = None;
    }

    /// Put a history item back in the input and result displays
    pub fn recall(&mut self, index: usize) -> bool {
        match self.history.get(index).cloned() {
            Some(item) => {
                self.input = item.expression;
                self.result = item.result;
                self.result_unit = item.unit;
                true
            }
            None => false,
        }
    }

    /// Remove every history item
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Insert or update a formula, keeping its position when it already
    /// exists. Returns the id of the saved formula.
    ///
    /// Variables can not be named after a constant or function of the
    /// evaluator: substitution would rewrite those names too.
    pub fn save_formula(&mut self, mut formula: CustomFormula) -> Result<String, FormulaError> {
        if !formula.is_complete() {
            return Err(FormulaError::Incomplete);
        }
        if let Some(variable) = formula
            .variables
            .iter()
            .find(|variable| is_reserved(variable.name.trim()))
        {
            return Err(FormulaError::ReservedName(variable.name.clone()));
        }
        if formula.id.is_empty() {
            formula.id = Uuid::new_v4().to_string();
        }
        let id = formula.id.clone();

        match self.formulas.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => {
                log::info!("updating formula '{}' ({})", formula.name, id);
                *existing = formula;
            }
            None => {
                log::info!("adding formula '{}' ({})", formula.name, id);
                self.formulas.push(formula);
            }
        }
        Ok(id)
    }

    /// Delete a formula and the values entered for it
    pub fn delete_formula(&mut self, id: &str) -> bool {
        let count = self.formulas.len();
        self.formulas.retain(|formula| formula.id != id);
        self.values.remove_formula(id);
        let deleted = self.formulas.len() != count;
        if deleted {
            log::info!("deleted formula {}", id);
        }
        deleted
    }

    /// Record the text entered for a formula variable
    pub fn set_variable_value(
        &mut self,
        formula_id: &str,
        variable_id: &str,
        value: impl Into<String>,
    ) {
        self.values.set(formula_id, variable_id, value);
    }

    /// Check if every variable of the formula has a value
    pub fn can_use_formula(&self, id: &str) -> bool {
        self.formula(id)
            .map_or(false, |formula| self.values.all_filled(formula))
    }

    /// Substitute the entered values into a formula and calculate it. The
    /// substituted expression replaces the input.
    pub fn use_formula(&mut self, id: &str) -> Result<&str, FormulaError> {
        let formula = self
            .formula(id)
            .cloned()
            .ok_or_else(|| FormulaError::UnknownFormula(id.to_owned()))?;

        let no_values = HashMap::new();
        let values = self.values.values_for(id).unwrap_or(&no_values);
        let expression = substitute_with(&formula, values, self.config.matching)?;

        self.input = expression.clone();
        Ok(self.calculate(expression, formula.unit().map(str::to_owned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;
    use crate::formula::{Matching, Variable};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn radians() -> Calculator {
        Calculator::with_config(CalculatorConfig {
            angle_mode: AngleMode::Radians,
            ..CalculatorConfig::default()
        })
    }

    fn type_in(calculator: &mut Calculator, labels: &[&str]) {
        for label in labels {
            let key = Key::from_label(label).unwrap();
            calculator.press(key);
        }
    }

    /// Save a formula and enter values for its variables, by name
    fn force(calculator: &mut Calculator, m: &str, a: &str) -> String {
        let m_var = Variable::new("m").with_unit("kg");
        let a_var = Variable::new("a").with_unit("m/s^2");
        let (m_id, a_id) = (m_var.id.clone(), a_var.id.clone());
        let formula = CustomFormula::new("Force", "m * a")
            .with_variable(m_var)
            .with_variable(a_var)
            .with_result_unit("N");
        let id = calculator.save_formula(formula).unwrap();
        calculator.set_variable_value(&id, &m_id, m);
        calculator.set_variable_value(&id, &a_id, a);
        id
    }

    #[test]
    fn evaluate_appends_history() {
        init();
        let mut calculator = radians();
        type_in(&mut calculator, &["7", "×", "8", "="]);
        assert_eq!(calculator.input(), "7*8");
        assert_eq!(calculator.result(), "56");

        let item = calculator.history().last().unwrap();
        assert_eq!(item.expression, "7*8");
        assert_eq!(item.result, "56");
        assert_eq!(item.unit, None);
        assert_eq!(calculator.history().len(), 1);
    }

    #[test]
    fn degrees_by_default() {
        init();
        let mut calculator = Calculator::new();
        assert_eq!(calculator.angle_mode(), AngleMode::Degrees);
        type_in(&mut calculator, &["sin", "9", "0", ")", "="]);
        assert_eq!(calculator.result(), "1");
        // the history keeps what the user typed
        assert_eq!(calculator.history().last().unwrap().expression, "sin(90)");

        calculator.set_input("cos(0)");
        assert_eq!(calculator.evaluate(), "1");
        calculator.set_input("cos(90)");
        assert_eq!(calculator.evaluate(), "0");
    }

    #[test]
    fn toggle_angle_mode() {
        init();
        let mut calculator = Calculator::new();
        calculator.press(Key::ToggleAngle);
        assert_eq!(calculator.angle_mode(), AngleMode::Radians);
        type_in(&mut calculator, &["sin", "π", "÷", "2", ")", "="]);
        assert_eq!(calculator.input(), "sin(pi/2)");
        assert_eq!(calculator.result(), "1");
    }

    #[test]
    fn sqrt_shorthand() {
        init();
        let mut calculator = radians();
        type_in(&mut calculator, &["sqrt", "1", "6", "+", "1", "="]);
        assert_eq!(calculator.input(), "sqrt16+1");
        assert_eq!(calculator.result(), "5");
    }

    #[test]
    fn errors_are_not_recorded() {
        init();
        let mut calculator = radians();
        for input in &["7*", "(1+2", "1/0", "sqrt(-1)", "unknown+1", "7 × 8"] {
            calculator.set_input(*input);
            assert_eq!(calculator.evaluate(), ERROR_SENTINEL, "{}", input);
        }
        assert!(calculator.history().is_empty());
    }

    #[test]
    fn empty_input_does_nothing() {
        let mut calculator = radians();
        calculator.press(Key::Equals);
        assert_eq!(calculator.result(), "");
        assert!(calculator.history().is_empty());
    }

    #[test]
    fn delete_and_clear() {
        let mut calculator = radians();
        type_in(&mut calculator, &["1", "2", "DEL", "+", "3", "="]);
        assert_eq!(calculator.result(), "4");
        calculator.press(Key::Clear);
        assert_eq!(calculator.input(), "");
        assert_eq!(calculator.result(), "");
        // deleting from an empty input is harmless
        calculator.press(Key::Delete);
        assert_eq!(calculator.input(), "");
    }

    #[test]
    fn labels() {
        assert_eq!(Key::from_label("DEG"), Some(Key::ToggleAngle));
        assert_eq!(Key::from_label("("), Some(Key::Char('(')));
        assert_eq!(Key::from_label("^"), Some(Key::Char('^')));
        assert_eq!(Key::from_label("x"), None);
        assert_eq!(Key::from_label("12"), None);
    }

    #[test]
    fn use_formula() {
        init();
        let mut calculator = Calculator::new();
        let id = force(&mut calculator, "2", "9.8");
        assert!(calculator.can_use_formula(&id));

        assert_eq!(calculator.use_formula(&id).unwrap(), "19.6");
        assert_eq!(calculator.result_unit(), Some("N"));
        assert_eq!(calculator.input(), "(2) * (9.8)");

        let item = calculator.history().last().unwrap();
        assert_eq!(item.expression, "(2) * (9.8)");
        assert_eq!(item.result, "19.6");
        assert_eq!(item.unit.as_deref(), Some("N"));

        // a plain calculation has no unit
        calculator.set_input("1+1");
        calculator.evaluate();
        assert_eq!(calculator.result_unit(), None);
    }

    #[test]
    fn formulas_follow_the_angle_mode() {
        init();
        let mut calculator = Calculator::new();
        let angle = Variable::new("angle");
        let angle_id = angle.id.clone();
        let id = calculator
            .save_formula(CustomFormula::new("Sine", "sin(angle)").with_variable(angle))
            .unwrap();
        calculator.set_variable_value(&id, &angle_id, "30");
        assert_eq!(calculator.use_formula(&id).unwrap(), "0.5");
    }

    #[test]
    fn formula_needs_every_value() {
        init();
        let mut calculator = Calculator::new();
        let id = force(&mut calculator, "2", " ");
        assert!(!calculator.can_use_formula(&id));
        assert!(matches!(
            calculator.use_formula(&id),
            Err(FormulaError::MissingValue { .. })
        ));
        assert_eq!(calculator.input(), "");
        assert!(calculator.history().is_empty());

        assert!(matches!(
            calculator.use_formula("nope"),
            Err(FormulaError::UnknownFormula(_))
        ));
        assert!(!calculator.can_use_formula("nope"));
    }

    #[test]
    fn identifier_matching_from_config() {
        let mut calculator = Calculator::with_config(CalculatorConfig {
            matching: Matching::Identifier,
            ..CalculatorConfig::default()
        });
        let a = Variable::new("a");
        let a_id = a.id.clone();
        let id = calculator
            .save_formula(CustomFormula::new("Double", "a + a").with_variable(a))
            .unwrap();
        calculator.set_variable_value(&id, &a_id, "1e2");
        assert_eq!(calculator.use_formula(&id).unwrap(), "200");
    }

    #[test]
    fn save_and_delete_formulas() {
        init();
        let mut calculator = Calculator::new();
        assert!(matches!(
            calculator.save_formula(CustomFormula::new("", "1")),
            Err(FormulaError::Incomplete)
        ));
        assert!(matches!(
            calculator.save_formula(CustomFormula::new("Empty", "")),
            Err(FormulaError::Incomplete)
        ));

        let first = calculator.save_formula(CustomFormula::new("One", "1")).unwrap();
        let second = calculator.save_formula(CustomFormula::new("Two", "2")).unwrap();
        assert_ne!(first, second);

        let mut updated = calculator.formula(&first).unwrap().clone();
        updated.name = "Uno".into();
        assert_eq!(calculator.save_formula(updated).unwrap(), first);

        let names: Vec<_> = calculator.formulas().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Uno", "Two"]);

        let id = force(&mut calculator, "2", "3");
        assert!(calculator.values().values_for(&id).is_some());
        assert!(calculator.delete_formula(&id));
        assert!(calculator.values().values_for(&id).is_none());
        assert!(!calculator.delete_formula(&id));
        assert_eq!(calculator.formulas().len(), 2);
    }

    #[test]
    fn reserved_variable_names() {
        let mut calculator = Calculator::new();
        for name in &["e", "pi", "sin", "sqrt", " cos "] {
            let formula = CustomFormula::new("Reserved", "ceil(x) + 1")
                .with_variable(Variable::new("x"))
                .with_variable(Variable::new(*name));
            assert!(matches!(
                calculator.save_formula(formula),
                Err(FormulaError::ReservedName(ref reserved)) if reserved == *name
            ));
        }
        assert!(calculator.formulas().is_empty());

        let formula = CustomFormula::new("Energy", "energy * 2")
            .with_variable(Variable::new("energy"));
        assert!(calculator.save_formula(formula).is_ok());
    }

    #[test]
    fn long_inputs_do_not_overflow() {
        init();
        let mut calculator = radians();
        calculator.set_input(vec!["1"; 10_000].join("+"));
        assert_eq!(calculator.evaluate(), "10000");

        calculator.set_input(format!("{}1", "-".repeat(1000)));
        assert_eq!(calculator.evaluate(), "1");

        calculator.set_input(format!("{}2{}", "(".repeat(5000), ")".repeat(5000)));
        assert_eq!(calculator.evaluate(), "2");

        // 2^2000 overflows
        calculator.set_input(vec!["sqrt 4"; 2000].join("*"));
        assert_eq!(calculator.evaluate(), ERROR_SENTINEL);
    }

    #[test]
    fn restored_values() {
        let mut calculator = Calculator::new();
        let id = force(&mut calculator, "2", "3");
        let json = calculator.values().to_json().unwrap();

        let restored = VariableValues::from_json(&json).unwrap();
        let mut other = Calculator::new().with_values(restored);
        let formula = calculator.formula(&id).unwrap().clone();
        other.save_formula(formula).unwrap();
        assert_eq!(other.use_formula(&id).unwrap(), "6");
    }

    #[test]
    fn recall_history() {
        let mut calculator = radians();
        calculator.set_input("2^10");
        calculator.evaluate();
        calculator.press(Key::Clear);

        assert!(calculator.recall(0));
        assert_eq!(calculator.input(), "2^10");
        assert_eq!(calculator.result(), "1024");
        assert!(!calculator.recall(1));

        calculator.clear_history();
        assert!(calculator.history().is_empty());
    }
}
