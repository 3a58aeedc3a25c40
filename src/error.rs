use thiserror::Error;

/// Error type for parsing and evaluating expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Error while parsing an expression
    #[error("ParseError: {0}")]
    ParseError(String),
    /// Unknown variable during evaluation
    #[error("NameError: {0}")]
    NameError(String),
}

/// Error type for custom formula operations
#[derive(Debug, Error)]
pub enum FormulaError {
    /// A variable of the formula has no entered value, or only whitespace
    #[error("formula '{formula}' is missing a value for variable '{variable}'")]
    MissingValue {
        /// Name of the formula
        formula: String,
        /// Name of the variable without a value
        variable: String,
    },
    /// The formula has no name or no expression and can not be saved
    #[error("formula needs both a name and an expression")]
    Incomplete,
    /// A variable is named after an evaluator constant or function
    #[error("variable name '{0}' is reserved by the evaluator")]
    ReservedName(String),
    /// No formula with this id exists
    #[error("no formula with id '{0}'")]
    UnknownFormula(String),
    /// A variable name could not be compiled into a literal pattern
    #[error("invalid variable name pattern: {0}")]
    Pattern(#[from] regex::Error),
}
