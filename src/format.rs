use crate::error::Error;

/// Text shown in place of a result when the evaluation failed
pub const ERROR_SENTINEL: &str = "Error";

/// Number of decimal places kept for non-integer results
pub const DEFAULT_PRECISION: usize = 8;

/// Magnitude from which results are written in exponent form, `1e+21`
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Format an evaluated value for display, with the default precision.
///
/// # Examples
///
/// ```
/// use scicalc::format_result;
///
/// assert_eq!(format_result(4.0), "4");
/// assert_eq!(format_result(0.1 + 0.2), "0.3");
/// assert_eq!(format_result(f64::NAN), "Error");
/// ```
#[must_use]
pub fn format_result(value: f64) -> String {
    format_with_precision(value, DEFAULT_PRECISION)
}

/// Format an evaluated value for display.
///
/// Integers are rendered without a decimal point, and magnitudes from `1e21`
/// in exponent form. Other values are rounded to `precision` decimal places,
/// then trailing zeros are dropped. Non-finite values give [`ERROR_SENTINEL`].
#[must_use]
pub fn format_with_precision(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return ERROR_SENTINEL.to_owned();
    }
    // -0 and values that round to -0 display as 0
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        return format!("{}", value);
    }

    let rounded: f64 = match format!("{:.*}", precision, value).parse() {
        Ok(rounded) => rounded,
        Err(_) => return ERROR_SENTINEL.to_owned(),
    };
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{}", rounded)
    }
}

/// Shortest exponent form with an explicit sign: `1.5e+300`
fn exponent_form(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.find('e') {
        Some(index) if !formatted[index + 1..].starts_with('-') => {
            format!("{}e+{}", &formatted[..index], &formatted[index + 1..])
        }
        _ => formatted,
    }
}

/// Format the outcome of an evaluation, mapping any error to
/// [`ERROR_SENTINEL`]
#[must_use]
pub fn format_outcome(outcome: &Result<f64, Error>) -> String {
    match outcome {
        Ok(value) => format_result(*value),
        Err(error) => {
            log::warn!("evaluation failed: {}", error);
            ERROR_SENTINEL.to_owned()
        }
    }
}
