//! # Scientific calculator core
//!
//! Evaluates calculator expressions, applies scientific functions to the
//! number in the display, converts values between units, and keeps the
//! history of calculations. Nothing here draws anything: a UI owns a
//! [`Session`] (or calls the free functions below) and shows the texts it
//! returns.
//!
//! Numbers are either exact big integers or floats. Integers stay exact
//! while possible: `2 ** 100`, `25!`, and `100 C 50` are computed without
//! rounding. A float operand turns the result into a float, and a division
//! produces an integer only when it is exact: `6 / 3` -> `2`, `7 / 2` -> `3.5`.
//!
//! Operators (starting from highest priority):
//! * `!`, `²`, `³` - factorial, square, and cube after a number or closing bracket
//! * `**` - power, right-associative
//! * `-`, `+`, `√`, `∛` - unary minus and plus, square and cube roots
//! * `C`, `P` - combinations and permutations
//! * `*`, `/`, `mod` (and `×`, `÷`) - multiplication, division, modulus
//! * `+`, `-` (and `−`) - addition and subtraction
//!
//! Functions: sin, cos, tan, asin, acos, atan, log, ln, sqr, sqrt, cube, cbrt,
//! pow10, exp, fact. Trigonometric functions work with degrees or radians
//! depending on [`AngleMode`].
//!
//! Predefined constants: `pi` (or `π`) and `e`.
//!
//! A value next to a bracket, a constant, or a function is multiplied:
//! `2(3+4)` is `14`, `2π` is `6.28...`. A missing closing bracket at the end
//! of an expression is added automatically.
//!
//! Results are rendered with at most 10 fractional digits and without
//! trailing zeros; see [`format()`].

#[macro_use]
extern crate pest_derive;

pub mod convert;
pub mod errors;
pub mod format;
pub mod func;
pub mod history;
pub mod parse;
pub mod session;
mod stack;
pub mod value;

pub use crate::convert::{convert, convert_display, Category};
pub use crate::errors::{CalcError, ErrorKind, ERROR_TEXT, INVALID_INPUT_TEXT};
pub use crate::func::{apply_function, AngleMode, Applied, ScientificFunction};
pub use crate::history::{CalcMode, History, HistoryEntry};
pub use crate::session::{Session, Theme};
pub use crate::value::{CalcResult, Value};

/// Evaluates an expression
///
/// Example:
///
/// ```
/// use scicalc::{evaluate, AngleMode};
///
/// let v = evaluate("2 + 3 * 4", AngleMode::Degrees).unwrap();
/// assert_eq!(v.to_string(), "14");
/// let v = evaluate("sin(30) + 5C2", AngleMode::Degrees).unwrap();
/// assert_eq!(v.to_string(), "10.5");
/// assert!(evaluate("5 / 0", AngleMode::Degrees).is_err());
/// ```
pub fn evaluate(text: &str, angle: AngleMode) -> CalcResult {
    let res = parse::eval(text, angle);
    match &res {
        Ok(v) => tracing::debug!(expr = text, result = %v, "expression evaluated"),
        Err(e) => tracing::debug!(expr = text, error = %e, "expression failed"),
    }
    res
}

/// Renders a number the way the display shows it
pub fn format(value: f64) -> String {
    format::format_f64(value)
}
