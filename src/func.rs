//! Single-argument scientific functions applied to the value in the display.
//!
//! The same functions are available inside expressions (`sin(30)`, `5!`,
//! `√16`), so every application produces a label that can be evaluated
//! again when it is replayed from history.

use num_bigint::BigInt;
use std::f64::consts;
use std::fmt;
use std::str::FromStr;

use crate::errors::*;
use crate::parse::is_plain_number;
use crate::value::*;

/// How trigonometric functions interpret their arguments and results
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleMode {
    Degrees,
    Radians,
}

impl Default for AngleMode {
    fn default() -> AngleMode {
        AngleMode::Degrees
    }
}

impl AngleMode {
    fn to_radians(self, f: f64) -> f64 {
        match self {
            AngleMode::Degrees => f.to_radians(),
            AngleMode::Radians => f,
        }
    }

    fn from_radians(self, f: f64) -> f64 {
        match self {
            AngleMode::Degrees => f.to_degrees(),
            AngleMode::Radians => f,
        }
    }
}

impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Degrees),
            "rad" | "radian" | "radians" => Ok(AngleMode::Radians),
            _ => Err(CalcError::InvalidInput(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Base 10 logarithm
    Log,
    Ln,
    Square,
    Cube,
    Sqrt,
    Cbrt,
    /// `10^x`
    Pow10,
    /// `e^x`
    Exp,
    Factorial,
    /// `1/x`
    Reciprocal,
    /// `x/100`
    Percent,
}

/// Result of applying a function to the display value
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    pub value: Value,
    /// Expression that reproduces the value, e.g. `sin(30)`
    pub label: String,
}

impl FromStr for ScientificFunction {
    type Err = CalcError;

    /// Accepts both button captions (`x²`, `√x`, `n!`) and expression names (`sqr`, `sqrt`, `fact`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = match s.trim() {
            "sin" => ScientificFunction::Sin,
            "cos" => ScientificFunction::Cos,
            "tan" => ScientificFunction::Tan,
            "asin" => ScientificFunction::Asin,
            "acos" => ScientificFunction::Acos,
            "atan" => ScientificFunction::Atan,
            "log" => ScientificFunction::Log,
            "ln" => ScientificFunction::Ln,
            "x²" | "sqr" => ScientificFunction::Square,
            "x³" | "cube" => ScientificFunction::Cube,
            "√x" | "√" | "sqrt" => ScientificFunction::Sqrt,
            "³√x" | "∛" | "cbrt" => ScientificFunction::Cbrt,
            "10^x" | "10ˣ" | "pow10" => ScientificFunction::Pow10,
            "exp" | "eˣ" | "e^x" => ScientificFunction::Exp,
            "n!" | "!" | "fact" => ScientificFunction::Factorial,
            "1/x" => ScientificFunction::Reciprocal,
            "%" => ScientificFunction::Percent,
            _ => return Err(CalcError::UnknownFunction(s.to_string())),
        };
        Ok(f)
    }
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// operands that start with a sign are wrapped in brackets for postfix
// notations: "(-3)²" and not "-3²"
fn operand(text: &str) -> String {
    if text.starts_with('-') || text.starts_with('+') {
        format!("({})", text)
    } else {
        text.to_string()
    }
}

impl ScientificFunction {
    /// Name of the function as it is written in expressions
    pub fn name(self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Asin => "asin",
            ScientificFunction::Acos => "acos",
            ScientificFunction::Atan => "atan",
            ScientificFunction::Log => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Square => "sqr",
            ScientificFunction::Cube => "cube",
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Cbrt => "cbrt",
            ScientificFunction::Pow10 => "pow10",
            ScientificFunction::Exp => "exp",
            ScientificFunction::Factorial => "fact",
            ScientificFunction::Reciprocal => "1/x",
            ScientificFunction::Percent => "%",
        }
    }

    /// Builds an expression that applies the function to `text`
    pub fn label(self, text: &str) -> String {
        match self {
            ScientificFunction::Square => format!("{}²", operand(text)),
            ScientificFunction::Cube => format!("{}³", operand(text)),
            ScientificFunction::Sqrt => format!("√{}", operand(text)),
            ScientificFunction::Cbrt => format!("∛{}", operand(text)),
            ScientificFunction::Pow10 => format!("10**{}", operand(text)),
            ScientificFunction::Factorial => format!("{}!", operand(text)),
            ScientificFunction::Reciprocal => format!("1/({})", text),
            ScientificFunction::Percent => format!("{}/100", operand(text)),
            _ => format!("{}({})", self.name(), text),
        }
    }

    /// Calculates the function for a value
    pub fn eval(self, v: Value, angle: AngleMode) -> CalcResult {
        let res = match self {
            ScientificFunction::Sin => Value::Float(angle.to_radians(v.into_raw_f64()?).sin()),
            ScientificFunction::Cos => Value::Float(angle.to_radians(v.into_raw_f64()?).cos()),
            ScientificFunction::Tan => tan(v, angle)?,
            ScientificFunction::Asin | ScientificFunction::Acos => {
                let f = v.into_raw_f64()?;
                if !(-1.0..=1.0).contains(&f) {
                    return Err(CalcError::ArgumentOutOfRange(
                        self.name().to_string(),
                        format!("{}", f),
                        "-1..1".to_string(),
                    ));
                }
                let r = if self == ScientificFunction::Asin { f.asin() } else { f.acos() };
                Value::Float(angle.from_radians(r))
            }
            ScientificFunction::Atan => Value::Float(angle.from_radians(v.into_raw_f64()?.atan())),
            ScientificFunction::Log | ScientificFunction::Ln => {
                let f = v.clone().into_raw_f64()?;
                if f <= 0.0 {
                    return Err(CalcError::InvalidArgument(self.name().to_string(), format!("{}", v)));
                }
                if self == ScientificFunction::Log {
                    Value::Float(f.log10())
                } else {
                    Value::Float(f.ln())
                }
            }
            ScientificFunction::Square => v.clone().multiply(v)?,
            ScientificFunction::Cube => v.clone().multiply(v.clone())?.multiply(v)?,
            ScientificFunction::Sqrt => v.sqrt()?,
            ScientificFunction::Cbrt => v.cbrt()?,
            ScientificFunction::Pow10 => Value::Int(BigInt::from(10)).power(v)?,
            ScientificFunction::Exp => Value::Float(v.into_raw_f64()?.exp()),
            ScientificFunction::Factorial => v.fact()?,
            ScientificFunction::Reciprocal => Value::Int(BigInt::from(1)).divide(v)?,
            ScientificFunction::Percent => v.divide(Value::Int(BigInt::from(100)))?,
        };
        if !res.is_finite() {
            return Err(CalcError::NotFinite(self.name().to_string()));
        }
        Ok(res)
    }

    /// Applies the function to a number given as text (the content of the display).
    /// Only plain decimals are accepted, so the label evaluates to the same value
    pub fn apply(self, text: &str, angle: AngleMode) -> Result<Applied, CalcError> {
        let text = text.trim();
        if !is_plain_number(text) {
            return Err(CalcError::InvalidInput(text.to_string()));
        }
        let v = Value::from_str_number(text)?;
        let value = self.eval(v, angle)?;
        Ok(Applied {
            value,
            label: self.label(text),
        })
    }
}

// tangent is undefined at odd multiples of a right angle
fn tan(v: Value, angle: AngleMode) -> CalcResult {
    let f = v.clone().into_raw_f64()?;
    let pole = match angle {
        AngleMode::Degrees => {
            let k = f / 90.0;
            k == k.trunc() && (k % 2.0).abs() == 1.0
        }
        AngleMode::Radians => {
            let half = consts::FRAC_PI_2;
            let k = (f / half).round();
            (k % 2.0).abs() == 1.0 && f64_equal(k * half, f)
        }
    };
    if pole {
        return Err(CalcError::InvalidArgument("tan".to_owned(), format!("{}", v)));
    }
    Ok(Value::Float(angle.to_radians(f).tan()))
}

/// Applies a function given by its name to the number in `text`
pub fn apply_function(name: &str, text: &str, angle: AngleMode) -> Result<Applied, CalcError> {
    let func = ScientificFunction::from_str(name)?;
    let res = func.apply(text, angle);
    tracing::debug!(func = name, arg = text, ok = res.is_ok(), "function applied");
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(v: &Value, expected: f64) -> bool {
        match v.to_f64() {
            Ok(f) => (f - expected).abs() < 1e-9,
            Err(..) => false,
        }
    }

    fn int(i: i64) -> Value {
        Value::Int(BigInt::from(i))
    }

    #[test]
    fn test_trigonometry_degrees() {
        let r = apply_function("sin", "30", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 0.5));
        assert_eq!(r.label, "sin(30)");
        let r = apply_function("cos", "60", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 0.5));
        let r = apply_function("tan", "45", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 1.0));
        let r = apply_function("asin", "0.5", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 30.0));
        let r = apply_function("atan", "1", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 45.0));
    }

    #[test]
    fn test_trigonometry_radians() {
        let r = apply_function("sin", "30", AngleMode::Radians).unwrap();
        assert!(approx(&r.value, 30.0f64.sin()));
        let r = apply_function("acos", "-1", AngleMode::Radians).unwrap();
        assert!(approx(&r.value, consts::PI));
    }

    #[test]
    fn test_inverse_domain() {
        let r = apply_function("asin", "2", AngleMode::Degrees);
        assert_eq!(r.map_err(|e| e.kind()), Err(ErrorKind::Domain));
        let r = apply_function("acos", "-1.5", AngleMode::Radians);
        assert_eq!(r.map_err(|e| e.kind()), Err(ErrorKind::Domain));
    }

    #[test]
    fn test_tan_poles() {
        let r = apply_function("tan", "90", AngleMode::Degrees);
        assert_eq!(r, Err(CalcError::InvalidArgument("tan".to_string(), "90".to_string())));
        assert!(apply_function("tan", "-270", AngleMode::Degrees).is_err());
        assert!(apply_function("tan", "180", AngleMode::Degrees).is_ok());
        assert!(apply_function("tan", "0", AngleMode::Radians).is_ok());
        let half = format!("{}", consts::FRAC_PI_2);
        assert!(apply_function("tan", &half, AngleMode::Radians).is_err());
    }

    #[test]
    fn test_logarithms() {
        let r = apply_function("log", "1000", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 3.0));
        let r = apply_function("ln", "1", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 0.0));
        assert_eq!(
            apply_function("log", "0", AngleMode::Degrees),
            Err(CalcError::InvalidArgument("log".to_string(), "0".to_string()))
        );
        assert!(apply_function("ln", "-2", AngleMode::Degrees).is_err());
    }

    #[test]
    fn test_powers_and_roots() {
        let r = apply_function("x²", "-3", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(9));
        assert_eq!(r.label, "(-3)²");
        let r = apply_function("x³", "2", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(8));
        let r = apply_function("√x", "16", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(4));
        assert_eq!(r.label, "√16");
        let r = apply_function("√x", "-16", AngleMode::Degrees);
        assert_eq!(r.map_err(|e| e.kind()), Err(ErrorKind::Domain));
        let r = apply_function("³√x", "-27", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(-3));
        let r = apply_function("10^x", "3", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(1000));
        let r = apply_function("10^x", "-1", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, 0.1));
        let r = apply_function("exp", "1", AngleMode::Degrees).unwrap();
        assert!(approx(&r.value, consts::E));
        assert_eq!(r.label, "exp(1)");
    }

    #[test]
    fn test_factorial() {
        let r = apply_function("n!", "5", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(120));
        assert_eq!(r.label, "5!");
        let r = apply_function("n!", "5.0", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, int(120));
        assert!(apply_function("n!", "5.5", AngleMode::Degrees).is_err());
        assert!(apply_function("n!", "-1", AngleMode::Degrees).is_err());
    }

    #[test]
    fn test_standard_functions() {
        let r = apply_function("1/x", "4", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, Value::Float(0.25));
        assert_eq!(r.label, "1/(4)");
        let r = apply_function("1/x", "0", AngleMode::Degrees);
        assert_eq!(r.map_err(|e| e.kind()), Err(ErrorKind::Arithmetic));
        let r = apply_function("%", "50", AngleMode::Degrees).unwrap();
        assert_eq!(r.value, Value::Float(0.5));
        assert_eq!(r.label, "50/100");
    }

    #[test]
    fn test_bad_input() {
        assert_eq!(
            apply_function("sin", "", AngleMode::Degrees),
            Err(CalcError::InvalidInput("".to_string()))
        );
        assert_eq!(
            apply_function("sin", "2+2", AngleMode::Degrees),
            Err(CalcError::InvalidInput("2+2".to_string()))
        );
        assert_eq!(
            apply_function("x²", "1e3", AngleMode::Degrees),
            Err(CalcError::InvalidInput("1e3".to_string()))
        );
        assert_eq!(
            apply_function("x²", "1_000", AngleMode::Degrees),
            Err(CalcError::InvalidInput("1_000".to_string()))
        );
        assert_eq!(
            apply_function("sinh", "1", AngleMode::Degrees),
            Err(CalcError::UnknownFunction("sinh".to_string()))
        );
        assert_eq!(
            apply_function("exp", "1000", AngleMode::Degrees),
            Err(CalcError::NotFinite("exp".to_string()))
        );
    }

    #[test]
    fn test_angle_mode_names() {
        assert_eq!("deg".parse::<AngleMode>(), Ok(AngleMode::Degrees));
        assert_eq!("Radians".parse::<AngleMode>(), Ok(AngleMode::Radians));
        assert!("grad".parse::<AngleMode>().is_err());
    }
}
