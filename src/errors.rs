use num_bigint::BigInt;
use std::fmt;

/// Sentinel shown in the display after a failed evaluation
pub const ERROR_TEXT: &str = "Error";
/// Sentinel shown in a conversion output when the input is not a number
pub const INVALID_INPUT_TEXT: &str = "Invalid input";

/// Coarse classification of calculator errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Argument outside the valid domain of a function or operator
    Domain,
    /// Division or modulus by zero
    Arithmetic,
    /// Malformed expression text
    Syntax,
    /// Non-numeric text where a number was required
    InvalidInput,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalcError {
    StrToFloat(String),
    StrToInt(String),
    IntToFloat(BigInt),
    FloatToInt(f64),
    DividedByZero(String),
    NotFinite(String),

    NotForNegativeInt(String),
    OnlyInt(String),
    InvalidArgument(String, String),
    ArgumentOutOfRange(String, String, String),
    CombinatoricOrder(String, BigInt, BigInt),

    InvalidOp(String),
    TooManyOps,
    ClosingBracketMismatch,
    FunctionNoArgs(String),
    EmptyExpression,
    InsufficientOps,
    ParseFailed(String),

    UnknownFunction(String),
    UnknownCategory(String),
    UnknownUnit(String, String),
    InvalidInput(String),

    Unreachable,
}

impl CalcError {
    /// Returns the group the error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::DividedByZero(..) => ErrorKind::Arithmetic,

            CalcError::IntToFloat(..)
            | CalcError::FloatToInt(..)
            | CalcError::NotFinite(..)
            | CalcError::NotForNegativeInt(..)
            | CalcError::OnlyInt(..)
            | CalcError::InvalidArgument(..)
            | CalcError::ArgumentOutOfRange(..)
            | CalcError::CombinatoricOrder(..)
            | CalcError::UnknownCategory(..)
            | CalcError::UnknownUnit(..) => ErrorKind::Domain,

            CalcError::StrToFloat(..) | CalcError::StrToInt(..) | CalcError::InvalidInput(..) => {
                ErrorKind::InvalidInput
            }

            CalcError::InvalidOp(..)
            | CalcError::TooManyOps
            | CalcError::ClosingBracketMismatch
            | CalcError::FunctionNoArgs(..)
            | CalcError::EmptyExpression
            | CalcError::InsufficientOps
            | CalcError::ParseFailed(..)
            | CalcError::UnknownFunction(..)
            | CalcError::Unreachable => ErrorKind::Syntax,
        }
    }

    /// Text a display field shows instead of a result
    pub fn display_text(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidInput => INVALID_INPUT_TEXT,
            _ => ERROR_TEXT,
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::StrToFloat(s) => write!(f, "Failed to convert '{}' to float", s),
            CalcError::StrToInt(s) => write!(f, "Failed to convert '{}' to integer", s),
            CalcError::IntToFloat(i) => write!(f, "Failed to convert integer {} to float", i),
            CalcError::FloatToInt(r) => write!(f, "Failed to convert float {} to integer", r),
            CalcError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),
            CalcError::NotFinite(s) => write!(f, "Result of '{}' is not a finite number", s),

            CalcError::NotForNegativeInt(s) => write!(f, "Function '{}' is not supported for negative integers", s),
            CalcError::OnlyInt(s) => write!(f, "{} supports only integers", s),
            CalcError::InvalidArgument(func, val) => write!(f, "Invalid argument {} for function '{}'", val, func),
            CalcError::ArgumentOutOfRange(func, val, range) => {
                write!(f, "Argument {} of {} out of range({})", val, func, range)
            }
            CalcError::CombinatoricOrder(op, n, r) => {
                write!(f, "{}: r ({}) must not be greater than n ({})", op, r, n)
            }

            CalcError::InvalidOp(s) => write!(f, "Invalid operator '{}'", s),
            CalcError::TooManyOps => write!(f, "Too many operators"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::FunctionNoArgs(s) => write!(f, "Function '{}' requires an argument", s),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::InsufficientOps => write!(f, "Too many numbers"),
            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),

            CalcError::UnknownFunction(s) => write!(f, "Function '{}' not found", s),
            CalcError::UnknownCategory(s) => write!(f, "Conversion category '{}' not found", s),
            CalcError::UnknownUnit(cat, unit) => write!(f, "Unit '{}' does not belong to {}", unit, cat),
            CalcError::InvalidInput(s) => write!(f, "'{}' is not a number", s),

            CalcError::Unreachable => write!(f, "unreachable"),
        }
    }
}

impl std::error::Error for CalcError {}
