use pest::Parser;
use std::f64::consts::{E, PI};

use crate::errors::*;
use crate::func::AngleMode;
use crate::stack::{Stack, CUBE, CUBE_ROOT, FACTORIAL, SQUARE, SQUARE_ROOT, UNARY_MINUS};
use crate::value::*;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

// what the previous token was, to tell unary operators from binary ones
// and to insert implicit multiplication
#[derive(Default)]
struct ParseState {
    is_last_value: bool,
    is_last_func: bool,
}

/// Returns a constant value by its name
pub fn constant(name: &str) -> Option<Value> {
    match name {
        "e" => Some(Value::Float(E)),
        "pi" | "π" => Some(Value::Float(PI)),
        _ => None,
    }
}

fn operator_name(op: &str) -> &str {
    match op {
        "×" => "*",
        "÷" => "/",
        "−" => "-",
        _ => op,
    }
}

fn push_value(stk: &mut Stack, state: &mut ParseState, v: Value) -> CalcErrorResult {
    if state.is_last_func {
        stk.push("(", None)?;
    } else if state.is_last_value {
        stk.push("*", None)?;
    }
    stk.push("", Some(v))?;
    if state.is_last_func {
        stk.push(")", None)?;
    }
    state.is_last_value = true;
    state.is_last_func = false;
    Ok(())
}

/// Returns true if the text is a plain decimal number with an optional sign,
/// written the way an expression accepts it (no exponent, no separators)
pub fn is_plain_number(text: &str) -> bool {
    CalcParser::parse(Rule::display_number, text.trim()).is_ok()
}

/// evaluates a given expression and returns either result or error
pub fn eval(expr: &str, angle: AngleMode) -> CalcResult {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(e) => {
            tracing::trace!(error = %e, "expression rejected by the grammar");
            return Err(CalcError::ParseFailed("invalid expression".to_string()));
        }
    };

    let mut state = ParseState::default();
    let mut stk = Stack::new(angle);
    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str();
        tracing::trace!(?rule, token = val);
        match rule {
            Rule::number => {
                // "2 3" is a missing operator, while "2π" or "(1)(2)" multiply
                if state.is_last_value {
                    return Err(CalcError::InsufficientOps);
                }
                let v = if val.contains('.') {
                    Value::from_str_float(val)?
                } else {
                    Value::from_str_integer(val)?
                };
                push_value(&mut stk, &mut state, v)?;
            }
            Rule::constant => match constant(val) {
                Some(v) => push_value(&mut stk, &mut state, v)?,
                None => return Err(CalcError::Unreachable),
            },
            Rule::open_b => {
                if state.is_last_value {
                    stk.push("*", None)?;
                }
                stk.push("(", None)?;
                state.is_last_value = false;
                state.is_last_func = false;
            }
            Rule::close_b => {
                stk.push(")", None)?;
                state.is_last_value = true;
                state.is_last_func = false;
            }
            Rule::operator => {
                let op = operator_name(val);
                if op == "+" && !state.is_last_value {
                    // unary plus changes nothing
                } else if op == "-" && !state.is_last_value {
                    stk.push(UNARY_MINUS, None)?;
                    state.is_last_func = false;
                } else {
                    stk.push(op, None)?;
                    state.is_last_value = false;
                    state.is_last_func = false;
                }
            }
            Rule::postfix => {
                if !state.is_last_value {
                    return Err(CalcError::InvalidOp(val.to_string()));
                }
                let op = match val {
                    "!" => FACTORIAL,
                    "²" => SQUARE,
                    _ => CUBE,
                };
                stk.push(op, None)?;
            }
            Rule::root => {
                // a prefix operator: `√4!` is the root of 24
                if state.is_last_value {
                    stk.push("*", None)?;
                }
                stk.push(if val == "√" { SQUARE_ROOT } else { CUBE_ROOT }, None)?;
                state.is_last_value = false;
                state.is_last_func = false;
            }
            Rule::func => {
                if state.is_last_value {
                    stk.push("*", None)?;
                }
                stk.push(val, None)?;
                state.is_last_value = false;
                state.is_last_func = true;
            }
            Rule::EOI => {}
            _ => return Err(CalcError::Unreachable),
        }
    }
    stk.calculate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn calc(expr: &str) -> String {
        match eval(expr, AngleMode::Degrees) {
            Ok(v) => format!("{}", v),
            Err(e) => format!("{:?}", e),
        }
    }

    fn kind(expr: &str) -> Option<ErrorKind> {
        eval(expr, AngleMode::Degrees).err().map(|e| e.kind())
    }

    #[test]
    fn test_expr() {
        let v = eval("2+3", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(5))));
        let v = eval("2 + 3 * 4", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(14))));
        let v = eval("(3+2)(4-9)", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(-25))));
        let v = eval("7 ÷ 2", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Float(3.5)));
        let v = eval("6 × 7", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(42))));
        let v = eval("10 − 4", AngleMode::Degrees);
        assert_eq!(v, Ok(Value::Int(BigInt::from(6))));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(calc("2 ** 3 ** 2"), "512");
        assert_eq!(calc("-2 ** 2"), "-4");
        assert_eq!(calc("2 ** -1"), "0.5");
        assert_eq!(calc("2 * -3"), "-6");
        assert_eq!(calc("--3"), "3");
        assert_eq!(calc("+3 - +2"), "1");
        assert_eq!(calc("1 + 2 * (3 + 4) / 7"), "3");
        assert_eq!(calc("((2 + 3) * 4"), "20");
    }

    #[test]
    fn test_combinatorics() {
        assert_eq!(calc("5C2"), "10");
        assert_eq!(calc("5P2"), "20");
        assert_eq!(calc("5 C 2 + 1"), "11");
        assert_eq!(calc("2 * 5C2"), "20");
        assert_eq!(calc("5.0C2"), "10");
        assert_eq!(kind("2C5"), Some(ErrorKind::Domain));
        assert_eq!(kind("5.5C2"), Some(ErrorKind::Domain));
        assert_eq!(kind("-5C2"), Some(ErrorKind::Domain));
        // `cos`, `acos`, and `exp` are functions, not operators
        assert_eq!(calc("cos(60) + 1"), "1.5");
        assert_eq!(calc("acos(1)"), "0");
        assert_eq!(calc("exp(0)"), "1");
    }

    #[test]
    fn test_mod() {
        assert_eq!(calc("7 mod 3"), "1");
        assert_eq!(calc("5.5 mod 2"), "1.5");
        assert_eq!(calc("-7 mod 3"), "2");
        assert_eq!(calc("1 + 7 mod 3"), "2");
        assert_eq!(kind("5 mod 0"), Some(ErrorKind::Arithmetic));
        assert_eq!(kind("5 / 0"), Some(ErrorKind::Arithmetic));
        assert_eq!(kind("5 / (2 - 2)"), Some(ErrorKind::Arithmetic));
    }

    #[test]
    fn test_constants() {
        assert_eq!(calc("e"), "2.7182818285");
        assert_eq!(calc("pi"), "3.1415926536");
        assert_eq!(calc("2π"), "6.2831853072");
        assert_eq!(calc("2e"), "5.4365636569");
        assert_eq!(calc("e ** 0"), "1");
    }

    #[test]
    fn test_functions() {
        assert_eq!(calc("sin(30)"), "0.5");
        assert_eq!(calc("sin 30 + 1"), "1.5");
        assert_eq!(calc("2sin(30)"), "1");
        assert_eq!(calc("√16 + 1"), "5");
        assert_eq!(calc("∛-27"), "-3");
        assert_eq!(calc("√4!"), "4.8989794856");
        assert_eq!(calc("√(3+1)!"), "4.8989794856");
        assert_eq!(calc("2√9"), "6");
        assert_eq!(calc("√√16"), "2");
        assert_eq!(calc("sqrt(4)!"), "2");
        assert_eq!(calc("5!"), "120");
        assert_eq!(calc("3! + (3 + 2)!"), "126");
        assert_eq!(calc("3²"), "9");
        assert_eq!(calc("(-3)²"), "9");
        assert_eq!(calc("-3²"), "-9");
        assert_eq!(calc("2³"), "8");
        assert_eq!(calc("log(1000)"), "3");
        assert_eq!(calc("ln(e)"), "1");
        assert_eq!(calc("10**2"), "100");
        assert_eq!(calc("1/(4)"), "0.25");
        assert_eq!(calc("sqrt(2)"), "1.4142135624");

        let v = eval("sin(pi/6)", AngleMode::Radians).map(|v| format!("{}", v));
        assert_eq!(v, Ok("0.5".to_string()));
        assert_eq!(kind("asin(2)"), Some(ErrorKind::Domain));
        assert_eq!(kind("√(0-4)"), Some(ErrorKind::Domain));
        assert_eq!(kind("log(0)"), Some(ErrorKind::Domain));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(kind(""), Some(ErrorKind::Syntax));
        assert_eq!(kind("2 +* 2"), Some(ErrorKind::Syntax));
        assert_eq!(kind("2 + 3)"), Some(ErrorKind::Syntax));
        assert_eq!(kind("2 3"), Some(ErrorKind::Syntax));
        assert_eq!(kind("hello"), Some(ErrorKind::Syntax));
        assert_eq!(kind("2 ^ 3"), Some(ErrorKind::Syntax));
        assert_eq!(kind("!5"), Some(ErrorKind::Syntax));
        assert_eq!(kind("sin"), Some(ErrorKind::Syntax));
        assert_eq!(kind("__import__('os')"), Some(ErrorKind::Syntax));
    }

    #[test]
    fn test_plain_number() {
        assert!(is_plain_number("12"));
        assert!(is_plain_number(" -0.25 "));
        assert!(is_plain_number("+.5"));
        assert!(is_plain_number("12."));
        assert!(!is_plain_number(""));
        assert!(!is_plain_number("1e3"));
        assert!(!is_plain_number("1_000"));
        assert!(!is_plain_number("2 + 2"));
        assert!(!is_plain_number("--3"));
        assert!(!is_plain_number("pi"));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(kind("10.0 ** 400"), Some(ErrorKind::Domain));
        assert_eq!(calc("2 ** 100"), "1267650600228229401496703205376");
        assert_eq!(kind("(9**4096)**4096"), Some(ErrorKind::Domain));
        assert_eq!(kind("0 ** -1"), Some(ErrorKind::Arithmetic));
    }
}
