use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::f64::EPSILON;
use std::fmt;

use crate::errors::*;
use crate::format::format_f64;

/// Result of a calculation: a number or the reason it failed
pub type CalcResult = Result<Value, CalcError>;
pub(crate) type CalcErrorResult = Result<(), CalcError>;

// an integer power is exact only while the result stays under this many bits
// (about 79k decimal digits); larger ones are computed with floats
const MAX_EXACT_BITS: u64 = 1 << 18;
// the same for factorial: 20000! has ~77k digits
const MAX_FACTORIAL: u32 = 20_000;

/// Supported value types
#[derive(Clone)]
pub enum Value {
    /// Big integer number, stays exact through `+ - * ** !`, nCr, and nPr
    Int(BigInt),
    /// Float number
    Float(f64),
}

pub(crate) fn f64_equal(f1: f64, f2: f64) -> bool {
    (f1 - f2).abs() <= EPSILON
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, "{}", i),
            Value::Float(ref g) => write!(f, "{}", format_f64(*g)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, "Int({:?})", i),
            Value::Float(ref g) => write!(f, "Float({:?})", g),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, &other) {
            (Value::Int(ref i1), Value::Int(ref i2)) => i1 == i2,
            (Value::Float(ref f1), Value::Float(ref f2)) => f1 == f2,
            (_, _) => false,
        }
    }
}

fn int_to_f64(i: &BigInt) -> Result<f64, CalcError> {
    match i.to_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(CalcError::IntToFloat(i.clone())),
    }
}

fn f64_to_int(f: f64) -> Result<BigInt, CalcError> {
    if let Some(i) = BigInt::from_f64(f) {
        Ok(i)
    } else {
        Err(CalcError::FloatToInt(f))
    }
}

// Python-like remainder: the result has the sign of the divisor
fn floor_rem_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn floor_rem_int(a: &BigInt, b: &BigInt) -> BigInt {
    let r = a % b;
    if !r.is_zero() && (r.sign() == Sign::Minus) != (b.sign() == Sign::Minus) {
        r + b
    } else {
        r
    }
}

macro_rules! basic_op {
    ($id:ident, $op:tt) => {
        pub fn $id(self, rhs: Value) -> CalcResult {
            match (&self, &rhs) {
                (Value::Float(..), ..) | (.., Value::Float(..)) => {
                    let f1 = self.into_raw_f64()?;
                    let f2 = rhs.into_raw_f64()?;
                    Ok(Value::Float(f1 $op f2))
                },
                _ => {
                    let i1 = self.into_raw_big_int()?;
                    let i2 = rhs.into_raw_big_int()?;
                    Ok(Value::Int(i1 $op i2))
                },
            }
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Int(BigInt::zero())
    }
}

impl Value {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn into_raw_f64(self) -> Result<f64, CalcError> {
        match self {
            Value::Int(i) => int_to_f64(&i),
            Value::Float(f) => Ok(f),
        }
    }

    // floats are truncated
    pub(crate) fn into_raw_big_int(self) -> Result<BigInt, CalcError> {
        match self {
            Value::Int(i) => Ok(i),
            Value::Float(f) => f64_to_int(f.trunc()),
        }
    }

    // unlike into_raw_big_int, refuses floats with a fractional part
    pub(crate) fn into_exact_int(self, fname: &str) -> Result<BigInt, CalcError> {
        match self {
            Value::Int(i) => Ok(i),
            Value::Float(f) => {
                if f.is_finite() && f == f.trunc() {
                    f64_to_int(f)
                } else {
                    Err(CalcError::OnlyInt(fname.to_string()))
                }
            }
        }
    }

    /// Returns the value as a float
    pub fn to_f64(&self) -> Result<f64, CalcError> {
        self.clone().into_raw_f64()
    }

    /// Converts &str to big integer number. Only decimal digits with
    /// optional sign are accepted
    pub fn from_str_integer(s: &str) -> CalcResult {
        match s.trim().parse::<BigInt>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(..) => Err(CalcError::StrToInt(s.to_owned())),
        }
    }

    /// Converts &str to float number. Exponents (`1.02e-5`) are accepted
    pub fn from_str_float(s: &str) -> CalcResult {
        match s.trim().parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(..) => Err(CalcError::StrToFloat(s.to_owned())),
        }
    }

    /// Converts the text of a display to a number: integers stay exact,
    /// anything else must be a finite float
    pub fn from_str_number(s: &str) -> CalcResult {
        let t = s.trim();
        if t.is_empty() {
            return Err(CalcError::InvalidInput(s.to_owned()));
        }
        if let Ok(v) = Value::from_str_integer(t) {
            return Ok(v);
        }
        match Value::from_str_float(t) {
            Ok(Value::Float(f)) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(CalcError::InvalidInput(s.to_owned())),
        }
    }

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_zero(),
            Value::Float(ref f) => *f == 0.0,
        }
    }

    /// Returns true if the value is less than zero
    pub fn is_negative(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_negative(),
            Value::Float(ref f) => *f < 0.0,
        }
    }

    /// Returns true if the value is a finite number
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Int(..) => true,
            Value::Float(ref f) => f.is_finite(),
        }
    }

    basic_op!(addition, +);
    basic_op!(subtract, -);
    basic_op!(multiply, *);

    /// Divides two numbers. Two integers produce an integer only if
    /// the division is exact
    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        match (&self, &rhs) {
            (Value::Int(i1), Value::Int(i2)) => {
                if (i1 % i2).is_zero() {
                    return Ok(Value::Int(i1 / i2));
                }
                let f1 = int_to_f64(i1)?;
                let f2 = int_to_f64(i2)?;
                Ok(Value::Float(f1 / f2))
            }
            _ => {
                let f2 = rhs.into_raw_f64()?;
                let f1 = self.into_raw_f64()?;
                Ok(Value::Float(f1 / f2))
            }
        }
    }

    /// Remainder of division. The result takes the sign of the divisor:
    /// `-7 mod 3` = `2`
    pub fn reminder(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        match (&self, &rhs) {
            (Value::Int(i1), Value::Int(i2)) => Ok(Value::Int(floor_rem_int(i1, i2))),
            _ => {
                let f2 = rhs.into_raw_f64()?;
                let f1 = self.into_raw_f64()?;
                Ok(Value::Float(floor_rem_f64(f1, f2)))
            }
        }
    }

    /// Inverts the sign of the value
    pub fn negate(self) -> CalcResult {
        match self {
            Value::Int(i) => Ok(Value::Int(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
        }
    }

    /// Returns square root of a number. Negative numbers are rejected
    pub fn sqrt(self) -> CalcResult {
        if self.is_negative() {
            return Err(CalcError::InvalidArgument("sqrt".to_owned(), format!("{}", self)));
        }
        match &self {
            Value::Float(f) => Ok(Value::Float(f.sqrt())),
            Value::Int(i) => {
                let sq = i.sqrt();
                if &sq * &sq == *i {
                    Ok(Value::Int(sq))
                } else {
                    let f = int_to_f64(i)?;
                    Ok(Value::Float(f.sqrt()))
                }
            }
        }
    }

    /// Returns cubic root of a number. Negative numbers have a real root
    pub fn cbrt(self) -> CalcResult {
        match &self {
            Value::Float(f) => Ok(Value::Float(f.cbrt())),
            Value::Int(i) => {
                let cb = i.cbrt();
                if &cb * &cb * &cb == *i {
                    return Ok(Value::Int(cb));
                }
                let f = int_to_f64(i)?;
                Ok(Value::Float(f.cbrt()))
            }
        }
    }

    fn fast_power(self, pow: u32) -> CalcResult {
        let mut pow = pow;
        let mut res = Value::Int(BigInt::one());
        let mut base = self;
        while pow > 0 {
            if pow % 2 == 0 {
                pow /= 2;
                base = base.clone().multiply(base)?;
            } else {
                pow -= 1;
                res = res.multiply(base.clone())?;
            }
        }
        Ok(res)
    }

    /// Raises a number into arbitrary power.
    /// Non-negative integer powers of integers are calculated exactly,
    /// the rest is calculated with floats
    pub fn power(self, rhs: Value) -> CalcResult {
        if self.is_zero() && rhs.is_negative() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        if let (Value::Int(i), Value::Int(p)) = (&self, &rhs) {
            if !p.is_negative() {
                if let Some(p) = p.to_u32() {
                    if i.bits().saturating_mul(u64::from(p)) <= MAX_EXACT_BITS {
                        return self.fast_power(p);
                    }
                }
            }
        }
        let f1 = self.into_raw_f64()?;
        let f2 = rhs.into_raw_f64()?;
        Ok(Value::Float(f1.powf(f2)))
    }

    /// Returns factorial of a number.
    /// Only non-negative integers are supported (floats without fractional part are
    /// treated as integers)
    pub fn fact(self) -> CalcResult {
        let i = self.into_exact_int("factorial")?;
        if i.is_negative() {
            return Err(CalcError::NotForNegativeInt("factorial".to_owned()));
        }
        let n = match i.to_u32() {
            Some(n) if n <= MAX_FACTORIAL => n,
            _ => {
                return Err(CalcError::ArgumentOutOfRange(
                    "factorial".to_string(),
                    format!("{}", i),
                    format!("0..{}", MAX_FACTORIAL),
                ))
            }
        };
        Ok(Value::Int(falling_product(n, n)))
    }

    fn combinatoric_args(self, rhs: Value, op: &str) -> Result<(u32, u32), CalcError> {
        let n = self.into_exact_int(op)?;
        let r = rhs.into_exact_int(op)?;
        if n.is_negative() || r.is_negative() {
            return Err(CalcError::NotForNegativeInt(op.to_owned()));
        }
        if r > n {
            return Err(CalcError::CombinatoricOrder(op.to_owned(), n, r));
        }
        match n.to_u32() {
            Some(nn) if nn <= MAX_FACTORIAL => {
                // r <= n, so it fits as well
                let rr = r.to_u32().unwrap_or(nn);
                Ok((nn, rr))
            }
            _ => Err(CalcError::ArgumentOutOfRange(
                op.to_string(),
                format!("{}", n),
                format!("0..{}", MAX_FACTORIAL),
            )),
        }
    }

    /// Number of combinations: `n! / (r! * (n-r)!)`
    pub fn combinations(self, rhs: Value) -> CalcResult {
        let (n, r) = self.combinatoric_args(rhs, "nCr")?;
        let r = r.min(n - r);
        // every intermediate value is itself a binomial coefficient,
        // so the division is always exact
        let mut res = BigInt::one();
        for i in 1..=r {
            res *= BigInt::from(n - r + i);
            res /= BigInt::from(i);
        }
        Ok(Value::Int(res))
    }

    /// Number of permutations: `n! / (n-r)!`
    pub fn permutations(self, rhs: Value) -> CalcResult {
        let (n, r) = self.combinatoric_args(rhs, "nPr")?;
        Ok(Value::Int(falling_product(n, r)))
    }
}

// n * (n-1) * ... * (n-k+1)
fn falling_product(n: u32, k: u32) -> BigInt {
    let mut res = BigInt::one();
    for i in (n - k + 1)..=n {
        res *= BigInt::from(i);
    }
    res
}
