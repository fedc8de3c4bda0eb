use std::str::FromStr;

use crate::errors::*;
use crate::func::{AngleMode, ScientificFunction};
use crate::value::*;

use lazy_static::lazy_static;

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    Val(Value),
    Op(String, i32, bool),
    OpenB,
    Func(String),
}

pub(crate) struct Stack {
    pending: Vec<Entry>,
    output: Vec<Entry>,
    values: Vec<Value>,
    angle: AngleMode,
}

const PRI_IMMEDIATE: i32 = 99;
const PRI_POWER: i32 = 17;
const PRI_PREFIX: i32 = 14;
const PRI_COMBINATORIC: i32 = 13;
const PRI_MULT: i32 = 12;
const PRI_ADD: i32 = 8;
pub(crate) const FACTORIAL: &str = "!!!";
pub(crate) const SQUARE: &str = "²";
pub(crate) const CUBE: &str = "³";
pub(crate) const UNARY_MINUS: &str = "---";
pub(crate) const SQUARE_ROOT: &str = "√";
pub(crate) const CUBE_ROOT: &str = "∛";

lazy_static! {
    pub(crate) static ref STD_FUNCS: Vec<&'static str> = [
        "sin",
        "cos",
        "tan",
        "asin",
        "acos",
        "atan",
        "log",
        "ln",
        "sqr",
        "sqrt",
        "cube",
        "cbrt",
        "pow10",
        "exp",
        "fact",
    ]
    .to_vec();
}

impl Stack {
    fn priority(op: &str) -> (i32, bool) {
        match op {
            FACTORIAL | SQUARE | CUBE => (PRI_IMMEDIATE, false),
            "**" => (PRI_POWER, true),
            UNARY_MINUS | SQUARE_ROOT | CUBE_ROOT => (PRI_PREFIX, true),
            "C" | "P" => (PRI_COMBINATORIC, false),
            "*" | "/" | "mod" => (PRI_MULT, false),
            "+" | "-" => (PRI_ADD, false),
            _ => (0, false),
        }
    }

    pub(crate) fn is_func(&self, s: &str) -> bool {
        STD_FUNCS.iter().any(|fname| *fname == s)
    }

    // output the pending operators that bind at least as tight as the next one
    fn pop_stronger(&mut self, priority: i32) {
        while let Some(e) = self.pending.pop() {
            match &e {
                Entry::OpenB => {
                    self.pending.push(e);
                    return;
                }
                Entry::Func(..) => {
                    self.output.push(e);
                }
                Entry::Op(_, p, right) => {
                    if *p > priority || (*p == priority && !*right) {
                        self.output.push(e);
                    } else {
                        self.pending.push(e);
                        return;
                    }
                }
                Entry::Val(..) => return, // unreachable
            }
        }
    }

    // closes the innermost group
    fn pop_group(&mut self) -> CalcErrorResult {
        loop {
            let e = match self.pending.pop() {
                Some(e) => e,
                None => return Err(CalcError::ClosingBracketMismatch),
            };
            match &e {
                Entry::Val(..) | Entry::Op(..) | Entry::Func(..) => self.output.push(e),
                Entry::OpenB => return Ok(()),
            }
        }
    }

    // a postfix operator applies to the result of the functions waiting for it
    fn pop_pending_funcs(&mut self) {
        while let Some(e) = self.pending.pop() {
            match &e {
                Entry::Func(..) => self.output.push(e),
                _ => {
                    self.pending.push(e);
                    return;
                }
            }
        }
    }

    // flushes everything at the end of the expression
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(e) = self.pending.pop() {
            match &e {
                Entry::OpenB => {} // an unclosed group ends with the expression
                Entry::Op(..) | Entry::Func(..) => self.output.push(e),
                Entry::Val(..) => return Err(CalcError::Unreachable),
            }
        }
        Ok(())
    }

    fn pop_value(&mut self) -> CalcResult {
        self.values.pop().ok_or(CalcError::TooManyOps)
    }

    pub(crate) fn new(angle: AngleMode) -> Self {
        Stack {
            pending: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
            angle,
        }
    }

    pub(crate) fn push(&mut self, op: &str, val: Option<Value>) -> CalcErrorResult {
        if op.is_empty() {
            if let Some(v) = val {
                self.output.push(Entry::Val(v))
            } else {
                return Err(CalcError::EmptyExpression);
            }
            return Ok(());
        }

        if self.is_func(op) {
            self.pending.push(Entry::Func(op.to_owned()));
            return Ok(());
        }

        if op == "(" {
            self.pending.push(Entry::OpenB);
            return Ok(());
        }

        if op == ")" {
            return self.pop_group();
        }

        let (pri, right_assoc) = Stack::priority(op);
        if pri == 0 {
            return Err(CalcError::InvalidOp(op.to_owned()));
        }

        if pri == PRI_IMMEDIATE {
            self.pop_pending_funcs();
            self.output.push(Entry::Op(op.to_owned(), pri, false));
            return Ok(());
        }

        // a prefix operator has no left operand, so nothing is ready to be popped
        if pri != PRI_PREFIX {
            self.pop_stronger(pri);
        }
        self.pending.push(Entry::Op(op.to_owned(), pri, right_assoc));

        Ok(())
    }

    pub(crate) fn calculate(&mut self) -> CalcResult {
        self.pop_all()?;
        if self.output.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        self.values.clear();

        let output = std::mem::take(&mut self.output);
        for o in output {
            match o {
                Entry::Val(v) => {
                    self.values.push(v);
                }
                Entry::Op(op, ..) => {
                    self.process_operator(&op)?;
                }
                Entry::Func(fname) => {
                    self.process_function(&fname)?;
                }
                Entry::OpenB => return Err(CalcError::Unreachable),
            }
        }

        if self.values.len() != 1 {
            return Err(CalcError::InsufficientOps);
        }

        let result = self.pop_value()?;
        if !result.is_finite() {
            return Err(CalcError::NotFinite(format!("{}", result)));
        }
        Ok(result)
    }

    fn process_operator(&mut self, op: &str) -> CalcErrorResult {
        match op {
            UNARY_MINUS => self.one_arg(Value::negate),
            SQUARE_ROOT => self.one_arg(Value::sqrt),
            CUBE_ROOT => self.one_arg(Value::cbrt),
            FACTORIAL => self.one_arg(Value::fact),
            SQUARE => self.one_arg(|v| v.clone().multiply(v)),
            CUBE => self.one_arg(|v| v.clone().multiply(v.clone())?.multiply(v)),
            "+" => self.two_arg(Value::addition),
            "-" => self.two_arg(Value::subtract),
            "*" => self.two_arg(Value::multiply),
            "/" => self.two_arg(Value::divide),
            "mod" => self.two_arg(Value::reminder),
            "**" => self.two_arg(Value::power),
            "C" => self.two_arg(Value::combinations),
            "P" => self.two_arg(Value::permutations),
            _ => Err(CalcError::InvalidOp(op.to_string())),
        }
    }

    fn process_function(&mut self, fname: &str) -> CalcErrorResult {
        let func = ScientificFunction::from_str(fname)?;
        let v = match self.values.pop() {
            Some(v) => v,
            None => return Err(CalcError::FunctionNoArgs(fname.to_string())),
        };
        let v = func.eval(v, self.angle)?;
        self.values.push(v);
        Ok(())
    }

    fn one_arg<F>(&mut self, f: F) -> CalcErrorResult
    where
        F: Fn(Value) -> CalcResult,
    {
        let v = self.pop_value()?;
        let v = f(v)?;
        self.values.push(v);
        Ok(())
    }

    fn two_arg<F>(&mut self, f: F) -> CalcErrorResult
    where
        F: Fn(Value, Value) -> CalcResult,
    {
        if self.values.len() < 2 {
            return Err(CalcError::TooManyOps);
        }
        let v2 = self.pop_value()?;
        let v1 = self.pop_value()?;
        let v = f(v1, v2)?;
        self.values.push(v);
        Ok(())
    }
}
