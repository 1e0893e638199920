//! Fast-path and polymorphic operator dispatch.
//!
//! Every operator is exposed two ways. The `<kind>_<op>_<kind>` functions are
//! the fast path: the caller has already verified both operand kinds, and the
//! functions panic if that contract is broken. The `op_*` entry points are the
//! safe polymorphic path: they consult the left descriptor's fast slot when
//! both descriptors match, fall back to a total match over the kind-tag pair,
//! and answer unsupported combinations with a `TypeError` value instead of
//! faulting.

use std::ptr;

use crate::factory::{create_float, create_integer, type_error, zero_division_error};
use crate::object::{boolean_object, Object, ObjectData};
use crate::Value;

fn expect_integer(obj: &Object, signature: &str) -> i64 {
    match obj.as_integer() {
        Some(value) => value,
        None => panic!("'{}': wrong type (expected `integer`)", signature),
    }
}

fn expect_float(obj: &Object, signature: &str) -> f64 {
    match obj.as_float() {
        Some(value) => value,
        None => panic!("'{}': wrong type (expected `float`)", signature),
    }
}

fn expect_boolean(obj: &Object, signature: &str) -> bool {
    match obj.as_boolean() {
        Some(value) => value,
        None => panic!("'{}': wrong type (expected `boolean`)", signature),
    }
}

// Shared numeric bodies. Integer arithmetic wraps; division by zero yields a
// `ZeroDivisionError` value for both kinds, never a native fault.

fn integer_add(a: i64, b: i64) -> Value {
    create_integer(a.wrapping_add(b))
}

fn integer_sub(a: i64, b: i64) -> Value {
    create_integer(a.wrapping_sub(b))
}

fn integer_mul(a: i64, b: i64) -> Value {
    create_integer(a.wrapping_mul(b))
}

fn integer_div(a: i64, b: i64) -> Value {
    if b == 0 {
        zero_division_error("integer division by zero")
    } else {
        create_integer(a.wrapping_div(b))
    }
}

fn float_add(a: f64, b: f64) -> Value {
    create_float(a + b)
}

fn float_sub(a: f64, b: f64) -> Value {
    create_float(a - b)
}

fn float_mul(a: f64, b: f64) -> Value {
    create_float(a * b)
}

fn float_div(a: f64, b: f64) -> Value {
    if b == 0.0 {
        zero_division_error("float division by zero")
    } else {
        create_float(a / b)
    }
}

macro_rules! integer_integer_op {
    ($($name:ident => $body:expr),* $(,)?) => {$(
        pub fn $name(left: &Object, right: &Object) -> Value {
            let a = expect_integer(left, stringify!($name));
            let b = expect_integer(right, stringify!($name));
            ($body)(a, b)
        }
    )*};
}

macro_rules! integer_float_op {
    ($($name:ident => $body:expr),* $(,)?) => {$(
        pub fn $name(left: &Object, right: &Object) -> Value {
            let a = expect_integer(left, stringify!($name)) as f64;
            let b = expect_float(right, stringify!($name));
            ($body)(a, b)
        }
    )*};
}

macro_rules! float_integer_op {
    ($($name:ident => $body:expr),* $(,)?) => {$(
        pub fn $name(left: &Object, right: &Object) -> Value {
            let a = expect_float(left, stringify!($name));
            let b = expect_integer(right, stringify!($name)) as f64;
            ($body)(a, b)
        }
    )*};
}

macro_rules! float_float_op {
    ($($name:ident => $body:expr),* $(,)?) => {$(
        pub fn $name(left: &Object, right: &Object) -> Value {
            let a = expect_float(left, stringify!($name));
            let b = expect_float(right, stringify!($name));
            ($body)(a, b)
        }
    )*};
}

integer_integer_op![
    integer_add_integer => integer_add,
    integer_sub_integer => integer_sub,
    integer_mul_integer => integer_mul,
    integer_div_integer => integer_div,
    integer_eq_integer => |a, b| boolean_object(a == b),
    integer_ne_integer => |a, b| boolean_object(a != b),
    integer_lt_integer => |a, b| boolean_object(a < b),
    integer_le_integer => |a, b| boolean_object(a <= b),
    integer_gt_integer => |a, b| boolean_object(a > b),
    integer_ge_integer => |a, b| boolean_object(a >= b),
];

integer_float_op![
    integer_add_float => float_add,
    integer_sub_float => float_sub,
    integer_mul_float => float_mul,
    integer_div_float => float_div,
    integer_eq_float => |a, b| boolean_object(a == b),
    integer_ne_float => |a, b| boolean_object(a != b),
    integer_lt_float => |a, b| boolean_object(a < b),
    integer_le_float => |a, b| boolean_object(a <= b),
    integer_gt_float => |a, b| boolean_object(a > b),
    integer_ge_float => |a, b| boolean_object(a >= b),
];

float_integer_op![
    float_add_integer => float_add,
    float_sub_integer => float_sub,
    float_mul_integer => float_mul,
    float_div_integer => float_div,
    float_eq_integer => |a, b| boolean_object(a == b),
    float_ne_integer => |a, b| boolean_object(a != b),
    float_lt_integer => |a, b| boolean_object(a < b),
    float_le_integer => |a, b| boolean_object(a <= b),
    float_gt_integer => |a, b| boolean_object(a > b),
    float_ge_integer => |a, b| boolean_object(a >= b),
];

float_float_op![
    float_add_float => float_add,
    float_sub_float => float_sub,
    float_mul_float => float_mul,
    float_div_float => float_div,
    float_eq_float => |a, b| boolean_object(a == b),
    float_ne_float => |a, b| boolean_object(a != b),
    float_lt_float => |a, b| boolean_object(a < b),
    float_le_float => |a, b| boolean_object(a <= b),
    float_gt_float => |a, b| boolean_object(a > b),
    float_ge_float => |a, b| boolean_object(a >= b),
];

pub fn boolean_and_boolean(left: &Object, right: &Object) -> Value {
    const SIGNATURE: &str = "boolean_and_boolean";
    boolean_object(expect_boolean(left, SIGNATURE) && expect_boolean(right, SIGNATURE))
}

pub fn boolean_or_boolean(left: &Object, right: &Object) -> Value {
    const SIGNATURE: &str = "boolean_or_boolean";
    boolean_object(expect_boolean(left, SIGNATURE) || expect_boolean(right, SIGNATURE))
}

pub fn boolean_not(operand: &Object) -> Value {
    boolean_object(!expect_boolean(operand, "boolean_not"))
}

#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arith {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Compare {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Compare {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    fn holds<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => a < b,
            Self::Le => a <= b,
            Self::Gt => a > b,
            Self::Ge => a >= b,
        }
    }
}

fn unsupported(symbol: &str, left: &Object, right: &Object) -> Value {
    type_error(format!(
        "operator '{}' not supported between '{}' and '{}'",
        symbol,
        left.type_name(),
        right.type_name()
    ))
}

fn arith_integers(op: Arith, a: i64, b: i64) -> Value {
    match op {
        Arith::Add => integer_add(a, b),
        Arith::Sub => integer_sub(a, b),
        Arith::Mul => integer_mul(a, b),
        Arith::Div => integer_div(a, b),
    }
}

fn arith_floats(op: Arith, a: f64, b: f64) -> Value {
    match op {
        Arith::Add => float_add(a, b),
        Arith::Sub => float_sub(a, b),
        Arith::Mul => float_mul(a, b),
        Arith::Div => float_div(a, b),
    }
}

fn dispatch_arith(op: Arith, left: &Object, right: &Object) -> Value {
    match (left.data(), right.data()) {
        (ObjectData::Integer(a), ObjectData::Integer(b)) => arith_integers(op, *a, *b),
        (ObjectData::Integer(a), ObjectData::Float(b)) => arith_floats(op, *a as f64, *b),
        (ObjectData::Float(a), ObjectData::Integer(b)) => arith_floats(op, *a, *b as f64),
        (ObjectData::Float(a), ObjectData::Float(b)) => arith_floats(op, *a, *b),
        _ => unsupported(op.symbol(), left, right),
    }
}

fn dispatch_compare(op: Compare, left: &Object, right: &Object) -> Value {
    match (left.data(), right.data()) {
        (ObjectData::Integer(a), ObjectData::Integer(b)) => boolean_object(op.holds(*a, *b)),
        (ObjectData::Integer(a), ObjectData::Float(b)) => boolean_object(op.holds(*a as f64, *b)),
        (ObjectData::Float(a), ObjectData::Integer(b)) => boolean_object(op.holds(*a, *b as f64)),
        (ObjectData::Float(a), ObjectData::Float(b)) => boolean_object(op.holds(*a, *b)),
        _ => unsupported(op.symbol(), left, right),
    }
}

/// Polymorphic `+`, dispatched through the left operand's descriptor.
pub fn op_add(left: &Object, right: &Object) -> Value {
    if ptr::eq(left.info(), right.info()) {
        if let Some(fast) = left.info().fast_add {
            return fast(left, right);
        }
    }
    dispatch_arith(Arith::Add, left, right)
}

/// Polymorphic `-`, dispatched through the left operand's descriptor.
pub fn op_sub(left: &Object, right: &Object) -> Value {
    if ptr::eq(left.info(), right.info()) {
        if let Some(fast) = left.info().fast_sub {
            return fast(left, right);
        }
    }
    dispatch_arith(Arith::Sub, left, right)
}

/// Polymorphic `*`.
pub fn op_mul(left: &Object, right: &Object) -> Value {
    dispatch_arith(Arith::Mul, left, right)
}

/// Polymorphic `/`.
pub fn op_div(left: &Object, right: &Object) -> Value {
    dispatch_arith(Arith::Div, left, right)
}

/// Polymorphic `==`, dispatched through the left operand's descriptor.
pub fn op_eq(left: &Object, right: &Object) -> Value {
    if ptr::eq(left.info(), right.info()) {
        if let Some(fast) = left.info().fast_eq {
            return fast(left, right);
        }
    }
    dispatch_compare(Compare::Eq, left, right)
}

/// Polymorphic `!=`.
pub fn op_ne(left: &Object, right: &Object) -> Value {
    dispatch_compare(Compare::Ne, left, right)
}

/// Polymorphic `<`.
pub fn op_lt(left: &Object, right: &Object) -> Value {
    dispatch_compare(Compare::Lt, left, right)
}

/// Polymorphic `<=`.
pub fn op_le(left: &Object, right: &Object) -> Value {
    dispatch_compare(Compare::Le, left, right)
}

/// Polymorphic `>`.
pub fn op_gt(left: &Object, right: &Object) -> Value {
    dispatch_compare(Compare::Gt, left, right)
}

/// Polymorphic `>=`.
pub fn op_ge(left: &Object, right: &Object) -> Value {
    dispatch_compare(Compare::Ge, left, right)
}

/// Identity comparison. Never overridden per kind.
pub fn op_is(left: &Object, right: &Object) -> Value {
    boolean_object(ptr::eq(left, right))
}

/// Polymorphic logical `and`, defined on Booleans only.
pub fn op_and(left: &Object, right: &Object) -> Value {
    match (left.data(), right.data()) {
        (ObjectData::Boolean(a), ObjectData::Boolean(b)) => boolean_object(*a && *b),
        _ => unsupported("and", left, right),
    }
}

/// Polymorphic logical `or`, defined on Booleans only.
pub fn op_or(left: &Object, right: &Object) -> Value {
    match (left.data(), right.data()) {
        (ObjectData::Boolean(a), ObjectData::Boolean(b)) => boolean_object(*a || *b),
        _ => unsupported("or", left, right),
    }
}

/// Polymorphic logical `not`, defined on Booleans only.
pub fn op_not(operand: &Object) -> Value {
    match operand.data() {
        ObjectData::Boolean(value) => boolean_object(!value),
        _ => type_error(format!(
            "operator 'not' not supported on '{}'",
            operand.type_name()
        )),
    }
}
