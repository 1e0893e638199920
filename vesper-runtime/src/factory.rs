use std::sync::Mutex;

use vesper_arc::Ref;

use crate::object::{self, Object, ObjectData};
use crate::typeinfo;
use crate::Value;

/// Creates an integer object with a count-one owned reference.
pub fn create_integer(value: i64) -> Value {
    Ref::new(Object::new(
        &typeinfo::INTEGER_TYPE,
        ObjectData::Integer(value),
    ))
}

/// Creates a float object with a count-one owned reference.
pub fn create_float(value: f64) -> Value {
    Ref::new(Object::new(&typeinfo::FLOAT_TYPE, ObjectData::Float(value)))
}

/// Creates a string object with a count-one owned reference.
pub fn create_string(value: impl Into<String>) -> Value {
    Ref::new(Object::new(
        &typeinfo::STRING_TYPE,
        ObjectData::String(value.into()),
    ))
}

/// Creates an empty list with a count-one owned reference.
pub fn create_list() -> Value {
    Ref::new(Object::new(
        &typeinfo::LIST_TYPE,
        ObjectData::List(Mutex::new(Vec::new())),
    ))
}

/// Creates an error value of the given kind.
pub fn create_error(kind: impl Into<String>, message: impl Into<String>) -> Value {
    Ref::new(Object::new(
        &typeinfo::ERROR_TYPE,
        ObjectData::Error {
            kind: kind.into(),
            message: message.into(),
        },
    ))
}

/// Returns the shared Boolean singleton for `value`.
pub fn create_boolean(value: bool) -> Value {
    object::boolean_object(value)
}

/// Returns the shared **nil** singleton.
pub fn create_nil() -> Value {
    object::nil_object()
}

/// Bundles `args` into a foreign-call argument pack, retaining each entry.
pub fn pack_call_args(args: &[Value]) -> Value {
    Ref::new(Object::new(
        &typeinfo::CALL_ARGS_TYPE,
        ObjectData::CallArgs(args.to_vec()),
    ))
}

/// Creates a `TypeError` value.
pub fn type_error(message: impl Into<String>) -> Value {
    create_error("TypeError", message)
}

/// Creates a `ZeroDivisionError` value.
pub fn zero_division_error(message: impl Into<String>) -> Value {
    create_error("ZeroDivisionError", message)
}

/// Creates an `IndexError` value.
pub fn index_error(message: impl Into<String>) -> Value {
    create_error("IndexError", message)
}

/// Creates an `FFIError` value.
pub fn ffi_error(message: impl Into<String>) -> Value {
    create_error("FFIError", message)
}
