use std::ptr;

use crate::object::Object;
use crate::ops;
use crate::Value;

/// A fast-path binary operator over caller-verified operand kinds.
pub type BinaryOp = fn(&Object, &Object) -> Value;

/// Static, process-lifetime metadata for a value kind.
///
/// Descriptor identity is pointer equality, never name comparison: every kind
/// has exactly one descriptor, created at compile time and never freed. The
/// `parent` link forms the single-inheritance chain walked by [`is_instance`].
pub struct TypeInfo {
    /// The kind's name, as reported by `type_name` and the registry dump.
    pub name: &'static str,
    /// The parent descriptor, if this kind has one.
    pub parent: Option<&'static TypeInfo>,
    /// Fast-path `+` over two operands of this kind.
    pub fast_add: Option<BinaryOp>,
    /// Fast-path `-` over two operands of this kind.
    pub fast_sub: Option<BinaryOp>,
    /// Fast-path `==` over two operands of this kind.
    pub fast_eq: Option<BinaryOp>,
}

/// The root descriptor every kind ultimately descends from.
pub static OBJECT_TYPE: TypeInfo = TypeInfo {
    name: "object",
    parent: None,
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

/// The common parent of the integer and float kinds.
pub static NUMERIC_TYPE: TypeInfo = TypeInfo {
    name: "numeric",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

pub static INTEGER_TYPE: TypeInfo = TypeInfo {
    name: "integer",
    parent: Some(&NUMERIC_TYPE),
    fast_add: Some(ops::integer_add_integer),
    fast_sub: Some(ops::integer_sub_integer),
    fast_eq: Some(ops::integer_eq_integer),
};

pub static FLOAT_TYPE: TypeInfo = TypeInfo {
    name: "float",
    parent: Some(&NUMERIC_TYPE),
    fast_add: Some(ops::float_add_float),
    fast_sub: Some(ops::float_sub_float),
    fast_eq: Some(ops::float_eq_float),
};

pub static BOOLEAN_TYPE: TypeInfo = TypeInfo {
    name: "boolean",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

pub static NIL_TYPE: TypeInfo = TypeInfo {
    name: "nil",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

pub static STRING_TYPE: TypeInfo = TypeInfo {
    name: "string",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

pub static ERROR_TYPE: TypeInfo = TypeInfo {
    name: "error",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

/// The common parent of the container kinds.
pub static CONTAINER_TYPE: TypeInfo = TypeInfo {
    name: "container",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

pub static LIST_TYPE: TypeInfo = TypeInfo {
    name: "list",
    parent: Some(&CONTAINER_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

/// The descriptor of the foreign-call argument bundle.
pub static CALL_ARGS_TYPE: TypeInfo = TypeInfo {
    name: "call-args",
    parent: Some(&OBJECT_TYPE),
    fast_add: None,
    fast_sub: None,
    fast_eq: None,
};

static ALL_TYPES: [&TypeInfo; 11] = [
    &OBJECT_TYPE,
    &NUMERIC_TYPE,
    &INTEGER_TYPE,
    &FLOAT_TYPE,
    &BOOLEAN_TYPE,
    &NIL_TYPE,
    &STRING_TYPE,
    &ERROR_TYPE,
    &CONTAINER_TYPE,
    &LIST_TYPE,
    &CALL_ARGS_TYPE,
];

/// Finds a descriptor by name, for callers that cannot hold one by pointer.
pub fn lookup(name: &str) -> Option<&'static TypeInfo> {
    ALL_TYPES.iter().copied().find(|info| info.name == name)
}

/// Returns whether `obj` is an instance of `target` or of a kind descending
/// from it, by walking the parent chain from the object's own descriptor.
pub fn is_instance(obj: &Object, target: &'static TypeInfo) -> bool {
    let mut current = Some(obj.info());
    while let Some(info) = current {
        if ptr::eq(info, target) {
            return true;
        }
        current = info.parent;
    }
    false
}
