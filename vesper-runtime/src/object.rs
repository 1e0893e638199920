use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::Mutex;

use vesper_arc::{ArcBox, Inspect, Ref};

use crate::typeinfo::{self, TypeInfo};
use crate::Value;

/// Represents a runtime object: a type descriptor plus its kind's payload.
///
/// The strong-reference count and the static flag live in the surrounding
/// [`ArcBox`] header; everything else an object carries is here.
pub struct Object {
    info: &'static TypeInfo,
    data: ObjectData,
}

/// The payload of each value kind.
pub enum ObjectData {
    /// The **nil** value.
    Nil,
    /// A boolean value (**true** or **false**).
    Boolean(bool),
    /// A 64-bit integer value.
    Integer(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A string value.
    String(String),
    /// A first-class failure value, returned instead of thrown.
    Error {
        /// The failure class, e.g. `TypeError`.
        kind: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// A mutable, ordered sequence of strong object references.
    List(Mutex<Vec<Value>>),
    /// An ordered bundle of strong object references for a foreign call.
    CallArgs(Vec<Value>),
}

impl Object {
    pub(crate) const fn new(info: &'static TypeInfo, data: ObjectData) -> Self {
        Self { info, data }
    }

    /// The object's type descriptor.
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The payload carried by this object.
    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.data {
            ObjectData::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.data {
            ObjectData::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.data {
            ObjectData::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ObjectData::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.data, ObjectData::Nil)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.data, ObjectData::Error { .. })
    }

    /// The failure class of an error value, e.g. `ZeroDivisionError`.
    pub fn error_kind(&self) -> Option<&str> {
        match &self.data {
            ObjectData::Error { kind, .. } => Some(kind.as_str()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.data {
            ObjectData::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub(crate) fn elements(&self) -> Option<&Mutex<Vec<Value>>> {
        match &self.data {
            ObjectData::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// The entries of a foreign-call argument bundle.
    pub fn call_args(&self) -> Option<&[Value]> {
        match &self.data {
            ObjectData::CallArgs(args) => Some(args.as_slice()),
            _ => None,
        }
    }

    /// Structural equality: value-based for the scalar kinds (with the
    /// integer operand widened against a float), identity for everything else.
    pub fn equals(&self, other: &Object) -> bool {
        match (&self.data, &other.data) {
            (ObjectData::Nil, ObjectData::Nil) => true,
            (ObjectData::Boolean(a), ObjectData::Boolean(b)) => a.eq(b),
            (ObjectData::Integer(a), ObjectData::Integer(b)) => a.eq(b),
            (ObjectData::Integer(a), ObjectData::Float(b))
            | (ObjectData::Float(b), ObjectData::Integer(a)) => (*a as f64).eq(b),
            (ObjectData::Float(a), ObjectData::Float(b)) => a.eq(b),
            (ObjectData::String(a), ObjectData::String(b)) => a.eq(b),
            _ => ptr::eq(self, other),
        }
    }

    /// A hash consistent with [`Object::equals`] for the scalar kinds; the
    /// object's address for everything else.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match &self.data {
            ObjectData::Nil => {
                hasher.write(b"#nil#");
            }
            ObjectData::Boolean(value) => {
                hasher.write(b"#bool#");
                value.hash(&mut hasher);
            }
            ObjectData::Integer(value) => {
                hasher.write(b"#int#");
                value.hash(&mut hasher);
            }
            ObjectData::Float(value) => {
                hasher.write(b"#float#");
                value.to_bits().hash(&mut hasher);
            }
            ObjectData::String(value) => {
                hasher.write(b"#string#");
                value.hash(&mut hasher);
            }
            _ => return self as *const Object as u64,
        }
        hasher.finish()
    }

    /// Get the human-readable string representation of this object.
    pub fn repr(&self) -> String {
        match &self.data {
            ObjectData::Nil => "nil".to_string(),
            ObjectData::Boolean(value) => value.to_string(),
            ObjectData::Integer(value) => value.to_string(),
            ObjectData::Float(value) => value.to_string(),
            ObjectData::String(value) => value.clone(),
            ObjectData::Error { kind, message } => format!("{}: {}", kind, message),
            ObjectData::List(elements) => {
                let elements = elements.lock().expect("list elements poisoned");
                let strings: Vec<String> = elements.iter().map(|value| value.repr()).collect();
                format!("[{}]", strings.join(", "))
            }
            ObjectData::CallArgs(_) => self.info.name.to_string(),
        }
    }

    /// Get the object's type name.
    pub fn type_name(&self) -> &'static str {
        self.info.name
    }
}

impl Inspect for Object {
    fn type_name(&self) -> &'static str {
        self.info.name
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            ObjectData::Nil => f.debug_tuple("Nil").finish(),
            ObjectData::Boolean(val) => f.debug_tuple("Boolean").field(val).finish(),
            ObjectData::Integer(val) => f.debug_tuple("Integer").field(val).finish(),
            ObjectData::Float(val) => f.debug_tuple("Float").field(val).finish(),
            ObjectData::String(val) => f.debug_tuple("String").field(val).finish(),
            ObjectData::Error { kind, message } => f
                .debug_struct("Error")
                .field("kind", kind)
                .field("message", message)
                .finish(),
            ObjectData::List(val) => {
                let elements = val.lock().expect("list elements poisoned");
                f.debug_tuple("List").field(&*elements).finish()
            }
            ObjectData::CallArgs(val) => f.debug_tuple("CallArgs").field(val).finish(),
        }
    }
}

static TRUE_CELL: ArcBox<Object> =
    ArcBox::new_static(Object::new(&typeinfo::BOOLEAN_TYPE, ObjectData::Boolean(true)));
static FALSE_CELL: ArcBox<Object> =
    ArcBox::new_static(Object::new(&typeinfo::BOOLEAN_TYPE, ObjectData::Boolean(false)));
static NIL_CELL: ArcBox<Object> =
    ArcBox::new_static(Object::new(&typeinfo::NIL_TYPE, ObjectData::Nil));

/// The **true** singleton. Every call returns a handle to the same cell.
pub fn true_object() -> Value {
    Ref::from_static(&TRUE_CELL)
}

/// The **false** singleton. Every call returns a handle to the same cell.
pub fn false_object() -> Value {
    Ref::from_static(&FALSE_CELL)
}

/// The **nil** singleton. Every call returns a handle to the same cell.
pub fn nil_object() -> Value {
    Ref::from_static(&NIL_CELL)
}

/// The Boolean singleton for `value`, never a fresh instance.
pub fn boolean_object(value: bool) -> Value {
    if value {
        true_object()
    } else {
        false_object()
    }
}
