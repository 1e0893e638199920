//! The list container: a mutable, ordered, reference-owning sequence.
//!
//! Storing a value retains it, displacing or removing one releases it, and
//! destroying the list releases every remaining element. Index keys must be
//! integers in `[0, length)`; violations come back as Error values.

use std::mem;
use std::sync::Mutex;

use crate::factory::{create_integer, index_error, type_error};
use crate::object::{boolean_object, nil_object, Object};
use crate::Value;

fn expect_list<'a>(obj: &'a Object, signature: &str) -> Result<&'a Mutex<Vec<Value>>, Value> {
    obj.elements().ok_or_else(|| {
        type_error(format!(
            "'{}' expects a list, got '{}'",
            signature,
            obj.type_name()
        ))
    })
}

fn expect_index(obj: &Object, length: usize, signature: &str) -> Result<usize, Value> {
    let index = match obj.as_integer() {
        Some(index) => index,
        None => {
            return Err(type_error(format!(
                "'{}' expects an integer index, got '{}'",
                signature,
                obj.type_name()
            )))
        }
    };
    if index < 0 || index as usize >= length {
        return Err(index_error(format!(
            "index {} out of range for list of length {}",
            index, length
        )));
    }
    Ok(index as usize)
}

/// The number of elements in `list`, as an integer value.
pub fn list_length(list: &Object) -> Value {
    let elements = match expect_list(list, "list_length") {
        Ok(elements) => elements,
        Err(err) => return err,
    };
    let length = elements.lock().expect("list elements poisoned").len();
    create_integer(length as i64)
}

/// Whether some element of `list` is `equals` to `value`.
pub fn list_contains(list: &Object, value: &Object) -> Value {
    let elements = match expect_list(list, "list_contains") {
        Ok(elements) => elements,
        Err(err) => return err,
    };
    let elements = elements.lock().expect("list elements poisoned");
    boolean_object(elements.iter().any(|element| element.equals(value)))
}

/// The element at `index`, retained for the caller.
pub fn list_get(list: &Object, index: &Object) -> Value {
    let elements = match expect_list(list, "list_get") {
        Ok(elements) => elements,
        Err(err) => return err,
    };
    let elements = elements.lock().expect("list elements poisoned");
    match expect_index(index, elements.len(), "list_get") {
        Ok(index) => elements[index].clone(),
        Err(err) => err,
    }
}

/// Replaces the element at `index`, retaining `value` and releasing the
/// previous occupant. Returns **nil** on success.
pub fn list_set(list: &Object, index: &Object, value: &Value) -> Value {
    let elements = match expect_list(list, "list_set") {
        Ok(elements) => elements,
        Err(err) => return err,
    };
    let mut elements = elements.lock().expect("list elements poisoned");
    let index = match expect_index(index, elements.len(), "list_set") {
        Ok(index) => index,
        Err(err) => return err,
    };
    let displaced = mem::replace(&mut elements[index], value.clone());
    drop(elements);
    drop(displaced);
    nil_object()
}

/// Appends `value`, retaining it. Returns **nil** on success.
pub fn list_append(list: &Object, value: &Value) -> Value {
    let elements = match expect_list(list, "list_append") {
        Ok(elements) => elements,
        Err(err) => return err,
    };
    elements
        .lock()
        .expect("list elements poisoned")
        .push(value.clone());
    nil_object()
}
