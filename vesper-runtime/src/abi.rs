//! The C surface consumed by compiled Vesper code.
//!
//! Objects cross this boundary as opaque cell addresses. Every function is
//! tolerant of null handles in the manner of the rest of the runtime: a null
//! lifecycle argument is a no-op, a null operand produces a `TypeError`
//! value. Strings are copied into caller-supplied buffers, always
//! NUL-terminated, truncating if the buffer is too small.

use std::ffi::CStr;
use std::mem::ManuallyDrop;
use std::os::raw::c_char;
use std::ptr;

use vesper_arc::{ArcBox, Ref, Registry};

use crate::factory::{
    create_error, create_float, create_integer, create_list, create_string, pack_call_args,
    type_error,
};
use crate::ffi;
use crate::list;
use crate::object::{false_object, nil_object, true_object, Object};
use crate::ops;
use crate::typeinfo;
use crate::Value;

/// An opaque object handle: the address of a live cell.
pub type ObjectHandle = *const ArcBox<Object>;

unsafe fn borrow<'a>(obj: ObjectHandle) -> Option<&'a Object> {
    if obj.is_null() {
        None
    } else {
        Some(&**obj)
    }
}

/// Borrows a handle as a `Value` without touching its count.
unsafe fn borrow_value(obj: ObjectHandle) -> Option<ManuallyDrop<Value>> {
    if obj.is_null() {
        None
    } else {
        Some(ManuallyDrop::new(Ref::from_raw(obj)))
    }
}

unsafe fn copy_into(text: &str, buffer: *mut c_char, buffer_size: usize) {
    if buffer.is_null() || buffer_size == 0 {
        return;
    }
    let take = text.len().min(buffer_size - 1);
    ptr::copy_nonoverlapping(text.as_ptr(), buffer as *mut u8, take);
    *buffer.add(take) = 0;
}

// --- Object lifecycle ---

#[no_mangle]
pub unsafe extern "C" fn vesper_retain(obj: ObjectHandle) -> u64 {
    match borrow_value(obj) {
        Some(value) => value.retain(),
        None => 0,
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_release(obj: ObjectHandle) -> u64 {
    if obj.is_null() {
        return 0;
    }
    Ref::release(Ref::from_raw(obj))
}

#[no_mangle]
pub unsafe extern "C" fn vesper_type_name(
    obj: ObjectHandle,
    buffer: *mut c_char,
    buffer_size: usize,
) {
    if let Some(obj) = borrow(obj) {
        copy_into(obj.type_name(), buffer, buffer_size);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_repr_length(obj: ObjectHandle) -> usize {
    match borrow(obj) {
        Some(obj) => obj.repr().len(),
        None => 0,
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_repr(obj: ObjectHandle, buffer: *mut c_char, buffer_size: usize) {
    if let Some(obj) = borrow(obj) {
        copy_into(&obj.repr(), buffer, buffer_size);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_equals(left: ObjectHandle, right: ObjectHandle) -> bool {
    match (borrow(left), borrow(right)) {
        (Some(left), Some(right)) => left.equals(right),
        _ => false,
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_hash(obj: ObjectHandle) -> u64 {
    match borrow(obj) {
        Some(obj) => obj.hash_code(),
        None => 0,
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_is_instance(obj: ObjectHandle, type_name: *const c_char) -> bool {
    let obj = match borrow(obj) {
        Some(obj) => obj,
        None => return false,
    };
    if type_name.is_null() {
        return false;
    }
    let name = match CStr::from_ptr(type_name).to_str() {
        Ok(name) => name,
        Err(_) => return false,
    };
    typeinfo::lookup(name).map_or(false, |info| typeinfo::is_instance(obj, info))
}

// --- Factories ---

#[no_mangle]
pub extern "C" fn vesper_create_integer(value: i64) -> ObjectHandle {
    Ref::into_raw(create_integer(value))
}

#[no_mangle]
pub extern "C" fn vesper_create_float(value: f64) -> ObjectHandle {
    Ref::into_raw(create_float(value))
}

#[no_mangle]
pub unsafe extern "C" fn vesper_create_string(text: *const c_char) -> ObjectHandle {
    if text.is_null() {
        return ptr::null();
    }
    let text = CStr::from_ptr(text).to_string_lossy().into_owned();
    Ref::into_raw(create_string(text))
}

#[no_mangle]
pub extern "C" fn vesper_create_list() -> ObjectHandle {
    Ref::into_raw(create_list())
}

#[no_mangle]
pub unsafe extern "C" fn vesper_create_error(
    kind: *const c_char,
    message: *const c_char,
) -> ObjectHandle {
    if kind.is_null() || message.is_null() {
        return ptr::null();
    }
    let kind = CStr::from_ptr(kind).to_string_lossy().into_owned();
    let message = CStr::from_ptr(message).to_string_lossy().into_owned();
    Ref::into_raw(create_error(kind, message))
}

#[no_mangle]
pub extern "C" fn vesper_true() -> ObjectHandle {
    Ref::into_raw(true_object())
}

#[no_mangle]
pub extern "C" fn vesper_false() -> ObjectHandle {
    Ref::into_raw(false_object())
}

#[no_mangle]
pub extern "C" fn vesper_nil() -> ObjectHandle {
    Ref::into_raw(nil_object())
}

#[no_mangle]
pub unsafe extern "C" fn vesper_pack_call_args(
    argv: *const ObjectHandle,
    count: usize,
) -> ObjectHandle {
    let args = collect_arguments(argv, count);
    Ref::into_raw(pack_call_args(&args))
}

/// Clones `count` handles into owned values, substituting nil for nulls.
unsafe fn collect_arguments(argv: *const ObjectHandle, count: usize) -> Vec<Value> {
    let mut args = Vec::with_capacity(count);
    for i in 0..count {
        let handle = if argv.is_null() {
            ptr::null()
        } else {
            *argv.add(i)
        };
        match borrow_value(handle) {
            Some(value) => args.push((*value).clone()),
            None => args.push(nil_object()),
        }
    }
    args
}

// --- Operators ---

macro_rules! export_binary_op {
    ($($export:ident => $op:path),* $(,)?) => {$(
        #[no_mangle]
        pub unsafe extern "C" fn $export(left: ObjectHandle, right: ObjectHandle) -> ObjectHandle {
            let (left, right) = match (borrow(left), borrow(right)) {
                (Some(left), Some(right)) => (left, right),
                _ => return Ref::into_raw(type_error("null operand")),
            };
            Ref::into_raw($op(left, right))
        }
    )*};
}

export_binary_op![
    vesper_op_add => ops::op_add,
    vesper_op_sub => ops::op_sub,
    vesper_op_mul => ops::op_mul,
    vesper_op_div => ops::op_div,
    vesper_op_eq => ops::op_eq,
    vesper_op_ne => ops::op_ne,
    vesper_op_lt => ops::op_lt,
    vesper_op_le => ops::op_le,
    vesper_op_gt => ops::op_gt,
    vesper_op_ge => ops::op_ge,
    vesper_op_is => ops::op_is,
    vesper_op_and => ops::op_and,
    vesper_op_or => ops::op_or,
];

#[no_mangle]
pub unsafe extern "C" fn vesper_op_not(operand: ObjectHandle) -> ObjectHandle {
    match borrow(operand) {
        Some(operand) => Ref::into_raw(ops::op_not(operand)),
        None => Ref::into_raw(type_error("null operand")),
    }
}

// --- Lists ---

#[no_mangle]
pub unsafe extern "C" fn vesper_list_length(list: ObjectHandle) -> ObjectHandle {
    match borrow(list) {
        Some(list) => Ref::into_raw(list::list_length(list)),
        None => Ref::into_raw(type_error("null operand")),
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_list_contains(
    list: ObjectHandle,
    value: ObjectHandle,
) -> ObjectHandle {
    match (borrow(list), borrow(value)) {
        (Some(list), Some(value)) => Ref::into_raw(list::list_contains(list, value)),
        _ => Ref::into_raw(type_error("null operand")),
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_list_get(list: ObjectHandle, index: ObjectHandle) -> ObjectHandle {
    match (borrow(list), borrow(index)) {
        (Some(list), Some(index)) => Ref::into_raw(list::list_get(list, index)),
        _ => Ref::into_raw(type_error("null operand")),
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_list_set(
    list: ObjectHandle,
    index: ObjectHandle,
    value: ObjectHandle,
) -> ObjectHandle {
    let value = match borrow_value(value) {
        Some(value) => value,
        None => return Ref::into_raw(type_error("null operand")),
    };
    match (borrow(list), borrow(index)) {
        (Some(list), Some(index)) => Ref::into_raw(list::list_set(list, index, &value)),
        _ => Ref::into_raw(type_error("null operand")),
    }
}

#[no_mangle]
pub unsafe extern "C" fn vesper_list_append(
    list: ObjectHandle,
    value: ObjectHandle,
) -> ObjectHandle {
    let value = match borrow_value(value) {
        Some(value) => value,
        None => return Ref::into_raw(type_error("null operand")),
    };
    match borrow(list) {
        Some(list) => Ref::into_raw(list::list_append(list, &value)),
        None => Ref::into_raw(type_error("null operand")),
    }
}

// --- Foreign calls ---

#[no_mangle]
pub unsafe extern "C" fn vesper_ffi_call(
    library: ObjectHandle,
    symbol: ObjectHandle,
    argc: usize,
    argv: *const ObjectHandle,
) -> ObjectHandle {
    let (library, symbol) = match (borrow(library), borrow(symbol)) {
        (Some(library), Some(symbol)) => (library, symbol),
        _ => return Ref::into_raw(type_error("null operand")),
    };
    let args = collect_arguments(argv, argc);
    Ref::into_raw(ffi::ffi_call(library, symbol, &args))
}

// --- Diagnostics ---

#[no_mangle]
pub extern "C" fn vesper_dump_live_objects() {
    Registry::global().dump_stdout();
}
