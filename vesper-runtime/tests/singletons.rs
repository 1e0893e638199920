use vesper_arc::Registry;

use vesper_runtime::factory::{
    create_error, create_float, create_integer, create_list, create_string, pack_call_args,
};
use vesper_runtime::object::{false_object, nil_object, true_object};
use vesper_runtime::typeinfo::{self, is_instance};

#[test]
fn singleton_accessors_share_one_address() {
    let first = true_object();
    let second = true_object();
    assert!(first.ptr_eq(&second));
    assert_eq!(first.address(), second.address());

    assert!(false_object().ptr_eq(&false_object()));
    assert!(nil_object().ptr_eq(&nil_object()));
    assert!(!true_object().ptr_eq(&false_object()));
}

#[test]
fn singletons_survive_every_release() {
    let nil = nil_object();
    assert!(nil.is_static());

    for _ in 0..16 {
        drop(nil.clone());
    }
    drop(nil);

    let nil = nil_object();
    assert!(nil.is_nil());
    assert!(nil.strong_count() >= 1);
}

#[test]
fn singletons_are_not_registry_tracked() {
    assert!(!Registry::global().contains(nil_object().address()));
    assert!(!Registry::global().contains(true_object().address()));

    let value = create_integer(5);
    assert!(Registry::global().contains(value.address()));
}

#[test]
fn type_names_match_their_kind() {
    assert_eq!(create_integer(1).type_name(), "integer");
    assert_eq!(create_float(1.0).type_name(), "float");
    assert_eq!(create_string("s").type_name(), "string");
    assert_eq!(create_list().type_name(), "list");
    assert_eq!(create_error("TypeError", "boom").type_name(), "error");
    assert_eq!(true_object().type_name(), "boolean");
    assert_eq!(nil_object().type_name(), "nil");
    assert_eq!(pack_call_args(&[]).type_name(), "call-args");
}

#[test]
fn repr_is_kind_specific() {
    assert_eq!(nil_object().repr(), "nil");
    assert_eq!(true_object().repr(), "true");
    assert_eq!(false_object().repr(), "false");
    assert_eq!(create_integer(42).repr(), "42");
    assert_eq!(create_float(2.5).repr(), "2.5");
    assert_eq!(create_string("hello").repr(), "hello");
    assert_eq!(
        create_error("ZeroDivisionError", "integer division by zero").repr(),
        "ZeroDivisionError: integer division by zero"
    );
    assert_eq!(pack_call_args(&[]).repr(), "call-args");
}

#[test]
fn instance_checks_walk_the_parent_chain() {
    let value = create_integer(3);
    assert!(is_instance(&value, &typeinfo::INTEGER_TYPE));
    assert!(is_instance(&value, &typeinfo::NUMERIC_TYPE));
    assert!(is_instance(&value, &typeinfo::OBJECT_TYPE));
    assert!(!is_instance(&value, &typeinfo::FLOAT_TYPE));
    assert!(!is_instance(&value, &typeinfo::LIST_TYPE));

    let value = create_float(3.0);
    assert!(is_instance(&value, &typeinfo::NUMERIC_TYPE));

    let value = create_list();
    assert!(is_instance(&value, &typeinfo::CONTAINER_TYPE));
    assert!(!is_instance(&value, &typeinfo::NUMERIC_TYPE));
}

#[test]
fn descriptors_resolve_by_name() {
    let info = typeinfo::lookup("integer").unwrap();
    assert!(std::ptr::eq(info, &typeinfo::INTEGER_TYPE));
    assert!(typeinfo::lookup("no-such-kind").is_none());
}

#[test]
fn scalar_equality_and_hashing_agree() {
    let a = create_integer(7);
    let b = create_integer(7);
    assert!(a.equals(&b));
    assert_eq!(a.hash_code(), b.hash_code());

    let f = create_float(7.0);
    assert!(a.equals(&f));

    let s1 = create_string("abc");
    let s2 = create_string("abc");
    assert!(s1.equals(&s2));
    assert_eq!(s1.hash_code(), s2.hash_code());

    // Reference kinds fall back to identity.
    let l1 = create_list();
    let l2 = create_list();
    assert!(!l1.equals(&l2));
    assert!(l1.equals(&l1));
    assert_ne!(l1.hash_code(), l2.hash_code());
}

#[test]
fn call_args_bundles_retain_their_entries() {
    let value = create_string("arg");
    let bundle = pack_call_args(&[value.clone()]);
    assert_eq!(value.strong_count(), 2);

    assert_eq!(bundle.call_args().map(|args| args.len()), Some(1));
    assert!(bundle.call_args().unwrap()[0].ptr_eq(&value));

    drop(bundle);
    assert_eq!(value.strong_count(), 1);
}
