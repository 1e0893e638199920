use vesper_runtime::factory::{create_integer, create_nil, create_string};
use vesper_runtime::ffi::{
    borrow_argument, call_resolved, ffi_call, return_value, FfiCache, MAX_FFI_ARGS,
};

#[test]
fn unresolvable_libraries_fail_consistently() {
    let library = create_string("/nonexistent/libvesper-missing.so");
    let symbol = create_string("anything");

    let first = ffi_call(&library, &symbol, &[]);
    assert_eq!(first.error_kind(), Some("FFIError"));

    let second = ffi_call(&library, &symbol, &[]);
    assert_eq!(second.error_kind(), Some("FFIError"));
}

#[test]
fn names_must_be_strings() {
    let result = ffi_call(&create_integer(1), &create_string("puts"), &[]);
    assert_eq!(result.error_kind(), Some("TypeError"));

    let result = ffi_call(&create_string("libc.so.6"), &create_nil(), &[]);
    assert_eq!(result.error_kind(), Some("TypeError"));
}

#[test]
fn argument_counts_beyond_the_maximum_are_rejected() {
    let library = create_string("/nonexistent/libvesper-missing.so");
    let symbol = create_string("anything");
    let args: Vec<_> = (0..MAX_FFI_ARGS as i64 + 1).map(create_integer).collect();

    // The arity check precedes resolution, so even an unloadable library
    // reports the arity problem.
    let result = ffi_call(&library, &symbol, &args);
    assert_eq!(result.error_kind(), Some("FFIError"));
    assert!(result
        .error_message()
        .unwrap()
        .contains("supported maximum"));
}

#[test]
#[cfg(target_os = "linux")]
fn symbols_resolve_exactly_once() {
    let cache = FfiCache::new();

    let resolved = cache
        .resolve("libm.so.6", "cos")
        .or_else(|_| cache.resolve("/lib/x86_64-linux-gnu/libm.so.6", "cos"));

    // Tolerate exotic environments without libm; everywhere else, the second
    // lookup must be a cache hit against a single resolution.
    if let Ok(address) = resolved {
        assert_ne!(address, 0);
        let stats = cache.stats();
        assert_eq!(stats.symbols_resolved, 1);
        assert_eq!(stats.cache_hits, 0);

        let again = cache.resolve("libm.so.6", "cos").or_else(|_| {
            cache.resolve("/lib/x86_64-linux-gnu/libm.so.6", "cos")
        });
        assert_eq!(again.ok(), Some(address));

        let stats = cache.stats();
        assert_eq!(stats.libraries_loaded, 1);
        assert_eq!(stats.symbols_resolved, 1);
        assert_eq!(stats.cache_hits, 1);
    }
}

#[test]
#[cfg(target_os = "linux")]
fn missing_symbols_are_errors_not_crashes() {
    let cache = FfiCache::new();

    if cache.resolve("libm.so.6", "cos").is_err() {
        return;
    }
    assert!(cache.resolve("libm.so.6", "vesper_no_such_symbol").is_err());
    assert!(cache.resolve("libm.so.6", "vesper_no_such_symbol").is_err());
    assert_eq!(cache.stats().libraries_loaded, 1);
}

extern "C" fn native_add(left: usize, right: usize) -> usize {
    let left = unsafe { borrow_argument(left) };
    let right = unsafe { borrow_argument(right) };
    let sum = left.as_integer().unwrap() + right.as_integer().unwrap();
    return_value(create_integer(sum))
}

extern "C" fn native_nil() -> usize {
    return_value(create_nil())
}

extern "C" fn native_null(_arg: usize) -> usize {
    0
}

#[test]
fn marshaling_borrows_arguments_and_wraps_the_return() {
    let left = create_integer(2);
    let right = create_integer(40);
    let args = [left.clone(), right.clone()];

    let result = unsafe { call_resolved(native_add as usize, &args) };
    assert_eq!(result.as_integer(), Some(42));

    drop(args);
    assert_eq!(left.strong_count(), 1);
    assert_eq!(right.strong_count(), 1);
}

#[test]
fn zero_argument_calls_are_supported() {
    let result = unsafe { call_resolved(native_nil as usize, &[]) };
    assert!(result.is_nil());
}

#[test]
fn null_returns_become_ffi_errors() {
    let arg = create_integer(1);
    let result = unsafe { call_resolved(native_null as usize, &[arg]) };
    assert_eq!(result.error_kind(), Some("FFIError"));
}

#[test]
fn call_resolved_enforces_the_arity_ceiling() {
    let args: Vec<_> = (0..MAX_FFI_ARGS as i64 + 1).map(create_integer).collect();
    let result = unsafe { call_resolved(native_nil as usize, &args) };
    assert_eq!(result.error_kind(), Some("FFIError"));
}
