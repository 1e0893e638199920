//! The foreign-function bridge: a dynamic library/symbol cache plus the
//! marshaling convention for calling natively compiled functions.
//!
//! Foreign functions follow the platform C calling convention and exchange
//! objects as opaque pointer-sized handles: every argument is the address of
//! a live cell borrowed for the call's duration, and the return value must be
//! an *owned* handle (produced by a factory, or by [`return_value`]). The
//! bridge never checks the callee's true arity or signature; its obligations
//! end at consistent marshaling and honest `FFIError` reporting.

use std::mem;
use std::os::raw::c_void;
use std::sync::Mutex;

use anyhow::{Context, Error};
use indexmap::IndexMap;
use libloading::Library;
use once_cell::sync::Lazy;

use vesper_arc::{ArcBox, Ref};

use crate::factory::{ffi_error, type_error};
use crate::object::Object;
use crate::Value;

/// The largest argument count a foreign call can marshal.
pub const MAX_FFI_ARGS: usize = 5;

static GLOBAL: Lazy<FfiCache> = Lazy::new(FfiCache::new);

/// Counters on the resolution step, for leak-free cache verification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Libraries opened (first use of each path).
    pub libraries_loaded: u64,
    /// Symbols resolved against a loaded library.
    pub symbols_resolved: u64,
    /// Lookups answered from the symbol cache.
    pub cache_hits: u64,
}

struct LibEntry {
    library: Library,
    symbols: IndexMap<String, usize>,
}

struct CacheInner {
    libraries: IndexMap<String, LibEntry>,
    stats: ResolveStats,
}

/// A cache of loaded libraries and their resolved symbol addresses.
pub struct FfiCache {
    inner: Mutex<CacheInner>,
}

impl FfiCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                libraries: IndexMap::new(),
                stats: ResolveStats::default(),
            }),
        }
    }

    /// The process-wide cache used by [`ffi_call`].
    pub fn global() -> &'static FfiCache {
        &GLOBAL
    }

    /// A snapshot of the resolution counters.
    pub fn stats(&self) -> ResolveStats {
        self.inner.lock().expect("ffi cache poisoned").stats
    }

    /// Resolves `symbol` within the library at `path`, loading the library on
    /// first use and caching the symbol address on first resolution. Failed
    /// loads and lookups are not cached and will be retried.
    pub fn resolve(&self, path: &str, symbol: &str) -> Result<usize, Error> {
        let mut inner = self.inner.lock().expect("ffi cache poisoned");
        let inner = &mut *inner;

        if !inner.libraries.contains_key(path) {
            // SAFETY: loading a library runs its initializers; the embedder
            // vouches for any library name it passes across this boundary.
            let library = unsafe { Library::new(path) }
                .with_context(|| format!("could not load library '{}'", path))?;
            inner.stats.libraries_loaded += 1;
            tracing::debug!(library = path, "library loaded");
            inner.libraries.insert(
                path.to_string(),
                LibEntry {
                    library,
                    symbols: IndexMap::new(),
                },
            );
        }
        let entry = match inner.libraries.get_mut(path) {
            Some(entry) => entry,
            None => unreachable!("library entry inserted above"),
        };

        if let Some(&address) = entry.symbols.get(symbol) {
            inner.stats.cache_hits += 1;
            return Ok(address);
        }

        // SAFETY: the symbol is only read as an address here; calling it is
        // deferred to the marshaling layer.
        let address = unsafe { entry.library.get::<*const c_void>(symbol.as_bytes()) }
            .map(|sym| *sym as usize)
            .with_context(|| format!("could not resolve symbol '{}' in '{}'", symbol, path))?;
        entry.symbols.insert(symbol.to_string(), address);
        inner.stats.symbols_resolved += 1;
        tracing::debug!(library = path, symbol, address, "symbol resolved");
        Ok(address)
    }
}

impl Default for FfiCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Calls `symbol` from the library at `library` with `args`.
///
/// The library and symbol names must be string objects; at most
/// [`MAX_FFI_ARGS`] arguments are marshaled. Resolution failures and arity
/// violations come back as `FFIError` values, name-kind violations as
/// `TypeError` values.
pub fn ffi_call(library: &Object, symbol: &Object, args: &[Value]) -> Value {
    let path = match library.as_str() {
        Some(path) => path,
        None => {
            return type_error(format!(
                "'ffi_call' expects a string library name, got '{}'",
                library.type_name()
            ))
        }
    };
    let name = match symbol.as_str() {
        Some(name) => name,
        None => {
            return type_error(format!(
                "'ffi_call' expects a string symbol name, got '{}'",
                symbol.type_name()
            ))
        }
    };
    if args.len() > MAX_FFI_ARGS {
        return ffi_error(format!(
            "foreign call to '{}' passes {} arguments, the supported maximum is {}",
            name,
            args.len(),
            MAX_FFI_ARGS
        ));
    }

    let address = match FfiCache::global().resolve(path, name) {
        Ok(address) => address,
        Err(err) => {
            tracing::warn!(library = path, symbol = name, "foreign symbol resolution failed");
            return ffi_error(format!("{:#}", err));
        }
    };

    // SAFETY: the address came from a successful symbol resolution; the
    // embedder vouches that the symbol follows the bridge's convention.
    unsafe { call_resolved(address, args) }
}

/// Calls an already-resolved foreign function with `args`.
///
/// # Safety
///
/// `address` must be a function following the platform C calling convention
/// that accepts `args.len()` pointer-sized arguments and returns an owned
/// object handle (or null). The bridge cannot verify any of this.
pub unsafe fn call_resolved(address: usize, args: &[Value]) -> Value {
    if args.len() > MAX_FFI_ARGS {
        return ffi_error(format!(
            "foreign call passes {} arguments, the supported maximum is {}",
            args.len(),
            MAX_FFI_ARGS
        ));
    }

    // Arguments are borrowed for the call's duration only: the callee
    // receives bare cell addresses and must retain whatever it keeps.
    let argv: Vec<usize> = args.iter().map(|arg| arg.address()).collect();

    let ret = match argv.len() {
        0 => mem::transmute::<usize, extern "C" fn() -> usize>(address)(),
        1 => mem::transmute::<usize, extern "C" fn(usize) -> usize>(address)(argv[0]),
        2 => mem::transmute::<usize, extern "C" fn(usize, usize) -> usize>(address)(
            argv[0], argv[1],
        ),
        3 => mem::transmute::<usize, extern "C" fn(usize, usize, usize) -> usize>(address)(
            argv[0], argv[1], argv[2],
        ),
        4 => mem::transmute::<usize, extern "C" fn(usize, usize, usize, usize) -> usize>(
            address,
        )(argv[0], argv[1], argv[2], argv[3]),
        5 => mem::transmute::<usize, extern "C" fn(usize, usize, usize, usize, usize) -> usize>(
            address,
        )(argv[0], argv[1], argv[2], argv[3], argv[4]),
        _ => unreachable!("argument count checked above"),
    };

    if ret == 0 {
        return ffi_error("foreign function returned a null object");
    }
    Ref::from_raw(ret as *const ArcBox<Object>)
}

/// Borrows the object behind a marshaled argument handle.
///
/// # Safety
///
/// `handle` must be an address marshaled by the bridge for the current call;
/// the borrow must not outlive that call.
pub unsafe fn borrow_argument<'a>(handle: usize) -> &'a Object {
    let cell = &*(handle as *const ArcBox<Object>);
    &**cell
}

/// Transfers an owned value to the foreign function's caller.
///
/// This is the return half of the marshaling convention: the handle carries
/// the strong reference the bridge will reconstitute on the runtime side.
pub fn return_value(value: Value) -> usize {
    Ref::into_raw(value) as usize
}
