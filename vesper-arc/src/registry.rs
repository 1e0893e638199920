use std::io::{self, Write};
use std::sync::Mutex;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The set of live, non-static objects, tracked for diagnostics.
///
/// The registry is purely observational: it never owns a reference and never
/// participates in deallocation decisions. Entries are keyed by cell address
/// in insertion order, so leak dumps are deterministic.
pub struct Registry {
    live: Mutex<IndexMap<usize, &'static str>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            live: Mutex::new(IndexMap::new()),
        }
    }

    /// The process-wide registry that every allocation reports to.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Records a live object. Static singletons are never registered.
    pub fn register(&self, address: usize, type_name: &'static str) {
        tracing::trace!(address, type_name, "object registered");
        self.live
            .lock()
            .expect("allocator registry poisoned")
            .insert(address, type_name);
    }

    /// Removes an object, immediately before its storage is freed.
    pub fn unregister(&self, address: usize) {
        tracing::trace!(address, "object unregistered");
        self.live
            .lock()
            .expect("allocator registry poisoned")
            .swap_remove(&address);
    }

    /// Returns the number of tracked live objects.
    pub fn live_count(&self) -> usize {
        self.live.lock().expect("allocator registry poisoned").len()
    }

    /// Returns whether an object at `address` is currently tracked.
    pub fn contains(&self, address: usize) -> bool {
        self.live
            .lock()
            .expect("allocator registry poisoned")
            .contains_key(&address)
    }

    /// Writes a human-readable live-object report to `out`.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let live = self.live.lock().expect("allocator registry poisoned");
        tracing::debug!(live = live.len(), "dumping live objects");
        writeln!(out, "Live objects: {}", live.len())?;
        for (address, type_name) in live.iter() {
            writeln!(out, "  {:#x} ({})", address, type_name)?;
        }
        Ok(())
    }

    /// Writes the live-object report to the standard output stream.
    pub fn dump_stdout(&self) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let _ = self.dump(&mut lock);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
