use std::cell::Cell;
use std::rc::Rc;

use vesper_arc::{ArcBox, Inspect, Ref, Registry};

/// A droppable probe that counts how many times its destructor ran.
struct Probe {
    drops: Rc<Cell<usize>>,
}

impl Probe {
    fn new(drops: &Rc<Cell<usize>>) -> Self {
        Self {
            drops: Rc::clone(drops),
        }
    }
}

impl Inspect for Probe {
    fn type_name(&self) -> &'static str {
        "probe"
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn fresh_handle_owns_one_reference() {
    let drops = Rc::new(Cell::new(0));
    let value = Ref::new(Probe::new(&drops));

    assert_eq!(value.strong_count(), 1);
    assert!(!value.is_static());

    drop(value);
    assert_eq!(drops.get(), 1);
}

#[test]
fn clone_retains_and_drop_releases() {
    let drops = Rc::new(Cell::new(0));
    let value = Ref::new(Probe::new(&drops));

    let alias = value.clone();
    assert_eq!(value.strong_count(), 2);
    assert!(value.ptr_eq(&alias));

    assert_eq!(value.retain(), 3);
    assert_eq!(Ref::release(alias), 2);

    // Two counts remain: `value` and the explicit retain. Reconstituting
    // handles from the raw cell pointer balances both.
    let raw = Ref::into_raw(value);
    let first = unsafe { Ref::from_raw(raw) };
    let second = unsafe { Ref::from_raw(raw) };

    assert_eq!(Ref::release(first), 1);
    assert_eq!(drops.get(), 0);

    drop(second);
    assert_eq!(drops.get(), 1);
}

#[test]
fn destructor_runs_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let value = Ref::new(Probe::new(&drops));

    let aliases: Vec<_> = (0..8).map(|_| value.clone()).collect();
    assert_eq!(value.strong_count(), 9);

    drop(aliases);
    assert_eq!(value.strong_count(), 1);
    assert_eq!(drops.get(), 0);

    drop(value);
    assert_eq!(drops.get(), 1);
}

/// A probe that owns a strong reference to another probe.
struct Node {
    child: Option<Ref<Node>>,
    drops: Rc<Cell<usize>>,
}

impl Inspect for Node {
    fn type_name(&self) -> &'static str {
        "node"
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn owned_children_release_recursively() {
    let drops = Rc::new(Cell::new(0));

    let child = Ref::new(Node {
        child: None,
        drops: Rc::clone(&drops),
    });
    let parent = Ref::new(Node {
        child: Some(child.clone()),
        drops: Rc::clone(&drops),
    });

    drop(child);
    assert_eq!(parent.child.as_ref().map(Ref::strong_count), Some(1));
    assert_eq!(drops.get(), 0);

    drop(parent);
    assert_eq!(drops.get(), 2);
}

struct Singleton;

impl Inspect for Singleton {
    fn type_name(&self) -> &'static str {
        "singleton"
    }
}

static SINGLETON: ArcBox<Singleton> = ArcBox::new_static(Singleton);

#[test]
fn static_cells_share_an_address_and_never_die() {
    let first = Ref::from_static(&SINGLETON);
    let second = Ref::from_static(&SINGLETON);

    assert!(first.ptr_eq(&second));
    assert_eq!(first.address(), second.address());
    assert!(first.is_static());
    assert!(!Registry::global().contains(first.address()));

    drop(second);
    drop(first.clone());
    drop(first);

    // The cell survives every release and can still hand out handles.
    let again = Ref::from_static(&SINGLETON);
    assert!(again.strong_count() >= 1);
}
