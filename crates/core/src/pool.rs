//! Managed-object lifecycle: mark-and-sweep over heap cells that may
//! participate in reference cycles, so the surrounding `Rc` refcount can
//! finish reclaiming them once their internal references are severed.
//!
//! This is not a general garbage collector: ordinary acyclic `Value`s are
//! reclaimed by `Rc` the moment their last owner drops them, same as any
//! other Rust value. The pool only needs to break *cycles* — a ring of
//! `mpair`s, a vector that contains itself — that `Rc` alone can never free.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::value::Value;

/// The mark state carried by every heap cell that may participate in a
/// cycle: the epoch of the last collection in which it was found reachable.
/// `0` means "never marked" and is never assigned as a live epoch.
#[derive(Debug, Default)]
pub struct ManagedHeader {
    tag: Cell<u8>,
}

impl ManagedHeader {
    pub fn new() -> Self {
        ManagedHeader { tag: Cell::new(0) }
    }
}

/// Anything the pool can mark and, if unreachable, clean up.
///
/// Implementors are the `(H)` heap cells in `value.rs` (`MPairCell`,
/// `BoxCell`, `VectorCell`, `ArrayCell`, `RecordCell`, `StringCell`,
/// `BytesCell`, `OpaqueCell`) and [`crate::hashtable::HashTable`].
pub trait ManagedCell {
    /// The cell's mark header.
    fn header(&self) -> &ManagedHeader;

    /// Mark every `Value` this cell directly holds. Called at most once per
    /// collection per cell — `mark` itself guards re-entrancy via the tag.
    fn mark_children(&self, epoch: u8);

    /// Sever every outgoing reference so the enclosing `Rc` refcount can
    /// finish reclaiming this cell and whatever it pointed to. Idempotent:
    /// safe to call on an already-cleaned-up cell.
    fn cleanup(&self);

    /// Used only for pool statistics.
    fn type_name(&self) -> &'static str;

    /// The epoch this cell was last marked at (0 if never).
    fn tag(&self) -> u8 {
        self.header().tag.get()
    }

    /// Mark this cell at `epoch`, descending into its children only the
    /// first time it is visited this cycle.
    fn mark(&self, epoch: u8) {
        if self.header().tag.get() == epoch {
            return;
        }
        self.header().tag.set(epoch);
        self.mark_children(epoch);
    }
}

/// Collection statistics, updated after every `collect` call.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub cycles_completed: u64,
    pub last_epoch: u8,
    pub tracked_count: usize,
    pub reclaimed_by_type: HashMap<&'static str, u64>,
}

/// Tracks heap cells that may form cycles and periodically breaks them.
///
/// Holds only `Weak` references: ordinary `Rc` ownership lives in the
/// VM registers, call stack, environments, and data structures that the
/// embedder's `mark_roots` callback walks. A tracked cell that nobody else
/// references anymore has already been reclaimed by `Rc` before the pool
/// ever gets to sweep it; such dead weak refs are simply dropped from the
/// tracked list, not counted as reclaimed.
pub struct ManagedObjectPool {
    tracked: RefCell<Vec<Weak<dyn ManagedCell>>>,
    epoch: Cell<u8>,
    stats: RefCell<PoolStats>,
    collecting: Cell<bool>,
}

impl Default for ManagedObjectPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagedObjectPool {
    pub fn new() -> Self {
        ManagedObjectPool {
            tracked: RefCell::new(Vec::new()),
            epoch: Cell::new(0),
            stats: RefCell::new(PoolStats::default()),
            collecting: Cell::new(false),
        }
    }

    /// Register a newly allocated cell that may participate in a cycle.
    pub fn register(&self, obj: Rc<dyn ManagedCell>) {
        assert!(
            !self.collecting.get(),
            "ManagedObjectPool::register called while a collection is in progress"
        );
        self.tracked.borrow_mut().push(Rc::downgrade(&obj));
    }

    fn next_epoch(&self) -> u8 {
        let next = match self.epoch.get() {
            255 => 1,
            n => n + 1,
        };
        self.epoch.set(next);
        next
    }

    /// Run one mark-and-sweep cycle, returning the number of cells reclaimed.
    ///
    /// `mark_roots` is the embedder-supplied callback: it is handed the
    /// fresh epoch and a mark function, and must call that mark function on
    /// every root `Value` (VM registers, call stack, environment chain,
    /// global heap locations).
    pub fn collect(&self, mark_roots: impl FnOnce(u8, &mut dyn FnMut(&Value, u8))) -> usize {
        assert!(
            !self.collecting.get(),
            "ManagedObjectPool::collect called re-entrantly — collection must be synchronous"
        );
        self.collecting.set(true);
        let epoch = self.next_epoch();

        let mut mark_fn = |v: &Value, e: u8| crate::value::mark(v, e);
        mark_roots(epoch, &mut mark_fn);

        let mut reclaimed = 0u64;
        let mut survivors = Vec::new();
        for weak in self.tracked.borrow_mut().drain(..) {
            let Some(obj) = weak.upgrade() else {
                continue; // already reclaimed by Rc, nothing to do
            };
            if obj.tag() != epoch {
                obj.cleanup();
                reclaimed += 1;
                *self
                    .stats
                    .borrow_mut()
                    .reclaimed_by_type
                    .entry(obj.type_name())
                    .or_insert(0) += 1;
            }
            survivors.push(weak);
        }
        *self.tracked.borrow_mut() = survivors;

        {
            let mut stats = self.stats.borrow_mut();
            stats.cycles_completed += 1;
            stats.last_epoch = epoch;
            stats.tracked_count = self.tracked.borrow().len();
        }

        self.collecting.set(false);
        reclaimed as usize
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Counter(ManagedHeader);

    impl ManagedCell for Counter {
        fn header(&self) -> &ManagedHeader {
            &self.0
        }
        fn mark_children(&self, _epoch: u8) {}
        fn cleanup(&self) {}
        fn type_name(&self) -> &'static str {
            "counter"
        }
    }

    #[test]
    fn already_dropped_object_is_pruned_not_counted_reclaimed() {
        let pool = ManagedObjectPool::new();
        let cell: Rc<dyn ManagedCell> = Rc::new(Counter(ManagedHeader::new()));
        pool.register(cell.clone());
        drop(cell);

        let reclaimed = pool.collect(|_epoch, _mark| {});
        assert_eq!(reclaimed, 0); // already gone via Rc before the sweep ran
        assert_eq!(pool.stats().tracked_count, 0);
    }

    #[test]
    fn unreachable_but_still_owned_object_gets_cleaned_up() {
        let pool = ManagedObjectPool::new();
        let cell: Rc<dyn ManagedCell> = Rc::new(Counter(ManagedHeader::new()));
        pool.register(cell.clone());

        // No root marks it, so the sweep must invoke cleanup even though an
        // external Rc (a dangling cycle remnant) keeps it alive.
        let reclaimed = pool.collect(|_epoch, _mark| {});
        assert_eq!(reclaimed, 1);
        assert_eq!(pool.stats().reclaimed_by_type.get("counter"), Some(&1));
        assert_eq!(pool.stats().tracked_count, 1);
        drop(cell);
    }

    #[test]
    fn reachable_object_survives_and_is_not_cleaned_up() {
        let pool = ManagedObjectPool::new();
        let cell: Rc<dyn ManagedCell> = Rc::new(Counter(ManagedHeader::new()));
        pool.register(cell.clone());

        let reclaimed = pool.collect(|epoch, _mark| {
            cell.mark(epoch);
        });
        assert_eq!(reclaimed, 0);
        assert_eq!(pool.stats().tracked_count, 1);
    }

    #[test]
    fn epoch_wraps_and_skips_zero() {
        let pool = ManagedObjectPool::new();
        for _ in 0..260 {
            let reclaimed = pool.collect(|_e, _m| {});
            assert!(reclaimed == 0);
            assert_ne!(pool.stats().last_epoch, 0);
        }
    }

    #[test]
    fn collect_is_safe_to_call_twice() {
        let pool = ManagedObjectPool::new();
        let cell: Rc<dyn ManagedCell> = Rc::new(Counter(ManagedHeader::new()));
        pool.register(cell);
        assert_eq!(pool.collect(|_e, _m| {}), 1);
        assert_eq!(pool.collect(|_e, _m| {}), 1); // cleanup is idempotent
    }

    #[test]
    fn mark_roots_receives_mark_value_closure() {
        let pool = ManagedObjectPool::new();
        let reclaimed = pool.collect(|epoch, mark| {
            mark(&Value::Fixnum(1), epoch);
        });
        assert_eq!(reclaimed, 0);
    }

    #[test]
    #[should_panic(expected = "re-entrantly")]
    fn collect_rejects_reentrant_calls() {
        let pool = ManagedObjectPool::new();
        pool.collect(|_epoch, _mark| {
            pool.collect(|_e, _m| {});
        });
    }

    #[test]
    fn self_referential_mpair_ring_with_no_external_reference_is_reclaimed() {
        let pool = ManagedObjectPool::new();
        let (mp, cell) = Value::mpair(Value::Null, Value::Null);
        *cell.car.borrow_mut() = mp.clone();
        *cell.cdr.borrow_mut() = mp.clone();
        pool.register(cell.clone() as Rc<dyn ManagedCell>);
        drop(mp);
        // Only the ring's own car/cdr point back at `cell` now; the pool's
        // reference is Weak, so Rc alone can never drop it.

        let reclaimed = pool.collect(|_epoch, _mark| {});
        assert_eq!(reclaimed, 1);
        assert!(matches!(*cell.car.borrow(), Value::Null));
        assert!(matches!(*cell.cdr.borrow(), Value::Null));

        // Safe to sweep again: the dead weak ref is simply pruned.
        let reclaimed_again = pool.collect(|_epoch, _mark| {});
        assert_eq!(reclaimed_again, 0);
        assert_eq!(pool.stats().tracked_count, 0);
    }

    #[test]
    fn managed_cell_handle_registers_and_collects_through_value() {
        let pool = ManagedObjectPool::new();
        let (boxed, cell) = Value::boxed(Value::Fixnum(42));
        let handle = boxed.managed_cell().expect("box is a managed cell");
        pool.register(handle);

        // Marked via the `Value` (not the raw cell), so this exercises the
        // same path an embedder's mark_roots callback would take.
        let reclaimed = pool.collect(|epoch, mark| mark(&boxed, epoch));
        assert_eq!(reclaimed, 0);
        assert_eq!(pool.stats().tracked_count, 1);
        assert!(matches!(*cell.slot.borrow(), Value::Fixnum(42)));

        // No root marks it this round, so the sweep cleans it up even
        // though `cell` is still a live Rc.
        let reclaimed = pool.collect(|_epoch, _mark| {});
        assert_eq!(reclaimed, 1);
        assert!(matches!(*cell.slot.borrow(), Value::Null));
    }
}
