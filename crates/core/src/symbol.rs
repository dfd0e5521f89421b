//! Symbol interning.
//!
//! Symbols compare `eq` iff identical, so interning them into a flat table
//! and comparing the resulting index is both correct and O(1) — no string
//! comparison is ever needed once a symbol exists as a `SymbolId`.
//!
//! The table is thread-local rather than behind a `Mutex`: this core runs a
//! single-threaded cooperative executor, so there is exactly one table per
//! process in practice, modeled the way the teacher crate keeps its runtime
//! error slot thread-local rather than reaching for a global `Mutex`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An interned symbol. Two `SymbolId`s are equal iff they name the same
/// interned string — identity comparison is just `==` on the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Intern `name`, returning the existing id if already interned.
    pub fn intern(name: &str) -> SymbolId {
        SYMBOLS.with(|table| table.borrow_mut().intern(name))
    }

    /// The interned string this id names.
    pub fn name(self) -> Rc<str> {
        SYMBOLS.with(|table| table.borrow().name(self))
    }

    /// Raw numeric index, for embedders that want a stable small integer.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Default)]
struct SymbolTable {
    names: Vec<Rc<str>>,
    ids: HashMap<Rc<str>, u32>,
}

impl SymbolTable {
    fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return SymbolId(id);
        }
        let rc: Rc<str> = Rc::from(name);
        let id = self.names.len() as u32;
        self.names.push(rc.clone());
        self.ids.insert(rc, id);
        SymbolId(id)
    }

    fn name(&self, id: SymbolId) -> Rc<str> {
        self.names[id.0 as usize].clone()
    }
}

thread_local! {
    static SYMBOLS: RefCell<SymbolTable> = RefCell::new(SymbolTable::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = SymbolId::intern("foo");
        let b = SymbolId::intern("foo");
        assert_eq!(a, b);
        let c = SymbolId::intern("bar");
        assert_ne!(a, c);
    }

    #[test]
    fn name_round_trips() {
        let id = SymbolId::intern("hello-world");
        assert_eq!(&*id.name(), "hello-world");
    }
}
