//! `Value`: the tagged sum every Scheme datum is represented as.
//!
//! Immutable/by-value variants (fixnums, flonums, singletons, ...) carry
//! their payload inline, the way the teacher's own `Value` enum inlines
//! `Int`/`Float`/`Bool`. Mutable or identity-significant variants carry an
//! `Rc` handle to a heap cell instead — the single-threaded analogue of the
//! teacher's `Arc<VariantData>`/`Arc<ChannelData>` handles, since this core
//! runs a single-threaded cooperative executor rather than the teacher's
//! green-thread model. Every such handle that can participate in a
//! reference cycle carries a [`ManagedHeader`] so [`crate::pool`] can find
//! and break it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::pool::{ManagedCell, ManagedHeader};
use crate::symbol::SymbolId;

/// The domain type tag returned by [`type_of`], used to build contract-
/// violation error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undef,
    Void,
    Eof,
    Null,
    Boolean,
    Symbol,
    Uninit,
    Char,
    Fixnum,
    Bignum,
    Rational,
    Flonum,
    Complex,
    String,
    Bytes,
    Pair,
    MPair,
    Box,
    Vector,
    Array,
    Record,
    Table,
    Procedure,
    Special,
    Env,
    Port,
    Object,
    Promise,
    Error,
    Tagged,
    Syntax,
    Values,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Undef => "undef",
            ValueType::Void => "void",
            ValueType::Eof => "eof",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Symbol => "symbol",
            ValueType::Uninit => "uninit",
            ValueType::Char => "char",
            ValueType::Fixnum => "fixnum",
            ValueType::Bignum => "bignum",
            ValueType::Rational => "rational",
            ValueType::Flonum => "flonum",
            ValueType::Complex => "complex",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
            ValueType::Pair => "pair",
            ValueType::MPair => "mpair",
            ValueType::Box => "box",
            ValueType::Vector => "vector",
            ValueType::Array => "array",
            ValueType::Record => "record",
            ValueType::Table => "table",
            ValueType::Procedure => "procedure",
            ValueType::Special => "special",
            ValueType::Env => "env",
            ValueType::Port => "port",
            ValueType::Object => "object",
            ValueType::Promise => "promise",
            ValueType::Error => "error",
            ValueType::Tagged => "tagged",
            ValueType::Syntax => "syntax",
            ValueType::Values => "values",
        };
        write!(f, "{name}")
    }
}

/// Exact integer magnitude: a fixnum that still fits in `i64`, or a bignum
/// once it doesn't. Used as the numerator/denominator of a [`Value::Rational`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntMag {
    Fixnum(i64),
    Bignum(Rc<BigInt>),
}

impl IntMag {
    pub fn to_bigint(&self) -> BigInt {
        match self {
            IntMag::Fixnum(n) => BigInt::from(*n),
            IntMag::Bignum(b) => (**b).clone(),
        }
    }

    fn from_bigint(b: BigInt) -> IntMag {
        match b.to_i64() {
            Some(n) => IntMag::Fixnum(n),
            None => IntMag::Bignum(Rc::new(b)),
        }
    }

    fn is_one(&self) -> bool {
        matches!(self, IntMag::Fixnum(1))
            || matches!(self, IntMag::Bignum(b) if b.as_ref() == &BigInt::from(1))
    }
}

/// A one-slot mutable cell holding a `Value`. The same cell indirection used
/// by every mutable aggregate below: identity-comparable, shared between the
/// owning structure and any iterator holding a reference to one mapping's
/// value.
pub type Slot = Rc<RefCell<Value>>;

macro_rules! managed_cell {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }, $type_name:expr) => {
        #[derive(Debug)]
        pub struct $name {
            header: ManagedHeader,
            $(pub $field: $ty,)*
        }

        impl ManagedCell for $name {
            fn header(&self) -> &ManagedHeader {
                &self.header
            }

            fn mark_children(&self, epoch: u8) {
                self.mark_fields(epoch);
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn cleanup(&self) {
                self.sever();
            }
        }
    };
}

managed_cell!(MPairCell { car: RefCell<Value>, cdr: RefCell<Value> }, "mpair");
managed_cell!(BoxCell { slot: RefCell<Value> }, "box");
managed_cell!(VectorCell { items: RefCell<Vec<Value>>, growable: bool }, "vector");
managed_cell!(ArrayCell { items: Box<[Value]> }, "array");
managed_cell!(RecordCell { kind: SymbolId, fields: Box<[Value]> }, "record");

impl MPairCell {
    fn mark_fields(&self, epoch: u8) {
        mark(&self.car.borrow(), epoch);
        mark(&self.cdr.borrow(), epoch);
    }

    fn sever(&self) {
        *self.car.borrow_mut() = Value::Null;
        *self.cdr.borrow_mut() = Value::Null;
    }
}

impl BoxCell {
    fn mark_fields(&self, epoch: u8) {
        mark(&self.slot.borrow(), epoch);
    }

    fn sever(&self) {
        *self.slot.borrow_mut() = Value::Null;
    }
}

impl VectorCell {
    fn mark_fields(&self, epoch: u8) {
        for item in self.items.borrow().iter() {
            mark(item, epoch);
        }
    }

    fn sever(&self) {
        self.items.borrow_mut().clear();
    }
}

impl ArrayCell {
    fn mark_fields(&self, epoch: u8) {
        for item in self.items.iter() {
            mark(item, epoch);
        }
    }

    fn sever(&self) {
        // Array contents are immutable; cleanup cannot replace them in
        // place. Dropping the pool's last weak interest in this cell is
        // sufficient once its owner(s) drop their Rc — the cycle, if any,
        // runs through a *mutable* handle elsewhere in the ring, which that
        // handle's own cleanup severs.
    }
}

impl RecordCell {
    fn mark_fields(&self, epoch: u8) {
        for item in self.fields.iter() {
            mark(item, epoch);
        }
    }

    fn sever(&self) {
        // Same rationale as ArrayCell: fields are immutable after construction.
    }
}

/// The kind of opaque, VM-owned handle this cell stands in for. The core
/// treats all seven uniformly: it knows nothing about their shape beyond
/// "some `Value`s may be reachable through it" (`refs`), which is enough to
/// mark and, on cleanup, release them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Procedure,
    Special,
    Env,
    Port,
    Object,
    Promise,
    Error,
}

impl OpaqueKind {
    fn type_name(self) -> &'static str {
        match self {
            OpaqueKind::Procedure => "procedure",
            OpaqueKind::Special => "special",
            OpaqueKind::Env => "env",
            OpaqueKind::Port => "port",
            OpaqueKind::Object => "object",
            OpaqueKind::Promise => "promise",
            OpaqueKind::Error => "error",
        }
    }
}

/// An opaque handle: `procedure`, `special`, `env`, `port`, `object`,
/// `promise`, or `error`. These are compiler/VM/host concerns the core does
/// not implement — it only needs to track their identity, mark whatever
/// `Value`s they hold (`refs`), and sever those references on cleanup.
#[derive(Debug)]
pub struct OpaqueCell {
    header: ManagedHeader,
    pub kind: OpaqueKind,
    pub label: String,
    pub refs: RefCell<Vec<Value>>,
}

impl ManagedCell for OpaqueCell {
    fn header(&self) -> &ManagedHeader {
        &self.header
    }

    fn mark_children(&self, epoch: u8) {
        for v in self.refs.borrow().iter() {
            mark(v, epoch);
        }
    }

    fn cleanup(&self) {
        self.refs.borrow_mut().clear();
    }

    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Every Scheme datum: inline scalars and singletons, transparent composites
/// (`Pair`, `Tagged`, `Syntax`, `Values`), and heap handles to mutable or
/// identity-significant aggregates. Constructors for each variant live
/// below.
///
/// `Debug` is hand-written (below) rather than derived: a derived impl would
/// recurse field-by-field through `Rc<RefCell<Value>>` with no cycle guard,
/// looping forever on a self-referential `mpair` or `vector`.
#[derive(Clone)]
pub enum Value {
    Undef,
    Void,
    Eof,
    Null,
    True,
    False,
    Symbol(SymbolId),
    Uninit(SymbolId),
    Char(u16),
    Fixnum(i64),
    Bignum(Rc<BigInt>),
    Rational(Rc<(IntMag, IntMag)>),
    Flonum(f64),
    Complex(Rc<(f64, f64)>),
    Str(Rc<RefCell<String>>),
    Bytes(Rc<RefCell<Vec<u8>>>),
    Pair(Rc<(Value, Value)>),
    MPair(Rc<MPairCell>),
    Box(Rc<BoxCell>),
    Vector(Rc<VectorCell>),
    Array(Rc<ArrayCell>),
    Record(Rc<RecordCell>),
    Table(Rc<crate::hashtable::HashTable>),
    Procedure(Rc<OpaqueCell>),
    Special(Rc<OpaqueCell>),
    Env(Rc<OpaqueCell>),
    Port(Rc<OpaqueCell>),
    Object(Rc<OpaqueCell>),
    Promise(Rc<OpaqueCell>),
    Error(Rc<OpaqueCell>),
    Tagged(Rc<(Value, Value)>),
    Syntax(Rc<(SyntaxPos, Value)>),
    Values(Rc<Value>),
}

/// Source position carried by a `syntax` value. Compared by value, not by
/// handle identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxPos {
    pub line: u32,
    pub column: u32,
}

impl Value {
    pub fn fixnum(n: i64) -> Value {
        Value::Fixnum(n)
    }

    pub fn bignum(b: BigInt) -> Value {
        normalized(&Value::Bignum(Rc::new(b)))
    }

    pub fn rational(num: IntMag, den: IntMag) -> Value {
        let (n, d) = reduce_rational(num, den);
        normalized(&Value::Rational(Rc::new((n, d))))
    }

    pub fn flonum(f: f64) -> Value {
        Value::Flonum(f)
    }

    pub fn complex(re: f64, im: f64) -> Value {
        normalized(&Value::Complex(Rc::new((re, im))))
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(SymbolId::intern(name))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(RefCell::new(s.into())))
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Value {
        Value::Bytes(Rc::new(RefCell::new(b.into())))
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new((car, cdr)))
    }

    pub fn list(items: Vec<Value>) -> Value {
        let mut tail = Value::Null;
        for item in items.into_iter().rev() {
            tail = Value::cons(item, tail);
        }
        tail
    }

    pub fn mpair(car: Value, cdr: Value) -> (Value, Rc<MPairCell>) {
        let cell = Rc::new(MPairCell {
            header: ManagedHeader::new(),
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
        });
        (Value::MPair(cell.clone()), cell)
    }

    pub fn boxed(v: Value) -> (Value, Rc<BoxCell>) {
        let cell = Rc::new(BoxCell {
            header: ManagedHeader::new(),
            slot: RefCell::new(v),
        });
        (Value::Box(cell.clone()), cell)
    }

    pub fn vector(items: Vec<Value>, growable: bool) -> (Value, Rc<VectorCell>) {
        let cell = Rc::new(VectorCell {
            header: ManagedHeader::new(),
            items: RefCell::new(items),
            growable,
        });
        (Value::Vector(cell.clone()), cell)
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(ArrayCell {
            header: ManagedHeader::new(),
            items: items.into_boxed_slice(),
        }))
    }

    pub fn record(kind: SymbolId, fields: Vec<Value>) -> Value {
        Value::Record(Rc::new(RecordCell {
            header: ManagedHeader::new(),
            kind,
            fields: fields.into_boxed_slice(),
        }))
    }

    pub fn opaque(kind: OpaqueKind, label: impl Into<String>, refs: Vec<Value>) -> Value {
        let cell = Rc::new(OpaqueCell {
            header: ManagedHeader::new(),
            kind,
            label: label.into(),
            refs: RefCell::new(refs),
        });
        match kind {
            OpaqueKind::Procedure => Value::Procedure(cell),
            OpaqueKind::Special => Value::Special(cell),
            OpaqueKind::Env => Value::Env(cell),
            OpaqueKind::Port => Value::Port(cell),
            OpaqueKind::Object => Value::Object(cell),
            OpaqueKind::Promise => Value::Promise(cell),
            OpaqueKind::Error => Value::Error(cell),
        }
    }

    /// Build a `Value::Error` — the typed error value contract violations
    /// surface as, rather than a panic.
    pub fn error(message: impl Into<String>) -> Value {
        Value::opaque(OpaqueKind::Error, message, Vec::new())
    }

    pub fn tagged(tag: Value, payload: Value) -> Value {
        Value::Tagged(Rc::new((tag, payload)))
    }

    pub fn syntax(pos: SyntaxPos, v: Value) -> Value {
        Value::Syntax(Rc::new((pos, v)))
    }

    pub fn values(v: Value) -> Value {
        Value::Values(Rc::new(v))
    }

    /// The cell this value's mark/cleanup lifecycle is tied to, if any.
    /// `None` for by-value variants and for `string`/`bytes`, which cannot
    /// hold other `Value`s and therefore can never be part of a cycle.
    pub fn managed_cell(&self) -> Option<Rc<dyn ManagedCell>> {
        match self {
            Value::MPair(c) => Some(c.clone()),
            Value::Box(c) => Some(c.clone()),
            Value::Vector(c) => Some(c.clone()),
            Value::Array(c) => Some(c.clone()),
            Value::Record(c) => Some(c.clone()),
            Value::Table(c) => Some(c.clone()),
            Value::Procedure(c)
            | Value::Special(c)
            | Value::Env(c)
            | Value::Port(c)
            | Value::Object(c)
            | Value::Promise(c)
            | Value::Error(c) => Some(c.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::display::write(self))
    }
}

/// Delegates to the same cycle-safe renderer as `Display` (see the doc
/// comment on the `Value` enum).
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::display::write(self))
    }
}

/// `type(v)` — the domain type tag.
pub fn type_of(v: &Value) -> ValueType {
    match v {
        Value::Undef => ValueType::Undef,
        Value::Void => ValueType::Void,
        Value::Eof => ValueType::Eof,
        Value::Null => ValueType::Null,
        Value::True | Value::False => ValueType::Boolean,
        Value::Symbol(_) => ValueType::Symbol,
        Value::Uninit(_) => ValueType::Uninit,
        Value::Char(_) => ValueType::Char,
        Value::Fixnum(_) => ValueType::Fixnum,
        Value::Bignum(_) => ValueType::Bignum,
        Value::Rational(_) => ValueType::Rational,
        Value::Flonum(_) => ValueType::Flonum,
        Value::Complex(_) => ValueType::Complex,
        Value::Str(_) => ValueType::String,
        Value::Bytes(_) => ValueType::Bytes,
        Value::Pair(_) => ValueType::Pair,
        Value::MPair(_) => ValueType::MPair,
        Value::Box(_) => ValueType::Box,
        Value::Vector(_) => ValueType::Vector,
        Value::Array(_) => ValueType::Array,
        Value::Record(_) => ValueType::Record,
        Value::Table(_) => ValueType::Table,
        Value::Procedure(_) => ValueType::Procedure,
        Value::Special(_) => ValueType::Special,
        Value::Env(_) => ValueType::Env,
        Value::Port(_) => ValueType::Port,
        Value::Object(_) => ValueType::Object,
        Value::Promise(_) => ValueType::Promise,
        Value::Error(_) => ValueType::Error,
        Value::Tagged(_) => ValueType::Tagged,
        Value::Syntax(_) => ValueType::Syntax,
        Value::Values(_) => ValueType::Values,
    }
}

/// All values are truthy except the `false` singleton.
pub fn is_truthy(v: &Value) -> bool {
    !matches!(v, Value::False)
}

fn gcd_bigint(a: BigInt, b: BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn reduce_rational(num: IntMag, den: IntMag) -> (IntMag, IntMag) {
    let mut n = num.to_bigint();
    let mut d = den.to_bigint();
    if d.is_negative() {
        n = -n;
        d = -d;
    }
    let g = gcd_bigint(n.clone(), d.clone());
    if !g.is_zero() && g != BigInt::from(1) {
        n /= &g;
        d /= &g;
    }
    (IntMag::from_bigint(n), IntMag::from_bigint(d))
}

/// `normalized(v)` — canonical numeric form; identity elsewhere.
/// Idempotent: applying it twice yields the same result as applying it once.
pub fn normalized(v: &Value) -> Value {
    match v {
        Value::Bignum(b) => match b.to_i64() {
            Some(n) => Value::Fixnum(n),
            None => v.clone(),
        },
        Value::Rational(r) => {
            let (num, den) = r.as_ref();
            if den.is_one() {
                match num {
                    IntMag::Fixnum(n) => Value::Fixnum(*n),
                    IntMag::Bignum(b) => normalized(&Value::Bignum(b.clone())),
                }
            } else {
                v.clone()
            }
        }
        Value::Complex(c) => {
            let (re, im) = **c;
            if im == 0.0 && !re.is_nan() {
                Value::Flonum(re)
            } else {
                v.clone()
            }
        }
        _ => v.clone(),
    }
}

/// `requires_tracking(v)` — true if `v` contains any `(H)` handle that may
/// cycle; pairs (and the other transparent wrappers) recurse into their
/// children. `string`/`bytes` are `(H)` but hold only raw content — never a
/// `Value` — so they can never be part of a cycle and are excluded.
pub fn requires_tracking(v: &Value) -> bool {
    match v {
        Value::MPair(_)
        | Value::Box(_)
        | Value::Vector(_)
        | Value::Array(_)
        | Value::Record(_)
        | Value::Table(_)
        | Value::Procedure(_)
        | Value::Special(_)
        | Value::Env(_)
        | Value::Port(_)
        | Value::Object(_)
        | Value::Promise(_)
        | Value::Error(_) => true,
        Value::Pair(p) => requires_tracking(&p.0) || requires_tracking(&p.1),
        Value::Tagged(t) => requires_tracking(&t.0) || requires_tracking(&t.1),
        Value::Syntax(s) => requires_tracking(&s.1),
        Value::Values(v) => requires_tracking(v),
        _ => false,
    }
}

/// `mark(v, epoch)` — descend into `(H)` children and set their tag; never
/// revisits a handle already at this epoch. Transparent wrappers
/// (`pair`, `tagged`, `syntax`, `values`) are not themselves managed cells,
/// but marking must still walk through them to reach any managed handle
/// they hold.
pub fn mark(v: &Value, epoch: u8) {
    match v {
        Value::MPair(c) => c.mark(epoch),
        Value::Box(c) => c.mark(epoch),
        Value::Vector(c) => c.mark(epoch),
        Value::Array(c) => c.mark(epoch),
        Value::Record(c) => c.mark(epoch),
        Value::Table(c) => c.mark(epoch),
        Value::Procedure(c)
        | Value::Special(c)
        | Value::Env(c)
        | Value::Port(c)
        | Value::Object(c)
        | Value::Promise(c)
        | Value::Error(c) => c.mark(epoch),
        Value::Pair(p) => {
            mark(&p.0, epoch);
            mark(&p.1, epoch);
        }
        Value::Tagged(t) => {
            mark(&t.0, epoch);
            mark(&t.1, epoch);
        }
        Value::Syntax(s) => mark(&s.1, epoch),
        Value::Values(v) => mark(v, epoch),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bignum_that_fits_fixnum_normalizes() {
        let v = Value::bignum(BigInt::from(42));
        assert!(matches!(v, Value::Fixnum(42)));
    }

    #[test]
    fn bignum_that_does_not_fit_stays_bignum() {
        let huge = BigInt::from(i64::MAX) * BigInt::from(4);
        let v = Value::bignum(huge.clone());
        match v {
            Value::Bignum(b) => assert_eq!(*b, huge),
            _ => panic!("expected Bignum"),
        }
    }

    #[test]
    fn rational_reduces_to_lowest_terms() {
        let v = Value::rational(IntMag::Fixnum(4), IntMag::Fixnum(2));
        assert!(matches!(v, Value::Fixnum(2)));

        let v = Value::rational(IntMag::Fixnum(2), IntMag::Fixnum(4));
        match v {
            Value::Rational(r) => {
                assert_eq!(r.0, IntMag::Fixnum(1));
                assert_eq!(r.1, IntMag::Fixnum(2));
            }
            _ => panic!("expected Rational"),
        }
    }

    #[test]
    fn rational_denominator_sign_normalized() {
        let v = Value::rational(IntMag::Fixnum(1), IntMag::Fixnum(-2));
        match v {
            Value::Rational(r) => {
                assert_eq!(r.0, IntMag::Fixnum(-1));
                assert_eq!(r.1, IntMag::Fixnum(2));
            }
            _ => panic!("expected Rational"),
        }
    }

    #[test]
    fn complex_with_zero_imaginary_normalizes_to_flonum() {
        let v = Value::complex(3.5, 0.0);
        assert!(matches!(v, Value::Flonum(f) if f == 3.5));
    }

    #[test]
    fn complex_with_nonzero_imaginary_stays_complex() {
        let v = Value::complex(1.0, 2.0);
        assert!(matches!(v, Value::Complex(_)));
    }

    #[test]
    fn is_truthy_excludes_only_false() {
        assert!(is_truthy(&Value::True));
        assert!(is_truthy(&Value::Null));
        assert!(is_truthy(&Value::Fixnum(0)));
        assert!(!is_truthy(&Value::False));
    }

    #[test]
    fn requires_tracking_excludes_strings_and_scalars() {
        assert!(!requires_tracking(&Value::string("hi")));
        assert!(!requires_tracking(&Value::Fixnum(1)));
        let (v, _) = Value::boxed(Value::Fixnum(1));
        assert!(requires_tracking(&v));
    }

    #[test]
    fn requires_tracking_recurses_through_pairs() {
        let (boxed, _) = Value::boxed(Value::Fixnum(1));
        let pair = Value::cons(Value::Fixnum(1), boxed);
        assert!(requires_tracking(&pair));

        let plain_pair = Value::cons(Value::Fixnum(1), Value::Fixnum(2));
        assert!(!requires_tracking(&plain_pair));
    }

    #[test]
    fn mark_sets_tag_on_managed_handle() {
        let (v, cell) = Value::boxed(Value::Fixnum(1));
        assert_eq!(cell.tag(), 0);
        mark(&v, 7);
        assert_eq!(cell.tag(), 7);
    }

    #[test]
    fn mark_is_idempotent_within_one_epoch_even_through_a_cycle() {
        let (mp, cell) = Value::mpair(Value::Null, Value::Null);
        *cell.car.borrow_mut() = mp.clone();
        *cell.cdr.borrow_mut() = mp.clone();
        // Self-referential mpair: marking must terminate.
        mark(&mp, 3);
        assert_eq!(cell.tag(), 3);
    }

    #[test]
    fn list_builds_proper_list() {
        let l = Value::list(vec![Value::Fixnum(1), Value::Fixnum(2), Value::Fixnum(3)]);
        match &l {
            Value::Pair(p) => assert!(matches!(p.0, Value::Fixnum(1))),
            _ => panic!("expected pair"),
        }
    }
}
