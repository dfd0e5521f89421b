//! Textual rendering: `display` (human-readable) and `write`
//! (machine-readable) both walk the same structure, differing only in how
//! strings and characters are rendered. Shared or cyclic `(H)` aggregates
//! are detected by a first pass that counts handle-pointer encounters, then
//! labeled with `#N=`/`#N#` back-references during the render pass so the
//! output is always finite even for a value that contains itself.
//!
//! Pairs are not label-eligible: built only by `cons`, they carry no
//! interior mutability, so no pair can ever reference itself or a pair
//! constructed after it — sharing/cycles can only enter through an `(H)`
//! handle reachable from a pair's car or cdr.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::{ArrayCell, BoxCell, RecordCell, VectorCell};
use crate::value::Value;

fn handle_ptr(v: &Value) -> Option<usize> {
    match v {
        Value::MPair(c) => Some(Rc::as_ptr(c) as usize),
        Value::Box(c) => Some(Rc::as_ptr(c) as usize),
        Value::Vector(c) => Some(Rc::as_ptr(c) as usize),
        Value::Array(c) => Some(Rc::as_ptr(c) as usize),
        Value::Record(c) => Some(Rc::as_ptr(c) as usize),
        Value::Table(c) => Some(Rc::as_ptr(c) as usize),
        _ => None,
    }
}

fn scan(v: &Value, counts: &mut HashMap<usize, u32>) {
    if let Some(ptr) = handle_ptr(v) {
        let count = counts.entry(ptr).or_insert(0);
        *count += 1;
        if *count > 1 {
            return; // already descended once, or mid-cycle: stop here
        }
    }
    scan_children(v, counts);
}

fn scan_children(v: &Value, counts: &mut HashMap<usize, u32>) {
    match v {
        Value::Pair(p) => {
            scan(&p.0, counts);
            scan(&p.1, counts);
        }
        Value::MPair(c) => {
            scan(&c.car.borrow(), counts);
            scan(&c.cdr.borrow(), counts);
        }
        Value::Box(c) => scan(&c.slot.borrow(), counts),
        Value::Vector(c) => {
            for item in c.items.borrow().iter() {
                scan(item, counts);
            }
        }
        Value::Array(c) => {
            for item in c.items.iter() {
                scan(item, counts);
            }
        }
        Value::Record(c) => {
            for item in c.fields.iter() {
                scan(item, counts);
            }
        }
        Value::Table(c) => {
            for (k, val) in c.entries_vec() {
                scan(&k, counts);
                scan(&val, counts);
            }
        }
        Value::Tagged(t) => {
            scan(&t.0, counts);
            scan(&t.1, counts);
        }
        Value::Syntax(s) => scan(&s.1, counts),
        Value::Values(inner) => scan(inner, counts),
        _ => {}
    }
}

struct Renderer<'a> {
    counts: HashMap<usize, u32>,
    labels: HashMap<usize, u32>,
    next_id: u32,
    quoted: bool,
    abort: Option<&'a dyn Fn() -> bool>,
    aborted: bool,
}

impl<'a> Renderer<'a> {
    fn render(&mut self, v: &Value, out: &mut String) {
        if self.aborted {
            return;
        }
        if let Some(probe) = self.abort {
            if probe() {
                self.aborted = true;
                out.push_str("...");
                return;
            }
        }
        if let Some(ptr) = handle_ptr(v) {
            if self.counts.get(&ptr).copied().unwrap_or(0) >= 2 {
                if let Some(&id) = self.labels.get(&ptr) {
                    out.push_str(&format!("#{id}#"));
                    return;
                }
                let id = self.next_id;
                self.next_id += 1;
                self.labels.insert(ptr, id);
                out.push_str(&format!("#{id}="));
                self.render_content(v, out);
                return;
            }
        }
        self.render_content(v, out);
    }

    fn render_content(&mut self, v: &Value, out: &mut String) {
        match v {
            Value::Undef => out.push_str("#<undef>"),
            Value::Void => out.push_str("#<void>"),
            Value::Eof => out.push_str("#<eof>"),
            Value::Null => out.push_str("()"),
            Value::True => out.push_str("#t"),
            Value::False => out.push_str("#f"),
            Value::Symbol(s) => out.push_str(&s.name()),
            Value::Uninit(s) => out.push_str(&format!("#<uninit {}>", s.name())),
            Value::Char(c) => {
                if self.quoted {
                    out.push_str(&char_literal(*c));
                } else if let Some(ch) = char::from_u32(*c as u32) {
                    out.push(ch);
                } else {
                    out.push_str(&char_literal(*c));
                }
            }
            Value::Fixnum(n) => out.push_str(&n.to_string()),
            Value::Bignum(b) => out.push_str(&b.to_string()),
            Value::Rational(r) => {
                out.push_str(&r.0.to_bigint().to_string());
                out.push('/');
                out.push_str(&r.1.to_bigint().to_string());
            }
            Value::Flonum(f) => out.push_str(&format_flonum(*f)),
            Value::Complex(c) => out.push_str(&format_complex(c.0, c.1)),
            Value::Str(s) => {
                if self.quoted {
                    out.push_str(&escape_string(&s.borrow()));
                } else {
                    out.push_str(&s.borrow());
                }
            }
            Value::Bytes(b) => {
                out.push_str("#u8(");
                for (i, byte) in b.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&byte.to_string());
                }
                out.push(')');
            }
            Value::Pair(p) => self.render_pair(&p.0, &p.1, out),
            Value::MPair(c) => self.render_pair(&c.car.borrow(), &c.cdr.borrow(), out),
            Value::Box(c) => self.render_box(c, out),
            Value::Vector(c) => self.render_vector(c, out),
            Value::Array(c) => self.render_array(c, out),
            Value::Record(c) => self.render_record(c, out),
            Value::Table(c) => out.push_str(&format!("#<table count={}>", c.count())),
            Value::Procedure(c) => out.push_str(&format!("#<procedure {}>", c.label)),
            Value::Special(c) => out.push_str(&format!("#<special {}>", c.label)),
            Value::Env(c) => out.push_str(&format!("#<environment {}>", c.label)),
            Value::Port(c) => out.push_str(&format!("#<port {}>", c.label)),
            Value::Object(c) => out.push_str(&format!("#<object {}>", c.label)),
            Value::Promise(c) => out.push_str(&format!("#<promise {}>", c.label)),
            Value::Error(c) => out.push_str(&format!("#<error {}>", c.label)),
            Value::Tagged(t) => {
                out.push_str("#tagged(");
                self.render(&t.0, out);
                out.push(' ');
                self.render(&t.1, out);
                out.push(')');
            }
            Value::Syntax(s) => {
                out.push_str(&format!("#<syntax {}:{} ", s.0.line, s.0.column));
                self.render(&s.1, out);
                out.push('>');
            }
            Value::Values(inner) => {
                out.push_str("(values ");
                self.render(inner, out);
                out.push(')');
            }
        }
    }

    fn render_pair(&mut self, car: &Value, cdr: &Value, out: &mut String) {
        out.push('(');
        self.render(car, out);
        let mut cur = cdr.clone();
        loop {
            if self.aborted {
                break;
            }
            match cur {
                Value::Null => break,
                Value::Pair(p2) => {
                    out.push(' ');
                    self.render(&p2.0, out);
                    cur = p2.1.clone();
                }
                other => {
                    out.push_str(" . ");
                    self.render(&other, out);
                    break;
                }
            }
        }
        out.push(')');
    }

    fn render_box(&mut self, c: &Rc<BoxCell>, out: &mut String) {
        out.push_str("#&");
        self.render(&c.slot.borrow(), out);
    }

    fn render_vector(&mut self, c: &Rc<VectorCell>, out: &mut String) {
        out.push_str("#(");
        for (i, item) in c.items.borrow().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.render(item, out);
        }
        out.push(')');
    }

    fn render_array(&mut self, c: &Rc<ArrayCell>, out: &mut String) {
        out.push_str("#array(");
        for (i, item) in c.items.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.render(item, out);
        }
        out.push(')');
    }

    fn render_record(&mut self, c: &Rc<RecordCell>, out: &mut String) {
        out.push_str(&format!("#<{}", c.kind.name()));
        for item in c.fields.iter() {
            out.push(' ');
            self.render(item, out);
        }
        out.push('>');
    }
}

fn char_literal(code: u16) -> String {
    let named = match code {
        0x00 => Some("null"),
        0x07 => Some("alarm"),
        0x08 => Some("backspace"),
        0x09 => Some("tab"),
        0x0A => Some("newline"),
        0x0B => Some("vtab"),
        0x0C => Some("page"),
        0x0D => Some("return"),
        0x1B => Some("escape"),
        0x20 => Some("space"),
        0x7F => Some("delete"),
        _ => None,
    };
    if let Some(name) = named {
        return format!("#\\{name}");
    }
    match char::from_u32(code as u32) {
        Some(c) if !c.is_control() => format!("#\\{c}"),
        _ => format!("#\\u{code:X}"),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{B}' => out.push_str("\\v"),
            '\u{C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1B}' => out.push_str("\\e"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_flonum(f: f64) -> String {
    if f.is_nan() {
        return "+nan.0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+inf.0".to_string() } else { "-inf.0".to_string() };
    }
    let s = format!("{f}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

fn format_complex(re: f64, im: f64) -> String {
    let re_s = format_flonum(re);
    let im_s = format_flonum(im);
    let sign = if im_s.starts_with('-') || im_s.starts_with('+') {
        ""
    } else {
        "+"
    };
    format!("{re_s}{sign}{im_s}i")
}

fn render(v: &Value, quoted: bool, abort: Option<&dyn Fn() -> bool>) -> String {
    let mut counts = HashMap::new();
    scan(v, &mut counts);
    let mut r = Renderer {
        counts,
        labels: HashMap::new(),
        next_id: 0,
        quoted,
        abort,
        aborted: false,
    };
    let mut out = String::new();
    r.render(v, &mut out);
    out
}

/// `write(v)` — machine-readable form: strings quoted/escaped, characters as
/// `#\name` literals.
pub fn write(v: &Value) -> String {
    render(v, true, None)
}

/// `display(v)` — human-readable form: strings and characters print raw.
pub fn display(v: &Value) -> String {
    render(v, false, None)
}

/// `write`, but checked against an abort probe between recursive steps:
/// when the probe returns `true`, rendering stops and the partial text ends
/// with `...` rather than completing, so a long-running traversal can be
/// cancelled without throwing or panicking.
pub fn write_with_abort(v: &Value, abort: Option<&dyn Fn() -> bool>) -> String {
    render(v, true, abort)
}

/// `display`, but checked against an abort probe — see [`write_with_abort`].
pub fn display_with_abort(v: &Value, abort: Option<&dyn Fn() -> bool>) -> String {
    render(v, false, abort)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_quotes_strings_and_escapes_control_chars() {
        let s = Value::string("a\nb\"c");
        assert_eq!(write(&s), "\"a\\nb\\\"c\"");
    }

    #[test]
    fn display_does_not_quote_strings() {
        let s = Value::string("hello");
        assert_eq!(display(&s), "hello");
    }

    #[test]
    fn write_proper_list() {
        let l = Value::list(vec![Value::Fixnum(1), Value::Fixnum(2), Value::Fixnum(3)]);
        assert_eq!(write(&l), "(1 2 3)");
    }

    #[test]
    fn write_dotted_pair() {
        let p = Value::cons(Value::Fixnum(1), Value::Fixnum(2));
        assert_eq!(write(&p), "(1 . 2)");
    }

    #[test]
    fn write_improper_list_tail() {
        let tail = Value::cons(Value::Fixnum(3), Value::Fixnum(99));
        let l = Value::cons(Value::Fixnum(1), Value::cons(Value::Fixnum(2), tail));
        assert_eq!(write(&l), "(1 2 3 . 99)");
    }

    #[test]
    fn write_named_char_literals() {
        assert_eq!(write(&Value::Char(0x20)), "#\\space");
        assert_eq!(write(&Value::Char(0x0A)), "#\\newline");
        assert_eq!(write(&Value::Char('a' as u16)), "#\\a");
    }

    #[test]
    fn write_surrogate_char_as_hex() {
        assert_eq!(write(&Value::Char(0xD800)), "#\\uD800");
    }

    #[test]
    fn write_flonum_specials() {
        assert_eq!(write(&Value::Flonum(f64::INFINITY)), "+inf.0");
        assert_eq!(write(&Value::Flonum(f64::NEG_INFINITY)), "-inf.0");
        assert_eq!(write(&Value::Flonum(f64::NAN)), "+nan.0");
        assert_eq!(write(&Value::Flonum(3.0)), "3.0");
    }

    #[test]
    fn write_self_referential_vector_is_labeled_and_finite() {
        let (v, cell) = Value::vector(vec![Value::Null], false);
        cell.items.borrow_mut()[0] = v.clone();
        assert_eq!(write(&v), "#0=#(#0#)");
    }

    #[test]
    fn write_shared_but_acyclic_vector_labels_both_occurrences() {
        let (shared, _) = Value::vector(vec![Value::Fixnum(1)], false);
        let l = Value::list(vec![shared.clone(), shared]);
        assert_eq!(write(&l), "(#0=#(1) #0#)");
    }

    #[test]
    fn abort_probe_truncates_write_with_ellipsis() {
        let l = Value::list(vec![Value::Fixnum(1), Value::Fixnum(2), Value::Fixnum(3)]);
        let probe = || true;
        assert_eq!(write_with_abort(&l, Some(&probe)), "...");
    }

    #[test]
    fn write_mpair_ring_terminates() {
        let (a, cell) = Value::mpair(Value::Null, Value::Null);
        *cell.car.borrow_mut() = a.clone();
        *cell.cdr.borrow_mut() = a.clone();
        let rendered = write(&a);
        assert!(rendered.starts_with("#0=("));
        assert!(rendered.contains("#0#"));
    }
}
