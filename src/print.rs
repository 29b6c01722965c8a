// Copyright 2019 Matthieu Felix
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! print.rs - Prints a `Function`/`Expression` back out in canonical
//! Unlambda syntax, mirroring `print_fun`/`print_expr` in the reference
//! implementation: `` ` `` prefixes every application, lettered singletons
//! print as themselves, `.x`/`r` print the dot combinators, and reified
//! continuations print as the opaque `<cont>` token (they have no source
//! syntax of their own).

use crate::value::{Expression, Function};

pub fn format_function(f: &Function) -> String {
    let mut out = String::new();
    write_function(f, &mut out);
    out
}

pub fn format_expression(e: &Expression) -> String {
    let mut out = String::new();
    write_expression(e, &mut out);
    out
}

fn write_function(f: &Function, out: &mut String) {
    match f {
        Function::K => out.push('k'),
        Function::K1(x) => {
            out.push_str("`k");
            write_function(x, out);
        }
        Function::S => out.push('s'),
        Function::S1(x) => {
            out.push_str("`s");
            write_function(x, out);
        }
        Function::S2(x, y) => {
            out.push_str("``s");
            write_function(x, out);
            write_function(y, out);
        }
        Function::I => out.push('i'),
        Function::V => out.push('v'),
        Function::D => out.push('d'),
        Function::D1(e) => {
            out.push_str("`d");
            write_expression(e, out);
        }
        Function::Dot(b'\n') => out.push('r'),
        Function::Dot(c) => {
            out.push('.');
            push_byte(*c, out);
        }
        Function::C => out.push('c'),
        Function::Cont(_) => out.push_str("<cont>"),
        Function::E => out.push('e'),
        Function::At => out.push('@'),
        Function::Question(c) => {
            out.push('?');
            push_byte(*c, out);
        }
        Function::Pipe => out.push('|'),
    }
}

fn write_expression(e: &Expression, out: &mut String) {
    match e {
        Expression::Function(f) => write_function(f, out),
        Expression::Application(func, arg) => {
            out.push('`');
            write_expression(func, out);
            write_expression(arg, out);
        }
    }
}

/// Unlambda's `.x` takes `x` as a raw byte; non-ASCII bytes have no single
/// `char` rendering, so we fall back to a `\xNN` escape purely for display.
fn push_byte(b: u8, out: &mut String) {
    if b.is_ascii() {
        out.push(b as char);
    } else {
        out.push_str(&format!("\\x{:02x}", b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_program;

    fn roundtrip(s: &str) {
        let expr = parse_program(s.as_bytes()).unwrap();
        assert_eq!(format_expression(&expr), s);
    }

    #[test]
    fn singletons_roundtrip() {
        for s in ["k", "s", "i", "v", "d", "c", "e", "@", "|"] {
            roundtrip(s);
        }
    }

    #[test]
    fn dot_and_r_roundtrip() {
        roundtrip(".H");
        roundtrip("r");
        roundtrip("?x");
    }

    #[test]
    fn application_roundtrips() {
        roundtrip("```skss");
        roundtrip("`.Hi");
    }

    #[test]
    fn k1_prints_nested() {
        use std::rc::Rc;
        let k1 = Function::K1(Rc::new(Function::I));
        assert_eq!(format_function(&k1), "`ki");
    }

    #[test]
    fn s2_prints_nested() {
        use std::rc::Rc;
        let s2 = Function::S2(Rc::new(Function::K), Rc::new(Function::S));
        assert_eq!(format_function(&s2), "``sks");
    }

    #[test]
    fn cont_prints_opaque() {
        use crate::value::Continuation;
        use std::rc::Rc;
        let cont = Function::Cont(Rc::new(Continuation::Term));
        assert_eq!(format_function(&cont), "<cont>");
    }
}
