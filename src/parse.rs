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

//! parse.rs - Parsing utilities
//! Reads an Unlambda program from a byte buffer into a syntax tree,
//! reporting the byte and position of any error. The grammar operates on
//! raw bytes rather than Unicode scalar values: a `.x`/`?x` atom's payload
//! and the latch it eventually feeds are both single bytes, not codepoints.

use std::iter::Peekable;
use std::rc::Rc;

use crate::error::ParseError;
use crate::value::{Expression, Function};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Atom {
    I,
    K,
    S,
    V,
    D,
    C,
    E,
    At,
    Pipe,
    Dot(u8),
    Question(u8),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SyntaxTree {
    Atom(Atom),
    Application(Box<SyntaxTree>, Box<SyntaxTree>),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BytePos {
    pub byte: u8,
    pub position: (usize, usize),
}

fn read_to_newline<I: Iterator<Item = BytePos>>(iterator: &mut Peekable<I>) {
    for bp in iterator {
        if bp.byte == b'\n' {
            return;
        }
    }
}

fn consume_whitespace<I: Iterator<Item = BytePos>>(iterator: &mut Peekable<I>) {
    loop {
        match iterator.peek() {
            Some(bp) if bp.byte == b'#' => read_to_newline(iterator),
            Some(bp) if bp.byte.is_ascii_whitespace() => {
                iterator.next().unwrap();
            }
            _ => break,
        }
    }
}

fn parse<I: Iterator<Item = BytePos>>(
    iterator: &mut Peekable<I>,
) -> Result<SyntaxTree, ParseError> {
    consume_whitespace(iterator);
    let token = iterator.next().ok_or(ParseError::UnexpectedEof)?;
    match token.byte.to_ascii_lowercase() {
        b'k' => Ok(SyntaxTree::Atom(Atom::K)),
        b's' => Ok(SyntaxTree::Atom(Atom::S)),
        b'i' => Ok(SyntaxTree::Atom(Atom::I)),
        b'v' => Ok(SyntaxTree::Atom(Atom::V)),
        b'd' => Ok(SyntaxTree::Atom(Atom::D)),
        b'c' => Ok(SyntaxTree::Atom(Atom::C)),
        b'e' => Ok(SyntaxTree::Atom(Atom::E)),
        b'@' => Ok(SyntaxTree::Atom(Atom::At)),
        b'|' => Ok(SyntaxTree::Atom(Atom::Pipe)),
        b'r' => Ok(SyntaxTree::Atom(Atom::Dot(b'\n'))),
        b'?' => {
            let (line, column) = token.position;
            iterator
                .next()
                .map(|bp| SyntaxTree::Atom(Atom::Question(bp.byte)))
                .ok_or(ParseError::UnexpectedEofAfter {
                    after: '?',
                    line,
                    column,
                })
        }
        b'.' => {
            let (line, column) = token.position;
            iterator
                .next()
                .map(|bp| SyntaxTree::Atom(Atom::Dot(bp.byte)))
                .ok_or(ParseError::UnexpectedEofAfter {
                    after: '.',
                    line,
                    column,
                })
        }
        b'`' => {
            let func = parse(iterator)?;
            let arg = parse(iterator)?;
            Ok(SyntaxTree::Application(Box::new(func), Box::new(arg)))
        }
        _ => {
            let (line, column) = token.position;
            Err(ParseError::UnexpectedByte {
                byte: token.byte,
                line,
                column,
            })
        }
    }
}

pub fn parse_toplevel<I: Iterator<Item = BytePos>>(
    iterator: &mut Peekable<I>,
) -> Result<SyntaxTree, ParseError> {
    let res = parse(iterator)?;
    consume_whitespace(iterator);
    if let Some(bp) = iterator.next() {
        let (line, column) = bp.position;
        Err(ParseError::TrailingInput { line, column })
    } else {
        Ok(res)
    }
}

pub struct BytePosIterator<I: Iterator<Item = u8>> {
    bytes: I,
    col: usize,
    line: usize,
    nl: bool,
}

impl<I: Iterator<Item = u8>> BytePosIterator<I> {
    pub fn new(bytes: I) -> Self {
        Self {
            bytes,
            col: 0,
            line: 0,
            nl: false,
        }
    }
}

impl<I: Iterator<Item = u8>> Iterator for BytePosIterator<I> {
    type Item = BytePos;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.bytes.next()?;
        if self.nl {
            self.col = 0;
            self.line += 1;
            self.nl = false;
        }
        self.nl = cur == b'\n';
        let bp = BytePos {
            byte: cur,
            position: (self.line, self.col),
        };
        self.col += 1;
        Some(bp)
    }
}

/// Converts a parsed syntax tree into the expression representation the
/// evaluator consumes. Application spines build `Rc<Expression>` bottom-up
/// so that once a promise captures a subexpression, that subexpression is
/// shared rather than copied.
pub fn to_expression(st: &SyntaxTree) -> Rc<Expression> {
    match st {
        SyntaxTree::Atom(atom) => Rc::new(Expression::Function(Rc::new(atom_to_function(*atom)))),
        SyntaxTree::Application(func, arg) => Rc::new(Expression::Application(
            to_expression(func),
            to_expression(arg),
        )),
    }
}

fn atom_to_function(atom: Atom) -> Function {
    match atom {
        Atom::K => Function::K,
        Atom::S => Function::S,
        Atom::I => Function::I,
        Atom::V => Function::V,
        Atom::D => Function::D,
        Atom::C => Function::C,
        Atom::E => Function::E,
        Atom::At => Function::At,
        Atom::Pipe => Function::Pipe,
        Atom::Dot(c) => Function::Dot(c),
        Atom::Question(c) => Function::Question(c),
    }
}

/// Parses a whole program from a byte slice, the way the CLI layer uses it
/// once it has the entire source (whether from a file or a drained stdin)
/// in memory.
pub fn parse_program(source: &[u8]) -> Result<Rc<Expression>, ParseError> {
    let mut iter = BytePosIterator::new(source.iter().copied()).peekable();
    let st = parse_toplevel(&mut iter)?;
    Ok(to_expression(&st))
}
