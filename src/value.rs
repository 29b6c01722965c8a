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

//! value.rs - The three value families the evaluator is built on:
//! `Expression` (unevaluated syntax), `Function` (a head-normal combinator
//! value), and `Continuation` (a reified control stack frame).
//!
//! All three are closed, acyclic tagged sums held behind `Rc`. `Rc`'s strong
//! count is exactly the addref/decref bookkeeping the reference C
//! implementation does by hand in `fun_addref`/`fun_decref` and friends;
//! dropping the last `Rc` to a node recursively drops its payload the same
//! way `fun_decref` recurses into `onefunc`/`twofunc`/`expr`. No `Drop` impl
//! needs to be written here because there is nothing to release beyond the
//! memory itself and the graph never cycles back on itself (see
//! DESIGN.md).

use std::rc::Rc;

/// An unevaluated piece of Unlambda syntax, or a function wrapped back up
/// into expression position (used when building the expressions that force
/// promises and expand `s`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Expression {
    Function(Rc<Function>),
    Application(Rc<Expression>, Rc<Expression>),
}

/// A head-normal combinator value. Every Unlambda value that can flow
/// through the evaluator is one of these.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Function {
    /// Unsaturated kestrel.
    K,
    /// `k` applied to one argument; constant function.
    K1(Rc<Function>),
    /// Unsaturated starling.
    S,
    /// `s` with one argument.
    S1(Rc<Function>),
    /// `s` with two arguments; applying this triggers the starling
    /// expansion `` ``xz`yz ``.
    S2(Rc<Function>, Rc<Function>),
    /// Identity.
    I,
    /// Void: discards its argument and returns itself.
    V,
    /// Delay constructor. Applying this to an argument does *not* evaluate
    /// the argument; it is a special form, not a function.
    D,
    /// A promise: a delayed, unevaluated expression. Forcing it (applying
    /// it to anything) evaluates `Expression` first and applies the result
    /// to the argument. Forcing is never memoized.
    D1(Rc<Expression>),
    /// Outputs the byte `c` and returns its argument unchanged when applied.
    Dot(u8),
    /// call-with-current-continuation.
    C,
    /// A captured continuation.
    Cont(Rc<Continuation>),
    /// Terminates the whole program with its argument as the final result.
    E,
    /// Reads one byte of input into the latch; applying it yields `i` if a
    /// byte was read, `v` on EOF.
    At,
    /// Compares the latch against a fixed byte; applying it yields `i` on
    /// equality, `v` otherwise.
    Question(u8),
    /// Reprints the current latch byte (as a `Dot`), or `v` if the latch is
    /// EOF.
    Pipe,
}

/// A reified control-stack frame. `next` links toward the eventual `Term`
/// the way the reference implementation's `cont::next` does; the chain is
/// finite and acyclic, but may be shared once captured by `c`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Continuation {
    /// Pending: evaluate `arg_expr`, then apply the value being tossed here
    /// to the result. If the value being tossed here is `D`, no evaluation
    /// happens at all — a promise is produced instead (the promise rule).
    EvalApply(Rc<Expression>, Rc<Continuation>),
    /// Pending: apply `func` to the value being tossed here.
    Apply(Rc<Function>, Rc<Continuation>),
    /// Pending: apply the value being tossed here to `arg` (used to
    /// complete forcing a promise).
    ApplyDee(Rc<Function>, Rc<Continuation>),
    /// The whole program. Tossing here ends execution.
    Term,
}

