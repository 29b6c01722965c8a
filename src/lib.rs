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

//! A trampoline-evaluating interpreter for Unlambda.
//!
//! The pipeline is: [`parse::parse_program`] turns source bytes into an
//! [`value::Expression`] tree, [`eval::Interpreter::run`] drives it to a
//! final [`value::Function`] value over the given I/O handles, and
//! [`print::format_function`] renders that value back out in Unlambda's own
//! syntax.

pub mod error;
pub mod eval;
pub mod parse;
pub mod print;
pub mod value;

use std::io::{Read, Write};
use std::rc::Rc;

use log::info;

use error::UnlambdaError;
use eval::Interpreter;
use value::Function;

/// Parses and runs a whole program, reading further input (for `@`) from
/// `input` and writing `.`/`` ` `` output to `output`. Returns the program's
/// final value.
pub fn run_program<R: Read, W: Write>(
    source: &[u8],
    input: R,
    output: W,
) -> Result<Rc<Function>, UnlambdaError> {
    let program = parse::parse_program(source)?;
    info!("parsed program, {} bytes of source", source.len());
    let mut interp = Interpreter::new(input, output);
    let result = interp.run(program)?;
    info!("program terminated with value {:?}", result);
    Ok(result)
}
