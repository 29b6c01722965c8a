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

//! error.rs - The parse/runtime error taxonomy.
//!
//! The reference interpreter reports errors as plain `fprintf` diagnostics
//! followed by `exit(1)`. We keep the same diagnostic text but give it a
//! proper `std::error::Error` shape so `main` has one `Result` type to match
//! on when deciding the exit code.

use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ParseError {
    #[error("unexpected EOF")]
    UnexpectedEof,

    #[error("unexpected EOF after `{after}` at {line}:{column}")]
    UnexpectedEofAfter {
        after: char,
        line: usize,
        column: usize,
    },

    #[error("unexpected byte `{}` (0x{byte:02x}) at {line}:{column}", display_byte(*byte))]
    UnexpectedByte {
        byte: u8,
        line: usize,
        column: usize,
    },

    #[error("unexpected trailing input at {line}:{column}")]
    TrailingInput { line: usize, column: usize },
}

fn display_byte(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '?'
    }
}

#[derive(Debug, Error)]
pub enum UnlambdaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
