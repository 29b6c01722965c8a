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

use std::fs;
use std::io::{self, stdin, stdout, Read, Write};
use std::process::exit;

use clap::{App, Arg};
use log::error;

use unlambda::print::format_function;
use unlambda::run_program;

fn main() {
    let matches = App::new("unlambda")
        .version("0.1.0")
        .about("A trampoline-evaluating Unlambda interpreter")
        .arg(
            Arg::with_name("FILE")
                .help("Unlambda source file to run; reads stdin if omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase logging verbosity (repeatable)"),
        )
        .get_matches();

    stderrlog::new()
        .module(module_path!())
        .verbosity(matches.occurrences_of("v") as usize + 1)
        .init()
        .unwrap();

    let source = match read_source(matches.value_of("FILE")) {
        Ok(source) => source,
        Err(e) => {
            error!("could not read source: {}", e);
            exit(1);
        }
    };

    match run_program(&source, stdin(), stdout()) {
        Ok(result) => {
            let mut out = stdout();
            // Matches the reference interpreter's final diagnostic line,
            // not part of the program's own output stream.
            writeln!(out).unwrap();
            writeln!(out, "Result: {}", format_function(&result)).unwrap();
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

fn read_source(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
