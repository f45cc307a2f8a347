/*
Copyright 2025 the mm14asm authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as clap_parser;
use mm14asm::io::AsmFileIo;

/// A pedagogical assembler for the 14-bit-word CPU described in the
/// course materials. Each argument is a source file path *without* its
/// `.as` extension (spec §6.1); a failure in one file is reported and
/// does not stop the others.
#[derive(clap_parser)]
#[clap(version)]
struct Opts {
    /// Source file stems, e.g. `prog` for `prog.as`.
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    let io = AsmFileIo;

    let mut any_failed = false;
    for stem in &opts.files {
        if let Err(diagnostics) = mm14asm::assemble_file(stem, &io, &io) {
            any_failed = true;
            for diagnostic in diagnostics {
                println!("{}: {diagnostic}", stem.display());
            }
        }
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
