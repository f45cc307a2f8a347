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

pub mod artifacts;
pub mod assembler;
pub mod ast;
pub mod encoding;
pub mod errors;
pub mod io;
pub mod lexer;
pub mod macro_expander;
pub mod parser;

use std::path::{Path, PathBuf};

use assembler::{first_pass, second_pass};
use errors::AssemblyError;
use io::{FileReader, FileWriter};

/// Every diagnostic collected while assembling one file, in source-line
/// order where a line number applies (spec §7.2: stages never
/// short-circuit, they surface every diagnostic they can).
pub type Diagnostics = Vec<AssemblyError>;

fn sibling(stem: &Path, extension: &str) -> PathBuf {
    stem.with_extension(extension)
}

/// Parses every line of an already macro-expanded `.am` text into its AST,
/// continuing past a line that fails to parse so later lines still get a
/// chance to report their own diagnostics (spec §7.2).
fn parse_lines(am_text: &str) -> (Vec<ast::Line>, Diagnostics) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (idx, text) in am_text.lines().enumerate() {
        match parser::build_ast(idx + 1, text) {
            Ok(line) => lines.push(line),
            Err(err) => errors.push(err),
        }
    }

    (lines, errors)
}

/// Runs the full three-stage pipeline (spec §2) on one source file named
/// `stem` (a path without extension, per spec §6.1), reading `stem.as` and,
/// on success, writing `stem.ob` and optionally `stem.ent`/`stem.ext`.
///
/// Every stage's state is local to this call; nothing here is shared
/// across files (spec §5's per-file ownership), and any exit path —
/// success, macro-expansion failure, first-pass failure, second-pass
/// failure — simply drops it when the function returns.
pub fn assemble_file(
    stem: &Path,
    reader: &impl FileReader,
    writer: &impl FileWriter,
) -> Result<(), Diagnostics> {
    let source_path = sibling(stem, "as");
    let source = reader
        .read_to_string(&source_path)
        .map_err(|err| vec![AssemblyError::Io(err.to_string())])?;

    let expansion = macro_expander::expand_macros(&source).map_err(|err| vec![err])?;

    let am_path = sibling(stem, "am");
    writer
        .write_string(&am_path, &expansion.am_text)
        .map_err(|err| vec![AssemblyError::Io(err.to_string())])?;

    let (lines, mut errors) = parse_lines(&expansion.am_text);

    let first_pass_out = match first_pass::run(&lines, &expansion.macro_names) {
        Ok(out) => out,
        Err(pass_errors) => {
            errors.extend(pass_errors);
            return Err(errors);
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let second_pass_out = second_pass::run(
        &lines,
        &first_pass_out.symbol_table,
        &first_pass_out.constant_table,
    )
    .map_err(|pass_errors| pass_errors)?;

    let object_text = artifacts::build_object_file(
        &second_pass_out.instruction_words,
        &second_pass_out.data_words,
    );
    writer
        .write_string(&sibling(stem, "ob"), &object_text)
        .map_err(|err| vec![AssemblyError::Io(err.to_string())])?;

    if let Some(entries_text) = artifacts::build_entries_file(&first_pass_out.entries) {
        writer
            .write_string(&sibling(stem, "ent"), &entries_text)
            .map_err(|err| vec![AssemblyError::Io(err.to_string())])?;
    }

    if let Some(externals_text) = artifacts::build_externals_file(&second_pass_out.extern_table) {
        writer
            .write_string(&sibling(stem, "ext"), &externals_text)
            .map_err(|err| vec![AssemblyError::Io(err.to_string())])?;
    }

    Ok(())
}
