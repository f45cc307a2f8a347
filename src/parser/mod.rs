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

mod ast_builder;

use crate::ast::{AssemblyLine, Line};
use crate::errors::AssemblyError;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct LineParser;

/// Parses one physical source line (no trailing newline) into a [`Line`].
///
/// This is `build_ast` from the design: Phase A (classify the head, via the
/// grammar) followed by Phase B (parse operands from the leftover text, in
/// `ast_builder`).
pub fn build_ast(line_number: usize, text: &str) -> Result<Line, AssemblyError> {
    let mut pairs = LineParser::parse(Rule::source_line, text).map_err(|_| {
        AssemblyError::SyntaxError {
            line: line_number,
            reason: "the first word must be an instruction or directive or .define or label name"
                .to_string(),
        }
    })?;

    let line_pair = pairs.next().expect("source_line always produces one pair");
    let inner = line_pair.into_inner().next();

    let body = match inner {
        None => AssemblyLine::Empty,
        Some(p) if p.as_rule() == Rule::comment_line => AssemblyLine::Comment,
        Some(p) if p.as_rule() == Rule::empty_line => AssemblyLine::Empty,
        Some(p) => {
            return ast_builder::build_content_line(line_number, p);
        }
        #[allow(unreachable_patterns)]
        Some(_) => AssemblyLine::Empty,
    };

    Ok(Line {
        number: line_number,
        label: None,
        body,
    })
}
