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

mod directive;
mod operand_builders;
mod utility_functions;
mod validators;

use crate::ast::{AssemblyLine, Line};
use crate::errors::AssemblyError;
use crate::lexer::{self, IdentifierPosition};
use pest::iterators::Pair;

use super::Rule;

/// Phase B: given the pest `content_line` pair (optional label, a head
/// word, and the rest of the line as raw text), classify the head and
/// parse its operands.
pub fn build_content_line(line_number: usize, pair: Pair<Rule>) -> Result<Line, AssemblyError> {
    let mut inner = pair.into_inner();
    let mut next = inner.next();

    let mut label = None;
    if let Some(p) = &next {
        if p.as_rule() == Rule::label {
            let text = p.as_str();
            let name = lexer::is_identifier(text, IdentifierPosition::Declaration).ok_or_else(
                || AssemblyError::SyntaxError {
                    line: line_number,
                    reason: format!("invalid label declaration '{text}'"),
                },
            )?;
            label = Some(name.to_string());
            next = inner.next();
        }
    }

    let head = next.ok_or_else(|| AssemblyError::SyntaxError {
        line: line_number,
        reason: "the first word must be an instruction or directive or .define or label name"
            .to_string(),
    })?;
    let head_word = head.as_str();

    let rest = inner.next().map(|p| p.as_str()).unwrap_or("");

    if head_word == ".define" {
        if label.is_some() {
            return Err(AssemblyError::SyntaxError {
                line: line_number,
                reason: ".define may not be preceded by a label".to_string(),
            });
        }
        let (name, value) = utility_functions::parse_define_body(rest).map_err(|reason| {
            AssemblyError::SyntaxError {
                line: line_number,
                reason,
            }
        })?;
        return Ok(Line {
            number: line_number,
            label: None,
            body: AssemblyLine::ConstantDef { name, value },
        });
    }

    if let Some(kind) = lexer::lookup_directive(head_word) {
        let directive = directive::build_directive(kind, rest)
            .map_err(|reason| AssemblyError::SyntaxError {
                line: line_number,
                reason,
            })?;
        return Ok(Line {
            number: line_number,
            label,
            body: AssemblyLine::Directive(directive),
        });
    }

    if let Some(opcode) = lexer::lookup_opcode(head_word) {
        let operands = operand_builders::build_instruction_operands(opcode, rest).map_err(
            |reason| AssemblyError::SyntaxError {
                line: line_number,
                reason,
            },
        )?;
        validators::validate_operand_kinds(opcode, &operands).map_err(|reason| {
            AssemblyError::SyntaxError {
                line: line_number,
                reason,
            }
        })?;
        return Ok(Line {
            number: line_number,
            label,
            body: AssemblyLine::Instruction { opcode, operands },
        });
    }

    Err(AssemblyError::SyntaxError {
        line: line_number,
        reason: "the first word must be an instruction or directive or .define or label name"
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Directive, InstOperand};
    use crate::parser::LineParser;
    use pest::Parser;

    fn content_line(text: &str) -> Line {
        let mut pairs = LineParser::parse(Rule::source_line, text).unwrap();
        let source_line = pairs.next().unwrap();
        let content = source_line
            .into_inner()
            .find(|p| p.as_rule() == Rule::content_line)
            .expect("text is a content line, not a comment or blank line");
        build_content_line(1, content).unwrap()
    }

    #[test]
    fn entry_directive_takes_a_bare_identifier() {
        let line = content_line(".entry LBL");
        assert_eq!(line.body, AssemblyLine::Directive(Directive::Entry("LBL".to_string())));
    }

    #[test]
    fn extern_directive_takes_a_bare_identifier() {
        let line = content_line(".extern LBL");
        assert_eq!(line.body, AssemblyLine::Directive(Directive::Extern("LBL".to_string())));
    }

    #[test]
    fn indexed_label_operand_is_recognized_where_the_opcode_allows_it() {
        // `prn` accepts any operand kind in its one slot (spec §4.2), so
        // this exercises `NAME[INDEX]` parsing without also tripping the
        // per-opcode compatibility check.
        let line = content_line("prn ARR[2]");
        match line.body {
            AssemblyLine::Instruction { operands, .. } => {
                assert!(matches!(operands[1], InstOperand::LabelIndexed(ref name, _) if name == "ARR"));
            }
            other => panic!("expected an instruction, got {other:?}"),
        }
    }

    #[test]
    fn lea_rejects_an_immediate_source() {
        let err = content_line_err("lea #1, r2");
        assert!(matches!(err, AssemblyError::SyntaxError { .. }));
    }

    #[test]
    fn jmp_rejects_an_indexed_destination() {
        // `jmp`'s destination must be a `Label` or `Register`, not
        // `LabelIndexed` (spec §4.2) — unlike `prn` above, which accepts it.
        let err = content_line_err("jmp ARR[2]");
        assert!(matches!(err, AssemblyError::SyntaxError { .. }));
    }

    fn content_line_err(text: &str) -> AssemblyError {
        let mut pairs = LineParser::parse(Rule::source_line, text).unwrap();
        let source_line = pairs.next().unwrap();
        let content = source_line
            .into_inner()
            .find(|p| p.as_rule() == Rule::content_line)
            .expect("text is a content line, not a comment or blank line");
        build_content_line(1, content).unwrap_err()
    }
}
