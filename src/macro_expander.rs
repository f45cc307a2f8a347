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

//! Pre-assembly: expands `mcr`/`endmcr` macro bodies in place, turning a
//! `.as` source into its `.am` form. The macro table is local to this call
//! and dropped with it — nothing survives across files (spec §5).

use std::collections::HashMap;

use crate::errors::AssemblyError;
use crate::lexer::{self, IdentifierPosition, MAX_LINE_LEN};

/// Output of the macro-expansion stage: the expanded `.am` text, plus the
/// set of macro names defined in this file. First pass still needs the
/// names (not the bodies) to reject a symbol that collides with a macro.
pub struct Expansion {
    pub am_text: String,
    pub macro_names: std::collections::HashSet<String>,
}

pub fn expand_macros(source: &str) -> Result<Expansion, AssemblyError> {
    let mut macros: HashMap<String, Vec<String>> = HashMap::new();
    let mut current_def: Option<String> = None;
    let mut output_lines: Vec<String> = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_number = idx + 1;
        if raw_line.chars().count() > MAX_LINE_LEN {
            return Err(AssemblyError::SyntaxError {
                line: line_number,
                reason: format!("line exceeds the {MAX_LINE_LEN}-character limit"),
            });
        }

        if raw_line.trim_start().starts_with(';') {
            emit(&mut macros, &current_def, &mut output_lines, raw_line);
            continue;
        }

        let words = line_words(raw_line);
        if words.is_empty() {
            emit(&mut macros, &current_def, &mut output_lines, raw_line);
            continue;
        }

        if words.iter().skip(1).any(|w| *w == "mcr") {
            return Err(AssemblyError::SyntaxError {
                line: line_number,
                reason: "mcr not at start of line".to_string(),
            });
        }

        if words[0] == "mcr" {
            if words.len() != 2 {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: "mcr requires exactly one macro name and no further words"
                        .to_string(),
                });
            }
            let name = words[1];
            if macros.contains_key(name) {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: format!("macro '{name}' is already defined"),
                });
            }
            if lexer::lookup_directive(name).is_some() || lexer::lookup_opcode(name).is_some() {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: format!("'{name}' is not a valid macro name"),
                });
            }
            if lexer::is_identifier(name, IdentifierPosition::Operand).is_none() {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: format!("'{name}' is not a valid macro name"),
                });
            }
            macros.insert(name.to_string(), Vec::new());
            current_def = Some(name.to_string());
            continue;
        }

        if words[0] == "endmcr" {
            if current_def.is_none() {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: "endmcr without a matching mcr".to_string(),
                });
            }
            if words.len() != 1 {
                return Err(AssemblyError::SyntaxError {
                    line: line_number,
                    reason: "unexpected text after endmcr".to_string(),
                });
            }
            current_def = None;
            continue;
        }

        if let Some(body) = words
            .iter()
            .find_map(|word| macros.get(*word))
            .cloned()
        {
            for body_line in &body {
                emit(&mut macros, &current_def, &mut output_lines, body_line);
            }
            continue;
        }

        emit(&mut macros, &current_def, &mut output_lines, raw_line);
    }

    if current_def.is_some() {
        return Err(AssemblyError::SemanticErrorNoLine {
            reason: "macro definition missing a matching endmcr".to_string(),
        });
    }

    let mut am_text = output_lines.join("\n");
    if !am_text.is_empty() {
        am_text.push('\n');
    }
    let macro_names = macros.into_keys().collect();
    Ok(Expansion { am_text, macro_names })
}

fn line_words(line: &str) -> Vec<&str> {
    let mut cursor = line;
    let mut words = Vec::new();
    while let Some(w) = lexer::next_word(&mut cursor) {
        words.push(w);
    }
    words
}

fn emit(
    macros: &mut HashMap<String, Vec<String>>,
    current_def: &Option<String>,
    output: &mut Vec<String>,
    line: &str,
) {
    match current_def {
        Some(name) => {
            macros
                .get_mut(name)
                .expect("current definition always has a table entry")
                .push(line.to_string());
        }
        None => output.push(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_a_simple_macro() {
        let source = "mcr GREET\nprn #1\nendmcr\nGREET\nhlt\n";
        let expanded = expand_macros(source).unwrap();
        assert_eq!(expanded.am_text, "prn #1\nhlt\n");
        assert!(expanded.macro_names.contains("GREET"));
    }

    #[test]
    fn rejects_unterminated_macro() {
        let source = "mcr GREET\nprn #1\n";
        assert!(expand_macros(source).is_err());
    }

    #[test]
    fn rejects_text_after_endmcr() {
        let source = "mcr GREET\nprn #1\nendmcr extra\nhlt\n";
        let err = expand_macros(source).unwrap_err();
        match err {
            AssemblyError::SyntaxError { line, .. } => assert_eq!(line, 3),
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_overlong_lines() {
        let source = format!("{}\n", "a".repeat(81));
        assert!(expand_macros(&source).is_err());
    }

    #[test]
    fn rejects_macro_named_like_an_opcode() {
        let source = "mcr mov\nendmcr\n";
        assert!(expand_macros(source).is_err());
    }

    #[test]
    fn recognizes_a_macro_name_anywhere_on_the_line() {
        // Spec §4.3: "a word equal to an existing macro name appears on the
        // line" triggers expansion regardless of position or trailing text.
        let source = "mcr GREET\nprn #1\nendmcr\nGREET extra\nhlt\n";
        let expanded = expand_macros(source).unwrap();
        assert_eq!(expanded.am_text, "prn #1\nhlt\n");
    }
}
