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

use crate::ast::{DataOperand, Directive};
use crate::lexer::{self, DirectiveKeyword, IdentifierPosition};

use super::utility_functions::{parse_string_operand, split_comma_list, split_exact};

pub fn build_directive(kind: DirectiveKeyword, rest: &str) -> Result<Directive, String> {
    match kind {
        DirectiveKeyword::Entry => Ok(Directive::Entry(build_single_identifier(rest)?)),
        DirectiveKeyword::Extern => Ok(Directive::Extern(build_single_identifier(rest)?)),
        DirectiveKeyword::String => Ok(Directive::String(parse_string_operand(rest)?)),
        DirectiveKeyword::Data => Ok(Directive::Data(build_data_operands(rest)?)),
    }
}

fn build_single_identifier(rest: &str) -> Result<String, String> {
    let words = split_exact(rest, 1)?;
    lexer::is_identifier(words[0], IdentifierPosition::Operand)
        .map(str::to_string)
        .ok_or_else(|| format!("'{}' is not a valid identifier", words[0]))
}

const MAX_DATA_OPERANDS: usize = 50;

fn build_data_operands(rest: &str) -> Result<Vec<DataOperand>, String> {
    let words = split_comma_list(rest)?;
    if words.len() > MAX_DATA_OPERANDS {
        return Err(format!(
            "a .data directive may not have more than {MAX_DATA_OPERANDS} operands"
        ));
    }
    words
        .into_iter()
        .map(|word| {
            if let Some(n) = lexer::is_valid_number(word) {
                Ok(DataOperand::Int(n))
            } else if let Some(name) = lexer::is_identifier(word, IdentifierPosition::Operand) {
                Ok(DataOperand::ConstantRef(name.to_string()))
            } else {
                Err(format!("'{word}' is not a valid number or constant name"))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_takes_a_bare_identifier() {
        let directive = build_directive(DirectiveKeyword::Entry, " LBL ").unwrap();
        assert_eq!(directive, Directive::Entry("LBL".to_string()));
    }

    #[test]
    fn entry_rejects_more_than_one_word() {
        let err = build_directive(DirectiveKeyword::Entry, "LBL EXTRA").unwrap_err();
        assert!(err.contains("unexpected characters after operands"));
    }

    #[test]
    fn extern_rejects_a_register_name() {
        let err = build_directive(DirectiveKeyword::Extern, "r1").unwrap_err();
        assert!(err.contains("not a valid identifier"));
    }

    #[test]
    fn string_directive_strips_the_quotes() {
        let directive = build_directive(DirectiveKeyword::String, "\"hi\"").unwrap();
        assert_eq!(directive, Directive::String(b"hi".to_vec()));
    }

    #[test]
    fn data_directive_accepts_numbers_and_constant_refs() {
        let directive = build_directive(DirectiveKeyword::Data, "5, -3, SIZE").unwrap();
        assert_eq!(
            directive,
            Directive::Data(vec![
                DataOperand::Int(5),
                DataOperand::Int(-3),
                DataOperand::ConstantRef("SIZE".to_string()),
            ])
        );
    }

    #[test]
    fn data_directive_rejects_more_than_fifty_operands() {
        let operands: Vec<String> = (0..51).map(|n| n.to_string()).collect();
        let rest = operands.join(", ");
        let err = build_data_operands(&rest).unwrap_err();
        assert!(err.contains("may not have more than 50 operands"));
    }
}
