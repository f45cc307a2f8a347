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

use crate::ast::{IndexValue, InstOperand, Opcode, SOURCE_OPERAND, DESTINATION_OPERAND};
use crate::lexer::{self, IdentifierPosition};

use super::utility_functions::split_exact;

/// Builds the `[source, destination]` operand pair for one instruction
/// line, given the opcode's arity and the raw text following the mnemonic.
pub fn build_instruction_operands(
    opcode: Opcode,
    rest: &str,
) -> Result<[InstOperand; 2], String> {
    use crate::ast::Arity;

    let expected = match opcode.arity() {
        Arity::Zero => 0,
        Arity::One => 1,
        Arity::Two => 2,
    };
    let words = split_exact(rest, expected)?;

    let mut operands = [InstOperand::None, InstOperand::None];
    match expected {
        0 => {}
        1 => operands[DESTINATION_OPERAND] = classify_operand(words[0])?,
        2 => {
            operands[SOURCE_OPERAND] = classify_operand(words[0])?;
            operands[DESTINATION_OPERAND] = classify_operand(words[1])?;
        }
        _ => unreachable!("no opcode takes more than two operands"),
    }
    Ok(operands)
}

fn classify_operand(word: &str) -> Result<InstOperand, String> {
    if let Some(suffix) = word.strip_prefix('#') {
        if let Some(n) = lexer::is_valid_number(suffix) {
            return Ok(InstOperand::Immediate(n));
        }
        if let Some(name) = lexer::is_identifier(suffix, IdentifierPosition::Operand) {
            return Ok(InstOperand::ConstantRef(name.to_string()));
        }
        return Err(format!("'{word}' is not a valid immediate or constant operand"));
    }

    if let Some(reg) = lexer::lookup_register(word) {
        return Ok(InstOperand::Register(reg));
    }

    if let Some(open) = word.find('[') {
        if !word.ends_with(']') {
            return Err(format!("'{word}' is not a valid indexed label operand"));
        }
        let name_part = &word[..open];
        let index_part = &word[open + 1..word.len() - 1];
        let name = lexer::is_identifier(name_part, IdentifierPosition::Operand)
            .ok_or_else(|| format!("'{name_part}' is not a valid label name"))?;
        if let Some(n) = lexer::is_valid_number(index_part) {
            return Ok(InstOperand::LabelIndexed(
                name.to_string(),
                IndexValue::Immediate(n),
            ));
        }
        if let Some(cname) = lexer::is_identifier(index_part, IdentifierPosition::Operand) {
            return Ok(InstOperand::LabelIndexed(
                name.to_string(),
                IndexValue::ConstantRef(cname.to_string()),
            ));
        }
        return Err(format!("'{index_part}' is not a valid index"));
    }

    if let Some(name) = lexer::is_identifier(word, IdentifierPosition::Operand) {
        return Ok(InstOperand::Label(name.to_string()));
    }

    Err(format!("'{word}' is not a valid operand"))
}
