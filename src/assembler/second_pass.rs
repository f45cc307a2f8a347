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

//! Pass 2 (spec §4.5): assumes the first pass produced no errors. Re-walks
//! the same parsed line stream and emits 14-bit words, resolving symbol and
//! constant references and collecting extern-reference sites.

use crate::ast::{
    AssemblyLine, DataOperand, Directive, InstOperand, IndexValue, Line, Opcode, Register,
    DESTINATION_OPERAND, SOURCE_OPERAND,
};
use crate::errors::AssemblyError;

use super::constant_table::{resolve_constant, ConstantTable};
use super::extern_table::ExternTable;
use super::first_pass::PROGRAM_ORIGIN;
use super::symbol_table::{get_symbol, SymbolKind, SymbolTable};

pub struct SecondPassOutput {
    pub instruction_words: Vec<u16>,
    pub data_words: Vec<u16>,
    pub extern_table: ExternTable,
}

pub fn run(
    lines: &[Line],
    symbol_table: &SymbolTable,
    constant_table: &ConstantTable,
) -> Result<SecondPassOutput, Vec<AssemblyError>> {
    let mut instruction_words: Vec<u16> = Vec::new();
    let mut data_words: Vec<u16> = Vec::new();
    let mut extern_table = ExternTable::new();
    let mut errors: Vec<AssemblyError> = Vec::new();

    for line in lines {
        match &line.body {
            AssemblyLine::Empty
            | AssemblyLine::Comment
            | AssemblyLine::ConstantDef { .. }
            | AssemblyLine::Directive(Directive::Entry(_))
            | AssemblyLine::Directive(Directive::Extern(_)) => {}

            AssemblyLine::Directive(Directive::Data(operands)) => {
                for operand in operands {
                    match resolve_data_operand(operand, constant_table, line.number) {
                        Ok(value) => data_words.push(to_data_word(value)),
                        Err(err) => errors.push(err),
                    }
                }
            }

            AssemblyLine::Directive(Directive::String(chars)) => {
                for &byte in chars {
                    data_words.push(byte as u16);
                }
                data_words.push(0);
            }

            AssemblyLine::Instruction { opcode, operands } => {
                let address = PROGRAM_ORIGIN + instruction_words.len() as u16;
                match encode_instruction(
                    *opcode,
                    operands,
                    address,
                    line.number,
                    symbol_table,
                    constant_table,
                    &mut extern_table,
                ) {
                    Ok(mut words) => instruction_words.append(&mut words),
                    Err(mut errs) => errors.append(&mut errs),
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(SecondPassOutput {
            instruction_words,
            data_words,
            extern_table,
        })
    } else {
        Err(errors)
    }
}

/// A `.data` word holds its value directly in bits 0-13; there is no ARE
/// field on a data word (spec §4.5's directive encoding).
fn to_data_word(value: i16) -> u16 {
    (value as u16) & crate::encoding::WORD_MASK
}

/// An immediate/constant *instruction operand* word (and an indexed label's
/// index word) reserves bits 0-1 for the ARE field and carries its value in
/// bits 2-13, hence the left shift (spec §4.5: "value left-shifted by 2").
fn to_immediate_operand_word(value: i16) -> u16 {
    ((value as u16) << 2) & crate::encoding::WORD_MASK
}

fn resolve_data_operand(
    operand: &DataOperand,
    constant_table: &ConstantTable,
    line_number: usize,
) -> Result<i16, AssemblyError> {
    match operand {
        DataOperand::Int(n) => Ok(*n),
        DataOperand::ConstantRef(name) => resolve_constant(constant_table, name, line_number),
    }
}

fn addressing_mode(operand: &InstOperand) -> u16 {
    match operand {
        InstOperand::None | InstOperand::Immediate(_) | InstOperand::ConstantRef(_) => 0,
        InstOperand::Label(_) => 1,
        InstOperand::LabelIndexed(_, _) => 2,
        InstOperand::Register(_) => 3,
    }
}

fn register_number(register: Register) -> u16 {
    use Register::*;
    match register {
        R0 => 0,
        R1 => 1,
        R2 => 2,
        R3 => 3,
        R4 => 4,
        R5 => 5,
        R6 => 6,
        R7 => 7,
        Psw => 8,
        Pc => 9,
    }
}

/// Encodes one instruction line into its opcode word plus operand words,
/// in instruction-image order, recording extern reference sites as it goes.
fn encode_instruction(
    opcode: Opcode,
    operands: &[InstOperand; 2],
    address: u16,
    line_number: usize,
    symbol_table: &SymbolTable,
    constant_table: &ConstantTable,
    extern_table: &mut ExternTable,
) -> Result<Vec<u16>, Vec<AssemblyError>> {
    let src = &operands[SOURCE_OPERAND];
    let dst = &operands[DESTINATION_OPERAND];

    let opcode_word = (addressing_mode(dst) << 2) | (addressing_mode(src) << 4) | ((opcode.index() as u16) << 6);
    let mut words = vec![opcode_word];
    let mut errors: Vec<AssemblyError> = Vec::new();

    let paired_registers = matches!(src, InstOperand::Register(_)) && matches!(dst, InstOperand::Register(_));

    if paired_registers {
        let (InstOperand::Register(src_reg), InstOperand::Register(dst_reg)) = (src, dst) else {
            unreachable!("paired_registers guarantees both operands are registers");
        };
        let word = (register_number(*dst_reg) << 2) | (register_number(*src_reg) << 5);
        words.push(word);
    } else {
        for (slot, operand) in [(SOURCE_OPERAND, src), (DESTINATION_OPERAND, dst)] {
            match operand {
                InstOperand::None => {}
                InstOperand::Immediate(n) => words.push(to_immediate_operand_word(*n)),
                InstOperand::ConstantRef(name) => {
                    match resolve_constant(constant_table, name, line_number) {
                        Ok(value) => words.push(to_immediate_operand_word(value)),
                        Err(err) => errors.push(err),
                    }
                }
                InstOperand::Register(reg) => {
                    let shift = if slot == SOURCE_OPERAND { 5 } else { 2 };
                    words.push(register_number(*reg) << shift);
                }
                InstOperand::Label(name) => {
                    // The opcode word occupies `address`; this operand word
                    // is the next one after whatever's already been pushed.
                    let word_addr = address + words.len() as u16;
                    match encode_label_reference(name, word_addr, symbol_table, extern_table) {
                        Ok(word) => words.push(word),
                        Err(err) => errors.push(err),
                    }
                }
                InstOperand::LabelIndexed(name, index) => {
                    let word_addr = address + words.len() as u16;
                    match encode_label_reference(name, word_addr, symbol_table, extern_table) {
                        Ok(word) => words.push(word),
                        Err(err) => errors.push(err),
                    }
                    match index {
                        IndexValue::Immediate(n) => words.push(to_immediate_operand_word(*n)),
                        IndexValue::ConstantRef(cname) => {
                            match resolve_constant(constant_table, cname, line_number) {
                                Ok(value) => words.push(to_immediate_operand_word(value)),
                                Err(err) => errors.push(err),
                            }
                        }
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(words)
    } else {
        Err(errors)
    }
}

fn encode_label_reference(
    name: &str,
    word_addr: u16,
    symbol_table: &SymbolTable,
    extern_table: &mut ExternTable,
) -> Result<u16, AssemblyError> {
    // `word_addr` is unused for lookup purposes beyond extern bookkeeping;
    // line number isn't available here, so undefined-label errors carry no
    // line (matched against spec §4.5, which treats this as a general
    // semantic failure rather than a per-line one).
    let symbol = get_symbol(symbol_table, name, 0).map_err(|_| AssemblyError::SemanticErrorNoLine {
        reason: format!("undefined label: {name}"),
    })?;

    if symbol.kind == SymbolKind::Extern {
        extern_table.record(name, word_addr);
        Ok(0b01)
    } else {
        Ok((symbol.address as u16) << 2 | 0b10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::symbol_table::Symbol;

    fn line(number: usize, body: AssemblyLine) -> Line {
        Line { number, label: None, body }
    }

    #[test]
    fn two_register_operands_encode_into_one_shared_word() {
        let operands = [
            InstOperand::Register(Register::R5),
            InstOperand::Register(Register::R3),
        ];
        let symbol_table = SymbolTable::new();
        let constant_table = ConstantTable::new();
        let mut extern_table = ExternTable::new();
        let words = encode_instruction(
            Opcode::Mov,
            &operands,
            100,
            1,
            &symbol_table,
            &constant_table,
            &mut extern_table,
        )
        .unwrap();
        assert_eq!(words.len(), 2);
        // opcode=0, dest mode=3, src mode=3 -> bits 2-3=11, 4-5=11, 6-9=0000
        assert_eq!(words[0], 0b00_0000_11_11_00);
        // dest reg=3 (bits 2-4), src reg=5 (bits 5-7)
        assert_eq!(words[1], (3u16 << 2) | (5u16 << 5));
    }

    #[test]
    fn immediate_operand_value_is_shifted_into_bits_2_13() {
        let operands = [
            InstOperand::None,
            InstOperand::Immediate(-1),
        ];
        let symbol_table = SymbolTable::new();
        let constant_table = ConstantTable::new();
        let mut extern_table = ExternTable::new();
        let words = encode_instruction(
            Opcode::Clr,
            &operands,
            100,
            1,
            &symbol_table,
            &constant_table,
            &mut extern_table,
        )
        .unwrap();
        assert_eq!(words.len(), 2);
        // -1 in 12 bits is 0xFFF; shifted left 2 and masked to 14 bits.
        assert_eq!(words[1], ((-1i16 as u16) << 2) & crate::encoding::WORD_MASK);
        assert_eq!(words[1] & 0b11, 0);
    }

    #[test]
    fn extern_label_reference_is_recorded() {
        let mut symbol_table = SymbolTable::new();
        symbol_table.insert(
            "EXT".to_string(),
            Symbol {
                kind: SymbolKind::Extern,
                address: 0,
            },
        );
        let constant_table = ConstantTable::new();
        let mut extern_table = ExternTable::new();
        let operands = [InstOperand::Label("EXT".to_string()), InstOperand::Register(Register::R1)];
        let words = encode_instruction(
            Opcode::Mov,
            &operands,
            100,
            1,
            &symbol_table,
            &constant_table,
            &mut extern_table,
        )
        .unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1] & 0b11, 0b01);
        assert_eq!(extern_table.reference_count(), 1);
        assert_eq!(extern_table.iter().next(), Some(("EXT", 101)));
    }

    #[test]
    fn forward_constant_reference_is_rejected() {
        let symbol_table = SymbolTable::new();
        let mut constant_table = ConstantTable::new();
        constant_table.insert(
            "K".to_string(),
            super::super::constant_table::ConstantDef {
                value: 4,
                defined_at_line: 5,
            },
        );
        let lines = vec![line(
            1,
            AssemblyLine::Instruction {
                opcode: Opcode::Mov,
                operands: [
                    InstOperand::ConstantRef("K".to_string()),
                    InstOperand::Register(Register::R1),
                ],
            },
        )];
        let err = run(&lines, &symbol_table, &constant_table).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(&err[0], AssemblyError::SemanticError { line, .. } if *line == 1));
    }

    #[test]
    fn string_directive_emits_terminator() {
        let symbol_table = SymbolTable::new();
        let constant_table = ConstantTable::new();
        let lines = vec![line(1, AssemblyLine::Directive(Directive::String(vec![97, 98])))];
        let out = run(&lines, &symbol_table, &constant_table).unwrap();
        assert_eq!(out.data_words, vec![97, 98, 0]);
    }

}
