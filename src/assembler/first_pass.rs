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

//! Pass 1 (spec §4.4): symbol-table construction, IC/DC memory accounting,
//! entry/extern bookkeeping, and the end-of-pass data-address fixup.

use std::collections::HashSet;

use crate::ast::{
    AssemblyLine, Directive, InstOperand, Line, Opcode, DESTINATION_OPERAND, SOURCE_OPERAND,
};
use crate::errors::AssemblyError;

use super::constant_table::{ConstantDef, ConstantTable};
use super::symbol_table::{Symbol, SymbolKind, SymbolTable};

pub const PROGRAM_ORIGIN: u16 = 100;
pub const MAX_MEMORY_WORDS: u32 = 3_996;

pub struct FirstPassOutput {
    pub symbol_table: SymbolTable,
    pub constant_table: ConstantTable,
    pub entries: Vec<(String, u16)>,
    pub final_ic: u16,
    pub final_dc: u16,
}

/// Runs the first pass over an already-parsed line stream. Never
/// short-circuits on error: every line is visited so that the returned
/// error list is as complete as spec §7.2 requires.
pub fn run(lines: &[Line], macro_names: &HashSet<String>) -> Result<FirstPassOutput, Vec<AssemblyError>> {
    let mut symbol_table: SymbolTable = SymbolTable::new();
    let mut constant_table: ConstantTable = ConstantTable::new();
    let mut errors: Vec<AssemblyError> = Vec::new();
    let mut ic: u16 = PROGRAM_ORIGIN;
    let mut dc: u16 = 0;

    for line in lines {
        match &line.body {
            AssemblyLine::Empty | AssemblyLine::Comment => {}

            AssemblyLine::ConstantDef { name, value } => {
                handle_constant_def(
                    name,
                    *value,
                    line.number,
                    macro_names,
                    &symbol_table,
                    &mut constant_table,
                    &mut errors,
                );
            }

            AssemblyLine::Directive(Directive::Entry(name)) => {
                handle_entry(name, line.number, macro_names, &mut symbol_table, &mut errors);
            }

            AssemblyLine::Directive(Directive::Extern(name)) => {
                handle_extern(name, line.number, macro_names, &mut symbol_table, &mut errors);
            }

            AssemblyLine::Directive(Directive::Data(operands)) => {
                if let Some(label) = &line.label {
                    introduce_label(label, false, dc, line.number, macro_names, &mut symbol_table, &mut errors);
                }
                dc += operands.len() as u16;
            }

            AssemblyLine::Directive(Directive::String(chars)) => {
                if let Some(label) = &line.label {
                    introduce_label(label, false, dc, line.number, macro_names, &mut symbol_table, &mut errors);
                }
                dc += chars.len() as u16 + 1;
            }

            AssemblyLine::Instruction { opcode, operands } => {
                if let Some(label) = &line.label {
                    introduce_label(label, true, ic, line.number, macro_names, &mut symbol_table, &mut errors);
                }
                ic += instruction_word_count(*opcode, operands);
            }
        }
    }

    if (ic - PROGRAM_ORIGIN) as u32 + dc as u32 > MAX_MEMORY_WORDS {
        errors.push(AssemblyError::SemanticErrorNoLine {
            reason: format!(
                "program requires {} words, exceeding the {MAX_MEMORY_WORDS}-word memory budget",
                (ic - PROGRAM_ORIGIN) as u32 + dc as u32
            ),
        });
    }

    // Iterate in name order so entries/diagnostics are stable across runs
    // for identical input (spec §5), rather than depending on `HashMap`'s
    // randomized iteration order.
    let mut names: Vec<String> = symbol_table.keys().cloned().collect();
    names.sort();

    let mut entries: Vec<(String, u16)> = Vec::new();
    for name in &names {
        let symbol = symbol_table.get_mut(name).expect("name came from this table's keys");
        match symbol.kind {
            SymbolKind::EntryPending => {
                errors.push(AssemblyError::SemanticErrorNoLine {
                    reason: format!("'{name}' was defined as an entry but did not receive a value"),
                });
            }
            SymbolKind::Data | SymbolKind::DataEntry => {
                symbol.address += ic as i32;
                if symbol.kind == SymbolKind::DataEntry {
                    entries.push((name.clone(), symbol.address as u16));
                }
            }
            SymbolKind::InstEntry => {
                entries.push((name.clone(), symbol.address as u16));
            }
            SymbolKind::Inst | SymbolKind::Extern => {}
        }
    }

    if errors.is_empty() {
        Ok(FirstPassOutput {
            symbol_table,
            constant_table,
            entries,
            final_ic: ic,
            final_dc: dc,
        })
    } else {
        Err(errors)
    }
}

fn introduce_label(
    name: &str,
    is_instruction: bool,
    address: u16,
    line_number: usize,
    macro_names: &HashSet<String>,
    symbol_table: &mut SymbolTable,
    errors: &mut Vec<AssemblyError>,
) {
    if macro_names.contains(name) {
        errors.push(AssemblyError::SemanticError {
            line: line_number,
            reason: "redefining a name for a macro and symbol".to_string(),
        });
        return;
    }

    match symbol_table.get_mut(name) {
        Some(existing) if existing.kind == SymbolKind::EntryPending => {
            existing.kind = if is_instruction {
                SymbolKind::InstEntry
            } else {
                SymbolKind::DataEntry
            };
            existing.address = address as i32;
        }
        Some(_) => {
            errors.push(AssemblyError::SemanticError {
                line: line_number,
                reason: "redefenition of symbol".to_string(),
            });
        }
        None => {
            let kind = if is_instruction { SymbolKind::Inst } else { SymbolKind::Data };
            symbol_table.insert(
                name.to_string(),
                Symbol {
                    kind,
                    address: address as i32,
                },
            );
        }
    }
}

fn handle_entry(
    name: &str,
    line_number: usize,
    macro_names: &HashSet<String>,
    symbol_table: &mut SymbolTable,
    errors: &mut Vec<AssemblyError>,
) {
    if macro_names.contains(name) {
        errors.push(AssemblyError::SemanticError {
            line: line_number,
            reason: "redefining a name for a macro and symbol".to_string(),
        });
        return;
    }

    match symbol_table.get_mut(name) {
        Some(existing) => match existing.kind {
            SymbolKind::Data => existing.kind = SymbolKind::DataEntry,
            SymbolKind::Inst => existing.kind = SymbolKind::InstEntry,
            _ => {
                errors.push(AssemblyError::SemanticError {
                    line: line_number,
                    reason: "redefenition of symbol".to_string(),
                });
            }
        },
        None => {
            symbol_table.insert(
                name.to_string(),
                Symbol {
                    kind: SymbolKind::EntryPending,
                    address: 0,
                },
            );
        }
    }
}

fn handle_extern(
    name: &str,
    line_number: usize,
    macro_names: &HashSet<String>,
    symbol_table: &mut SymbolTable,
    errors: &mut Vec<AssemblyError>,
) {
    if macro_names.contains(name) {
        errors.push(AssemblyError::SemanticError {
            line: line_number,
            reason: "redefining a name for a macro and symbol".to_string(),
        });
        return;
    }

    match symbol_table.get_mut(name) {
        Some(_) => {
            errors.push(AssemblyError::SemanticError {
                line: line_number,
                reason: "redefenition of symbol".to_string(),
            });
        }
        None => {
            symbol_table.insert(
                name.to_string(),
                Symbol {
                    kind: SymbolKind::Extern,
                    address: 0,
                },
            );
        }
    }
}

fn handle_constant_def(
    name: &str,
    value: i16,
    line_number: usize,
    macro_names: &HashSet<String>,
    symbol_table: &SymbolTable,
    constant_table: &mut ConstantTable,
    errors: &mut Vec<AssemblyError>,
) {
    if macro_names.contains(name) {
        errors.push(AssemblyError::SemanticError {
            line: line_number,
            reason: "redefining a name for a macro and symbol".to_string(),
        });
        return;
    }
    if symbol_table.contains_key(name) || constant_table.contains_key(name) {
        errors.push(AssemblyError::SemanticError {
            line: line_number,
            reason: "redefenition of symbol".to_string(),
        });
        return;
    }
    constant_table.insert(
        name.to_string(),
        ConstantDef {
            value,
            defined_at_line: line_number,
        },
    );
}

fn word_cost(operand: &InstOperand) -> u16 {
    match operand {
        InstOperand::LabelIndexed(_, _) => 2,
        InstOperand::None => 0,
        _ => 1,
    }
}

/// Memory cells an instruction line occupies, including its opcode word
/// (spec §4.4.1). The one-operand class's lone operand lives in the
/// destination slot — see DESIGN.md's resolution of spec §9's open question
/// about which slot `memory_cell_calculator` should inspect.
pub fn instruction_word_count(opcode: Opcode, operands: &[InstOperand; 2]) -> u16 {
    use crate::ast::Arity;

    let operand_words = match opcode.arity() {
        Arity::Zero => 0,
        Arity::One => word_cost(&operands[DESTINATION_OPERAND]),
        Arity::Two => {
            let src = &operands[SOURCE_OPERAND];
            let dst = &operands[DESTINATION_OPERAND];
            if matches!(src, InstOperand::Register(_)) && matches!(dst, InstOperand::Register(_)) {
                1
            } else {
                word_cost(src) + word_cost(dst)
            }
        }
    };

    1 + operand_words
}
