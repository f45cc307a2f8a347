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

use crate::ast::{InstOperand, Opcode, DESTINATION_OPERAND, SOURCE_OPERAND};

/// Rejects operand-kind combinations that §4.2's per-opcode compatibility
/// table forbids at parse time (resolution-time checks belong to the
/// assembler passes, not here).
pub fn validate_operand_kinds(opcode: Opcode, operands: &[InstOperand; 2]) -> Result<(), String> {
    use Opcode::*;

    let is_immediate_like = |op: &InstOperand| {
        matches!(op, InstOperand::Immediate(_) | InstOperand::ConstantRef(_))
    };

    match opcode {
        Cmp | Prn => Ok(()),
        Lea => {
            if is_immediate_like(&operands[SOURCE_OPERAND]) {
                return Err(
                    "lea source operand may not be an immediate or a constant reference"
                        .to_string(),
                );
            }
            if is_immediate_like(&operands[DESTINATION_OPERAND]) {
                return Err(
                    "lea destination operand may not be an immediate or a constant reference"
                        .to_string(),
                );
            }
            Ok(())
        }
        Jmp | Bne | Jsr => match operands[DESTINATION_OPERAND] {
            InstOperand::Label(_) | InstOperand::Register(_) => Ok(()),
            _ => Err("destination operand must be a label or register".to_string()),
        },
        Mov | Add | Sub => {
            if is_immediate_like(&operands[DESTINATION_OPERAND]) {
                Err(
                    "destination operand may not be an immediate or a constant reference"
                        .to_string(),
                )
            } else {
                Ok(())
            }
        }
        Not | Clr | Inc | Dec | Red | Rts | Hlt => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Register;

    fn regs() -> [InstOperand; 2] {
        [
            InstOperand::Register(Register::R1),
            InstOperand::Register(Register::R2),
        ]
    }

    #[test]
    fn cmp_and_prn_allow_any_operand_kind() {
        let operands = [
            InstOperand::Immediate(1),
            InstOperand::LabelIndexed("ARR".to_string(), crate::ast::IndexValue::Immediate(0)),
        ];
        assert!(validate_operand_kinds(Opcode::Cmp, &operands).is_ok());
        assert!(validate_operand_kinds(Opcode::Prn, &[operands[0].clone(), InstOperand::None]).is_ok());
    }

    #[test]
    fn lea_rejects_an_immediate_source() {
        let operands = [InstOperand::Immediate(1), InstOperand::Register(Register::R2)];
        let err = validate_operand_kinds(Opcode::Lea, &operands).unwrap_err();
        assert!(err.contains("source operand"));
    }

    #[test]
    fn lea_rejects_a_constant_ref_destination() {
        let operands = [
            InstOperand::Register(Register::R1),
            InstOperand::ConstantRef("SIZE".to_string()),
        ];
        let err = validate_operand_kinds(Opcode::Lea, &operands).unwrap_err();
        assert!(err.contains("destination operand"));
    }

    #[test]
    fn lea_accepts_labels_and_registers() {
        assert!(validate_operand_kinds(Opcode::Lea, &regs()).is_ok());
    }

    #[test]
    fn jmp_bne_jsr_reject_an_immediate_destination() {
        let operands = [InstOperand::None, InstOperand::Immediate(4)];
        for opcode in [Opcode::Jmp, Opcode::Bne, Opcode::Jsr] {
            let err = validate_operand_kinds(opcode, &operands).unwrap_err();
            assert_eq!(err, "destination operand must be a label or register");
        }
    }

    #[test]
    fn jmp_rejects_an_indexed_destination() {
        let operands = [
            InstOperand::None,
            InstOperand::LabelIndexed("ARR".to_string(), crate::ast::IndexValue::Immediate(2)),
        ];
        assert!(validate_operand_kinds(Opcode::Jmp, &operands).is_err());
    }

    #[test]
    fn jmp_accepts_a_label_destination() {
        let operands = [InstOperand::None, InstOperand::Label("LOOP".to_string())];
        assert!(validate_operand_kinds(Opcode::Jmp, &operands).is_ok());
    }

    #[test]
    fn mov_add_sub_reject_an_immediate_destination() {
        let operands = [InstOperand::Register(Register::R1), InstOperand::Immediate(2)];
        for opcode in [Opcode::Mov, Opcode::Add, Opcode::Sub] {
            assert!(validate_operand_kinds(opcode, &operands).is_err());
        }
    }

    #[test]
    fn mov_add_sub_accept_an_immediate_source() {
        let operands = [InstOperand::Immediate(2), InstOperand::Register(Register::R1)];
        for opcode in [Opcode::Mov, Opcode::Add, Opcode::Sub] {
            assert!(validate_operand_kinds(opcode, &operands).is_ok());
        }
    }

    #[test]
    fn zero_and_one_operand_opcodes_allow_any_operand_kind() {
        let operands = [InstOperand::None, InstOperand::Immediate(9)];
        for opcode in [
            Opcode::Not,
            Opcode::Clr,
            Opcode::Inc,
            Opcode::Dec,
            Opcode::Red,
            Opcode::Rts,
            Opcode::Hlt,
        ] {
            assert!(validate_operand_kinds(opcode, &operands).is_ok());
        }
    }
}
