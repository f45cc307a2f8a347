//! Lexer primitives: whitespace/comma word extraction, numeric and
//! identifier validation, and the three case-sensitive keyword tables.
//!
//! These are pure functions over borrowed text, kept free of any AST or
//! pest dependency so they can be unit tested directly (spec §4.1).

use crate::ast::{Opcode, Register};

pub const MAX_LABEL_LEN: usize = 31;
pub const MAX_LINE_LEN: usize = 80;
pub const MIN_12_BIT: i32 = -2048;
pub const MAX_12_BIT: i32 = 2047;

/// Advances `cursor` past a run of whitespace and commas, then returns the
/// next maximal span of non-whitespace, non-comma characters. Commas are
/// word separators, not word content. Returns `None` at end of line; the
/// cursor is left pointing just past the consumed word on success.
pub fn next_word<'a>(cursor: &mut &'a str) -> Option<&'a str> {
    let trimmed = cursor.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    if trimmed.is_empty() {
        *cursor = trimmed;
        return None;
    }
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == ',')
        .unwrap_or(trimmed.len());
    let (word, rest) = trimmed.split_at(end);
    *cursor = rest;
    Some(word)
}

/// Parses a signed decimal integer within the 12-bit two's-complement range.
/// Rejects empty input, trailing non-digits, and textual forms longer than
/// 5 characters (sign plus up to four digits).
pub fn is_valid_number(word: &str) -> Option<i16> {
    if word.is_empty() || word.len() > 5 {
        return None;
    }
    let value: i32 = word.parse().ok()?;
    if (MIN_12_BIT..=MAX_12_BIT).contains(&value) {
        Some(value as i16)
    } else {
        None
    }
}

/// Where an identifier appears: a declaration site (`LABEL:`, colon
/// stripped before validation) or an operand site (no colon expected).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IdentifierPosition {
    Declaration,
    Operand,
}

/// Validates `word` as an identifier and returns its name with any
/// declaration-site colon stripped. Rejects register names, directive
/// names, and opcode mnemonics, length outside 1..=31, and anything but
/// `alpha alnum*`.
pub fn is_identifier(word: &str, position: IdentifierPosition) -> Option<&str> {
    let name = match position {
        IdentifierPosition::Declaration => word.strip_suffix(':')?,
        IdentifierPosition::Operand => word,
    };

    if name.is_empty() || name.len() > MAX_LABEL_LEN {
        return None;
    }

    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.clone().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    if lookup_register(name).is_some()
        || lookup_directive(name).is_some()
        || lookup_opcode(name).is_some()
    {
        return None;
    }

    Some(name)
}

pub fn lookup_register(word: &str) -> Option<Register> {
    use Register::*;
    Some(match word {
        "r0" => R0,
        "r1" => R1,
        "r2" => R2,
        "r3" => R3,
        "r4" => R4,
        "r5" => R5,
        "r6" => R6,
        "r7" => R7,
        "PSW" => Psw,
        "PC" => Pc,
        _ => return None,
    })
}

/// The four directive keywords, independent of the operands they carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectiveKeyword {
    Data,
    String,
    Entry,
    Extern,
}

pub fn lookup_directive(word: &str) -> Option<DirectiveKeyword> {
    use DirectiveKeyword::*;
    Some(match word {
        ".data" => Data,
        ".string" => String,
        ".entry" => Entry,
        ".extern" => Extern,
        _ => return None,
    })
}

pub fn lookup_opcode(word: &str) -> Option<Opcode> {
    use Opcode::*;
    Some(match word {
        "mov" => Mov,
        "cmp" => Cmp,
        "add" => Add,
        "sub" => Sub,
        "not" => Not,
        "clr" => Clr,
        "lea" => Lea,
        "inc" => Inc,
        "dec" => Dec,
        "jmp" => Jmp,
        "bne" => Bne,
        "red" => Red,
        "prn" => Prn,
        "jsr" => Jsr,
        "rts" => Rts,
        "hlt" => Hlt,
        _ => return None,
    })
}
