//! The object file's "encrypted base-4" word alphabet (spec §6.4).
//!
//! A 14-bit word is split into seven 2-bit groups, most-significant group
//! first, each mapped through `[00 -> '*', 01 -> '#', 10 -> '%', 11 -> '!']`.
//! Grounded on `original_source/src/back_end.c`'s `create_object_file`, which
//! prints `Encrypted_base_four[bits_12_13]` before `bits_10_11`, ..., before
//! `bits_0_1` — MSB group first, resolving spec §9's open question.

pub const WORD_BITS: u32 = 14;
pub const WORD_MASK: u16 = 0x3FFF;

fn symbol(group: u8) -> char {
    match group {
        0b00 => '*',
        0b01 => '#',
        0b10 => '%',
        0b11 => '!',
        _ => unreachable!("a 2-bit group is always in 0..=3"),
    }
}

fn group_value(c: char) -> Option<u8> {
    match c {
        '*' => Some(0b00),
        '#' => Some(0b01),
        '%' => Some(0b10),
        '!' => Some(0b11),
        _ => None,
    }
}

/// Encodes one 14-bit word (only the low 14 bits are significant) as the
/// seven-character encrypted base-4 string, most-significant group first.
pub fn encode_word(word: u16) -> String {
    let word = word & WORD_MASK;
    (0..7)
        .rev()
        .map(|group_idx| {
            let shift = group_idx * 2;
            symbol(((word >> shift) & 0b11) as u8)
        })
        .collect()
}

/// Decodes a seven-character encrypted base-4 string back into its 14-bit
/// word. Returns `None` if the string is the wrong length or contains a
/// character outside the four-symbol alphabet.
pub fn decode_word(text: &str) -> Option<u16> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() != 7 {
        return None;
    }
    let mut word: u16 = 0;
    for c in chars {
        let group = group_value(c)?;
        word = (word << 2) | group as u16;
    }
    Some(word)
}
