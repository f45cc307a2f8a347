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

//! Textual artifact writers (spec §6.4-6.6). Each function is a pure
//! `&[...] -> String` transform over already-computed pass output; nothing
//! here touches `std::fs` — that is `crate::io`'s job.

use crate::assembler::extern_table::ExternTable;
use crate::assembler::first_pass::PROGRAM_ORIGIN;
use crate::encoding::encode_word;

/// The `.ob` object file: a header line (`  IC DC`) followed by one line
/// per memory word, instructions first then data, each word prefixed with
/// its decimal address and encoded in the base-4 alphabet.
pub fn build_object_file(instruction_words: &[u16], data_words: &[u16]) -> String {
    let mut out = format!("  {} {}\n", instruction_words.len(), data_words.len());

    let mut addr = PROGRAM_ORIGIN;
    for &word in instruction_words.iter().chain(data_words.iter()) {
        out.push_str(&format!("0{addr} {}\n", encode_word(word)));
        addr += 1;
    }

    out
}

/// The `.ent` entries file: one `NAME\t0ADDR` line per exported symbol.
/// Returns `None` if there are no entries (spec §6.5: emitted only if at
/// least one entry exists).
pub fn build_entries_file(entries: &[(String, u16)]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let mut out = String::new();
    for (name, address) in entries {
        out.push_str(&format!("{name}\t0{address}\n"));
    }
    Some(out)
}

/// The `.ext` externals file: one `NAME\t0ADDR` line per reference site of
/// each extern-declared label. Returns `None` if no extern was ever
/// referenced (spec §6.6).
pub fn build_externals_file(extern_table: &ExternTable) -> Option<String> {
    if extern_table.is_empty() {
        return None;
    }
    let mut out = String::new();
    for (name, address) in extern_table.iter() {
        out.push_str(&format!("{name}\t0{address}\n"));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::extern_table::ExternTable;

    #[test]
    fn object_file_header_and_addresses() {
        let instructions = vec![0, 1];
        let data = vec![5u16];
        let text = build_object_file(&instructions, &data);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("  2 1"));
        assert_eq!(lines.next(), Some(format!("0100 {}", encode_word(0)).as_str()));
        assert_eq!(lines.next(), Some(format!("0101 {}", encode_word(1)).as_str()));
        assert_eq!(lines.next(), Some(format!("0102 {}", encode_word(5)).as_str()));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn entries_file_is_none_when_empty() {
        assert_eq!(build_entries_file(&[]), None);
    }

    #[test]
    fn entries_file_formats_tab_separated_lines() {
        let entries = vec![("LBL".to_string(), 102u16)];
        assert_eq!(build_entries_file(&entries), Some("LBL\t0102\n".to_string()));
    }

    #[test]
    fn externals_file_emits_one_line_per_reference_site() {
        let mut table = ExternTable::new();
        table.record("EXT", 101);
        table.record("EXT", 105);
        let text = build_externals_file(&table).unwrap();
        assert_eq!(text, "EXT\t0101\nEXT\t0105\n");
    }

    #[test]
    fn externals_file_is_none_when_no_references() {
        let table = ExternTable::new();
        assert_eq!(build_externals_file(&table), None);
    }
}
