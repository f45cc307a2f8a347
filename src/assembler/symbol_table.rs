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

use std::collections::HashMap;

use crate::errors::AssemblyError;

/// A symbol's kind, per spec §3.2's table. `address` means different
/// things per kind: unused for `Extern`/`EntryPending`, the final word
/// address for the `*Entry`/plain data/inst kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Extern,
    EntryPending,
    DataEntry,
    InstEntry,
    Data,
    Inst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub address: i32,
}

/// Flat hash map keyed by identifier, replacing the original's hand-rolled
/// bucket table — only the observable behavior (unique names, stable
/// lookups) is load-bearing, not the bucket structure (spec §9).
pub type SymbolTable = HashMap<String, Symbol>;

pub fn get_symbol<'a>(
    table: &'a SymbolTable,
    name: &str,
    line: usize,
) -> Result<&'a Symbol, AssemblyError> {
    table.get(name).ok_or_else(|| AssemblyError::SemanticError {
        line,
        reason: format!("undefined label: {name}"),
    })
}
