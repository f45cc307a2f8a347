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

/// A `.define NAME = N` constant. The original overloads a symbol's
/// `address` field with the defining line number to guard against forward
/// references; here that guard gets its own named field instead (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantDef {
    pub value: i16,
    pub defined_at_line: usize,
}

pub type ConstantTable = HashMap<String, ConstantDef>;

/// Resolves `name` for use on `using_line`, enforcing that the constant's
/// definition line is strictly less than the line using it.
pub fn resolve_constant(
    table: &ConstantTable,
    name: &str,
    using_line: usize,
) -> Result<i16, AssemblyError> {
    let def = table.get(name).ok_or_else(|| AssemblyError::SemanticError {
        line: using_line,
        reason: format!("undefined constant: {name}"),
    })?;

    if def.defined_at_line >= using_line {
        return Err(AssemblyError::SemanticError {
            line: using_line,
            reason: format!(
                "constant '{name}' is used before its definition on line {using_line}"
            ),
        });
    }

    Ok(def.value)
}
