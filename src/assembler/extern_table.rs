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

/// One record per distinct extern-declared label actually used, holding
/// the ordered sequence of instruction-word addresses where it was
/// referenced as an operand (spec §3.2's "Extern-reference record").
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExternTable {
    sites: HashMap<String, Vec<u16>>,
    order: Vec<String>,
    reference_count: usize,
}

impl ExternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference to `name` at the (already offset) word address
    /// `address`. Counted once per reference site, not once per symbol
    /// (spec §4.5's "extern counter").
    pub fn record(&mut self, name: &str, address: u16) {
        self.reference_count += 1;
        match self.sites.get_mut(name) {
            Some(addresses) => addresses.push(address),
            None => {
                self.sites.insert(name.to_string(), vec![address]);
                self.order.push(name.to_string());
            }
        }
    }

    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    pub fn is_empty(&self) -> bool {
        self.reference_count == 0
    }

    /// Iterates `(name, address)` pairs in definition order, then
    /// reference order within each name — stable across runs for
    /// identical input, per spec §5.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.order.iter().flat_map(move |name| {
            self.sites[name]
                .iter()
                .map(move |addr| (name.as_str(), *addr))
        })
    }
}
