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

//! The assembler proper: first and second pass over an already-parsed
//! line stream, plus the small tables each pass builds and consults.

pub mod constant_table;
pub mod extern_table;
pub mod first_pass;
pub mod second_pass;
pub mod symbol_table;
