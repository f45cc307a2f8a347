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

//! File I/O is a thin collaborator (spec §1's explicit non-goal): the
//! pipeline itself never touches `std::fs` directly, it goes through this
//! trait, so tests can swap in an in-memory double.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;

pub trait FileReader {
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

pub trait FileWriter {
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Production reader/writer backed by the real filesystem.
pub struct AsmFileIo;

impl FileReader for AsmFileIo {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}

impl FileWriter for AsmFileIo {
    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        Ok(fs::write(path, contents)?)
    }
}

/// In-memory reader/writer for tests: exercises the whole pipeline
/// (including the `.am` intermediate file) without touching disk.
#[derive(Default)]
pub struct MockFileIo {
    files: std::cell::RefCell<HashMap<std::path::PathBuf, String>>,
}

impl MockFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(std::path::PathBuf::from(path), content.to_string());
    }

    pub fn get_file(&self, path: &str) -> Option<String> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.borrow().contains_key(Path::new(path))
    }
}

impl FileReader for MockFileIo {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("mock file not found: {}", path.display()))
    }
}

impl FileWriter for MockFileIo {
    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
