//! Canned symbolic tibeb patterns for browsing, editing and export.

pub mod generate;

pub use generate::PatternGenerator;

use serde::Serialize;

use crate::error::{Result, TibebError};

/// A named symbolic pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SamplePattern {
    pub name: &'static str,
    pub code: &'static str,
}

const BUILTIN: [SamplePattern; 4] = [
    SamplePattern {
        name: "Tibeb Style 1 (kal666)",
        code: "X\n\nX\n\nX\n\nVOV V XX X",
    },
    SamplePattern {
        name: "Amhara Cross Border",
        code: "X X X X\n  V V  \nO   O   O\nX X X X",
    },
    SamplePattern {
        name: "Tigray Zigzag",
        code: "V   V   V\n  X   X  \nV   V   V",
    },
    SamplePattern {
        name: "Oromo Circle Motif",
        code: "O   O   O\n  X X X  \nO   O   O",
    },
];

impl SamplePattern {
    /// Download name: lower-cased, spaces replaced by underscores
    pub fn file_stem(&self) -> String {
        file_stem(self.name)
    }

    pub fn text_file_name(&self) -> String {
        format!("{}.txt", self.file_stem())
    }

    /// PDF download name keeps the display name as is
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.name)
    }

    pub fn lines(&self) -> impl Iterator<Item = &'static str> {
        self.code.split('\n')
    }
}

pub fn file_stem(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// The ordered, static pattern library
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternLibrary;

impl PatternLibrary {
    pub fn patterns(&self) -> &'static [SamplePattern] {
        &BUILTIN
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|pattern| pattern.name)
    }

    /// Look a pattern up by exact name, falling back to a case-insensitive
    /// match on the name or its file stem
    pub fn get(&self, name: &str) -> Result<&'static SamplePattern> {
        BUILTIN
            .iter()
            .find(|pattern| pattern.name == name)
            .or_else(|| {
                BUILTIN.iter().find(|pattern| {
                    pattern.name.eq_ignore_ascii_case(name) || pattern.file_stem() == file_stem(name)
                })
            })
            .ok_or_else(|| TibebError::UnknownPattern(name.to_string()))
    }
}
