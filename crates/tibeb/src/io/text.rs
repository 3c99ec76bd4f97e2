use std::fs;
use std::path::Path;

use tracing::info;

use crate::{
    error::Result,
    library::SamplePattern,
    render::{SymbolicGrid, VectorDiagram},
};

/// Normalize an edited pattern: `\r\n` and lone `\r` become `\n`
pub fn normalize_pattern(code: &str) -> String {
    code.replace("\r\n", "\n").replace('\r', "\n")
}

/// Write a symbolic pattern as UTF-8 text, without trailing metadata
pub fn save_pattern_text<P: AsRef<Path>>(path: P, code: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, normalize_pattern(code))?;
    info!(path = %path.display(), "saved pattern text");
    Ok(())
}

impl SymbolicGrid {
    /// Save the textual grid code
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_pattern_text(path, &self.to_code())
    }
}

impl VectorDiagram {
    /// Save the pretty-printed SVG document
    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_svg_string())?;
        info!(path = %path.display(), primitives = self.primitives.len(), "saved vector diagram");
        Ok(())
    }
}

impl SamplePattern {
    /// Save this pattern under its download name inside `dir`
    pub fn save_text_in<P: AsRef<Path>>(&self, dir: P) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(self.text_file_name());
        save_pattern_text(&path, self.code)?;
        Ok(path)
    }
}
