use std::fs;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::{info, warn};

use crate::{error::Result, library::SamplePattern};

/// Lines that fit on one A4 page at 10 mm per line between the margins
pub const MAX_LINES_PER_PAGE: usize = 27;

/// Render a symbolic pattern onto a single A4 page.
///
/// Each line becomes one fixed-height (10 mm) Courier 14pt cell from the top
/// margin down. Lines past the first page are dropped.
pub fn pattern_to_pdf(title: &str, code: &str) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "pattern");
    let font = doc.add_builtin_font(BuiltinFont::Courier)?;
    let canvas = doc.get_page(page).get_layer(layer);

    let lines: Vec<&str> = code.split('\n').collect();
    if lines.len() > MAX_LINES_PER_PAGE {
        warn!(
            title,
            lines = lines.len(),
            kept = MAX_LINES_PER_PAGE,
            "pattern longer than one page, dropping extra lines"
        );
    }

    canvas.begin_text_section();
    canvas.set_font(&font, 14.0);
    // 10 mm expressed in points
    canvas.set_line_height(28.35);
    canvas.set_text_cursor(Mm(10.0), Mm(280.0));
    for line in lines.iter().take(MAX_LINES_PER_PAGE) {
        canvas.write_text(*line, &font);
        canvas.add_line_break();
    }
    canvas.end_text_section();

    Ok(doc.save_to_bytes()?)
}

/// Write a pattern PDF to `path`
pub fn save_pattern_pdf<P: AsRef<Path>>(path: P, title: &str, code: &str) -> Result<()> {
    let path = path.as_ref();
    let bytes = pattern_to_pdf(title, code)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), "saved pattern PDF");
    Ok(())
}

impl SamplePattern {
    /// Save this pattern as a PDF under its download name inside `dir`
    pub fn save_pdf_in<P: AsRef<Path>>(&self, dir: P) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(self.pdf_file_name());
        save_pattern_pdf(&path, self.name, self.code)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PatternLibrary;

    #[test]
    fn test_pdf_bytes_have_header() {
        let bytes = pattern_to_pdf("Tigray Zigzag", "V   V   V\n  X   X  ").expect("Should render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_pattern_still_renders() {
        let code = vec!["X X"; MAX_LINES_PER_PAGE + 5].join("\n");
        assert!(pattern_to_pdf("long", &code).is_ok());
    }

    #[test]
    fn test_library_pattern_pdf_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let pattern = PatternLibrary.get("Amhara Cross Border").unwrap();
        let path = pattern.save_pdf_in(dir.path()).expect("Should save");
        assert_eq!(path.file_name().unwrap(), "Amhara Cross Border.pdf");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
