use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::GridConfig,
    error::{Result, TibebError},
};

/// Textual grid of foreground/background glyphs.
///
/// Rows always have equal length; trimming only happens when the grid is
/// turned into its textual code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicGrid {
    rows: Vec<String>,
    background: char,
    trim: bool,
}

impl SymbolicGrid {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Glyphs per row
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }

    /// Newline-joined rows, each trimmed of background glyphs when enabled
    pub fn to_code(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                if self.trim {
                    row.trim_matches(self.background)
                } else {
                    row.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders a binarized region as a symbolic grid
#[derive(Debug, Clone, Default)]
pub struct GridRenderer {
    pub config: GridConfig,
}

impl GridRenderer {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, binary: &GrayImage) -> Result<SymbolicGrid> {
        let cells = area_downsample(binary, self.config.scale)?;

        let rows: Vec<String> = cells
            .rows()
            .map(|row| {
                row.map(|cell| {
                    if cell[0] > self.config.threshold {
                        self.config.foreground
                    } else {
                        self.config.background
                    }
                })
                .collect()
            })
            .collect();

        debug!(rows = rows.len(), columns = cells.width(), "rendered grid code");

        Ok(SymbolicGrid {
            rows,
            background: self.config.background,
            trim: self.config.trim,
        })
    }
}

/// Shrink by an integer factor, each output pixel the mean of its block.
///
/// Output size is `(width / scale, height / scale)`; partial blocks at the
/// right and bottom edges are dropped.
pub fn area_downsample(image: &GrayImage, scale: u32) -> Result<GrayImage> {
    if scale == 0 {
        return Err(TibebError::invalid("grid scale must be at least 1"));
    }

    let width = image.width() / scale;
    let height = image.height() / scale;
    let block = (scale as u64) * (scale as u64);

    Ok(GrayImage::from_fn(width, height, |cx, cy| {
        let mut sum: u64 = 0;
        for y in cy * scale..(cy + 1) * scale {
            for x in cx * scale..(cx + 1) * scale {
                sum += image.get_pixel(x, y)[0] as u64;
            }
        }
        // Round half up
        Luma([((sum + block / 2) / block) as u8])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if (20..40).contains(&x) { Luma([255u8]) } else { Luma([0u8]) }
        })
    }

    #[test]
    fn test_downsample_averages_blocks() {
        let mut img = GrayImage::new(4, 2);
        img.put_pixel(0, 0, Luma([255]));
        img.put_pixel(1, 1, Luma([255]));
        let small = area_downsample(&img, 2).unwrap();
        assert_eq!(small.dimensions(), (2, 1));
        assert_eq!(small.get_pixel(0, 0)[0], 128);
        assert_eq!(small.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn test_row_count_and_equal_lengths() {
        let img = striped(65, 37);
        let grid = GridRenderer::new(GridConfig { scale: 10, ..GridConfig::default() })
            .render(&img)
            .unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 6);
        assert!(grid.rows().iter().all(|row| row.chars().count() == 6));
        assert_eq!(grid.rows()[0], "  XX  ");
    }

    #[test]
    fn test_code_trims_each_row() {
        let grid = GridRenderer::default().render(&striped(60, 20)).unwrap();
        assert_eq!(grid.to_code(), "XX\nXX");

        let untrimmed = GridRenderer::new(GridConfig { trim: false, ..GridConfig::default() })
            .render(&striped(60, 20))
            .unwrap();
        assert_eq!(untrimmed.to_code(), "  XX  \n  XX  ");
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let img = GrayImage::new(10, 10);
        let renderer = GridRenderer::new(GridConfig { scale: 0, ..GridConfig::default() });
        assert!(matches!(renderer.render(&img), Err(TibebError::InvalidInput(_))));
    }

    #[test]
    fn test_region_smaller_than_scale_gives_empty_grid() {
        let grid = GridRenderer::default().render(&GrayImage::new(5, 5)).unwrap();
        assert_eq!(grid.height(), 0);
        assert_eq!(grid.to_code(), "");
    }

    #[test]
    fn test_render_is_deterministic() {
        let img = striped(100, 40);
        let renderer = GridRenderer::default();
        assert_eq!(renderer.render(&img).unwrap(), renderer.render(&img).unwrap());
    }
}
