//! # Tibeb Pattern Library
//!
//! Turns a photo of a woven tibeb border into two artefacts: a symbolic grid
//! code of `X` and space characters, and a schematic SVG diagram with one
//! primitive per recognized motif. A small library of canned patterns can be
//! browsed, edited and exported as text or PDF.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tibeb::Pipeline;
//!
//! let pipeline = Pipeline::default();
//! let bytes = std::fs::read("border.jpg")?;
//! let output = pipeline.process_bytes(&bytes)?;
//!
//! println!("{}", output.grid.to_code());
//! output.diagram.save_svg("border.svg")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use tibeb::{Pipeline, algorithms::*, config::ClassifierConfig};
//!
//! let pipeline = Pipeline::builder()
//!     .with_crop_fraction(0.3)
//!     .add_preprocessor(GaussianBlurPreprocessor { sigma: 1.5 })
//!     .add_preprocessor(ThresholdPreprocessor { threshold: 100 })
//!     .set_classifier(HeuristicShapeClassifier::new(ClassifierConfig {
//!         min_area: 250.0,
//!         ..Default::default()
//!     }))
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod render;
pub mod library;
pub mod io;
pub mod studio;

pub use error::{Result, TibebError};
pub use types::{BoundingBox, Classification, ClassifiedShape, Contour, Evidence, PatternOutput, ShapeTag};
pub use config::PipelineConfig;
pub use traits::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use render::{SymbolicGrid, VectorDiagram};
pub use library::{PatternGenerator, PatternLibrary, SamplePattern};
pub use studio::{PatternStudio, StudioCommand, StudioOutput};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("Should encode");
        bytes
    }

    /// White motifs on black: triangle, square, circle and plus, left to right
    fn motif_strip() -> GrayImage {
        GrayImage::from_fn(420, 100, |x, y| {
            let (x, y) = (x as i32, y as i32);

            // Apex (50,10), base from (5,88) to (95,88)
            let triangle = (10..=88).contains(&y) && {
                let half = (y - 10) * 45 / 78;
                (50 - half..=50 + half).contains(&x)
            };
            let square = (120..=180).contains(&x) && (20..=80).contains(&y);
            let circle = (x - 250).pow(2) + (y - 50).pow(2) <= 40 * 40;
            let plus = ((350..=370).contains(&x) && (15..=85).contains(&y))
                || ((325..=395).contains(&x) && (40..=60).contains(&y));

            if triangle || square || circle || plus {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_blank_photo_gives_blank_pattern() {
        let photo = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 100, Luma([255])));
        let output = Pipeline::default()
            .process_bytes(&encode_png(&photo))
            .expect("Should process");

        assert_eq!((output.region_width, output.region_height), (100, 20));
        assert_eq!(output.grid.height(), 2);
        assert_eq!(output.grid.width(), 10);
        assert!(output.grid.rows().iter().all(|row| row.chars().all(|c| c == ' ')));
        assert_eq!(output.grid.to_code(), "\n");
        assert!(output.diagram.primitives.is_empty());
    }

    #[test]
    fn test_motif_strip_is_classified_in_order() {
        let pipeline = PipelineBuilder::build_threshold_only(127);
        let photo = DynamicImage::ImageLuma8(motif_strip());
        let output = pipeline.process(&photo).expect("Should process");

        assert_eq!(
            output.tags(),
            vec![ShapeTag::Triangle, ShapeTag::Square, ShapeTag::Circle, ShapeTag::Cross]
        );

        let xs: Vec<i32> = output.shapes.iter().map(|s| s.bounding_box.x).collect();
        assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));

        assert_eq!(output.diagram.primitives.len(), 4);
        assert_eq!((output.diagram.width, output.diagram.height), (160.0, 70.0));
        assert_eq!(output.diagram.tags(), output.tags());
    }

    #[test]
    fn test_motif_strip_through_edge_chain() {
        let config = PipelineConfig { crop_fraction: 1.0, ..Default::default() };
        let pipeline = Pipeline::from_config(&config).expect("Should build");
        let output = pipeline.process(&DynamicImage::ImageLuma8(motif_strip())).expect("Should process");

        // Canny rounds the corners of the plus, so only the first three are stable
        assert_eq!(output.shapes.len(), 4);
        assert_eq!(
            output.tags()[..3],
            [ShapeTag::Triangle, ShapeTag::Square, ShapeTag::Circle]
        );
    }

    #[test]
    fn test_same_bytes_same_output() {
        let bytes = encode_png(&DynamicImage::ImageLuma8(motif_strip()));
        let pipeline = Pipeline::default();

        let first = pipeline.process_bytes(&bytes).expect("Should process");
        let second = pipeline.process_bytes(&bytes).expect("Should process");

        assert_eq!(first.grid, second.grid);
        assert_eq!(first.shapes, second.shapes);
        assert_eq!(first.diagram.to_svg_string(), second.diagram.to_svg_string());
    }

    #[test]
    fn test_undecodable_upload_is_invalid_input() {
        let result = Pipeline::default().process_bytes(b"definitely not an image");
        assert!(matches!(result, Err(TibebError::InvalidInput(_))));
    }
}
