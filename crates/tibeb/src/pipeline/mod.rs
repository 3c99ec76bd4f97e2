pub mod builder;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};
use crate::{
    algorithms::crop_band,
    config::{LayoutConfig, PipelineConfig},
    error::{Result, TibebError},
    render::{GridRenderer, SymbolicGrid, VectorDiagram},
    traits::{ContourExtractor, ImagePreprocessor, ShapeClassifier},
    types::{ClassifiedShape, PatternOutput},
};

/// The photo-to-pattern pipeline.
///
/// Stages run in a fixed order: crop the bottom band, run the preprocessors
/// in sequence, then either downsample into a grid code or extract and
/// classify contours for the vector diagram. Every stage is a pure function
/// of its input, so a pipeline can be shared between threads.
pub struct Pipeline {
    crop_fraction: f64,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    classifier: Box<dyn ShapeClassifier>,
    grid_renderer: GridRenderer,
    layout: LayoutConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        crop_fraction: f64,
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        classifier: Box<dyn ShapeClassifier>,
        grid_renderer: GridRenderer,
        layout: LayoutConfig,
    ) -> Self {
        Self {
            crop_fraction,
            preprocessors,
            contour_extractor,
            classifier,
            grid_renderer,
            layout,
        }
    }

    /// Build the standard pipeline from a validated configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(builder::PipelineBuilder::from_config(config).build())
    }

    /// Decode an uploaded JPEG/PNG buffer
    pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(TibebError::invalid("image buffer is empty"));
        }
        image::load_from_memory(bytes)
            .map_err(|err| TibebError::invalid(format!("undecodable image: {err}")))
    }

    /// Crop the band and run every preprocessor, yielding the binary region
    pub fn prepare(&self, image: &DynamicImage) -> Result<GrayImage> {
        let band = crop_band(image, self.crop_fraction)?;
        self.preprocess(&band)
    }

    /// Apply all preprocessors in sequence
    pub fn preprocess(&self, region: &GrayImage) -> Result<GrayImage> {
        let mut processed = region.clone();
        for preprocessor in &self.preprocessors {
            processed = preprocessor.preprocess(&processed)?;
            debug!(stage = preprocessor.name(), "preprocessed region");
        }
        Ok(processed)
    }

    /// Branch A: downsample the binary region into a symbolic grid
    pub fn grid_code(&self, binary: &GrayImage) -> Result<SymbolicGrid> {
        self.grid_renderer.render(binary)
    }

    /// Branch B, first half: extract contours and classify each one
    pub fn classify_binary(&self, binary: &GrayImage) -> Result<Vec<ClassifiedShape>> {
        let contours = self.contour_extractor.extract_contours(binary)?;
        let shapes = contours
            .iter()
            .map(|contour| ClassifiedShape {
                bounding_box: contour.bounding_box(),
                area: contour.area(),
                classification: self.classifier.classify(contour),
            })
            .collect();
        Ok(shapes)
    }

    /// Branch B, second half: lay the classified shapes out as a diagram
    pub fn diagram(&self, shapes: &[ClassifiedShape]) -> VectorDiagram {
        VectorDiagram::from_shapes(shapes, &self.layout)
    }

    /// Run both branches on a decoded image
    pub fn process(&self, image: &DynamicImage) -> Result<PatternOutput> {
        let binary = self.prepare(image)?;
        let grid = self.grid_code(&binary)?;
        let shapes = self.classify_binary(&binary)?;
        let diagram = self.diagram(&shapes);

        info!(
            region_width = binary.width(),
            region_height = binary.height(),
            grid_rows = grid.height(),
            shapes = shapes.len(),
            primitives = diagram.primitives.len(),
            "processed pattern image"
        );

        Ok(PatternOutput {
            region_width: binary.width(),
            region_height: binary.height(),
            grid,
            shapes,
            diagram,
        })
    }

    /// Decode and process an uploaded image buffer
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<PatternOutput> {
        let image = Self::decode(bytes)?;
        self.process(&image)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        let stages: Vec<&str> = self.preprocessors.iter().map(|p| p.name()).collect();
        format!(
            "Pipeline: crop {:.2} → {} → contours → classifier",
            self.crop_fraction,
            stages.join(" → ")
        )
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        builder::PipelineBuilder::from_config(&PipelineConfig::default()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("Should encode PNG");
        bytes
    }

    fn banded_photo() -> DynamicImage {
        let mut img = RgbImage::from_pixel(120, 100, Rgb([200, 180, 160]));
        for y in 82..96 {
            for x in (5..115).filter(|x| (x / 15) % 2 == 0) {
                img.put_pixel(x, y, Rgb([20, 20, 20]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(Pipeline::decode(&[]), Err(TibebError::InvalidInput(_))));
        assert!(matches!(
            Pipeline::decode(b"definitely not an image"),
            Err(TibebError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prepare_keeps_width_and_rounds_height() {
        let pipeline = Pipeline::default();
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 33, Luma([255])));
        let binary = pipeline.prepare(&img).expect("Should prepare");
        // round(33 * 0.2) = round(6.6) = 7
        assert_eq!(binary.dimensions(), (64, 7));
    }

    #[test]
    fn test_binary_region_only_contains_extremes() {
        let pipeline = Pipeline::default();
        let binary = pipeline.prepare(&banded_photo()).expect("Should prepare");
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(binary.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn test_grid_rows_follow_region_size() {
        let pipeline = Pipeline::default();
        let output = pipeline.process(&banded_photo()).expect("Should process");
        assert_eq!(output.region_height, 20);
        assert_eq!(output.grid.height(), 2);
        assert!(output.grid.rows().iter().all(|row| row.chars().count() == 12));
    }

    #[test]
    fn test_process_bytes_is_deterministic() {
        let pipeline = Pipeline::default();
        let bytes = encode_png(banded_photo());

        let first = pipeline.process_bytes(&bytes).expect("Should process");
        let second = pipeline.process_bytes(&bytes).expect("Should process");
        assert_eq!(first.grid.to_code(), second.grid.to_code());
        assert_eq!(first.diagram.to_svg_string(), second.diagram.to_svg_string());
        assert_eq!(first.tags(), second.tags());
    }

    #[test]
    fn test_info_lists_stages() {
        let info = Pipeline::default().info();
        assert!(info.contains("gaussian_blur → canny → threshold"));
    }
}
