use image::GrayImage;
use crate::{
    error::Result,
    types::{Classification, Contour},
};

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync  {
    /// Preprocess the input image (e.g., blur, edge detection, threshold)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;

    /// Short name used in pipeline descriptions and logs
    fn name(&self) -> &'static str;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync  {
    /// Extract contours from a binary image, ordered left to right
    fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Contour>>;
}

/// Trait for shape classification algorithms
pub trait ShapeClassifier: Send + Sync {
    /// Classify a single contour; never fails, degenerate input maps to a tag
    fn classify(&self, contour: &Contour) -> Classification;
}
