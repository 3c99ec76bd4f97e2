use image::{DynamicImage, GrayImage};
use tracing::debug;
use crate::{
    config::validate_fraction,
    error::{Result, TibebError},
    traits::ImagePreprocessor,
};

/// Height in rows of the bottom band covering `fraction` of `height`
pub fn band_height(height: u32, fraction: f64) -> u32 {
    (height as f64 * fraction).round() as u32
}

/// Crop the bottom `fraction` of the image and convert it to grayscale.
///
/// The band keeps the full width. Fails on an empty image, a fraction outside
/// `(0, 1]`, or a band that rounds to zero rows.
pub fn crop_band(image: &DynamicImage, fraction: f64) -> Result<GrayImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TibebError::invalid(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    validate_fraction(fraction)?;

    let band = band_height(height, fraction);
    if band == 0 {
        return Err(TibebError::invalid(format!(
            "crop fraction {fraction} of {height} rows selects an empty region"
        )));
    }

    debug!(width, height, band, "cropping bottom band");
    Ok(image.crop_imm(0, height - band, width, band).to_luma8())
}

/// Simple thresholding preprocessor
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: 127 }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        // Pixels strictly above the threshold become 255, the rest 0
        Ok(imageproc::contrast::threshold(image, self.threshold))
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: 1.1 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if !(self.sigma > 0.0) {
            return Err(TibebError::invalid(format!(
                "blur sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }

    fn name(&self) -> &'static str {
        "gaussian_blur"
    }
}

/// Canny edge detector; output pixels are 255 on edges and 0 elsewhere
#[derive(Debug, Clone)]
pub struct CannyEdgePreprocessor {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyEdgePreprocessor {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl ImagePreprocessor for CannyEdgePreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::edges::canny(
            image,
            self.low_threshold,
            self.high_threshold,
        ))
    }

    fn name(&self) -> &'static str {
        "canny"
    }
}
