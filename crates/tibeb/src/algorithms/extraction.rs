use image::GrayImage;
use imageproc::contours::BorderType;
use tracing::debug;
use crate::{error::Result, traits::ContourExtractor, types::Contour};

/// Imageproc-based extractor keeping external borders only.
///
/// Contours come back sorted by the x origin of their bounding box. The sort
/// is stable, so contours sharing an x origin keep discovery order.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, binary_image: &GrayImage) -> Result<Vec<Contour>> {
        let contours = imageproc::contours::find_contours::<i32>(binary_image);
        let found = contours.len();

        let mut result: Vec<Contour> = contours
            .into_iter()
            .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
            .map(|contour| {
                Contour::new(contour.points.iter().map(|p| [p.x, p.y]).collect())
            })
            .collect();

        sort_left_to_right(&mut result);
        debug!(found, external = result.len(), "extracted contours");

        Ok(result)
    }
}

/// Stable sort by bounding-box x origin
pub fn sort_left_to_right(contours: &mut [Contour]) {
    contours.sort_by_key(|contour| contour.bounding_box().x);
}
