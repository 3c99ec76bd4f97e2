use std::f64::consts::PI;

use crate::{
    algorithms::geometry::{approximate_closed_polygon, min_enclosing_circle},
    config::ClassifierConfig,
    traits::ShapeClassifier,
    types::{Classification, Contour, Evidence, ShapeTag},
};

/// Vertex-count and circularity decision tree.
///
/// Rules are tried in a fixed order and the first one that applies decides:
///
/// 1. area at or below `min_area` → [`ShapeTag::None`]
/// 2. approximated polygon with 3 vertices → [`ShapeTag::Triangle`],
///    4 vertices → [`ShapeTag::Square`]
/// 3. circularity above `circularity_threshold` → [`ShapeTag::Circle`],
///    otherwise [`ShapeTag::Cross`]
///
/// This is a heuristic; irregular borders produce false positives.
#[derive(Debug, Clone, Default)]
pub struct HeuristicShapeClassifier {
    pub config: ClassifierConfig,
}

impl HeuristicShapeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    fn by_area(&self, area: f64) -> Option<Classification> {
        (area <= self.config.min_area).then_some(Classification {
            tag: ShapeTag::None,
            evidence: Evidence::BelowMinArea { area },
        })
    }

    fn by_vertex_count(vertices: usize) -> Option<Classification> {
        let tag = match vertices {
            3 => ShapeTag::Triangle,
            4 => ShapeTag::Square,
            _ => return None,
        };
        Some(Classification {
            tag,
            evidence: Evidence::VertexCount { vertices },
        })
    }

    fn by_circularity(&self, vertices: usize, circularity: f64) -> Classification {
        let tag = if circularity > self.config.circularity_threshold {
            ShapeTag::Circle
        } else {
            ShapeTag::Cross
        };
        Classification {
            tag,
            evidence: Evidence::Circularity { vertices, circularity },
        }
    }
}

impl ShapeClassifier for HeuristicShapeClassifier {
    fn classify(&self, contour: &Contour) -> Classification {
        let area = contour.area();
        if let Some(classification) = self.by_area(area) {
            return classification;
        }

        let coords = contour.coords();
        let epsilon = self.config.epsilon_factor * contour.perimeter();
        let vertices = approximate_closed_polygon(&coords, epsilon).len();
        if let Some(classification) = Self::by_vertex_count(vertices) {
            return classification;
        }

        self.by_circularity(vertices, circularity(area, &coords))
    }
}

/// Ratio of `area` to the area of the minimal enclosing circle of `points`.
///
/// A zero-radius circle gives 0 rather than an error.
pub fn circularity(area: f64, points: &[geo_types::Coord<f64>]) -> f64 {
    match min_enclosing_circle(points) {
        Some(circle) if circle.radius > 0.0 => area / (PI * circle.radius * circle.radius),
        _ => 0.0,
    }
}
