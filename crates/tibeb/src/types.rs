use geo_types::{Coord, LineString, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::render::{grid::SymbolicGrid, svg::VectorDiagram};

/// Closed boundary of a connected foreground region, in pixel coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[i32; 2]>,
}

/// Axis-aligned bounding box, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Contour {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as floating-point coordinates for geometric operations
    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.points
            .iter()
            .map(|&[x, y]| Coord { x: x as f64, y: y as f64 })
            .collect()
    }

    /// Convert to a geo-types Polygon; the ring is closed implicitly
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::new(self.coords()), vec![])
    }

    /// Enclosed area (shoelace formula over the boundary points)
    pub fn area(&self) -> f64 {
        use geo::Area;
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_geo_polygon().unsigned_area()
    }

    /// Length of the closed boundary, including the closing segment
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut coords = self.coords();
        coords.push(coords[0]);
        LineString::new(coords).euclidean_length()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;

        for &[x, y] in &self.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if self.points.is_empty() {
            return BoundingBox { x: 0, y: 0, width: 0, height: 0 };
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: (max_x - min_x) as u32 + 1,
            height: (max_y - min_y) as u32 + 1,
        }
    }
}

/// Symbolic tag attached to a classified contour
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShapeTag {
    Triangle,
    Square,
    Circle,
    Cross,
    None,
}

impl ShapeTag {
    /// Glyph used for this tag in symbolic pattern codes
    pub fn glyph(self) -> char {
        match self {
            Self::Triangle => 'V',
            Self::Square => 'X',
            Self::Circle => 'O',
            Self::Cross => '+',
            Self::None => ' ',
        }
    }

    /// Whether shapes with this tag are drawn in the vector diagram
    pub fn is_drawable(self) -> bool {
        self != Self::None
    }
}

/// The rule that decided a classification, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Evidence {
    /// Area at or below the minimum area
    BelowMinArea { area: f64 },
    /// Approximated polygon had 3 or 4 vertices
    VertexCount { vertices: usize },
    /// Fell through to the enclosing-circle roundness test
    Circularity { vertices: usize, circularity: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub tag: ShapeTag,
    pub evidence: Evidence,
}

/// A contour reduced to what the renderers need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifiedShape {
    pub bounding_box: BoundingBox,
    pub area: f64,
    pub classification: Classification,
}

impl ClassifiedShape {
    pub fn tag(&self) -> ShapeTag {
        self.classification.tag
    }
}

/// Everything a full pipeline run produces for one image
#[derive(Debug, Clone)]
pub struct PatternOutput {
    pub region_width: u32,
    pub region_height: u32,
    pub grid: SymbolicGrid,
    pub shapes: Vec<ClassifiedShape>,
    pub diagram: VectorDiagram,
}

impl PatternOutput {
    pub fn tags(&self) -> Vec<ShapeTag> {
        self.shapes.iter().map(ClassifiedShape::tag).collect()
    }
}
