use serde::{Deserialize, Serialize};
use svg::{
    Document,
    node::element::{Circle, Path, Polyline, Rectangle},
};
use tracing::debug;

use crate::{
    config::LayoutConfig,
    types::{ClassifiedShape, ShapeTag},
};

/// Half of the nominal extent every primitive is drawn within
const HALF_EXTENT: f64 = 15.0;
const SQUARE_WIDTH: f64 = 20.0;
const SQUARE_HEIGHT: f64 = 30.0;
const CIRCLE_RADIUS: f64 = 15.0;

/// One schematic draw command, positioned by its centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Triangle { cx: f64, cy: f64 },
    Rectangle { cx: f64, cy: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Cross { cx: f64, cy: f64, arm: f64 },
}

impl Primitive {
    fn for_tag(tag: ShapeTag, cx: f64, cy: f64) -> Option<Self> {
        match tag {
            ShapeTag::Triangle => Some(Self::Triangle { cx, cy }),
            ShapeTag::Square => Some(Self::Rectangle {
                cx,
                cy,
                width: SQUARE_WIDTH,
                height: SQUARE_HEIGHT,
            }),
            ShapeTag::Circle => Some(Self::Circle { cx, cy, r: CIRCLE_RADIUS }),
            ShapeTag::Cross => Some(Self::Cross { cx, cy, arm: HALF_EXTENT }),
            ShapeTag::None => None,
        }
    }

    pub fn tag(&self) -> ShapeTag {
        match self {
            Self::Triangle { .. } => ShapeTag::Triangle,
            Self::Rectangle { .. } => ShapeTag::Square,
            Self::Circle { .. } => ShapeTag::Circle,
            Self::Cross { .. } => ShapeTag::Cross,
        }
    }
}

/// Left-to-right schematic drawing of classified shapes; not to scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDiagram {
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    pub primitives: Vec<Primitive>,
}

impl VectorDiagram {
    /// Lay shapes out on a fixed pitch, skipping those tagged `none`
    pub fn from_shapes(shapes: &[ClassifiedShape], layout: &LayoutConfig) -> Self {
        let cy = layout.margin + HALF_EXTENT;
        let primitives: Vec<Primitive> = shapes
            .iter()
            .map(ClassifiedShape::tag)
            .filter(|tag| tag.is_drawable())
            .enumerate()
            .filter_map(|(slot, tag)| {
                let cx = layout.margin + layout.pitch * slot as f64 + layout.pitch / 2.0;
                Primitive::for_tag(tag, cx, cy)
            })
            .collect();

        let width = 2.0 * layout.margin + layout.pitch * primitives.len() as f64;
        let height = 2.0 * layout.margin + 2.0 * HALF_EXTENT;
        debug!(primitives = primitives.len(), width, height, "laid out vector diagram");

        Self {
            width,
            height,
            stroke_width: layout.stroke_width,
            primitives,
        }
    }

    pub fn tags(&self) -> Vec<ShapeTag> {
        self.primitives.iter().map(Primitive::tag).collect()
    }

    /// Build the SVG document tree
    pub fn to_document(&self) -> Document {
        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", format!("0 0 {} {}", self.width, self.height));

        for primitive in &self.primitives {
            document = match *primitive {
                Primitive::Triangle { cx, cy } => document.add(self.stroked(
                    Polyline::new().set(
                        "points",
                        format!(
                            "{},{} {},{} {},{}",
                            cx, cy - HALF_EXTENT,
                            cx - HALF_EXTENT, cy + HALF_EXTENT,
                            cx + HALF_EXTENT, cy + HALF_EXTENT,
                        ),
                    ),
                )),
                Primitive::Rectangle { cx, cy, width, height } => document.add(self.stroked(
                    Rectangle::new()
                        .set("x", cx - width / 2.0)
                        .set("y", cy - height / 2.0)
                        .set("width", width)
                        .set("height", height),
                )),
                Primitive::Circle { cx, cy, r } => document.add(self.stroked(
                    Circle::new().set("cx", cx).set("cy", cy).set("r", r),
                )),
                Primitive::Cross { cx, cy, arm } => {
                    let data = format!(
                        "M {} {} L {} {} M {} {} L {} {}",
                        cx - arm, cy,
                        cx + arm, cy,
                        cx, cy - arm,
                        cx, cy + arm,
                    );
                    document.add(self.stroked(Path::new().set("d", data)))
                }
            };
        }

        document
    }

    fn stroked<N: svg::Node>(&self, mut node: N) -> N {
        node.assign("fill", "none");
        node.assign("stroke", "black");
        node.assign("stroke-width", self.stroke_width);
        node
    }

    /// Pretty-printed SVG text with 2-space indentation
    pub fn to_svg_string(&self) -> String {
        indent_xml(&self.to_document().to_string())
    }
}

/// Re-indent markup that has one tag per line
fn indent_xml(markup: &str) -> String {
    let mut depth: usize = 0;
    let mut out = String::with_capacity(markup.len() * 2);

    for line in markup.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let closing = line.starts_with("</");
        if closing {
            depth = depth.saturating_sub(1);
        }
        out.push_str(&"  ".repeat(depth));
        out.push_str(line);
        out.push('\n');

        let opening = !closing
            && line.starts_with('<')
            && !line.starts_with("<?")
            && !line.starts_with("<!")
            && !line.ends_with("/>")
            && !line.contains("</");
        if opening {
            depth += 1;
        }
    }

    out
}
