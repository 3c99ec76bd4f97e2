pub mod grid;
pub mod svg;

pub use grid::{GridRenderer, SymbolicGrid, area_downsample};
pub use svg::{Primitive, VectorDiagram};
