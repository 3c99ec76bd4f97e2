pub mod preprocessing;
pub mod extraction;
pub mod geometry;
pub mod classification;

pub use preprocessing::*;
pub use extraction::*;
pub use geometry::{EnclosingCircle, approximate_closed_polygon, min_enclosing_circle};
pub use classification::*;
