pub mod text;
pub mod pdf;

pub use text::*;
pub use pdf::*;
