pub mod change;
pub mod display;
pub mod geometry;
pub mod region;
pub mod tree;

pub use change::*;
pub use display::*;
pub use geometry::*;
pub use region::*;
pub use tree::*;

// Re-export commonly used palette types
pub use palette::Srgba;
