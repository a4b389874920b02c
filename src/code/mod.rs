pub mod geometry;
pub mod renderer;
pub mod style;
