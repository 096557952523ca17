pub mod legend;
pub mod render;
