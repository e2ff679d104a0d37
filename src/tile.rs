pub mod model;
pub mod mosaic;
pub mod render;
pub mod sprite;
