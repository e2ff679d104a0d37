pub mod geometry;
pub mod projection;
