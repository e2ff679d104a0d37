pub mod classify;
pub mod legs;
pub mod model;
pub mod names;
