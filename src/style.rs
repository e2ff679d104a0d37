pub mod color;
pub mod document;
pub mod eval;
pub mod expr;
pub mod value;
