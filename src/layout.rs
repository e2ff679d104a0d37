pub mod labels;
pub mod text;
