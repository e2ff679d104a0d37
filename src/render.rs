pub mod document;
pub mod opts;
pub mod schematic;
pub mod svg;
