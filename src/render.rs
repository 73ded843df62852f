pub mod axis;
pub mod curve;
pub mod svg;
