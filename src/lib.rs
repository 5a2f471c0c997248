//! Trade route data, filtering and map styling shared by the viewer and the
//! sample generator.

pub mod color;
pub mod data;
pub mod geo;
