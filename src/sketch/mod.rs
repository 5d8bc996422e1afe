pub mod export;
pub mod raster;
pub mod render;
pub mod surface;

pub use raster::{RasterBuffer, Rgba};
pub use surface::{SketchSurface, SketchTool, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
