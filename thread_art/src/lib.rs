pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

mod engine;
mod float;
pub mod grid;
mod growth;
pub mod indicators;
pub mod instructions;
pub mod metrics;
pub mod params;
pub mod pegs;
pub mod raster;
pub mod render;
pub mod selector;
pub mod thread;
pub mod verboser;

pub use engine::{Error, ThreadArt};
pub use float::Float;
pub use grid::Grid;
pub use growth::Growth;
pub use indicators::IndicatorSink;
pub use metrics::ErrorStats;
pub use params::{Mode, Overrides, Parameters, Shape};
pub use render::{Capabilities, Compositing, Renderer, SvgRenderer};
pub use thread::{Channel, Thread};
