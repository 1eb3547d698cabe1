use palette::Srgb;

use crate::{
    engine::ThreadArt,
    geometry::Point,
    thread::{Channel, Thread},
    Float, Grid,
};

pub mod svg;
mod transform;

pub use self::svg::SvgRenderer;
pub use transform::Transform;

/// What an output surface can do, reported once per draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Supports lighten / darken blending between strokes.
    pub advanced_compositing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compositing {
    /// Screen like blending of light thread on a dark ground.
    Lighten,
    /// Multiply like blending of dark thread on a light ground.
    Darken,
    /// Plain alpha blending.
    SourceOver,
}

/// Output surface the finished threads are drawn onto. Coordinates are in
/// the surface's own units.
pub trait Renderer<S> {
    fn capabilities(&self) -> Capabilities;

    fn size(&self) -> Grid<S>;

    fn clear(&mut self, color: Srgb<u8>);

    fn draw_polyline(
        &mut self,
        points: &[Point<S>],
        color: Srgb<u8>,
        opacity: S,
        compositing: Compositing,
        thickness: S,
    );

    fn draw_points(&mut self, points: &[Point<S>], color: Srgb<u8>, radius: S);
}

pub const PEG_COLOR: Srgb<u8> = Srgb::new(128, 128, 128);

/// Ground the threads are stretched over.
pub fn background(invert_colors: bool) -> Srgb<u8> {
    if invert_colors {
        Srgb::new(0, 0, 0)
    } else {
        Srgb::new(255, 255, 255)
    }
}

/// Thread color of `channel`: subtractive inks on a light ground, additive
/// primaries on a dark one.
pub fn thread_color(channel: Channel, invert_colors: bool) -> Srgb<u8> {
    match (channel, invert_colors) {
        (Channel::Monochrome, false) => Srgb::new(0, 0, 0),
        (Channel::Red, false) => Srgb::new(0, 255, 255),
        (Channel::Green, false) => Srgb::new(255, 0, 255),
        (Channel::Blue, false) => Srgb::new(255, 255, 0),
        (Channel::Monochrome, true) => Srgb::new(255, 255, 255),
        (Channel::Red, true) => Srgb::new(255, 0, 0),
        (Channel::Green, true) => Srgb::new(0, 255, 0),
        (Channel::Blue, true) => Srgb::new(0, 0, 255),
    }
}

impl<S: Float> ThreadArt<S> {
    /// Draws the ground, every thread and the pegs onto `renderer`.
    pub fn draw_onto(&self, renderer: &mut impl Renderer<S>) {
        let invert = self.parameters.invert_colors;
        let compositing = if !renderer.capabilities().advanced_compositing {
            Compositing::SourceOver
        } else if invert {
            Compositing::Lighten
        } else {
            Compositing::Darken
        };
        let transform = Transform::new(self.raster.grid().as_::<S>(), renderer.size());
        let opacity = S::of_f64(self.parameters.line_opacity);
        let thickness = S::of_f64(self.parameters.line_thickness) * transform.scale();

        renderer.clear(background(invert));
        for &channel in self.threads.channels() {
            let sequence = self.threads.sequence(channel);
            if sequence.len() < 2 {
                continue;
            }
            let points: Vec<_> = sequence
                .iter()
                .map(|&peg| transform.apply(self.pegs[peg].position))
                .collect();
            renderer.draw_polyline(&points, thread_color(channel, invert), opacity, compositing, thickness);
        }
        let pegs: Vec<_> = self.pegs.positions().map(|position| transform.apply(position)).collect();
        renderer.draw_points(&pegs, PEG_COLOR, transform.scale());
    }
}
