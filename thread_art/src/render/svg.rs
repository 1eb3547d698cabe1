use std::{io, path::Path};

use ::svg::{
    node::element::{Circle, Polyline, Rectangle},
    Document, Node,
};
use palette::Srgb;

use super::{Capabilities, Compositing, Renderer};
use crate::{geometry::Point, Float, Grid};

/// Renders into an in memory SVG document.
pub struct SvgRenderer<S> {
    size: Grid<S>,
    capabilities: Capabilities,
    document: Document,
}

impl<S: Float> SvgRenderer<S> {
    pub fn new(width: S, height: S) -> Self {
        let size = Grid::new(height, width);
        Self {
            document: Self::blank(size),
            size,
            capabilities: Capabilities {
                advanced_compositing: true,
            },
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn blank(size: Grid<S>) -> Document {
        Document::new()
            .set("viewBox", (0, 0, size.width, size.height))
            .set("width", size.width)
            .set("height", size.height)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        ::svg::save(path, &self.document)
    }
}

fn rgb(color: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", color.red, color.green, color.blue)
}

fn blend_mode(compositing: Compositing) -> &'static str {
    match compositing {
        Compositing::Lighten => "mix-blend-mode:screen",
        Compositing::Darken => "mix-blend-mode:multiply",
        Compositing::SourceOver => "mix-blend-mode:normal",
    }
}

impl<S: Float> Renderer<S> for SvgRenderer<S> {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn size(&self) -> Grid<S> {
        self.size
    }

    fn clear(&mut self, color: Srgb<u8>) {
        self.document = Self::blank(self.size);
        self.document.append(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", self.size.width)
                .set("height", self.size.height)
                .set("fill", rgb(color)),
        );
    }

    fn draw_polyline(
        &mut self,
        points: &[Point<S>],
        color: Srgb<u8>,
        opacity: S,
        compositing: Compositing,
        thickness: S,
    ) {
        if points.len() < 2 {
            return;
        }
        let points = points
            .iter()
            .map(|point| format!("{:.4},{:.4}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.document.append(
            Polyline::new()
                .set("points", points)
                .set("fill", "none")
                .set("stroke", rgb(color))
                .set("stroke-opacity", format!("{:.4}", opacity))
                .set("stroke-width", format!("{:.4}", thickness))
                .set("stroke-linejoin", "round")
                .set("style", blend_mode(compositing)),
        );
    }

    fn draw_points(&mut self, points: &[Point<S>], color: Srgb<u8>, radius: S) {
        for point in points {
            self.document.append(
                Circle::new()
                    .set("cx", format!("{:.4}", point.x))
                    .set("cy", format!("{:.4}", point.y))
                    .set("r", format!("{:.4}", radius))
                    .set("fill", rgb(color)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_polylines_with_blend_mode() {
        let mut renderer = SvgRenderer::<f32>::new(100.0, 50.0);
        renderer.clear(Srgb::new(255, 255, 255));
        renderer.draw_polyline(
            &[Point::new(0.0, 0.0), Point::new(10.0, 5.0), Point::new(3.0, 4.5)],
            Srgb::new(0, 0, 0),
            0.25,
            Compositing::Darken,
            1.5,
        );
        renderer.draw_points(&[Point::new(1.0, 2.0)], Srgb::new(128, 128, 128), 0.5);

        let text = renderer.document().to_string();
        assert!(text.contains("0.0000,0.0000 10.0000,5.0000 3.0000,4.5000"));
        assert!(text.contains("mix-blend-mode:multiply"));
        assert!(text.contains("rgb(255, 255, 255)"));
        assert!(text.contains("<circle"));
    }

    #[test]
    fn clearing_drops_previous_strokes() {
        let mut renderer = SvgRenderer::<f64>::new(10.0, 10.0);
        renderer.draw_polyline(
            &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            Srgb::new(0, 0, 0),
            1.0,
            Compositing::SourceOver,
            1.0,
        );
        assert!(renderer.document().to_string().contains("<polyline"));
        renderer.clear(Srgb::new(0, 0, 0));
        assert!(!renderer.document().to_string().contains("<polyline"));
    }
}
