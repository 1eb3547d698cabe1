use image::{imageops, DynamicImage, RgbImage};

use crate::{
    geometry::{Point, Segment},
    Float, Grid,
};

mod crop;
mod snapshot;

pub use crop::{Crop, Window};
pub use snapshot::{Sampler, Snapshot};

/// Longer side of the working buffer at quality 1.
pub const MAX_SIZE: u32 = 512;

/// How the next segments are composited into the buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke<S> {
    plane: usize,
    intensity: S,
    width: S,
}

impl<S: Float> Stroke<S> {
    /// Thin strokes are drawn one unit wide with an intensity scaled by their
    /// thickness, approximating anti aliased coverage.
    pub fn new(plane: usize, opacity: S, thickness: S) -> Self {
        if thickness <= S::ONE {
            Self {
                plane,
                intensity: S::HALF * opacity * thickness,
                width: S::ONE,
            }
        } else {
            Self {
                plane,
                intensity: S::HALF * opacity,
                width: thickness,
            }
        }
    }

    pub fn plane(&self) -> usize {
        self.plane
    }

    pub fn intensity(&self) -> S {
        self.intensity
    }

    pub fn width(&self) -> S {
        self.width
    }
}

/// Working approximation of the source image.
///
/// Each plane holds one normalized channel; strokes add light to the plane
/// they target until it saturates at 255.
pub struct RasterBuffer<S> {
    source: RgbImage,
    grid: Grid,
    base: Vec<Vec<S>>,
    planes: Vec<Vec<S>>,
    active: usize,
    stroke: Stroke<S>,
    snapshot: Snapshot<S>,
}

impl<S: Float> RasterBuffer<S> {
    /// Crops `image` and resamples it so that its longer side is
    /// `MAX_SIZE * quality`. Planes stay empty until [`Self::initialize_planes`].
    pub fn new(image: &DynamicImage, crop: Crop, quality: u32) -> Self {
        let window = crop.window(image.width(), image.height());
        let cropped = imageops::crop_imm(image, window.x, window.y, window.width, window.height).to_image();
        let long = (MAX_SIZE * quality.max(1)) as f64;
        let scale = long / window.width.max(window.height).max(1) as f64;
        let width = ((window.width as f64 * scale).round() as u32).max(1);
        let height = ((window.height as f64 * scale).round() as u32).max(1);
        let source = DynamicImage::ImageRgba8(imageops::resize(
            &cropped,
            width,
            height,
            imageops::FilterType::Triangle,
        ))
        .to_rgb8();
        log::debug!(
            "raster buffer {width}x{height} from window {}x{} at ({}, {})",
            window.width,
            window.height,
            window.x,
            window.y
        );
        Self::from_rgb(source)
    }

    /// Uses `source` pixels as they are, without cropping or resampling.
    pub fn from_rgb(source: RgbImage) -> Self {
        let grid = Grid::new(source.height() as usize, source.width() as usize);
        Self {
            source,
            grid,
            base: Vec::new(),
            planes: Vec::new(),
            active: 0,
            stroke: Stroke::new(0, S::ZERO, S::ONE),
            snapshot: Snapshot::new(),
        }
    }

    /// Source pixels after cropping and resampling, row major.
    pub fn source_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.source.pixels().map(|pixel| pixel.0)
    }

    /// Builds `N` planes from the source pixels. The result is also kept as
    /// the pristine state [`Self::restore`] goes back to.
    pub fn initialize_planes<const N: usize>(&mut self, normalize: impl Fn([u8; 3]) -> [S; N]) {
        let mut planes: Vec<Vec<S>> = (0..N).map(|_| Vec::with_capacity(self.grid.len())).collect();
        for pixel in self.source_pixels() {
            for (plane, value) in planes.iter_mut().zip(normalize(pixel)) {
                plane.push(value);
            }
        }
        self.base = planes.clone();
        self.planes = planes;
        self.active = 0;
        self.snapshot.invalidate();
    }

    /// Drops every composited stroke.
    pub fn restore(&mut self) {
        self.planes.clone_from(&self.base);
        self.snapshot.invalidate();
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn planes(&self) -> &[Vec<S>] {
        &self.planes
    }

    pub fn stroke(&self) -> Stroke<S> {
        self.stroke
    }

    pub fn set_stroke(&mut self, stroke: Stroke<S>) {
        self.stroke = stroke;
    }

    /// Switches the plane sampling reads from.
    pub fn select_plane(&mut self, plane: usize) {
        if plane != self.active {
            self.active = plane;
            self.snapshot.invalidate();
        }
    }

    pub fn snapshot(&self) -> &Snapshot<S> {
        &self.snapshot
    }

    /// Materializes the snapshot of the active plane if needed.
    pub fn sampler(&mut self) -> Sampler<'_, S> {
        let plane = self.planes.get(self.active).map(Vec::as_slice).unwrap_or(&[]);
        let values = self.snapshot.materialize(self.active, plane);
        Sampler::new(values, if values.is_empty() { Grid::new(0, 0) } else { self.grid })
    }

    /// Adds the current stroke along `segment`.
    pub fn draw_segment(&mut self, segment: Segment<S>) {
        self.snapshot.invalidate();
        let Some(plane) = self.planes.get_mut(self.stroke.plane) else {
            return;
        };
        if self.grid.is_empty() {
            return;
        }
        let half = self.stroke.width * S::HALF;
        let reach = half + S::HALF;
        let amount = S::TWO_FIVE_FIVE * self.stroke.intensity;
        let (min, max) = segment.bounds();
        let last_x = S::of_usize(self.grid.width - 1);
        let last_y = S::of_usize(self.grid.height - 1);
        let x0 = (min.x - reach).floor().max(S::ZERO).min(last_x).as_usize();
        let x1 = (max.x + reach).ceil().max(S::ZERO).min(last_x).as_usize();
        let y0 = (min.y - reach).floor().max(S::ZERO).min(last_y).as_usize();
        let y1 = (max.y + reach).ceil().max(S::ZERO).min(last_y).as_usize();

        for y in y0..=y1 {
            let row = y * self.grid.width;
            for x in x0..=x1 {
                let distance = segment.distance_to(Point::new(S::of_usize(x), S::of_usize(y)));
                let coverage = (reach - distance).min(S::ONE);
                if coverage > S::ZERO {
                    let value = &mut plane[row + x];
                    *value = (*value + amount * coverage).min(S::TWO_FIVE_FIVE);
                }
            }
        }
    }
}
