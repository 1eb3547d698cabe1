use crate::{geometry::Point, Float, Grid};

/// Single slot, host readable copy of one plane of the working buffer.
///
/// Every draw invalidates it; sampling materializes it again on demand and
/// reuses it until the next draw.
#[derive(Clone, Debug, Default)]
pub struct Snapshot<S> {
    plane: Option<usize>,
    values: Vec<S>,
}

impl<S: Float> Snapshot<S> {
    pub fn new() -> Self {
        Self {
            plane: None,
            values: Vec::new(),
        }
    }

    pub fn invalidate(&mut self) {
        self.plane = None;
    }

    pub fn is_valid(&self) -> bool {
        self.plane.is_some()
    }

    /// Copies `source` into the snapshot unless it already holds `plane`.
    pub fn materialize(&mut self, plane: usize, source: &[S]) -> &[S] {
        if self.plane != Some(plane) {
            log::trace!("materializing snapshot of plane {plane}");
            self.values.clear();
            self.values.extend_from_slice(source);
            self.plane = Some(plane);
        }
        &self.values
    }
}

/// Read only bilinear view over a materialized snapshot.
#[derive(Clone, Copy)]
pub struct Sampler<'a, S> {
    values: &'a [S],
    grid: Grid,
}

impl<'a, S: Float> Sampler<'a, S> {
    pub fn new(values: &'a [S], grid: Grid) -> Self {
        debug_assert_eq!(values.len(), grid.len());
        Self { values, grid }
    }

    /// Bilinear interpolation of the four pixels surrounding `point`,
    /// clamped to the buffer.
    pub fn sample(&self, point: Point<S>) -> S {
        if self.values.is_empty() {
            return S::ZERO;
        }
        let max_x = S::of_usize(self.grid.width - 1);
        let max_y = S::of_usize(self.grid.height - 1);
        let x = point.x.max(S::ZERO).min(max_x);
        let y = point.y.max(S::ZERO).min(max_y);
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0.as_usize(), y0.as_usize());
        let x1 = (x0 + 1).min(self.grid.width - 1);
        let y1 = (y0 + 1).min(self.grid.height - 1);

        let at = |x: usize, y: usize| self.values[y * self.grid.width + x];
        let top = at(x0, y0) * (S::ONE - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (S::ONE - fx) + at(x1, y1) * fx;
        top * (S::ONE - fy) + bottom * fy
    }
}
