use super::{segments_of, truncate_to, Channel, Thread};
use crate::{raster::RasterBuffer, Float};

/// Single peg sequence sampling the luminance plane.
#[derive(Clone, Debug, Default)]
pub struct Monochrome {
    pegs: Vec<usize>,
}

impl Monochrome {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Thread for Monochrome {
    fn total_segments(&self) -> usize {
        segments_of(self.pegs.len())
    }

    fn lower_to(&mut self, target: usize) {
        truncate_to(&mut self.pegs, target);
    }

    fn iterate(&self, from_index: usize, mut visit: impl FnMut(&[usize], Channel)) {
        if from_index < self.pegs.len() {
            visit(&self.pegs[from_index..], Channel::Monochrome);
        }
    }

    fn growth_target(&mut self) -> Channel {
        Channel::Monochrome
    }

    fn sequence(&self, _: Channel) -> &[usize] {
        &self.pegs
    }

    fn sequence_mut(&mut self, _: Channel) -> &mut Vec<usize> {
        &mut self.pegs
    }

    fn initialize_from_buffer<S: Float>(&mut self, raster: &mut RasterBuffer<S>, invert_colors: bool) {
        raster.initialize_planes(|[r, g, b]| {
            let luminance = (S::of_u8(r) + S::of_u8(g) + S::of_u8(b)) / S::of_usize(3);
            let value = if invert_colors {
                S::TWO_FIVE_FIVE - luminance
            } else {
                luminance
            };
            [value * S::HALF]
        });
    }
}
