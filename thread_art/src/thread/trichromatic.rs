use super::{segments_of, truncate_to, Channel, Repartitioner, Thread};
use crate::{raster::RasterBuffer, Float};

/// Red, green and blue peg sequences sharing the segment budget according to
/// how much ink each channel of the source needs.
#[derive(Clone, Debug)]
pub struct Trichromatic {
    sequences: [Vec<usize>; 3],
    repartitioner: Repartitioner,
}

impl Default for Trichromatic {
    fn default() -> Self {
        Self {
            sequences: Default::default(),
            repartitioner: Repartitioner::new([1.0 / 3.0; 3]),
        }
    }
}

impl Trichromatic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequencies(&self) -> [f64; 3] {
        self.repartitioner.frequencies()
    }

    /// Per channel segment counts.
    pub fn counts(&self) -> [usize; 3] {
        self.sequences.each_ref().map(|sequence| segments_of(sequence.len()))
    }

    fn index(channel: Channel) -> usize {
        match channel {
            Channel::Monochrome | Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Normalized ink demand of each channel: `Σ(255 - v)` per channel, or `Σv`
/// for light thread. Equal thirds when nothing needs ink.
pub(crate) fn frequencies(pixels: impl Iterator<Item = [u8; 3]>, invert_colors: bool) -> [f64; 3] {
    let mut demand = [0u64; 3];
    for pixel in pixels {
        for (total, value) in demand.iter_mut().zip(pixel) {
            *total += u64::from(if invert_colors { value } else { 255 - value });
        }
    }
    let sum: u64 = demand.iter().sum();
    if sum == 0 {
        [1.0 / 3.0; 3]
    } else {
        demand.map(|value| value as f64 / sum as f64)
    }
}

impl Thread for Trichromatic {
    fn total_segments(&self) -> usize {
        self.counts().iter().sum()
    }

    fn lower_to(&mut self, target: usize) {
        let counts = self.repartitioner.at(target);
        for (sequence, count) in self.sequences.iter_mut().zip(counts) {
            truncate_to(sequence, count);
        }
    }

    fn iterate(&self, from_index: usize, mut visit: impl FnMut(&[usize], Channel)) {
        let starts = if from_index == 0 {
            [0; 3]
        } else {
            super::repartition(from_index, self.frequencies())
        };
        for ((sequence, start), channel) in self.sequences.iter().zip(starts).zip(Channel::RGB) {
            if start < sequence.len() {
                visit(&sequence[start..], channel);
            }
        }
    }

    fn growth_target(&mut self) -> Channel {
        let targets = self.repartitioner.at(self.total_segments() + 1);
        let counts = self.counts();
        [Channel::Red, Channel::Green]
            .into_iter()
            .find(|&channel| counts[Self::index(channel)] < targets[Self::index(channel)])
            .unwrap_or(Channel::Blue)
    }

    fn sequence(&self, channel: Channel) -> &[usize] {
        &self.sequences[Self::index(channel)]
    }

    fn sequence_mut(&mut self, channel: Channel) -> &mut Vec<usize> {
        &mut self.sequences[Self::index(channel)]
    }

    fn initialize_from_buffer<S: Float>(&mut self, raster: &mut RasterBuffer<S>, invert_colors: bool) {
        let frequencies = frequencies(raster.source_pixels(), invert_colors);
        log::debug!(
            "channel frequencies r={:.3} g={:.3} b={:.3}",
            frequencies[0],
            frequencies[1],
            frequencies[2]
        );
        self.repartitioner = Repartitioner::new(frequencies);
        raster.initialize_planes(|pixel| {
            pixel.map(|value| {
                let value = if invert_colors { 255 - value } else { value };
                S::of_u8(value) * S::HALF
            })
        });
    }
}
