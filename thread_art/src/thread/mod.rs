use crate::{params::Mode, raster::RasterBuffer, Float};

mod monochrome;
pub mod repartition;
mod trichromatic;

pub use monochrome::Monochrome;
pub use repartition::{repartition, Repartitioner};
pub use trichromatic::Trichromatic;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Monochrome,
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Raster plane this channel samples from and draws into.
    pub fn plane(self) -> usize {
        match self {
            Channel::Monochrome | Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// One or more ordered peg sequences growing toward a segment target.
///
/// A sequence of `n` pegs holds `n - 1` segments; an empty one holds none.
pub trait Thread {
    fn total_segments(&self) -> usize;

    /// Truncates the tails so that `target` segments remain in total.
    fn lower_to(&mut self, target: usize);

    /// Visits, per sequence, the pegs from the boundary matching the
    /// `from_index`-th overall segment onward.
    fn iterate(&self, from_index: usize, visit: impl FnMut(&[usize], Channel));

    /// Channel whose sequence receives the next segment.
    fn growth_target(&mut self) -> Channel;

    fn sequence(&self, channel: Channel) -> &[usize];

    fn sequence_mut(&mut self, channel: Channel) -> &mut Vec<usize>;

    /// Points sampling at the plane of `channel`.
    fn select_channel<S: Float>(&self, channel: Channel, raster: &mut RasterBuffer<S>) {
        raster.select_plane(channel.plane());
    }

    /// Normalizes the source into planes. Called once per reset.
    fn initialize_from_buffer<S: Float>(&mut self, raster: &mut RasterBuffer<S>, invert_colors: bool);
}

/// Segment count held by a sequence of `len` pegs.
pub(crate) fn segments_of(len: usize) -> usize {
    len.saturating_sub(1)
}

/// Keeps `count` segments of `sequence`.
pub(crate) fn truncate_to(sequence: &mut Vec<usize>, count: usize) {
    if count == 0 {
        sequence.clear();
    } else {
        sequence.truncate(count + 1);
    }
}

#[derive(Clone, Debug)]
pub enum Threads {
    Monochrome(Monochrome),
    Trichromatic(Trichromatic),
}

macro_rules! dispatch {
    ($self:ident, $thread:ident => $body:expr) => {
        match $self {
            Threads::Monochrome($thread) => $body,
            Threads::Trichromatic($thread) => $body,
        }
    };
}

impl Threads {
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::Monochrome => Threads::Monochrome(Monochrome::new()),
            Mode::Trichromatic => Threads::Trichromatic(Trichromatic::new()),
        }
    }

    /// Channels in drawing order.
    pub fn channels(&self) -> &'static [Channel] {
        match self {
            Threads::Monochrome(_) => &[Channel::Monochrome],
            Threads::Trichromatic(_) => &Channel::RGB,
        }
    }
}

impl Thread for Threads {
    fn total_segments(&self) -> usize {
        dispatch!(self, thread => thread.total_segments())
    }

    fn lower_to(&mut self, target: usize) {
        dispatch!(self, thread => thread.lower_to(target))
    }

    fn iterate(&self, from_index: usize, visit: impl FnMut(&[usize], Channel)) {
        dispatch!(self, thread => thread.iterate(from_index, visit))
    }

    fn growth_target(&mut self) -> Channel {
        dispatch!(self, thread => thread.growth_target())
    }

    fn sequence(&self, channel: Channel) -> &[usize] {
        dispatch!(self, thread => thread.sequence(channel))
    }

    fn sequence_mut(&mut self, channel: Channel) -> &mut Vec<usize> {
        dispatch!(self, thread => thread.sequence_mut(channel))
    }

    fn initialize_from_buffer<S: Float>(&mut self, raster: &mut RasterBuffer<S>, invert_colors: bool) {
        dispatch!(self, thread => thread.initialize_from_buffer(raster, invert_colors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_count_plus_one_pegs() {
        let mut sequence = vec![1, 5, 9, 2, 7];
        truncate_to(&mut sequence, 2);
        assert_eq!(sequence, [1, 5, 9]);
        truncate_to(&mut sequence, 0);
        assert!(sequence.is_empty());
        assert_eq!(segments_of(0), 0);
        assert_eq!(segments_of(1), 0);
        assert_eq!(segments_of(4), 3);
    }

    #[test]
    fn lowering_to_zero_empties_every_variant() {
        for mode in [Mode::Monochrome, Mode::Trichromatic] {
            let mut threads = Threads::new(mode);
            for &channel in threads.channels() {
                threads.sequence_mut(channel).extend([0, 3, 6, 1]);
            }
            assert!(threads.total_segments() > 0);
            threads.lower_to(0);
            assert_eq!(threads.total_segments(), 0);
            let mut visited = 0;
            threads.iterate(0, |_, _| visited += 1);
            assert_eq!(visited, 0);
        }
    }

    #[test]
    fn channels_map_onto_planes() {
        assert_eq!(Channel::Monochrome.plane(), 0);
        assert_eq!(Channel::RGB.map(Channel::plane), [0, 1, 2]);
    }
}
