use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    geometry::Segment,
    pegs::PegTable,
    raster::Sampler,
    Float,
};

/// Number of most recently visited pegs a thread may not return to.
pub const HISTORY: usize = 20;

/// Peg count above which the seed scan starts skipping pegs.
const SEED_STRIDE_DIVISOR: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no eligible segment among {pegs} pegs")]
    NoEligibleCandidate { pegs: usize },
}

/// Greedy choice of the next segment over a read only view of the buffer.
pub struct Selector<'a, S> {
    pegs: &'a PegTable<S>,
    sampler: Sampler<'a, S>,
    intensity: S,
}

impl<'a, S: Float> Selector<'a, S> {
    /// `intensity` is the stroke intensity of the channel being grown; it is
    /// added to every sample so that already bright pixels are penalized.
    pub fn new(pegs: &'a PegTable<S>, sampler: Sampler<'a, S>, intensity: S) -> Self {
        Self {
            pegs,
            sampler,
            intensity,
        }
    }

    /// Mean residual sampled along the interior of the segment `from -> to`.
    pub fn segment_potential(&self, from: usize, to: usize) -> S {
        let segment = Segment::new(self.pegs[from].position, self.pegs[to].position);
        let steps = segment.length().ceil().as_usize();
        if steps == 0 {
            return S::ZERO;
        }
        let stroke = S::TWO_FIVE_FIVE * self.intensity;
        let denominator = S::of_usize(steps + 1);
        let total = (0..steps).fold(S::ZERO, |total, idx| {
            let sample = self.sampler.sample(segment.at(S::of_usize(idx + 1) / denominator));
            total + S::HUNDRED_TWENTY_SEVEN - (sample + stroke)
        });
        total / S::of_usize(steps)
    }

    /// Best first segment of an empty sequence.
    pub fn seed(&self, rng: &mut impl Rng) -> Result<(usize, usize), Error> {
        let count = self.pegs.len();
        let stride = 1 + count / SEED_STRIDE_DIVISOR;
        let candidates: Vec<_> = (0..count)
            .step_by(stride)
            .flat_map(|from| ((from + stride)..count).step_by(stride).map(move |to| (from, to)))
            .filter(|&(from, to)| !self.pegs.too_close(from, to))
            .collect();
        let scored: Vec<_> = candidates
            .into_par_iter()
            .map(|(from, to)| ((from, to), self.segment_potential(from, to)))
            .collect();
        pick(scored, rng).ok_or(Error::NoEligibleCandidate { pegs: count })
    }

    /// Best peg to extend `sequence` with. `sequence` must not be empty.
    pub fn next(&self, sequence: &[usize], rng: &mut impl Rng) -> Result<usize, Error> {
        let count = self.pegs.len();
        let Some(&current) = sequence.last() else {
            return Err(Error::NoEligibleCandidate { pegs: count });
        };
        let recent = &sequence[sequence.len().saturating_sub(HISTORY)..];
        let scored: Vec<_> = (0..count)
            .into_par_iter()
            .filter(|&to| !self.pegs.too_close(current, to) && !recent.contains(&to))
            .map(|to| (to, self.segment_potential(current, to)))
            .collect();
        pick(scored, rng).ok_or(Error::NoEligibleCandidate { pegs: count })
    }
}

/// Uniform choice among the candidates tied for the highest score.
fn pick<T: Copy, S: Float>(scored: Vec<(T, S)>, rng: &mut impl Rng) -> Option<T> {
    let best = scored
        .iter()
        .map(|&(_, score)| score)
        .fold(None, |best: Option<S>, score| match best {
            Some(best) if best >= score => Some(best),
            _ => Some(score),
        })?;
    let ties: Vec<T> = scored
        .into_iter()
        .filter(|&(_, score)| score == best)
        .map(|(candidate, _)| candidate)
        .collect();
    match ties.len() {
        0 => None,
        1 => Some(ties[0]),
        len => Some(ties[rng.gen_range(0..len)]),
    }
}
