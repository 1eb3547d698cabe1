use std::time::{Duration, Instant};

use crate::{
    engine::{Error, ThreadArt},
    selector::Selector,
    thread::Thread,
    verboser::{Message, Verboser},
    Float,
};

/// Error statistics are refreshed every time the total reaches a multiple of
/// this many segments while growing.
pub const MEASURE_INTERVAL: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// Already at the target segment count.
    Idle,
    Worked,
}

impl<S: Float> ThreadArt<S> {
    /// Moves the threads toward the target segment count for at most about
    /// `budget`; the segment being added when the budget runs out is kept.
    ///
    /// On a selection failure the pass stops with the error and every segment
    /// drawn so far stays in place.
    pub fn grow_by(&mut self, budget: Duration, verboser: &mut impl Verboser) -> Result<Growth, Error> {
        let target = self.parameters.nb_lines;
        let total = self.threads.total_segments();
        match total.cmp(&target) {
            std::cmp::Ordering::Equal => Ok(Growth::Idle),
            std::cmp::Ordering::Greater => {
                self.truncate(target, verboser);
                Ok(Growth::Worked)
            }
            std::cmp::Ordering::Less => {
                self.grow(target, budget, verboser)?;
                Ok(Growth::Worked)
            }
        }
    }

    /// Cuts the threads back to `target` segments and redraws what remains
    /// over the pristine buffer.
    fn truncate(&mut self, target: usize, verboser: &mut impl Verboser) {
        log::debug!("truncating {} segments to {target}", self.threads.total_segments());
        verboser.verbose(Message::Truncating(target));
        self.threads.lower_to(target);
        self.raster.restore();
        self.channel = None;

        let mut runs = Vec::new();
        self.threads.iterate(0, |pegs, channel| runs.push((channel, pegs.to_vec())));
        verboser.verbose(Message::Replaying(self.threads.total_segments()));
        for (channel, pegs) in runs {
            self.switch_channel(channel);
            for pair in pegs.windows(2) {
                self.draw(pair[0], pair[1]);
            }
        }
        verboser.verbose(Message::Measuring);
        self.measure();
    }

    fn grow(&mut self, target: usize, budget: Duration, verboser: &mut impl Verboser) -> Result<(), Error> {
        let start = Instant::now();
        while self.threads.total_segments() < target {
            let channel = self.threads.growth_target();
            if self.channel != Some(channel) {
                self.switch_channel(channel);
            }

            let intensity = self.raster.stroke().intensity();
            let selector = Selector::new(&self.pegs, self.raster.sampler(), intensity);
            let sequence = self.threads.sequence(channel);
            let (from, to) = match sequence.last() {
                None => {
                    let (from, to) = selector.seed(&mut self.rng)?;
                    self.threads.sequence_mut(channel).push(from);
                    (from, to)
                }
                Some(&from) => (from, selector.next(sequence, &mut self.rng)?),
            };
            self.threads.sequence_mut(channel).push(to);
            self.draw(from, to);

            let total = self.threads.total_segments();
            verboser.verbose(Message::Growing(total));
            if total % MEASURE_INTERVAL == 0 {
                verboser.verbose(Message::Measuring);
                self.measure();
            }
            if start.elapsed() >= budget {
                break;
            }
        }
        log::trace!(
            "grew to {} of {target} segments in {:?}",
            self.threads.total_segments(),
            start.elapsed()
        );
        Ok(())
    }
}
