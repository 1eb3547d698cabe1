/// Slack used when deriving integer quotas from floating point shares.
const QUOTA_TOLERANCE: f64 = 1e-9;

/// Splits a total segment count between the red, green and blue sequences.
///
/// Units are handed out one at a time from zero: a channel under its floor
/// quota `floor(f * t)` is served first, otherwise the unit goes to the
/// channel furthest below its share among those still under their ceiling
/// quota. The allocation therefore sums to the total, never decreases for
/// any channel when the total grows, and stays within one unit of the exact
/// share. Results are memoized forward from the last requested total.
#[derive(Clone, Debug)]
pub struct Repartitioner {
    frequencies: [f64; 3],
    total: usize,
    counts: [usize; 3],
}

impl Repartitioner {
    pub fn new(frequencies: [f64; 3]) -> Self {
        Self {
            frequencies,
            total: 0,
            counts: [0; 3],
        }
    }

    pub fn frequencies(&self) -> [f64; 3] {
        self.frequencies
    }

    /// Allocation for `total` segments.
    pub fn at(&mut self, total: usize) -> [usize; 3] {
        if total < self.total {
            self.total = 0;
            self.counts = [0; 3];
        }
        while self.total < total {
            self.step();
        }
        self.counts
    }

    fn step(&mut self) {
        let allocated = self.total as f64;
        let next = allocated + 1.0;
        let floor = |idx: usize| (self.frequencies[idx] * next + QUOTA_TOLERANCE).floor() as usize;
        let ceil = |idx: usize| (self.frequencies[idx] * next - QUOTA_TOLERANCE).ceil() as usize;
        let deficit = |idx: usize| {
            let share = if self.total == 0 {
                0.0
            } else {
                self.counts[idx] as f64 / allocated
            };
            self.frequencies[idx] - share
        };
        let largest_deficit = |candidates: &mut dyn Iterator<Item = usize>| {
            candidates.fold(None, |best: Option<usize>, idx| match best {
                Some(best) if deficit(best) >= deficit(idx) => Some(best),
                _ => Some(idx),
            })
        };

        let chosen = (0..3)
            .find(|&idx| self.counts[idx] < floor(idx))
            .or_else(|| largest_deficit(&mut (0..3).filter(|&idx| self.counts[idx] < ceil(idx))))
            .or_else(|| largest_deficit(&mut (0..3)))
            .unwrap_or(0);
        self.counts[chosen] += 1;
        self.total += 1;
    }
}

/// Allocation of `total` segments for `frequencies`, computed from scratch.
pub fn repartition(total: usize, frequencies: [f64; 3]) -> [usize; 3] {
    Repartitioner::new(frequencies).at(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_ten_by_frequencies() {
        assert_eq!(repartition(10, [0.5, 0.3, 0.2]), [5, 3, 2]);
        assert_eq!(repartition(0, [0.5, 0.3, 0.2]), [0, 0, 0]);
    }

    #[test]
    fn sums_to_total_and_never_decreases() {
        let cases = [
            [0.5, 0.3, 0.2],
            [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
            [0.7, 0.0, 0.3],
            [0.05, 0.9, 0.05],
            [0.0, 0.0, 1.0],
        ];
        for frequencies in cases {
            let mut repartitioner = Repartitioner::new(frequencies);
            let mut previous = [0; 3];
            for total in 0..500 {
                let counts = repartitioner.at(total);
                assert_eq!(counts.iter().sum::<usize>(), total);
                for idx in 0..3 {
                    assert!(counts[idx] >= previous[idx], "{frequencies:?} at {total}");
                    let exact = frequencies[idx] * total as f64;
                    assert!((counts[idx] as f64 - exact).abs() < 1.0 + 1e-6);
                }
                previous = counts;
            }
        }
    }

    #[test]
    fn zero_frequency_channel_stays_empty() {
        assert_eq!(repartition(7, [0.5, 0.5, 0.0]), [4, 3, 0]);
    }

    #[test]
    fn memoized_lookups_match_fresh_ones() {
        let frequencies = [0.2, 0.45, 0.35];
        let mut repartitioner = Repartitioner::new(frequencies);
        for total in [40, 12, 97, 97, 3] {
            assert_eq!(repartitioner.at(total), repartition(total, frequencies));
        }
    }
}
