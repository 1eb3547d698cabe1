use std::collections::BTreeMap;

use crate::{engine::ThreadArt, Float};

/// Receives named numeric indicators.
pub trait IndicatorSink {
    fn indicate(&mut self, name: &str, value: f64);
}

impl IndicatorSink for BTreeMap<String, f64> {
    fn indicate(&mut self, name: &str, value: f64) {
        self.insert(name.to_owned(), value);
    }
}

pub const PEGS: &str = "pegs";
pub const SEGMENTS: &str = "segments";
pub const ERROR_AVERAGE: &str = "error_average";
pub const ERROR_MEAN_SQUARE: &str = "error_mean_square";
pub const ERROR_VARIANCE: &str = "error_variance";

impl<S: Float> ThreadArt<S> {
    pub fn report(&self, sink: &mut impl IndicatorSink) {
        sink.indicate(PEGS, self.pegs.len() as f64);
        sink.indicate(SEGMENTS, self.total_segments() as f64);
        sink.indicate(ERROR_AVERAGE, self.stats.average.as_f64());
        sink.indicate(ERROR_MEAN_SQUARE, self.stats.mean_square.as_f64());
        sink.indicate(ERROR_VARIANCE, self.stats.variance.as_f64());
    }
}
