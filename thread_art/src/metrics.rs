use serde::Serialize;

use crate::Float;

/// Residual statistics of the whole buffer, the residual of a value being
/// `127 - value`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStats<S> {
    pub average: S,
    pub mean_square: S,
    /// Spread of the per pixel residual, averaged over planes, around
    /// `average`.
    pub variance: S,
}

impl<S: Float> Default for ErrorStats<S> {
    fn default() -> Self {
        Self {
            average: S::ZERO,
            mean_square: S::ZERO,
            variance: S::ZERO,
        }
    }
}

impl<S: Float> ErrorStats<S> {
    /// Measures every plane. All planes must have the same length.
    pub fn measure(planes: &[Vec<S>]) -> Self {
        let pixels = planes.first().map_or(0, Vec::len);
        if pixels == 0 {
            return Self::default();
        }
        let residual = |value: S| 127.0 - value.as_f64();

        let (mut sum, mut sum_square) = (0.0, 0.0);
        for plane in planes {
            for &value in plane {
                let residual = residual(value);
                sum += residual;
                sum_square += residual * residual;
            }
        }
        let samples = (pixels * planes.len()) as f64;
        let average = sum / samples;

        let count = planes.len() as f64;
        let spread: f64 = (0..pixels)
            .map(|idx| {
                let mean = planes.iter().map(|plane| residual(plane[idx])).sum::<f64>() / count;
                (mean - average).powi(2)
            })
            .sum();

        Self {
            average: S::of_f64(average),
            mean_square: S::of_f64(sum_square / samples),
            variance: S::of_f64(spread / pixels as f64),
        }
    }
}
