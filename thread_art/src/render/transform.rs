use crate::{geometry::Point, Float, Grid};

/// Maps buffer coordinates onto an output surface, preserving the aspect
/// ratio and centering the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform<S> {
    scale: S,
    origin: Point<S>,
}

impl<S: Float> Transform<S> {
    pub fn new(source: Grid<S>, target: Grid<S>) -> Self {
        let scale = if source.width > S::ZERO && source.height > S::ZERO {
            (target.width / source.width).min(target.height / source.height)
        } else {
            S::ONE
        };
        let origin = Point::new(
            S::HALF * (target.width - scale * source.width),
            S::HALF * (target.height - scale * source.height),
        );
        Self { scale, origin }
    }

    pub fn scale(&self) -> S {
        self.scale
    }

    pub fn origin(&self) -> Point<S> {
        self.origin
    }

    pub fn apply(&self, point: Point<S>) -> Point<S> {
        self.origin + point * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_and_centers() {
        let transform = Transform::new(Grid::new(100.0, 200.0), Grid::new(400.0, 400.0));
        assert_eq!(transform.scale(), 2.0);
        assert_eq!(transform.origin(), Point::new(0.0, 100.0));
        assert_eq!(transform.apply(Point::new(200.0, 100.0)), Point::new(400.0, 300.0));
    }

    #[test]
    fn identity_when_sizes_match() {
        let transform = Transform::<f32>::new(Grid::new(50.0, 80.0), Grid::new(50.0, 80.0));
        assert_eq!(transform.apply(Point::new(3.5, 7.0)), Point::new(3.5, 7.0));
    }
}
