use super::Point;
use crate::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: Float> Segment<T> {
    pub fn length(&self) -> T {
        self.start.distance(&self.end)
    }

    pub fn at(&self, t: T) -> Point<T> {
        self.start.lerp(self.end, t)
    }

    /// Euclidean distance from `point` to the closest point of the segment.
    pub fn distance_to(&self, point: Point<T>) -> T {
        let dir = self.end - self.start;
        let sq_len = dir.dot(&dir);
        if sq_len <= T::EPSILON {
            return self.start.distance(&point);
        }
        let t = ((point - self.start).dot(&dir) / sq_len).max(T::ZERO).min(T::ONE);
        self.at(t).distance(&point)
    }

    /// Axis aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point<T>, Point<T>) {
        (
            Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }
}
