use serde::{Deserialize, Serialize};

use crate::Float;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl Grid {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn long_side(&self) -> usize {
        self.width.max(self.height)
    }

    pub fn as_<S: Float>(&self) -> Grid<S> {
        Grid {
            height: S::of_usize(self.height),
            width: S::of_usize(self.width),
        }
    }
}
