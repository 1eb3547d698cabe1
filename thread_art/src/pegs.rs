use std::ops::Deref;

use crate::{geometry::Point, grid::Grid, params::Shape, Float};

/// Longer side of the reference frame pegs are laid out in, so that peg
/// density does not depend on the working resolution.
pub const FRAME_SIZE: usize = 1000;

/// Circle layout: pegs closer than this angle are never linked.
pub const MIN_ANGULAR_DISTANCE_DIVISOR: usize = 16;

/// Tolerance used when comparing rectangle peg coordinates.
const ALIGNMENT_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct Peg<S> {
    pub position: Point<S>,
    /// Only set by the circle layout.
    pub angle: Option<S>,
    pub name: Option<String>,
}

impl<S> Peg<S> {
    pub fn new(position: Point<S>) -> Self {
        Self {
            position,
            angle: None,
            name: None,
        }
    }

    pub fn with_angle(mut self, angle: S) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct PegTable<S> {
    pegs: Vec<Peg<S>>,
    shape: Shape,
}

impl<S: Float> PegTable<S> {
    pub fn new(shape: Shape, grid: Grid, peg_count: usize) -> Self {
        match shape {
            Shape::Circle => Self::circle(grid, peg_count),
            Shape::Rectangle => Self::rectangle(grid, peg_count),
        }
    }

    /// `peg_count` pegs evenly spread along the circle inscribed in the frame.
    pub fn circle(grid: Grid, peg_count: usize) -> Self {
        let (frame, scale) = Self::frame(grid);
        let center = Point::new(frame.width, frame.height) * S::HALF;
        let radius = frame.width.min(frame.height) * S::HALF;
        let step = S::TAU / S::of_usize(peg_count.max(1));
        let pegs = (0..peg_count)
            .map(|idx| {
                let theta = step * S::of_usize(idx);
                Peg::new((center + Point::new(theta.cos(), theta.sin()) * radius) * scale)
                    .with_angle(theta)
                    .with_name(idx.to_string())
            })
            .collect();
        Self {
            pegs,
            shape: Shape::Circle,
        }
    }

    /// Pegs walking the frame border counterclockwise from the top left
    /// corner. Corners are always present; the remaining pegs are split
    /// between horizontal and vertical edges following the aspect ratio.
    pub fn rectangle(grid: Grid, peg_count: usize) -> Self {
        let (frame, scale) = Self::frame(grid);
        let rest = peg_count.saturating_sub(4);
        let horizontal = (S::of_usize(rest) * frame.width / (frame.width + frame.height))
            .round()
            .as_usize()
            .min(rest);
        let vertical = rest - horizontal;
        let (top, bottom) = (horizontal / 2, horizontal - horizontal / 2);
        let (right, left) = (vertical / 2, vertical - vertical / 2);

        let (w, h) = (frame.width, frame.height);
        let fraction = |idx: usize, count: usize| S::of_usize(idx) / S::of_usize(count + 1);

        let mut pegs = Vec::with_capacity(peg_count.max(4));
        let mut edge = |label: char,
                        corner: Point<S>,
                        count: usize,
                        along: &dyn Fn(S) -> Point<S>| {
            pegs.push(Peg::new(corner * scale).with_name(format!("{label}0")));
            pegs.extend((1..=count).map(|idx| {
                Peg::new(along(fraction(idx, count)) * scale).with_name(format!("{label}{idx}"))
            }));
        };
        edge('L', Point::new(S::ZERO, S::ZERO), left, &|t: S| Point::new(S::ZERO, h * t));
        edge('B', Point::new(S::ZERO, h), bottom, &|t: S| Point::new(w * t, h));
        edge('R', Point::new(w, h), right, &|t: S| Point::new(w, h - h * t));
        edge('T', Point::new(w, S::ZERO), top, &|t: S| Point::new(w - w * t, S::ZERO));

        Self {
            pegs,
            shape: Shape::Rectangle,
        }
    }

    /// Reference frame size and the factor scaling it onto `grid`.
    fn frame(grid: Grid) -> (Grid<S>, S) {
        let long = S::of_usize(grid.long_side().max(1));
        let size = grid.as_::<S>();
        let frame = Grid {
            width: S::THOUSAND * size.width / long,
            height: S::THOUSAND * size.height / long,
        };
        (frame, long / S::of_usize(FRAME_SIZE))
    }

    /// Whether pegs `a` and `b` must never be linked by a segment.
    pub fn too_close(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.pegs[a], &self.pegs[b]);
        match self.shape {
            Shape::Circle => match (a.angle, b.angle) {
                (Some(alpha), Some(beta)) => {
                    let diff = (alpha - beta).abs() % S::TAU;
                    diff.min(S::TAU - diff) <= S::TAU / S::of_usize(MIN_ANGULAR_DISTANCE_DIVISOR)
                }
                _ => a.position == b.position,
            },
            Shape::Rectangle => {
                let tolerance = S::of_f64(ALIGNMENT_TOLERANCE);
                (a.position.x - b.position.x).abs() <= tolerance
                    || (a.position.y - b.position.y).abs() <= tolerance
            }
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn pegs(&self) -> &[Peg<S>] {
        &self.pegs
    }

    pub fn positions(&self) -> impl Iterator<Item = Point<S>> + '_ {
        self.pegs.iter().map(|peg| peg.position)
    }

    /// Display name of peg `idx`, its index when unnamed.
    pub fn name(&self, idx: usize) -> String {
        self.pegs
            .get(idx)
            .and_then(|peg| peg.name.clone())
            .unwrap_or_else(|| idx.to_string())
    }
}

impl<S> Deref for PegTable<S> {
    type Target = [Peg<S>];

    fn deref(&self) -> &Self::Target {
        &self.pegs
    }
}
