use std::{
    fmt::{Debug, Display},
    ops::{AddAssign, DivAssign, MulAssign, SubAssign},
};

use num_traits::{ConstOne, ConstZero};

pub trait Float:
    'static
    + Debug
    + Display
    + Sync
    + Send
    + Into<svg::node::Value>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + num_traits::Float
    + num_traits::NumCast
    + ConstZero
    + ConstOne
{
    const HALF: Self;
    const EPSILON: Self;
    const TAU: Self;
    const TWO_FIVE_FIVE: Self;
    const HUNDRED_TWENTY_SEVEN: Self;
    const THOUSAND: Self;

    fn of_usize(value: usize) -> Self;

    fn of_u8(value: u8) -> Self;

    fn of_f64(value: f64) -> Self;

    fn as_usize(self) -> usize;

    fn as_f64(self) -> f64;
}

impl Float for f32 {
    const HALF: Self = 0.5;
    const EPSILON: Self = f32::EPSILON;
    const TAU: Self = core::f32::consts::TAU;
    const TWO_FIVE_FIVE: Self = 255.0;
    const HUNDRED_TWENTY_SEVEN: Self = 127.0;
    const THOUSAND: Self = 1000.0;

    fn of_usize(value: usize) -> Self {
        value as f32
    }

    fn of_u8(value: u8) -> Self {
        value as f32
    }

    fn of_f64(value: f64) -> Self {
        value as f32
    }

    fn as_usize(self) -> usize {
        self as usize
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Float for f64 {
    const HALF: Self = 0.5;
    const EPSILON: Self = f64::EPSILON;
    const TAU: Self = core::f64::consts::TAU;
    const TWO_FIVE_FIVE: Self = 255.0;
    const HUNDRED_TWENTY_SEVEN: Self = 127.0;
    const THOUSAND: Self = 1000.0;

    fn of_usize(value: usize) -> Self {
        value as f64
    }

    fn of_u8(value: u8) -> Self {
        value as f64
    }

    fn of_f64(value: f64) -> Self {
        value
    }

    fn as_usize(self) -> usize {
        self as usize
    }

    fn as_f64(self) -> f64 {
        self
    }
}
