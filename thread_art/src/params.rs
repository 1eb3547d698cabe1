use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Rectangle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Monochrome,
    Trichromatic,
}

/// Inclusive bounds applied to every numeric option.
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const PEGS_COUNT: RangeInclusive<usize> = 3..=10_000;
    pub const QUALITY: RangeInclusive<u32> = 1..=4;
    pub const NB_LINES: RangeInclusive<usize> = 0..=1_000_000;
    pub const LINE_OPACITY: RangeInclusive<f64> = 0.0..=1.0;
    pub const LINE_THICKNESS: RangeInclusive<f64> = 0.01..=16.0;
    pub const ZOOM: RangeInclusive<f64> = 1.0..=100.0;
    pub const ZOOM_OFFSET: RangeInclusive<f64> = -1.0..=1.0;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameters {
    pub shape: Shape,
    pub pegs_count: usize,
    /// Resolution multiplier of the working buffer.
    pub quality: u32,
    pub mode: Mode,
    /// Light thread on a dark ground.
    pub invert_colors: bool,
    /// Target segment count.
    pub nb_lines: usize,
    pub line_opacity: f64,
    /// Stroke width in buffer units.
    pub line_thickness: f64,
    pub zoom: f64,
    pub zoom_offset_x: f64,
    pub zoom_offset_y: f64,
    /// Tie-break seed, entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            pegs_count: 250,
            quality: 1,
            mode: Mode::Monochrome,
            invert_colors: false,
            nb_lines: 1000,
            line_opacity: 1.0 / 16.0,
            line_thickness: 1.0,
            zoom: 1.0,
            zoom_offset_x: 0.0,
            zoom_offset_y: 0.0,
            seed: None,
        }
    }
}

impl Parameters {
    /// Returns a copy with every numeric option clamped into its valid range.
    /// Non finite values fall back to the default.
    pub fn coerced(&self) -> Self {
        let default = Self::default();
        Self {
            shape: self.shape,
            pegs_count: (*bounds::PEGS_COUNT.start()).max(self.pegs_count.min(*bounds::PEGS_COUNT.end())),
            quality: (*bounds::QUALITY.start()).max(self.quality.min(*bounds::QUALITY.end())),
            mode: self.mode,
            invert_colors: self.invert_colors,
            nb_lines: self.nb_lines.min(*bounds::NB_LINES.end()),
            line_opacity: clamp(self.line_opacity, bounds::LINE_OPACITY, default.line_opacity),
            line_thickness: clamp(self.line_thickness, bounds::LINE_THICKNESS, default.line_thickness),
            zoom: clamp(self.zoom, bounds::ZOOM, default.zoom),
            zoom_offset_x: clamp(self.zoom_offset_x, bounds::ZOOM_OFFSET, default.zoom_offset_x),
            zoom_offset_y: clamp(self.zoom_offset_y, bounds::ZOOM_OFFSET, default.zoom_offset_y),
            seed: self.seed,
        }
    }

    /// Merges `overrides` on top of `self`, coercing every provided number.
    pub fn merged(&self, overrides: &Overrides) -> Self {
        let default = Self::default();
        Self {
            shape: overrides.shape.unwrap_or(self.shape),
            pegs_count: overrides
                .pegs_count
                .map_or(self.pegs_count, |value| to_count(value, default.pegs_count)),
            quality: overrides
                .quality
                .map_or(self.quality, |value| {
                    let quality = to_count(value, default.quality as usize);
                    quality.min(*bounds::QUALITY.end() as usize) as u32
                }),
            mode: overrides.mode.unwrap_or(self.mode),
            invert_colors: overrides.invert_colors.unwrap_or(self.invert_colors),
            nb_lines: overrides
                .nb_lines
                .map_or(self.nb_lines, |value| to_count(value, default.nb_lines)),
            line_opacity: overrides.line_opacity.unwrap_or(self.line_opacity),
            line_thickness: overrides.line_thickness.unwrap_or(self.line_thickness),
            zoom: overrides.zoom.unwrap_or(self.zoom),
            zoom_offset_x: overrides.zoom_offset_x.unwrap_or(self.zoom_offset_x),
            zoom_offset_y: overrides.zoom_offset_y.unwrap_or(self.zoom_offset_y),
            seed: overrides.seed.or(self.seed),
        }
        .coerced()
    }

    /// Whether both parameter sets lay out the same pegs and buffer, ignoring
    /// the target segment count.
    pub fn same_layout(&self, other: &Self) -> bool {
        Self {
            nb_lines: other.nb_lines,
            ..self.clone()
        } == *other
    }
}

/// Partial [`Parameters`], every absent field keeps its current value.
///
/// Numbers are deserialized leniently: numeric strings are parsed, booleans
/// become `0`/`1` and anything unparsable turns into `NaN`, which coercion
/// later replaces with the default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overrides {
    pub shape: Option<Shape>,
    #[serde(deserialize_with = "lenient")]
    pub pegs_count: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub quality: Option<f64>,
    pub mode: Option<Mode>,
    pub invert_colors: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub nb_lines: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub line_opacity: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub line_thickness: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub zoom: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub zoom_offset_x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub zoom_offset_y: Option<f64>,
    pub seed: Option<u64>,
}

impl Overrides {
    /// Overrides that only move the target segment count.
    pub fn nb_lines(nb_lines: usize) -> Self {
        Self {
            nb_lines: Some(nb_lines as f64),
            ..Default::default()
        }
    }
}

fn clamp(value: f64, range: std::ops::RangeInclusive<f64>, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        default
    }
}

fn to_count(value: f64, default: usize) -> usize {
    if value.is_finite() {
        value.round().max(0.0) as usize
    } else {
        default
    }
}

fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Flag(bool),
        Text(String),
        Null(()),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(value) => Some(value),
        Lenient::Flag(flag) => Some(if flag { 1.0 } else { 0.0 }),
        Lenient::Text(text) => Some(text.trim().parse().unwrap_or(f64::NAN)),
        Lenient::Null(()) => None,
    })
}
