use serde::{Deserialize, Serialize};

/// Zoomed window into the source image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Pixel rectangle of the source kept by a [`Crop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom,
            offset_x,
            offset_y,
        }
    }

    /// Window of size `source / zoom` panned over the remaining slack; a zero
    /// offset centers it.
    pub fn window(&self, width: u32, height: u32) -> Window {
        let zoom = if self.zoom.is_finite() { self.zoom.max(1.0) } else { 1.0 };
        let axis = |size: u32, offset: f64| {
            let kept = ((size as f64 / zoom).round() as u32).clamp(1.min(size), size);
            let slack = (size - kept) as f64;
            let offset = if offset.is_finite() { offset.clamp(-1.0, 1.0) } else { 0.0 };
            let start = (slack * (1.0 + offset) * 0.5).round() as u32;
            (start.min(size - kept), kept)
        };
        let (x, width) = axis(width, self.offset_x);
        let (y, height) = axis(height, self.offset_y);
        Window {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unzoomed_window_is_whole_image() {
        let window = Crop::default().window(640, 480);
        assert_eq!(
            window,
            Window {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn zoom_centers_then_pans_over_slack() {
        let centered = Crop::new(2.0, 0.0, 0.0).window(400, 200);
        assert_eq!((centered.x, centered.y, centered.width, centered.height), (100, 50, 200, 100));

        let left_top = Crop::new(2.0, -1.0, -1.0).window(400, 200);
        assert_eq!((left_top.x, left_top.y), (0, 0));

        let right_bottom = Crop::new(2.0, 1.0, 5.0).window(400, 200);
        assert_eq!((right_bottom.x, right_bottom.y), (200, 100));
    }
}
