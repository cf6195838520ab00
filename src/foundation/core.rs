use std::fmt;

use crate::foundation::error::{PairframeError, PairframeResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Logical frame width in pixels at scale 1.
pub const BASE_WIDTH: f64 = 1920.0;
/// Logical frame height in pixels at scale 1.
pub const BASE_HEIGHT: f64 = 1080.0;
/// Caption inset from the frame edges at scale 1.
pub const TEXT_MARGIN: f64 = 20.0;

/// Largest surface side the CPU rasterizer can address.
pub(crate) const MAX_SURFACE_SIDE: u32 = u16::MAX as u32;

/// One half of the side-by-side pair.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Uniform multiplier applied to the 1920×1080 logical frame.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize)]
pub struct FrameScale(f64);

impl FrameScale {
    /// Full-resolution export scale.
    pub const FULL: FrameScale = FrameScale(1.0);

    /// Create a validated scale; `s` must be finite and `> 0`.
    pub fn new(s: f64) -> PairframeResult<Self> {
        if !s.is_finite() || s <= 0.0 {
            return Err(PairframeError::surface(format!(
                "frame scale must be finite and > 0, got {s}"
            )));
        }
        Ok(Self(s))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Exact logical extent `1920·s × 1080·s`.
    pub fn logical_size(self) -> Size {
        Size::new(BASE_WIDTH * self.0, BASE_HEIGHT * self.0)
    }

    /// Half-region occupied by `side` at this scale.
    pub fn region(self, side: Side) -> Region {
        let size = self.logical_size();
        let half = size.width / 2.0;
        Region {
            x: match side {
                Side::Left => 0.0,
                Side::Right => half,
            },
            width: half,
            height: size.height,
        }
    }

    pub fn margin(self) -> f64 {
        TEXT_MARGIN * self.0
    }
}

impl Default for FrameScale {
    fn default() -> Self {
        Self::FULL
    }
}

/// A full-height vertical strip of the frame: `[x, x + width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.height / 2.0)
    }

    pub fn rect(self) -> Rect {
        Rect::new(self.x, 0.0, self.x + self.width, self.height)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub const WHITE: Rgba8Premul = Rgba8Premul {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rejects_non_positive_and_non_finite() {
        assert!(FrameScale::new(0.0).is_err());
        assert!(FrameScale::new(-0.5).is_err());
        assert!(FrameScale::new(f64::NAN).is_err());
        assert!(FrameScale::new(f64::INFINITY).is_err());
        assert_eq!(FrameScale::new(0.25).unwrap().get(), 0.25);
    }

    #[test]
    fn regions_split_the_frame_in_half() {
        let s = FrameScale::new(0.5).unwrap();
        let left = s.region(Side::Left);
        let right = s.region(Side::Right);
        assert_eq!(left, Region { x: 0.0, width: 480.0, height: 540.0 });
        assert_eq!(right, Region { x: 480.0, width: 480.0, height: 540.0 });
        assert_eq!(right.center(), Point::new(720.0, 270.0));
        assert_eq!(s.margin(), 10.0);
    }

    #[test]
    fn premul_rounds_to_nearest() {
        let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
        assert_eq!(c, Rgba8Premul { r: 128, g: 64, b: 0, a: 128 });
    }

    #[test]
    fn side_display_is_lowercase() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.to_string(), "right");
    }
}
