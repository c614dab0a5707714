//! Pixel viewport rectangle

use cloudview_core::{Error, Point2d, Result};
use serde::{Deserialize, Serialize};

/// Rectangle of the window the camera renders into, in pixels.
///
/// Width and height are always positive; a zero-sized rectangle (for example
/// a minimized window) is rejected at construction so that aspect ratios and
/// normalized pointer coordinates are always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawViewport")]
pub struct Viewport {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawViewport {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = Error;

    fn try_from(raw: RawViewport) -> Result<Self> {
        Viewport::new(raw.x, raw.y, raw.width, raw.height)
    }
}

impl Viewport {
    /// Create a viewport, failing if either extent is zero
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { x, y, width, height })
    }

    /// Viewport of the given size with its origin at the top left of the window
    pub fn with_size(width: u32, height: u32) -> Result<Self> {
        Self::new(0, 0, width, height)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Center of the rectangle in pixel coordinates
    pub fn center(&self) -> Point2d {
        Point2d::new(
            f64::from(self.x) + 0.5 * f64::from(self.width),
            f64::from(self.y) + 0.5 * f64::from(self.height),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_extent_is_rejected() {
        assert!(matches!(
            Viewport::new(0, 0, 800, 0),
            Err(Error::InvalidViewport { width: 800, height: 0 })
        ));
        assert!(Viewport::with_size(0, 600).is_err());
    }

    #[test]
    fn test_aspect_and_center() {
        let vp = Viewport::new(10, 20, 800, 600).unwrap();
        assert!((vp.aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(vp.center(), Point2d::new(410.0, 320.0));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Viewport = toml::from_str("x = 0\ny = 0\nwidth = 640\nheight = 480").unwrap();
        assert_eq!(ok, Viewport::with_size(640, 480).unwrap());

        let bad: std::result::Result<Viewport, _> =
            toml::from_str("x = 0\ny = 0\nwidth = 640\nheight = 0");
        assert!(bad.is_err());
    }
}
