use std::{fmt::Display, ops::Deref};

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Point;

/// An opaque 8-bit color. Alpha is dropped when sampling.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The channels in r, g, b order
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("({x}, {y}) lies outside the {width}x{height} surface")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// A read-only 2D grid of colors that the planner can query.
///
/// Implementors only answer for in-bounds positions, the bounds check lives in [`sample`].
pub trait Surface {
    /// Width and height in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Return the color at a position known to be inside the surface
    fn color_at(&self, x: u32, y: u32) -> Color;
}

impl<P, C> Surface for ImageBuffer<P, C>
where
    P: Pixel<Subpixel = u8>,
    C: Deref<Target = [P::Subpixel]>,
{
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(self.get_pixel(x, y).to_rgb().0)
    }
}

impl Surface for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(self.get_pixel(x, y).to_rgb().0)
    }
}

/// Check if the point lies in `[0, width) x [0, height)`
pub fn contains<S: Surface + ?Sized>(surface: &S, point: Point) -> bool {
    let (width, height) = surface.dimensions();
    point.x >= 0 && point.y >= 0 && (point.x as u32) < width && (point.y as u32) < height
}

/// Bounds-checked color lookup.
pub fn sample<S: Surface + ?Sized>(surface: &S, point: Point) -> Result<Color, SampleError> {
    if contains(surface, point) {
        Ok(surface.color_at(point.x as u32, point.y as u32))
    } else {
        let (width, height) = surface.dimensions();
        Err(SampleError::OutOfBounds {
            x: point.x,
            y: point.y,
            width,
            height,
        })
    }
}
