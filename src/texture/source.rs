use alloc::boxed::Box;

use crate::common::Rgba;
use crate::error::{Error, Result};

/// Decoded true-color image the texture builder reads pixels from
pub trait RgbaImage {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Color at column `x`, row `y`.  Callers stay within
    /// `width() x height()`.
    fn pixel(&self, x: u32, y: u32) -> Rgba;
}

/// Packed 8-bit RGBA pixels, four bytes per pixel, row-major
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, data: Box<[u8]>) -> Result<Self> {
        let expected = u64::from(width) * u64::from(height) * 4;

        if data.len() as u64 != expected {
            return Err(Error::Format(format!(
                "Expected {} bytes of RGBA for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        Ok(RgbaBuffer {
            width,
            height,
            data,
        })
    }

    /// Image where every pixel has the same color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixel_ct = width as usize * height as usize;
        let data = color.repeat(pixel_ct).into_boxed_slice();

        RgbaBuffer {
            width,
            height,
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }
}

impl RgbaImage for RgbaBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.data[start..(start + 4)]);
        color
    }
}
