//! RGBA pixel grid
//!
//! [`PixelImage`] is the only image representation in the crate. Its
//! constructors enforce the buffer invariant so every other module can index
//! without re-checking lengths.

use std::fmt;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Error type for constructing a [`PixelImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Width or height is zero
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Pixel buffer does not hold exactly `width × height × 4` bytes
    BufferLength {
        /// Length implied by the dimensions
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
    /// `width × height × 4` does not fit in memory addresses
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::ZeroDimension { width, height } => {
                write!(f, "image dimensions must be positive, got {}x{}", width, height)
            }
            ImageError::BufferLength { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} bytes, expected {} for RGBA",
                    actual, expected
                )
            }
            ImageError::TooLarge { width, height } => {
                write!(f, "image of {}x{} pixels is too large to address", width, height)
            }
        }
    }
}

impl std::error::Error for ImageError {}

/// A width × height grid of 8-bit RGBA pixels in row-major order.
///
/// The pixel buffer length always equals `width × height × 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelImage {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a canvas with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ImageError> {
        let len = buffer_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing RGBA buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer length must already match the dimensions.
    pub(crate) fn from_parts_unchecked(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * CHANNELS);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width × height`).
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image, returning its RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

fn buffer_len(width: u32, height: u32) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ImageError::TooLarge { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let img = PixelImage::new(3, 2).unwrap();
        assert_eq!(img.as_rgba().len(), 3 * 2 * 4);
        assert!(img.as_rgba().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filled_repeats_color() {
        let img = PixelImage::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(img.as_rgba(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            PixelImage::new(0, 5).unwrap_err(),
            ImageError::ZeroDimension {
                width: 0,
                height: 5
            }
        );
    }

    #[test]
    fn test_from_rgba_length_checked() {
        let err = PixelImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ImageError::BufferLength {
                expected: 16,
                actual: 15
            }
        );
        assert_eq!(err.to_string(), "pixel buffer has 15 bytes, expected 16 for RGBA");
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut img = PixelImage::new(4, 3).unwrap();
        img.set_pixel(3, 2, [9, 8, 7, 6]);
        assert_eq!(img.pixel(3, 2), [9, 8, 7, 6]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(&img.as_rgba()[44..48], &[9, 8, 7, 6]);
    }

    #[test]
    #[should_panic(expected = "outside 2x2 image")]
    fn test_pixel_out_of_bounds_panics() {
        let img = PixelImage::new(2, 2).unwrap();
        img.pixel(2, 0);
    }

    #[test]
    fn test_pixel_count() {
        let img = PixelImage::new(10, 20).unwrap();
        assert_eq!(img.pixel_count(), 200);
        assert_eq!(img.dimensions(), (10, 20));
    }
}
