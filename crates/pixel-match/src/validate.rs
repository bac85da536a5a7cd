//! Dimension validation
//!
//! [`validate()`] is the gate in front of [`crate::diff()`]: it is the only
//! constructor of [`SizedPair`].

use std::fmt;

use crate::image::PixelImage;

/// The two images do not share width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionMismatch {
    pub width_a: u32,
    pub height_a: u32,
    pub width_b: u32,
    pub height_b: u32,
}

impl fmt::Display for DimensionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image dimensions differ: {}x{} vs {}x{}",
            self.width_a, self.height_a, self.width_b, self.height_b
        )
    }
}

impl std::error::Error for DimensionMismatch {}

/// Two borrowed images proven to have identical dimensions.
#[derive(Debug, Clone, Copy)]
pub struct SizedPair<'a> {
    first: &'a PixelImage,
    second: &'a PixelImage,
}

impl<'a> SizedPair<'a> {
    pub fn first(&self) -> &'a PixelImage {
        self.first
    }

    pub fn second(&self) -> &'a PixelImage {
        self.second
    }

    /// Shared width.
    pub fn width(&self) -> u32 {
        self.first.width()
    }

    /// Shared height.
    pub fn height(&self) -> u32 {
        self.first.height()
    }

    /// Pair with the images swapped.
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

/// Check that `a` and `b` share width and height.
pub fn validate<'a>(
    a: &'a PixelImage,
    b: &'a PixelImage,
) -> Result<SizedPair<'a>, DimensionMismatch> {
    if a.dimensions() != b.dimensions() {
        return Err(DimensionMismatch {
            width_a: a.width(),
            height_a: a.height(),
            width_b: b.width(),
            height_b: b.height(),
        });
    }
    Ok(SizedPair {
        first: a,
        second: b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_dimensions_accepted() {
        let a = PixelImage::new(10, 10).unwrap();
        let b = PixelImage::filled(10, 10, [255, 255, 255, 255]).unwrap();
        let pair = validate(&a, &b).unwrap();
        assert_eq!((pair.width(), pair.height()), (10, 10));
    }

    #[test]
    fn test_height_mismatch_rejected() {
        let a = PixelImage::new(10, 10).unwrap();
        let b = PixelImage::new(10, 20).unwrap();
        let err = validate(&a, &b).unwrap_err();
        assert_eq!(
            err,
            DimensionMismatch {
                width_a: 10,
                height_a: 10,
                width_b: 10,
                height_b: 20
            }
        );
        assert_eq!(err.to_string(), "image dimensions differ: 10x10 vs 10x20");
    }

    #[test]
    fn test_transposed_dimensions_rejected() {
        let a = PixelImage::new(3, 4).unwrap();
        let b = PixelImage::new(4, 3).unwrap();
        assert!(validate(&a, &b).is_err());
    }

    #[test]
    fn test_swapped_pair() {
        let a = PixelImage::new(2, 2).unwrap();
        let b = PixelImage::filled(2, 2, [1, 1, 1, 1]).unwrap();
        let pair = validate(&a, &b).unwrap().swapped();
        assert_eq!(pair.first(), &b);
        assert_eq!(pair.second(), &a);
    }
}
