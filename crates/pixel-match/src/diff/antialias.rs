//! Anti-aliased edge detection.
//!
//! A pixel is treated as anti-aliasing when it sits between a darker and a
//! brighter neighbour, has at most two identical neighbours, and either of
//! those extreme neighbours lies inside a flat region in both images.
//! Based on Vysniauskas, "Anti-aliased Pixel and Intensity Slope Detector"
//! (2009).

use super::rgba_at;
use crate::color::luma_delta;
use crate::image::CHANNELS;

/// Whether `(x1, y1)` in `img` looks like an anti-aliased edge pixel,
/// with sibling flatness also checked in `other`.
pub(super) fn antialiased(
    img: &[u8],
    x1: usize,
    y1: usize,
    width: usize,
    height: usize,
    other: &[u8],
) -> bool {
    let (x0, y0, x2, y2) = window(x1, y1, width, height);
    let center = rgba_at(img, (y1 * width + x1) * CHANNELS);

    // pixels on the image border start with one implicit flat neighbour
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);
    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = None;
    let mut max_at = None;

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let delta = luma_delta(center, rgba_at(img, (y * width + x) * CHANNELS));
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = Some((x, y));
            } else if delta > max {
                max = delta;
                max_at = Some((x, y));
            }
        }
    }

    let (Some((min_x, min_y)), Some((max_x, max_y))) = (min_at, max_at) else {
        return false;
    };

    (has_many_siblings(img, min_x, min_y, width, height)
        && has_many_siblings(other, min_x, min_y, width, height))
        || (has_many_siblings(img, max_x, max_y, width, height)
            && has_many_siblings(other, max_x, max_y, width, height))
}

/// More than two neighbours share the exact color of `(x1, y1)`.
fn has_many_siblings(img: &[u8], x1: usize, y1: usize, width: usize, height: usize) -> bool {
    let (x0, y0, x2, y2) = window(x1, y1, width, height);
    let center = rgba_at(img, (y1 * width + x1) * CHANNELS);
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            if rgba_at(img, (y * width + x) * CHANNELS) == center {
                zeroes += 1;
                if zeroes > 2 {
                    return true;
                }
            }
        }
    }
    false
}

/// Inclusive 3×3 neighbourhood clipped to the image.
#[inline]
fn window(x: usize, y: usize, width: usize, height: usize) -> (usize, usize, usize, usize) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(width - 1),
        (y + 1).min(height - 1),
    )
}
