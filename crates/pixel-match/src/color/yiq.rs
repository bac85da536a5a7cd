/// Upper bound on the magnitude of [`color_delta()`].
pub const MAX_YIQ_DELTA: f64 = 35215.0;

const Y_WEIGHT: f64 = 0.5053;
const I_WEIGHT: f64 = 0.299;
const Q_WEIGHT: f64 = 0.1957;

/// Luma of an RGB triple.
#[inline]
pub fn rgb_to_y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.298_895_31 + g * 0.586_622_47 + b * 0.114_482_23
}

#[inline]
fn rgb_to_i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.595_977_99 - g * 0.274_176_10 - b * 0.321_801_89
}

#[inline]
fn rgb_to_q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.211_470_17 - g * 0.522_617_11 + b * 0.311_146_94
}

/// Composite channel value `c` with opacity `a` (0..=1) onto white.
#[inline]
pub fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

#[inline]
fn composited(p: [u8; 4]) -> (f64, f64, f64) {
    let (r, g, b) = (p[0] as f64, p[1] as f64, p[2] as f64);
    if p[3] == 255 {
        return (r, g, b);
    }
    let a = p[3] as f64 / 255.0;
    (blend(r, a), blend(g, a), blend(b, a))
}

/// Signed perceptual distance between two RGBA pixels.
///
/// The magnitude lies in `0..=MAX_YIQ_DELTA`. The sign is negative when `p`
/// is brighter than `q`, so `color_delta(p, q) == -color_delta(q, p)`.
pub fn color_delta(p: [u8; 4], q: [u8; 4]) -> f64 {
    if p == q {
        return 0.0;
    }
    let (r1, g1, b1) = composited(p);
    let (r2, g2, b2) = composited(q);

    let y1 = rgb_to_y(r1, g1, b1);
    let y2 = rgb_to_y(r2, g2, b2);
    let y = y1 - y2;
    let i = rgb_to_i(r1, g1, b1) - rgb_to_i(r2, g2, b2);
    let q = rgb_to_q(r1, g1, b1) - rgb_to_q(r2, g2, b2);

    let delta = Y_WEIGHT * y * y + I_WEIGHT * i * i + Q_WEIGHT * q * q;
    if y1 > y2 {
        -delta
    } else {
        delta
    }
}

/// Luma difference `Y(p) - Y(q)` after compositing onto white.
pub fn luma_delta(p: [u8; 4], q: [u8; 4]) -> f64 {
    if p == q {
        return 0.0;
    }
    let (r1, g1, b1) = composited(p);
    let (r2, g2, b2) = composited(q);
    rgb_to_y(r1, g1, b1) - rgb_to_y(r2, g2, b2)
}

/// Grey level for a matching pixel in the diff visual.
///
/// The pixel's luma is faded toward white, `alpha` being the remaining
/// opacity (0 = white, 1 = full luma).
pub fn gray_value(p: [u8; 4], alpha: f64) -> u8 {
    let y = rgb_to_y(p[0] as f64, p[1] as f64, p[2] as f64);
    let v = blend(y, alpha * p[3] as f64 / 255.0);
    v.clamp(0.0, 255.0) as u8
}
