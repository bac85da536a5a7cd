//! Test fixtures: small PNGs built in memory.

use pixel_match::PixelImage;
use pixdiff::rendering::encode_png;

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// PNG of a single flat color
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&PixelImage::filled(width, height, rgba).unwrap()).unwrap()
}

/// PNG of a flat color with some pixels replaced
pub fn png_with_pixels(
    width: u32,
    height: u32,
    background: [u8; 4],
    changed: &[(u32, u32, [u8; 4])],
) -> Vec<u8> {
    let mut image = PixelImage::filled(width, height, background).unwrap();
    for &(x, y, rgba) in changed {
        image.set_pixel(x, y, rgba);
    }
    encode_png(&image).unwrap()
}

/// Decode a PNG produced by the service
pub fn decode(png_bytes: &[u8]) -> PixelImage {
    pixdiff::rendering::decode_png(png_bytes, &Default::default()).unwrap()
}
