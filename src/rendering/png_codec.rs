//! PNG decoding to, and encoding from, [`PixelImage`].
//!
//! Every PNG layout is normalized to 8-bit RGBA on the way in: palettes and
//! sub-byte depths are expanded, 16-bit samples keep their high byte, grey is
//! replicated into RGB and missing alpha becomes 255. The encoder always
//! writes 8-bit RGBA, so `decode(encode(img)) == img` for any grid.

use pixel_match::PixelImage;
use std::io::Cursor;

use crate::error::{DecodeError, EncodeError};

/// Default pixel bound for decoded images.
pub const DEFAULT_MAX_PIXELS: u64 = 25_000_000;

/// Size bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted `width × height`
    pub max_pixels: u64,
}

impl DecodeLimits {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Memory budget handed to the PNG decoder: 16-bit RGBA plus 1 MiB for
    /// metadata chunks.
    fn decoder_bytes(&self) -> usize {
        let bytes = self.max_pixels.saturating_mul(8).saturating_add(1 << 20);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PIXELS)
    }
}

/// Decode a PNG byte buffer into an RGBA grid.
pub fn decode_png(bytes: &[u8], limits: &DecodeLimits) -> Result<PixelImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut decoder = png::Decoder::new_with_limits(
        Cursor::new(bytes),
        png::Limits {
            bytes: limits.decoder_bytes(),
        },
    );
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder.read_info().map_err(map_decoding_error)?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width as u64 * height as u64 > limits.max_pixels {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max: limits.max_pixels,
        });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(map_decoding_error)?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(DecodeError::Unsupported(format!(
            "{:?} bit samples after normalization",
            frame.bit_depth
        )));
    }

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(DecodeError::Unsupported(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    PixelImage::from_rgba(width, height, rgba).map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Encode an RGBA grid as an 8-bit RGBA PNG.
pub fn encode_png(image: &PixelImage) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        writer
            .write_image_data(image.as_rgba())
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
    }
    Ok(buf)
}

/// Re-compress a PNG with oxipng, keeping the input if optimization fails.
pub fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) if optimized.len() < png_bytes.len() => optimized,
        Ok(_) => png_bytes,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping original encoding");
            png_bytes
        }
    }
}

fn map_decoding_error(e: png::DecodingError) -> DecodeError {
    match e {
        png::DecodingError::LimitsExceeded => DecodeError::LimitsExceeded,
        other => DecodeError::Malformed(other.to_string()),
    }
}
