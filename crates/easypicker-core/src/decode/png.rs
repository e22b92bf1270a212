//! PNG decoding with row skipping.
//!
//! PNG has no reduced-resolution decode, but non-interlaced files arrive one
//! row at a time. Keeping every `sample_size`-th row and column means only the
//! sampled bitmap and a single row buffer are ever allocated.

use std::io::Cursor;

use png::{BitDepth, ColorType, Decoder as PngDecoder, Transformations};
use tracing::debug;

use super::sample::sampled_dimensions;
use super::{DecodedImage, LoadError};

/// Decode PNG bytes, keeping every `sample_size`-th pixel on both axes.
///
/// The result has the size [`sampled_dimensions`] reports for the file.
/// Returns `Ok(None)` for Adam7-interlaced files, whose rows arrive out of
/// order; the caller decodes those in full.
///
/// # Errors
///
/// Returns `LoadError::Decode` for malformed data, `LoadError::Io` for read
/// failures and `LoadError::OutOfMemory` when the decoder's own limits trip.
pub(crate) fn decode_png_sampled(
    bytes: &[u8],
    sample_size: u32,
) -> Result<Option<DecodedImage>, LoadError> {
    let mut decoder = PngDecoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(map_png_error)?;

    let (width, height, interlaced) = {
        let info = reader.info();
        (info.width, info.height, info.interlaced)
    };
    if interlaced {
        debug!("interlaced PNG {}x{}, no row sampling", width, height);
        return Ok(None);
    }

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(LoadError::Decode(format!(
            "unsupported PNG bit depth after expansion: {:?}",
            bit_depth
        )));
    }
    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(LoadError::Decode(format!(
                "unsupported PNG color type after expansion: {:?}",
                other
            )))
        }
    };

    let step = sample_size.max(1) as usize;
    let (out_width, out_height) = sampled_dimensions(width, height, sample_size);
    let mut pixels = Vec::with_capacity(out_width as usize * out_height as usize * 3);

    let mut kept = 0u32;
    for y in 0..height as usize {
        if kept == out_height {
            break;
        }
        let row = reader
            .next_row()
            .map_err(map_png_error)?
            .ok_or_else(|| LoadError::Decode(format!("PNG missing row {}", y)))?;
        if y % step != 0 {
            continue;
        }

        let data = row.data();
        for x in 0..out_width as usize {
            let i = x * step * channels;
            match channels {
                1 | 2 => pixels.extend_from_slice(&[data[i], data[i], data[i]]),
                _ => pixels.extend_from_slice(&data[i..i + 3]),
            }
        }
        kept += 1;
    }

    debug!(
        "PNG row sampling {}x{} -> {}x{}",
        width, height, out_width, out_height
    );
    Ok(Some(DecodedImage::new(out_width, out_height, pixels)))
}

fn map_png_error(err: png::DecodingError) -> LoadError {
    match err {
        png::DecodingError::IoError(e) => LoadError::Io(e.to_string()),
        png::DecodingError::LimitsExceeded => LoadError::OutOfMemory { sample_size: 0 },
        other => LoadError::Decode(other.to_string()),
    }
}
