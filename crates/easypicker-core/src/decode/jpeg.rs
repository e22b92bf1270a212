//! JPEG decoding with decode-time DCT scaling.
//!
//! The JPEG decoder can produce 1/2, 1/4 or 1/8 sized output straight from
//! the DCT coefficients, so a sampled decode never allocates the full
//! resolution bitmap. Any remainder (sample sizes above 8, or the decoder's
//! round-up on odd dimensions) is finished by [`resample`].

use std::io::Cursor;

use jpeg_decoder::{Decoder as JpegDecoder, PixelFormat};
use tracing::debug;

use super::resize::resample;
use super::{DecodedImage, FilterType, LoadError};

/// Decode JPEG bytes to exactly `target_width` x `target_height`.
///
/// The target is expected to be no larger than the natural size.
pub(crate) fn decode_jpeg_scaled(
    bytes: &[u8],
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, LoadError> {
    let mut decoder = JpegDecoder::new(Cursor::new(bytes));
    decoder.read_info().map_err(map_jpeg_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| LoadError::Decode("JPEG header missing".to_string()))?;

    let (mut width, mut height) = (info.width as u32, info.height as u32);
    let scale = choose_idct_scale(width, height, target_width, target_height);
    if scale < 8 {
        // The decoder settles on the first scale where either side reaches
        // the request, so the width is pinned out of reach and the height
        // alone picks `scale`. Scaled heights fit in u16 like the natural one.
        let (w, h) = decoder
            .scale(u16::MAX, idct_scaled(height, scale) as u16)
            .map_err(map_jpeg_error)?;
        debug!(
            "JPEG DCT scaling {}x{} -> {}x{} (target {}x{})",
            width, height, w, h, target_width, target_height
        );
        width = w as u32;
        height = h as u32;
    }

    let pixels = decoder.decode().map_err(map_jpeg_error)?;
    let rgb = to_rgb(pixels, info.pixel_format)?;
    if rgb.len() != (width as usize) * (height as usize) * 3 {
        return Err(LoadError::Decode(format!(
            "JPEG produced {} bytes for {}x{}",
            rgb.len(),
            width,
            height
        )));
    }

    resample(
        DecodedImage::new(width, height, rgb),
        target_width,
        target_height,
        filter,
    )
}

/// Side length the decoder produces for `len` at an IDCT of `scale` eighths.
fn idct_scaled(len: u32, scale: u32) -> u32 {
    (len * scale).saturating_sub(1) / 8 + 1
}

/// Smallest IDCT scale, in eighths, that keeps both sides at or above the
/// target. 8 means a full-size decode.
fn choose_idct_scale(width: u32, height: u32, target_width: u32, target_height: u32) -> u32 {
    [1, 2, 4]
        .into_iter()
        .find(|&scale| {
            idct_scaled(width, scale) >= target_width && idct_scaled(height, scale) >= target_height
        })
        .unwrap_or(8)
}

fn to_rgb(pixels: Vec<u8>, format: PixelFormat) -> Result<Vec<u8>, LoadError> {
    match format {
        PixelFormat::RGB24 => Ok(pixels),
        PixelFormat::L8 => Ok(pixels.iter().flat_map(|&l| [l, l, l]).collect()),
        PixelFormat::CMYK32 => {
            let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
            for chunk in pixels.chunks_exact(4) {
                let c = chunk[0] as f32 / 255.0;
                let m = chunk[1] as f32 / 255.0;
                let y = chunk[2] as f32 / 255.0;
                let k = chunk[3] as f32 / 255.0;
                let r = (1.0 - (c * (1.0 - k) + k)) * 255.0;
                let g = (1.0 - (m * (1.0 - k) + k)) * 255.0;
                let b = (1.0 - (y * (1.0 - k) + k)) * 255.0;
                rgb.push(r.clamp(0.0, 255.0) as u8);
                rgb.push(g.clamp(0.0, 255.0) as u8);
                rgb.push(b.clamp(0.0, 255.0) as u8);
            }
            Ok(rgb)
        }
        other => Err(LoadError::Decode(format!(
            "unsupported JPEG pixel format: {:?}",
            other
        ))),
    }
}

fn map_jpeg_error(err: jpeg_decoder::Error) -> LoadError {
    match err {
        jpeg_decoder::Error::Io(e) => LoadError::Io(e.to_string()),
        other => LoadError::Decode(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn test_full_size_decode() {
        let img = decode_jpeg_scaled(&jpeg_bytes(40, 20), 40, 20, FilterType::Bilinear).unwrap();
        assert_eq!((img.width, img.height), (40, 20));
        assert_eq!(img.pixels.len(), 40 * 20 * 3);
    }

    #[test]
    fn test_dct_scaled_decode() {
        let img = decode_jpeg_scaled(&jpeg_bytes(64, 48), 16, 12, FilterType::Bilinear).unwrap();
        assert_eq!((img.width, img.height), (16, 12));
    }

    #[test]
    fn test_odd_dimensions_land_on_exact_target() {
        // 1/4 DCT scaling rounds 65x49 up to 17x13; resample finishes at 16x12.
        let img = decode_jpeg_scaled(&jpeg_bytes(65, 49), 16, 12, FilterType::Bilinear).unwrap();
        assert_eq!((img.width, img.height), (16, 12));
    }

    #[test]
    fn test_beyond_dct_range() {
        // Sample size 16 is past what DCT scaling offers.
        let img = decode_jpeg_scaled(&jpeg_bytes(160, 160), 10, 10, FilterType::Nearest).unwrap();
        assert_eq!((img.width, img.height), (10, 10));
    }

    #[test]
    fn test_idct_scale_covers_both_sides() {
        assert_eq!(choose_idct_scale(64, 48, 16, 12), 2);
        assert_eq!(choose_idct_scale(64, 48, 64, 48), 8);
        assert_eq!(choose_idct_scale(160, 160, 10, 10), 1);

        // A narrow strip: 1/8 already gives the 1 column, but the rows need 1/2.
        assert_eq!(choose_idct_scale(3, 100, 1, 50), 4);
        assert_eq!(idct_scaled(3, 4), 2);
        assert_eq!(idct_scaled(100, 4), 50);
    }

    #[test]
    fn test_narrow_strip_lands_on_target() {
        let img = decode_jpeg_scaled(&jpeg_bytes(3, 100), 1, 50, FilterType::Bilinear).unwrap();
        assert_eq!((img.width, img.height), (1, 50));
    }

    #[test]
    fn test_decode_invalid_jpeg() {
        let result = decode_jpeg_scaled(&[0x00, 0x01, 0x02, 0x03], 1, 1, FilterType::Bilinear);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let bytes = jpeg_bytes(32, 32);
        let truncated = &bytes[..20];
        let result = decode_jpeg_scaled(truncated, 32, 32, FilterType::Bilinear);
        assert!(result.is_err());
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let rgb = to_rgb(vec![10, 20], PixelFormat::L8).unwrap();
        assert_eq!(rgb, vec![10, 10, 10, 20, 20, 20]);
    }

    #[test]
    fn test_cmyk_black_and_white() {
        let rgb = to_rgb(vec![0, 0, 0, 0, 0, 0, 0, 255], PixelFormat::CMYK32).unwrap();
        assert_eq!(rgb, vec![255, 255, 255, 0, 0, 0]);
    }
}
