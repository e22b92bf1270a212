//! EXIF orientation: reading the tag and applying the matching transform.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use exif::{In, Reader, Tag};
use image::imageops;

use super::{DecodedImage, LoadError, Orientation};

/// Read the EXIF orientation of the file at `path`.
///
/// A file without EXIF data, or EXIF without an orientation tag, is
/// `Orientation::Normal`. EXIF that is present but cannot be parsed is a
/// `LoadError::Metadata`.
pub fn read_orientation(path: &Path) -> Result<Orientation, LoadError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    orientation_from_container(Reader::new().read_from_container(&mut reader))
}

/// Same as [`read_orientation`], from in-memory file bytes.
pub fn orientation_from_bytes(bytes: &[u8]) -> Result<Orientation, LoadError> {
    let mut cursor = Cursor::new(bytes);
    orientation_from_container(Reader::new().read_from_container(&mut cursor))
}

fn orientation_from_container(
    parsed: Result<exif::Exif, exif::Error>,
) -> Result<Orientation, LoadError> {
    let exif = match parsed {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(Orientation::Normal),
        Err(exif::Error::Io(e)) => return Err(LoadError::Io(e.to_string())),
        Err(e) => return Err(LoadError::Metadata(e.to_string())),
    };

    Ok(exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default())
}

/// Apply an orientation transform to a decoded image.
///
/// `Normal` hands back the same buffer. Every other orientation consumes the
/// input, so the pre-transform pixels are dropped as soon as the transformed
/// buffer exists.
pub fn apply_orientation(image: DecodedImage, orientation: Orientation) -> DecodedImage {
    if orientation == Orientation::Normal {
        return image;
    }

    let Some(rgb) = image::RgbImage::from_raw(image.width, image.height, image.pixels) else {
        // Buffer length disagrees with the dimensions; nothing sane to rotate.
        return DecodedImage::new(0, 0, Vec::new());
    };

    let oriented = match orientation {
        Orientation::Normal => return DecodedImage::from_rgb_image(rgb),
        Orientation::FlipHorizontal => imageops::flip_horizontal(&rgb),
        Orientation::Rotate180 => imageops::rotate180(&rgb),
        Orientation::FlipVertical => imageops::flip_vertical(&rgb),
        Orientation::Transpose => imageops::flip_horizontal(&imageops::rotate90(&rgb)),
        Orientation::Rotate90CW => imageops::rotate90(&rgb),
        Orientation::Transverse => imageops::flip_horizontal(&imageops::rotate270(&rgb)),
        Orientation::Rotate270CW => imageops::rotate270(&rgb),
    };
    drop(rgb);

    DecodedImage::from_rgb_image(oriented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    /// 3x2 image, each pixel's red channel is its index in row-major order.
    fn indexed_3x2() -> DecodedImage {
        let mut pixels = Vec::new();
        for i in 0..6u8 {
            pixels.extend_from_slice(&[i, 0, 0]);
        }
        DecodedImage::new(3, 2, pixels)
    }

    fn red_channel(img: &DecodedImage) -> Vec<u8> {
        img.pixels.chunks_exact(3).map(|p| p[0]).collect()
    }

    // Source layout:
    //   0 1 2
    //   3 4 5

    #[test]
    fn test_normal_returns_same_buffer() {
        let img = indexed_3x2();
        let ptr = img.pixels.as_ptr();
        let out = apply_orientation(img, Orientation::Normal);
        assert_eq!(out.pixels.as_ptr(), ptr);
        assert_eq!(red_channel(&out), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flip_horizontal() {
        let out = apply_orientation(indexed_3x2(), Orientation::FlipHorizontal);
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(red_channel(&out), vec![2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn test_rotate_180() {
        let out = apply_orientation(indexed_3x2(), Orientation::Rotate180);
        assert_eq!(red_channel(&out), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_flip_vertical() {
        let out = apply_orientation(indexed_3x2(), Orientation::FlipVertical);
        assert_eq!(red_channel(&out), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn test_transpose_mirrors_main_diagonal() {
        let out = apply_orientation(indexed_3x2(), Orientation::Transpose);
        assert_eq!((out.width, out.height), (2, 3));
        // 0 3
        // 1 4
        // 2 5
        assert_eq!(red_channel(&out), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_rotate_90_clockwise() {
        let out = apply_orientation(indexed_3x2(), Orientation::Rotate90CW);
        assert_eq!((out.width, out.height), (2, 3));
        // 3 0
        // 4 1
        // 5 2
        assert_eq!(red_channel(&out), vec![3, 0, 4, 1, 5, 2]);
    }

    #[test]
    fn test_transverse_mirrors_anti_diagonal() {
        let out = apply_orientation(indexed_3x2(), Orientation::Transverse);
        assert_eq!((out.width, out.height), (2, 3));
        // 5 2
        // 4 1
        // 3 0
        assert_eq!(red_channel(&out), vec![5, 2, 4, 1, 3, 0]);
    }

    #[test]
    fn test_rotate_270_clockwise() {
        let out = apply_orientation(indexed_3x2(), Orientation::Rotate270CW);
        assert_eq!((out.width, out.height), (2, 3));
        // 2 5
        // 1 4
        // 0 3
        assert_eq!(red_channel(&out), vec![2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn test_mismatched_buffer_yields_empty_image() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0; 3],
        };
        assert!(apply_orientation(img, Orientation::Rotate90CW).is_empty());
    }

    #[test]
    fn test_orientation_from_exif_bytes() {
        let jpeg = jpeg_bytes(8, 8);
        for value in 1..=8u16 {
            let tagged = with_exif_orientation(&jpeg, value);
            let orientation = orientation_from_bytes(&tagged).unwrap();
            assert_eq!(orientation, Orientation::from(value as u32));
        }
    }

    #[test]
    fn test_missing_exif_is_normal() {
        assert_eq!(
            orientation_from_bytes(&jpeg_bytes(8, 8)).unwrap(),
            Orientation::Normal
        );
    }

    #[test]
    fn test_out_of_range_tag_is_normal() {
        let tagged = with_exif_orientation(&jpeg_bytes(8, 8), 42);
        assert_eq!(orientation_from_bytes(&tagged).unwrap(), Orientation::Normal);
    }

    #[test]
    fn test_broken_exif_is_metadata_error() {
        let broken = with_broken_exif(&jpeg_bytes(8, 8));
        assert!(matches!(
            orientation_from_bytes(&broken),
            Err(LoadError::Metadata(_))
        ));
    }

    #[test]
    fn test_read_orientation_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_fixture(
            &tmp,
            "portrait.jpg",
            &with_exif_orientation(&jpeg_bytes(8, 8), 6),
        );
        assert_eq!(read_orientation(&path).unwrap(), Orientation::Rotate90CW);
    }

    #[test]
    fn test_read_orientation_missing_file_is_io_error() {
        let result = read_orientation(Path::new("/definitely/not/here.jpg"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
