//! Power-of-two sample size selection.
//!
//! The sample size is the integer divisor applied while decoding so the
//! bitmap is produced small instead of being shrunk after a full-resolution
//! allocation.

/// Pick the sample size for an image of `width` x `height` bounded by
/// `max_dimension`.
///
/// The divisor doubles only while *both* sampled dimensions still exceed the
/// bound, so a very wide and short image stops as soon as its short side
/// fits. The long side may therefore stay above `max_dimension`.
///
/// `max_dimension` must be non-zero; the loader rejects zero before calling.
pub fn compute_sample_size(width: u32, height: u32, max_dimension: u32) -> u32 {
    let mut scale = 1u32;
    while width / scale > max_dimension && height / scale > max_dimension {
        scale *= 2;
    }
    scale
}

/// Dimensions of a bitmap decoded at `sample_size`. Never collapses to zero.
pub fn sampled_dimensions(width: u32, height: u32, sample_size: u32) -> (u32, u32) {
    let sample_size = sample_size.max(1);
    ((width / sample_size).max(1), (height / sample_size).max(1))
}

/// Bytes an RGB8 bitmap of the given size occupies.
pub fn bitmap_bytes(width: u32, height: u32) -> u64 {
    width as u64 * height as u64 * 3
}


// ============================================================================
// Property-Based Tests
// ============================================================================
