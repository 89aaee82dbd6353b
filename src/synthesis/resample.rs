//! Pitch shifting by sample-index striding.

/// Indices `round(0), round(f), round(2f), ...` below `len`.
///
/// Rounding is half-to-even. A factor above 1 drops samples (higher, shorter),
/// below 1 repeats them (lower, longer).
pub fn stride_indices(len: usize, factor: f64) -> Vec<usize> {
    if len == 0 || factor <= 0.0 || factor.is_nan() {
        return Vec::new();
    }
    let count = (len as f64 / factor).ceil() as usize;
    (0..count)
        .map(|k| (k as f64 * factor).round_ties_even())
        .filter(|&i| i < len as f64)
        .map(|i| i as usize)
        .collect()
}

/// Resample one channel at stride `factor`
pub fn speedx(samples: &[i16], factor: f64) -> Vec<i16> {
    stride_indices(samples.len(), factor)
        .into_iter()
        .map(|i| samples[i])
        .collect()
}

/// Pitch ratio for a semitone offset
pub fn semitone_factor(offset: i32) -> f64 {
    2f64.powf(offset as f64 / 12.0)
}
