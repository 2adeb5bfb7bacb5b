/// Arithmetic mean skipping NaN values. All-NaN or empty input yields NaN,
/// never zero, so an undefined average stays visibly undefined.
pub fn nan_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Maximum skipping NaN values. All-NaN or empty input yields NaN.
pub fn nan_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut max = f64::NAN;
    for v in values {
        if v.is_nan() {
            continue;
        }
        if max.is_nan() || v > max {
            max = v;
        }
    }
    max
}
