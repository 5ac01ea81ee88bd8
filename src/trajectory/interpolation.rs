//! Polynomial approximation over a sliding window of samples.
//!
//! Value-only Hermite approximation of degree `d` reduces to the Lagrange
//! polynomial through `d + 1` samples. The window around a query time is
//! picked so that it always contains the two samples bracketing the query.

use std::cmp::Ordering;

use crate::model::{Coordinate, PositionSample, TimeMs};

/// Index range `[first, last]` of the samples used for a query whose
/// insertion index is `insertion`.
fn sample_window(insertion: usize, len: usize, degree: usize) -> (usize, usize) {
    let last_index = len - 1;
    let mut first = insertion.saturating_sub(degree / 2 + 1);
    let mut last = first + degree;
    if last > last_index {
        last = last_index;
        first = last.saturating_sub(degree);
    }
    (first, last)
}

/// Interpolate a position at `time_ms` from time-ascending samples.
///
/// Returns `None` outside `[first sample time, last sample time]`. The
/// effective degree never exceeds `samples.len() - 1`, so two samples yield
/// a straight line between them.
pub fn interpolate(samples: &[PositionSample], time_ms: TimeMs, degree: usize) -> Option<Coordinate> {
    let first = samples.first()?;
    let last = samples.last()?;
    if !(time_ms >= first.time_ms && time_ms <= last.time_ms) {
        return None;
    }

    let insertion = match samples.binary_search_by(|s| {
        s.time_ms.partial_cmp(&time_ms).unwrap_or(Ordering::Less)
    }) {
        Ok(exact) => return Some(samples[exact].position),
        Err(insertion) => insertion,
    };

    let degree = degree.clamp(1, samples.len() - 1);
    let (lo, hi) = sample_window(insertion, samples.len(), degree);
    let window = &samples[lo..=hi];

    // Offsets from the window start keep the products well conditioned
    let origin = window[0].time_ms;
    let t = time_ms - origin;

    let mut result = Coordinate::zeros();
    for (j, sample_j) in window.iter().enumerate() {
        let tj = sample_j.time_ms - origin;
        let mut basis = 1.0;
        for (k, sample_k) in window.iter().enumerate() {
            if k != j {
                let tk = sample_k.time_ms - origin;
                basis *= (t - tk) / (tj - tk);
            }
        }
        result += sample_j.position * basis;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn sample(time_ms: f64, x: f64, y: f64, z: f64) -> PositionSample {
        PositionSample {
            time_ms,
            position: Vector3::new(x, y, z),
        }
    }

    #[test]
    fn test_two_samples_interpolate_linearly() {
        let samples = vec![sample(0.0, 0.0, 0.0, 0.0), sample(1000.0, 10.0, 0.0, 0.0)];
        let mid = interpolate(&samples, 500.0, 2).unwrap();
        assert!(mid.x > 0.0 && mid.x < 10.0);
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert_eq!(interpolate(&samples, -1.0, 2), None);
        assert_eq!(interpolate(&samples, 1001.0, 2), None);
    }

    #[test]
    fn test_exact_sample_is_returned() {
        let samples = vec![
            sample(0.0, 1.0, 2.0, 3.0),
            sample(500.0, 4.0, 5.0, 6.0),
            sample(1000.0, 7.0, 8.0, 9.0),
        ];
        assert_eq!(interpolate(&samples, 500.0, 2), Some(Vector3::new(4.0, 5.0, 6.0)));
        assert_eq!(interpolate(&samples, 1000.0, 2), Some(Vector3::new(7.0, 8.0, 9.0)));
    }

    #[test]
    fn test_quadratic_motion_is_reproduced() {
        // x = t^2 is exactly representable by a degree-2 polynomial
        let samples: Vec<PositionSample> = (0..6)
            .map(|i| {
                let t = i as f64 * 1000.0;
                let s = t / 1000.0;
                sample(t, s * s, 0.0, 0.0)
            })
            .collect();
        let p = interpolate(&samples, 2500.0, 2).unwrap();
        assert!((p.x - 6.25).abs() < 1e-9);
        let p = interpolate(&samples, 4750.0, 2).unwrap();
        assert!((p.x - 4.75 * 4.75).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_range() {
        let samples = vec![sample(100.0, 1.0, 1.0, 1.0)];
        assert_eq!(interpolate(&samples, 100.0, 2), Some(Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(interpolate(&samples, 100.5, 2), None);
        assert_eq!(interpolate(&[], 0.0, 2), None);
    }

    #[test]
    fn test_window_brackets_query() {
        assert_eq!(sample_window(1, 5, 2), (0, 2));
        assert_eq!(sample_window(3, 5, 2), (1, 3));
        assert_eq!(sample_window(4, 5, 2), (2, 4));
        assert_eq!(sample_window(3, 5, 1), (2, 3));
    }
}
