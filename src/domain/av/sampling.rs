//! Evenly spaced interior sample points for batch thumbnails.

/// `count` offsets strictly inside `(0, duration)`: `duration * i / (count + 1)`
/// for `i` in `1..=count`. Neither endpoint is ever sampled.
pub fn sample_offsets(duration: f64, count: u32) -> Vec<f64> {
    let slots = f64::from(count) + 1.0;
    (1..=count)
        .map(|i| duration * f64::from(i) / slots)
        .collect()
}

/// Decimal seconds with two fractional digits, as passed to `-ss`.
pub fn format_offset(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_samples_over_thirty_seconds() {
        let offsets: Vec<String> = sample_offsets(30.0, 3)
            .into_iter()
            .map(format_offset)
            .collect();
        assert_eq!(offsets, vec!["7.50", "15.00", "22.50"]);
    }

    #[test]
    fn offsets_are_interior_and_increasing() {
        for &duration in &[0.5, 1.0, 7.25, 30.0, 3600.0, 86_399.9] {
            for count in 2..=20u32 {
                let offsets = sample_offsets(duration, count);
                assert_eq!(offsets.len(), count as usize);
                assert!(offsets[0] > 0.0);
                assert!(*offsets.last().unwrap() < duration);
                assert!(offsets.windows(2).all(|w| w[0] < w[1]));
                for (i, offset) in offsets.iter().enumerate() {
                    let expected = duration * (i as f64 + 1.0) / (f64::from(count) + 1.0);
                    assert_eq!(*offset, expected);
                }
            }
        }
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(sample_offsets(30.0, 0).is_empty());
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_offset(7.5), "7.50");
        assert_eq!(format_offset(1.0 / 3.0), "0.33");
    }
}
