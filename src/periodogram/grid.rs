use crate::data::model::{FrequencyGrid, SampleSet};
use crate::error::{Error, Result};

/// `count` evenly spaced values over `[start, end]`.
///
/// A single point yields `[start]` whatever `end` is. The last value is pinned
/// to `end` so the endpoints never drift.
pub fn generate(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Derive a grid from the sampling of `samples`.
///
/// The spacing resolves each peak with `samples_per_peak` points over the
/// observation baseline `T`, starting at half a step, and extends up to
/// `nyquist_factor` times the average Nyquist frequency `n / 2T`.
pub fn auto_grid(
    samples: &SampleSet,
    samples_per_peak: f64,
    nyquist_factor: f64,
) -> Result<FrequencyGrid> {
    if !(samples_per_peak.is_finite() && samples_per_peak > 0.0) {
        return Err(Error::invalid(format!(
            "samples_per_peak must be > 0, got {samples_per_peak}"
        )));
    }
    if !(nyquist_factor.is_finite() && nyquist_factor > 0.0) {
        return Err(Error::invalid(format!(
            "nyquist_factor must be > 0, got {nyquist_factor}"
        )));
    }
    let (t_min, t_max) = samples
        .time_span()
        .ok_or_else(|| Error::invalid("cannot derive a frequency grid from an empty sample set"))?;
    let baseline = t_max - t_min;
    if !(baseline.is_finite() && baseline > 0.0) {
        return Err(Error::invalid(
            "cannot derive a frequency grid: all samples share the same time",
        ));
    }

    let df = 1.0 / (baseline * samples_per_peak);
    let start = 0.5 * df;
    let max_frequency = nyquist_factor * 0.5 * samples.len() as f64 / baseline;
    let count = 1 + ((max_frequency - start) / df).round().max(0.0) as usize;
    let end = start + df * (count - 1) as f64;

    FrequencyGrid::new(start, end, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn five_points_with_exact_endpoints() {
        let grid = generate(0.01, 4.0, 5);
        let expected = [0.01, 1.0075, 2.005, 3.0025, 4.0];
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 0.01);
        assert_eq!(grid[4], 4.0);
        for (g, e) in grid.iter().zip(expected) {
            assert_close(*g, e);
        }
    }

    #[test]
    fn single_point_ignores_end() {
        assert_eq!(generate(2.0, 0.0, 1), vec![2.0]);
        assert_eq!(generate(2.0, f64::NAN, 1), vec![2.0]);
    }

    #[test]
    fn zero_points_is_empty() {
        assert!(generate(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn spacing_is_uniform() {
        let grid = generate(0.5, 10.5, 11);
        for pair in grid.windows(2) {
            assert_close(pair[1] - pair[0], 1.0);
        }
    }

    #[test]
    fn auto_grid_follows_baseline() {
        // 9 samples over a baseline of 8 time units
        let samples = SampleSet::from_samples(
            (0..9).map(|i| Sample { amplitude: (i as f64).sin(), time: i as f64 }),
        );
        let grid = auto_grid(&samples, 5.0, 5.0).unwrap();
        let df = 1.0 / 40.0;
        assert_close(grid.start(), 0.5 * df);
        // (5 * 0.5 * 9 / 8 - df / 2) / df = 112
        assert_eq!(grid.count(), 113);
        assert_close(grid.end(), grid.start() + df * 112.0);
    }

    #[test]
    fn auto_grid_rejects_degenerate_input() {
        let same_time = SampleSet::from_samples([
            Sample { amplitude: 1.0, time: 3.0 },
            Sample { amplitude: 2.0, time: 3.0 },
        ]);
        assert!(auto_grid(&same_time, 5.0, 5.0).is_err());
        assert!(auto_grid(&SampleSet::default(), 5.0, 5.0).is_err());

        let ok = SampleSet::from_samples([
            Sample { amplitude: 1.0, time: 0.0 },
            Sample { amplitude: 2.0, time: 1.0 },
        ]);
        assert!(auto_grid(&ok, 0.0, 5.0).is_err());
        assert!(auto_grid(&ok, 5.0, -1.0).is_err());
    }
}
