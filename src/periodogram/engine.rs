use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::data::model::{FrequencyGrid, PeriodogramPoint, PeriodogramResult, SampleSet};
use crate::error::{Error, Result};

/// Grids smaller than this are always evaluated on the calling thread.
pub const PARALLEL_MIN_POINTS: usize = 2048;

/// Knobs that change what the engine returns or how it schedules work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Divide every power by the population variance of the amplitudes.
    pub normalize: bool,
    /// Spread frequencies over the rayon pool for large grids.
    pub parallel: bool,
}

/// Lomb-Scargle power of `samples` at every frequency of `grid`.
///
/// Amplitudes are used as-is (no mean removal). Each frequency is evaluated
/// independently with a fixed summation order, so the output is bit-identical
/// across calls and across the sequential and parallel paths.
pub fn compute(
    samples: &SampleSet,
    grid: &FrequencyGrid,
    options: EngineOptions,
) -> Result<PeriodogramResult> {
    if samples.is_empty() {
        return Err(Error::invalid("cannot compute a periodogram of an empty sample set"));
    }

    let variance = if options.normalize {
        match samples.variance() {
            Some(v) if v > 0.0 => Some(v),
            _ => {
                return Err(Error::invalid(
                    "cannot normalize: amplitudes have zero variance",
                ))
            }
        }
    } else {
        None
    };

    let times = centred_times(samples);
    let amplitudes: Vec<f64> = samples.amplitudes().collect();

    let point = |trig: &mut Vec<(f64, f64)>, frequency: f64| {
        let raw = power_at(&times, &amplitudes, frequency, trig);
        PeriodogramPoint {
            frequency,
            power: match variance {
                Some(v) => raw / v,
                None => raw,
            },
        }
    };

    let frequencies = grid.frequencies();
    let points: Vec<PeriodogramPoint> =
        if options.parallel && frequencies.len() >= PARALLEL_MIN_POINTS {
            frequencies
                .par_iter()
                .map_init(|| Vec::with_capacity(times.len()), |trig, &f| point(trig, f))
                .collect()
        } else {
            let mut trig = Vec::with_capacity(times.len());
            frequencies.iter().map(|&f| point(&mut trig, f)).collect()
        };

    Ok(PeriodogramResult::new(points))
}

/// Sample times shifted to their mean. The power is invariant under a time
/// shift (tau absorbs it), and small arguments keep the trig accurate. Falls
/// back to the raw times when the shift would overflow.
fn centred_times(samples: &SampleSet) -> Vec<f64> {
    let n = samples.len() as f64;
    let t_mean: f64 = samples.times().map(|t| t / n).sum();
    let centred: Vec<f64> = samples.times().map(|t| t - t_mean).collect();
    if t_mean.is_finite() && centred.iter().all(|t| t.is_finite()) {
        centred
    } else {
        samples.times().collect()
    }
}

/// Power at a single frequency. `trig` is scratch space for one
/// `(sin ωt, cos ωt)` pair per sample, reused for both passes.
fn power_at(times: &[f64], amplitudes: &[f64], frequency: f64, trig: &mut Vec<(f64, f64)>) -> f64 {
    let omega = TAU * frequency;
    trig.clear();
    trig.extend(times.iter().map(|&t| (omega * t).sin_cos()));

    // Σ sin 2ωt and Σ cos 2ωt via double-angle identities
    let (mut sum_sin2, mut sum_cos2) = (0.0, 0.0);
    for &(sin, cos) in trig.iter() {
        sum_sin2 += 2.0 * sin * cos;
        sum_cos2 += cos * cos - sin * sin;
    }

    // ωτ = atan2(Σ sin 2ωt, Σ cos 2ωt) / 2
    let (sin_wtau, cos_wtau) = (0.5 * sum_sin2.atan2(sum_cos2)).sin_cos();

    let (mut c, mut s, mut cc, mut ss) = (0.0, 0.0, 0.0, 0.0);
    for (&(sin, cos), &y) in trig.iter().zip(amplitudes) {
        // cos/sin of ω(t - τ) via angle differences
        let cos_shifted = cos * cos_wtau + sin * sin_wtau;
        let sin_shifted = sin * cos_wtau - cos * sin_wtau;
        c += y * cos_shifted;
        s += y * sin_shifted;
        cc += cos_shifted * cos_shifted;
        ss += sin_shifted * sin_shifted;
    }

    // Cc + Ss = n exactly; anything within rounding of zero is a zero
    // denominator.
    let floor = times.len() as f64 * f64::EPSILON;
    if cc <= floor || ss <= floor {
        return 0.0;
    }
    0.5 * (c * c / cc + s * s / ss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;
    use proptest::prelude::*;

    /// Uneven, deterministic sampling of `f(t)`.
    fn series(n: usize, f: impl Fn(f64) -> f64) -> SampleSet {
        SampleSet::from_samples((0..n).map(|i| {
            let t = i as f64 + 0.37 * (1.3 * i as f64).sin();
            Sample { amplitude: f(t), time: t }
        }))
    }

    /// Textbook evaluation with explicit tau and no time shift.
    fn reference_power(samples: &SampleSet, frequency: f64) -> f64 {
        let omega = TAU * frequency;
        let (s2, c2) = samples.times().fold((0.0, 0.0), |(s, c), t| {
            (s + (2.0 * omega * t).sin(), c + (2.0 * omega * t).cos())
        });
        let tau = s2.atan2(c2) / (2.0 * omega);
        let (mut c, mut s, mut cc, mut ss) = (0.0, 0.0, 0.0, 0.0);
        for sample in samples.samples() {
            let arg = omega * (sample.time - tau);
            c += sample.amplitude * arg.cos();
            s += sample.amplitude * arg.sin();
            cc += arg.cos().powi(2);
            ss += arg.sin().powi(2);
        }
        0.5 * (c * c / cc + s * s / ss)
    }

    #[test]
    fn empty_samples_are_rejected() {
        let grid = FrequencyGrid::new(0.1, 1.0, 10).unwrap();
        let err = compute(&SampleSet::default(), &grid, EngineOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn matches_reference_formula() {
        let samples = series(60, |t| 1.5 * (TAU * 0.2 * t).cos() + 0.3 * (TAU * 0.07 * t).sin());
        let grid = FrequencyGrid::new(0.01, 0.6, 40).unwrap();
        let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
        for point in result.points() {
            let expected = reference_power(&samples, point.frequency);
            let tolerance = 1e-9 * expected.abs().max(1.0);
            assert!(
                (point.power - expected).abs() < tolerance,
                "f={} got {} expected {}",
                point.frequency,
                point.power,
                expected
            );
        }
    }

    #[test]
    fn peak_at_signal_frequency() {
        let samples = series(200, |t| (TAU * 0.25 * t).sin());
        let grid = FrequencyGrid::new(0.05, 0.45, 41).unwrap();
        let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
        let peak = result.peak().unwrap();
        assert!((peak.frequency - 0.25).abs() < 1e-9, "peak at {}", peak.frequency);
        // A pure sinusoid of unit amplitude gives roughly N/4 at its frequency
        assert!((peak.power - 50.0).abs() < 5.0, "peak power {}", peak.power);
    }

    #[test]
    fn degenerate_frequency_yields_zero() {
        // A single sample sits at the centred origin, so Σ sin² ω(t-τ) is exactly 0
        let samples = SampleSet::from_samples([Sample { amplitude: 2.5, time: 7.0 }]);
        let grid = FrequencyGrid::new(0.5, 3.0, 6).unwrap();
        let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
        assert_eq!(result.len(), 6);
        assert!(result.points().iter().all(|p| p.power == 0.0));
    }

    #[test]
    fn evenly_spaced_nyquist_and_alias_yield_zero() {
        // Integer times put every sample on a node of sin ω(t-τ) at f = 0.5
        // and f = 1.0, so Ss vanishes up to rounding.
        for n in [2usize, 3, 4, 8, 10, 101] {
            let samples = SampleSet::from_samples(
                (0..n).map(|i| Sample { amplitude: 1.0 + i as f64, time: i as f64 }),
            );
            let grid = FrequencyGrid::new(0.5, 1.0, 2).unwrap();
            let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
            for point in result.points() {
                assert_eq!(point.power, 0.0, "n={n} f={}", point.frequency);
            }
        }
    }

    #[test]
    fn huge_times_stay_finite() {
        // The plain sum of these times overflows
        let same_sign = SampleSet::from_samples([
            Sample { amplitude: 1.0, time: 1.0e308 },
            Sample { amplitude: 2.0, time: 1.5e308 },
        ]);
        // The mean is finite but -1.7e308 minus it is not
        let wide = SampleSet::from_samples([
            Sample { amplitude: 1.0, time: -1.7e308 },
            Sample { amplitude: 2.0, time: 1.7e308 },
            Sample { amplitude: 0.5, time: 1.7e308 },
        ]);
        let grid = FrequencyGrid::new(1.0e-300, 2.0e-300, 3).unwrap();
        for samples in [same_sign, wide] {
            let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
            for point in result.points() {
                assert!(point.power.is_finite() && point.power >= 0.0, "power {}", point.power);
            }
        }
    }

    #[test]
    fn single_point_grid() {
        let samples = series(20, |t| t.cos());
        let grid = FrequencyGrid::new(2.0, 0.0, 1).unwrap();
        let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.points()[0].frequency, 2.0);
    }

    #[test]
    fn normalization_divides_by_variance() {
        let samples = series(50, |t| 3.0 + (TAU * 0.1 * t).sin());
        let grid = FrequencyGrid::new(0.02, 0.4, 20).unwrap();
        let raw = compute(&samples, &grid, EngineOptions::default()).unwrap();
        let normalized = compute(
            &samples,
            &grid,
            EngineOptions {
                normalize: true,
                ..Default::default()
            },
        )
        .unwrap();
        let variance = samples.variance().unwrap();
        for (r, n) in raw.points().iter().zip(normalized.points()) {
            assert_eq!(n.power, r.power / variance);
        }
    }

    #[test]
    fn normalization_of_constant_series_fails() {
        let samples = series(10, |_| 4.0);
        let grid = FrequencyGrid::new(0.1, 0.4, 4).unwrap();
        let options = EngineOptions {
            normalize: true,
            ..Default::default()
        };
        assert!(matches!(
            compute(&samples, &grid, options),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn parallel_matches_sequential_bit_for_bit() {
        let samples = series(300, |t| (TAU * 0.31 * t).cos() + 0.5 * (TAU * 0.12 * t).sin());
        let grid = FrequencyGrid::new(0.001, 0.5, PARALLEL_MIN_POINTS + 17).unwrap();
        let sequential = compute(&samples, &grid, EngineOptions::default()).unwrap();
        let parallel = compute(
            &samples,
            &grid,
            EngineOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.points().iter().zip(parallel.points()) {
            assert_eq!(a.frequency.to_bits(), b.frequency.to_bits());
            assert_eq!(a.power.to_bits(), b.power.to_bits());
        }
    }

    fn arb_samples() -> impl Strategy<Value = SampleSet> {
        prop::collection::vec((-1.0e3..1.0e3f64, -1.0e4..1.0e4f64), 1..40).prop_map(|pairs| {
            SampleSet::from_samples(
                pairs
                    .into_iter()
                    .map(|(amplitude, time)| Sample { amplitude, time }),
            )
        })
    }

    proptest! {
        #[test]
        fn result_follows_grid(
            samples in arb_samples(),
            start in 1.0e-3..10.0f64,
            width in 1.0e-3..10.0f64,
            count in 1usize..64,
        ) {
            let grid = FrequencyGrid::new(start, start + width, count).unwrap();
            let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
            let frequencies = grid.frequencies();
            prop_assert_eq!(result.len(), count);
            for (point, f) in result.points().iter().zip(&frequencies) {
                prop_assert_eq!(point.frequency, *f);
            }
        }

        #[test]
        fn power_is_non_negative(
            samples in arb_samples(),
            start in 1.0e-3..10.0f64,
            count in 1usize..64,
        ) {
            let grid = FrequencyGrid::new(start, start * 3.0, count).unwrap();
            let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
            for point in result.points() {
                prop_assert!(point.power >= 0.0, "negative power {} at {}", point.power, point.frequency);
            }
        }

        #[test]
        fn repeated_calls_are_identical(samples in arb_samples(), count in 1usize..32) {
            let grid = FrequencyGrid::new(0.05, 2.0, count).unwrap();
            let first = compute(&samples, &grid, EngineOptions::default()).unwrap();
            let second = compute(&samples, &grid, EngineOptions::default()).unwrap();
            for (a, b) in first.points().iter().zip(second.points()) {
                prop_assert_eq!(a.power.to_bits(), b.power.to_bits());
            }
        }
    }
}
