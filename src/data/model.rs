use std::fmt;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Sample – a single (amplitude, time) observation
// ---------------------------------------------------------------------------

/// One observation of the series. Both fields are finite by construction
/// (see [`Sample::new`]); times need not be sorted or unique.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub amplitude: f64,
    pub time: f64,
}

impl Sample {
    /// Returns `None` unless both values are finite reals.
    pub fn new(amplitude: f64, time: f64) -> Option<Self> {
        (amplitude.is_finite() && time.is_finite()).then_some(Sample { amplitude, time })
    }
}

// ---------------------------------------------------------------------------
// SampleSet – all valid samples of one input file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Keep only valid samples, preserving order.
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Self {
        SampleSet {
            samples: samples
                .into_iter()
                .filter(|s| s.amplitude.is_finite() && s.time.is_finite())
                .collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn amplitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.amplitude)
    }

    /// `(min, max)` of the sample times, `None` when empty.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        span(self.times())
    }

    /// `(min, max)` of the amplitudes, `None` when empty.
    pub fn amplitude_span(&self) -> Option<(f64, f64)> {
        span(self.amplitudes())
    }

    /// Population variance of the amplitudes: Σ(yᵢ−ȳ)² / n.
    pub fn variance(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f64;
        let mean = self.amplitudes().sum::<f64>() / n;
        Some(self.amplitudes().map(|y| (y - mean).powi(2)).sum::<f64>() / n)
    }
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ---------------------------------------------------------------------------
// FrequencyGrid – validated (start, end, count)
// ---------------------------------------------------------------------------

/// Linearly spaced frequencies over `[start, end]`.
///
/// For a single-point grid `end` is carried along but ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
    start: f64,
    end: f64,
    count: usize,
}

impl FrequencyGrid {
    pub fn new(start: f64, end: f64, count: usize) -> Result<Self> {
        if !start.is_finite() || start <= 0.0 {
            return Err(Error::invalid(format!(
                "frequency grid start must be a finite value > 0, got {start}"
            )));
        }
        if count == 0 {
            return Err(Error::invalid("frequency grid needs at least one point"));
        }
        if count > 1 && !(end.is_finite() && end > start) {
            return Err(Error::invalid(format!(
                "frequency grid end must be finite and greater than start ({start}), got {end}"
            )));
        }
        Ok(FrequencyGrid { start, end, count })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Materialise the grid frequencies.
    pub fn frequencies(&self) -> Vec<f64> {
        crate::periodogram::grid::generate(self.start, self.end, self.count)
    }
}

impl fmt::Display for FrequencyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{} (single point)", self.start)
        } else {
            write!(f, "{}..={} ({} points)", self.start, self.end, self.count)
        }
    }
}

// ---------------------------------------------------------------------------
// PeriodogramResult – engine output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodogramPoint {
    pub frequency: f64,
    pub power: f64,
}

/// Power per grid frequency, in grid order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodogramResult {
    points: Vec<PeriodogramPoint>,
}

impl PeriodogramResult {
    pub(crate) fn new(points: Vec<PeriodogramPoint>) -> Self {
        PeriodogramResult { points }
    }

    pub fn points(&self) -> &[PeriodogramPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point with the highest power (first one on ties).
    pub fn peak(&self) -> Option<PeriodogramPoint> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.power >= p.power => Some(b),
            _ => Some(p),
        })
    }

    pub fn max_power(&self) -> Option<f64> {
        self.peak().map(|p| p.power)
    }
}
