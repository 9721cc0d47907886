use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::Renderer;
use crate::color::{self, Rgb};
use crate::data::model::{PeriodogramResult, SampleSet};
use crate::data::writer::write_atomically;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Two-panel PNG figure (plotters bitmap backend)
// ---------------------------------------------------------------------------

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders the raw series on top and the periodogram below.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    width: u32,
    height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw into a fresh RGB buffer of `width * height * 3` bytes.
    ///
    /// Text goes through the system font stack. When no usable font is found
    /// the figure is redrawn without title, captions and tick labels.
    pub fn draw(&self, samples: &SampleSet, result: &PeriodogramResult, title: &str) -> Result<Vec<u8>> {
        self.draw_figure(samples, result, Some(title)).or_else(|e| {
            log::warn!("Drawing \"{title}\" without text: {e}");
            self.draw_figure(samples, result, None)
        })
    }

    /// `title = None` draws the series and axes only; no font is touched.
    fn draw_figure(
        &self,
        samples: &SampleSet,
        result: &PeriodogramResult,
        title: Option<&str>,
    ) -> Result<Vec<u8>> {
        let labels = title.is_some();
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let root = match title {
                Some(title) => root
                    .titled(title, ("sans-serif", 28).into_font())
                    .map_err(render_err)?,
                None => root,
            };

            let panels = root.split_evenly((2, 1));
            draw_samples(&panels[0], samples, labels)?;
            draw_periodogram(&panels[1], result, labels)?;

            root.present().map_err(render_err)?;
        }
        Ok(buffer)
    }
}

impl Renderer for PngRenderer {
    fn render(
        &self,
        samples: &SampleSet,
        result: &PeriodogramResult,
        title: &str,
        out: &Path,
    ) -> Result<()> {
        let buffer = self.draw(samples, result, title)?;
        let image = RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| Error::Render("pixel buffer does not match image size".into()))?;
        write_atomically(out, |file| {
            image
                .write_to(file, ImageFormat::Png)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
        })
    }
}

fn draw_samples(area: &Panel<'_>, samples: &SampleSet, labels: bool) -> Result<()> {
    let (t_min, t_max) = padded(samples.time_span());
    let (a_min, a_max) = padded(samples.amplitude_span());

    let mut builder = ChartBuilder::on(area);
    builder.margin(12);
    if labels {
        builder
            .caption("Samples", ("sans-serif", 22).into_font())
            .x_label_area_size(40)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(t_min..t_max, a_min..a_max)
        .map_err(render_err)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc("Amplitude")
            .draw()
            .map_err(render_err)?;
    } else {
        draw_frame(&chart)?;
    }

    let style = to_plotters(color::sample_color()).filled();
    chart
        .draw_series(
            samples
                .samples()
                .iter()
                .map(|s| Circle::new((s.time, s.amplitude), 3, style)),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_periodogram(area: &Panel<'_>, result: &PeriodogramResult, labels: bool) -> Result<()> {
    let points = result.points();
    let frequencies = points.first().zip(points.last()).map(|(a, b)| (a.frequency, b.frequency));
    let (f_min, f_max) = padded(frequencies);
    let p_max = match result.max_power() {
        Some(p) if p > 0.0 && p.is_finite() => p * 1.05,
        _ => 1.0,
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(12);
    if labels {
        builder
            .caption("Lomb-Scargle periodogram", ("sans-serif", 22).into_font())
            .x_label_area_size(40)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(f_min..f_max, 0.0..p_max)
        .map_err(render_err)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc("Frequency")
            .y_desc("Power")
            .draw()
            .map_err(render_err)?;
    } else {
        draw_frame(&chart)?;
    }

    let line_color = to_plotters(color::power_color());
    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.frequency, p.power)),
            line_color.stroke_width(2),
        ))
        .map_err(render_err)?;
    if points.len() == 1 {
        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p.frequency, p.power), 4, line_color.filled())),
            )
            .map_err(render_err)?;
    }
    Ok(())
}

type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Plot-area border standing in for the mesh when no font is available.
fn draw_frame(chart: &Chart<'_, '_>) -> Result<()> {
    let (x, y) = (chart.x_range(), chart.y_range());
    chart
        .plotting_area()
        .draw(&Rectangle::new(
            [(x.start, y.start), (x.end, y.end)],
            BLACK.stroke_width(1),
        ))
        .map_err(render_err)
}

/// Axis range with a 5% margin; collapsed or missing spans widen to ±1.
fn padded(span: Option<(f64, f64)>) -> (f64, f64) {
    match span {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => (v - 1.0, v + 1.0),
        None => (0.0, 1.0),
    }
}

fn to_plotters(c: Rgb) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FrequencyGrid, Sample};
    use crate::periodogram::{compute, EngineOptions};

    #[test]
    fn padding_widens_ranges() {
        assert_eq!(padded(Some((0.0, 10.0))), (-0.5, 10.5));
        assert_eq!(padded(Some((3.0, 3.0))), (2.0, 4.0));
        assert_eq!(padded(None), (0.0, 1.0));
    }

    fn sine_analysis() -> (SampleSet, PeriodogramResult) {
        let samples = SampleSet::from_samples(
            (0..50).map(|i| Sample { amplitude: (i as f64 * 0.7).sin(), time: i as f64 * 1.1 }),
        );
        let grid = FrequencyGrid::new(0.01, 0.5, 100).unwrap();
        let result = compute(&samples, &grid, EngineOptions::default()).unwrap();
        (samples, result)
    }

    #[test]
    fn text_free_figure_needs_no_font() {
        let (samples, result) = sine_analysis();
        let buffer = PngRenderer::new(320, 240)
            .draw_figure(&samples, &result, None)
            .unwrap();
        assert_eq!(buffer.len(), 320 * 240 * 3);
        // Something besides the white background was drawn
        assert!(buffer.iter().any(|&b| b != 255));
    }

    #[test]
    fn writes_a_png() {
        let (samples, result) = sine_analysis();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("figure.png");
        PngRenderer::new(640, 480)
            .render(&samples, &result, "figure", &out)
            .unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
