use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::data::loader::load_file;
use crate::data::model::{FrequencyGrid, PeriodogramPoint, PeriodogramResult, SampleSet};
use crate::data::writer::write_periodogram;
use crate::error::{Error, Result};
use crate::periodogram::compute;
use crate::render::Renderer;

// ---------------------------------------------------------------------------
// Per-file pipeline
// ---------------------------------------------------------------------------

/// Everything computed for one input: its samples, the grid used and the
/// resulting periodogram.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub samples: SampleSet,
    pub grid: FrequencyGrid,
    pub result: PeriodogramResult,
}

/// Load → grid → engine for a single file, no output written.
pub fn analyze(config: &Config, path: &Path) -> Result<Analysis> {
    let samples = load_file(path)?;
    let grid = config.grid_for(&samples)?;
    let result = compute(&samples, &grid, config.engine_options())?;
    Ok(Analysis {
        samples,
        grid,
        result,
    })
}

/// Artifacts written for a successfully processed file.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub dat_path: PathBuf,
    pub png_path: Option<PathBuf>,
    pub sample_count: usize,
    pub peak: Option<PeriodogramPoint>,
}

#[derive(Debug)]
pub enum FileStatus {
    Processed(ProcessedFile),
    Failed(Error),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Processed(_))
    }
}

/// Outcome of every file the batch looked at, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Failed(e) => Some((o.input.as_path(), e)),
            FileStatus::Processed(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Batch driver
// ---------------------------------------------------------------------------

pub struct BatchDriver<'a> {
    config: &'a Config,
    renderer: &'a dyn Renderer,
}

impl<'a> BatchDriver<'a> {
    pub fn new(config: &'a Config, renderer: &'a dyn Renderer) -> Self {
        Self { config, renderer }
    }

    /// Matching regular files directly inside `input_dir`, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.input_dir;
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if path.is_file() && self.config.accepts(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// `(output_dir/<name>.dat, output_dir/<name>.png)` for input `<name>`.
    pub fn output_paths(&self, input: &Path) -> (PathBuf, PathBuf) {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out = &self.config.output_dir;
        (out.join(format!("{name}.dat")), out.join(format!("{name}.png")))
    }

    /// Run the full pipeline for one file and write its outputs.
    pub fn process_file(&self, input: &Path) -> Result<(ProcessedFile, Analysis)> {
        let analysis = analyze(self.config, input)?;
        let (dat_path, png_path) = self.output_paths(input);

        let png_path = if self.config.persist {
            let title = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.renderer
                .render(&analysis.samples, &analysis.result, &title, &png_path)?;
            log::info!("Saved PNG to >> {}", png_path.display());
            Some(png_path)
        } else {
            None
        };

        if let Err(e) = write_periodogram(&analysis.result, &dat_path) {
            // A failed file leaves no outputs
            if let Some(png) = &png_path {
                let _ = std::fs::remove_file(png);
            }
            return Err(e);
        }
        log::info!("Saved DAT to >> {}", dat_path.display());

        let processed = ProcessedFile {
            dat_path,
            png_path,
            sample_count: analysis.samples.len(),
            peak: analysis.result.peak(),
        };
        Ok((processed, analysis))
    }

    pub fn run(&self) -> Result<BatchReport> {
        self.run_with(|_, _| {})
    }

    /// Process every discovered file. `on_success` receives the analysis of
    /// each file that went through; failures are logged and recorded only.
    ///
    /// Errors only when the input directory cannot be listed or the output
    /// directory cannot be created.
    pub fn run_with<F>(&self, mut on_success: F) -> Result<BatchReport>
    where
        F: FnMut(&Path, Analysis),
    {
        let files = self.discover()?;
        let out = &self.config.output_dir;
        std::fs::create_dir_all(out).map_err(|e| Error::io(out, e))?;

        log::info!(
            "Batch started: {} file(s) in {}",
            files.len(),
            self.config.input_dir.display()
        );

        let mut report = BatchReport::default();
        for input in files {
            log::info!("Process >> {}", input.display());
            let status = match self.process_file(&input) {
                Ok((processed, analysis)) => {
                    match processed.peak {
                        Some(peak) => log::info!(
                            "Done >> {} ({} samples, peak power {:.6} at frequency {:.6})",
                            input.display(),
                            processed.sample_count,
                            peak.power,
                            peak.frequency
                        ),
                        None => log::info!("Done >> {}", input.display()),
                    }
                    on_success(&input, analysis);
                    FileStatus::Processed(processed)
                }
                Err(e) => {
                    log::error!("Cannot process >> {}: {e}", input.display());
                    FileStatus::Failed(e)
                }
            };
            report.outcomes.push(FileOutcome { input, status });
        }

        log::info!(
            "Batch finished: {} processed, {} failed",
            report.processed(),
            report.failed()
        );
        Ok(report)
    }
}
