use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{FrequencyGrid, SampleSet};
use crate::error::{Error, Result};
use crate::periodogram::{grid, EngineOptions};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lomb.json";

pub const DEFAULT_FREQUENCY_START: f64 = 0.01;
pub const DEFAULT_FREQUENCY_END: f64 = 4.0;
pub const DEFAULT_FREQUENCY_COUNT: usize = 1000;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything a batch run needs. Missing JSON keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lower bound of the frequency grid (> 0).
    pub frequency_start: f64,
    /// Upper bound of the frequency grid (> start).
    pub frequency_end: f64,
    /// Number of grid points (>= 1).
    pub frequency_count: usize,
    /// Divide power by the amplitude variance.
    pub normalize: bool,
    /// Open the result viewer after the batch.
    pub display: bool,
    /// Write the PNG figure next to the numeric output.
    pub persist: bool,

    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Extensions (without dot, case-insensitive) picked up from `input_dir`.
    pub input_extensions: Vec<String>,

    /// Derive the grid from each file's sampling instead of the fixed bounds.
    pub auto_grid: bool,
    pub samples_per_peak: f64,
    pub nyquist_factor: f64,

    /// Evaluate large grids on all cores.
    pub parallel: bool,

    pub image_width: u32,
    pub image_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency_start: DEFAULT_FREQUENCY_START,
            frequency_end: DEFAULT_FREQUENCY_END,
            frequency_count: DEFAULT_FREQUENCY_COUNT,
            normalize: false,
            display: false,
            persist: true,
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
            input_extensions: vec!["dat".to_string()],
            auto_grid: false,
            samples_per_peak: 5.0,
            nyquist_factor: 5.0,
            parallel: false,
            image_width: 1280,
            image_height: 960,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// `path` if given, else `lomb.json` when present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.auto_grid {
            FrequencyGrid::new(self.frequency_start, self.frequency_end, self.frequency_count)
                .map_err(|e| Error::Config(e.to_string()))?;
        } else {
            if !(self.samples_per_peak.is_finite() && self.samples_per_peak > 0.0) {
                return Err(Error::Config(format!(
                    "samples_per_peak must be > 0, got {}",
                    self.samples_per_peak
                )));
            }
            if !(self.nyquist_factor.is_finite() && self.nyquist_factor > 0.0) {
                return Err(Error::Config(format!(
                    "nyquist_factor must be > 0, got {}",
                    self.nyquist_factor
                )));
            }
        }
        if self.input_extensions.is_empty() {
            return Err(Error::Config("input_extensions must not be empty".into()));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(Error::Config(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    /// Grid to evaluate `samples` on.
    pub fn grid_for(&self, samples: &SampleSet) -> Result<FrequencyGrid> {
        if self.auto_grid {
            grid::auto_grid(samples, self.samples_per_peak, self.nyquist_factor)
        } else {
            FrequencyGrid::new(self.frequency_start, self.frequency_end, self.frequency_count)
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            normalize: self.normalize,
            parallel: self.parallel,
        }
    }

    /// Whether `path` has one of the configured input extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.input_extensions
                    .iter()
                    .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
