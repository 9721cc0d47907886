/// Figure rendering behind a small trait so the batch driver never touches a
/// drawing backend directly.

pub mod png;

use std::path::Path;

use crate::data::model::{PeriodogramResult, SampleSet};
use crate::error::Result;

pub use png::PngRenderer;

/// Turns one file's samples and periodogram into an image on disk.
///
/// Implementations own their drawing context for the duration of a call; no
/// figure state survives between calls.
pub trait Renderer {
    fn render(
        &self,
        samples: &SampleSet,
        result: &PeriodogramResult,
        title: &str,
        out: &Path,
    ) -> Result<()>;
}
