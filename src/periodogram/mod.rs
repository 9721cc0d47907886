/// Periodogram core: frequency grids and the Lomb-Scargle engine.
///
/// ```text
///   SampleSet ──┐
///               ├──► engine::compute ──► PeriodogramResult
///   FrequencyGrid ┘        ▲
///        ▲                 │ EngineOptions (normalize, parallel)
///   grid::generate / grid::auto_grid
/// ```

pub mod engine;
pub mod grid;

pub use engine::{compute, EngineOptions};
