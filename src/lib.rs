//! Batch Lomb-Scargle periodograms for unevenly sampled time series.
//!
//! Each input file is loaded into a [`data::model::SampleSet`], evaluated on a
//! [`data::model::FrequencyGrid`] by [`periodogram::compute`], and written out
//! as a `frequency\tpower` table plus a two-panel PNG. [`batch::BatchDriver`]
//! runs that pipeline over a directory and keeps one file's failure from
//! affecting the others.

pub mod app;
pub mod batch;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod periodogram;
pub mod render;
pub mod state;
pub mod ui;

pub use error::{Error, Result};
