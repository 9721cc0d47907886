use std::path::Path;

use crate::batch::{analyze, Analysis, BatchReport};
use crate::color::{generate_palette, Rgb};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// One analysed file shown in the viewer.
pub struct ViewerEntry {
    pub name: String,
    pub analysis: Analysis,
}

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Settings used for files opened from the viewer.
    pub config: Config,

    pub entries: Vec<ViewerEntry>,

    /// `(file name, reason)` for files the batch could not process.
    pub failures: Vec<(String, String)>,

    /// Index into `entries` of the file being plotted.
    pub selected: Option<usize>,

    /// One colour per entry, rebuilt when entries change.
    pub colors: Vec<Rgb>,

    /// Scale the displayed power to [0, 1].
    pub minmax_scaling: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entries: Vec::new(),
            failures: Vec::new(),
            selected: None,
            colors: Vec::new(),
            minmax_scaling: false,
            status_message: None,
        }
    }

    /// Append an analysed file and select it.
    pub fn add_entry(&mut self, name: String, analysis: Analysis) {
        self.entries.push(ViewerEntry { name, analysis });
        self.colors = generate_palette(self.entries.len());
        self.selected = Some(self.entries.len() - 1);
    }

    pub fn record_failures(&mut self, report: &BatchReport) {
        self.failures = report
            .failures()
            .map(|(path, err)| (file_name(path), err.to_string()))
            .collect();
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = Some(index);
        }
    }

    pub fn selected_entry(&self) -> Option<&ViewerEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    pub fn selected_color(&self) -> Option<Rgb> {
        self.selected.and_then(|i| self.colors.get(i).copied())
    }

    /// Analyse `path` with the current settings and add it to the list.
    pub fn open_path(&mut self, path: &Path) {
        match analyze(&self.config, path) {
            Ok(analysis) => {
                log::info!(
                    "Loaded {} samples from {}",
                    analysis.samples.len(),
                    path.display()
                );
                self.add_entry(file_name(path), analysis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            frequency_start: 0.05,
            frequency_end: 0.5,
            frequency_count: 10,
            ..Config::default()
        }
    }

    #[test]
    fn opening_files_selects_latest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.dat");
        let b = dir.path().join("b.dat");
        std::fs::write(&a, "1.0\t0.0\n2.0\t1.3\n0.5\t2.1\n").unwrap();
        std::fs::write(&b, "0.2\t0.0\n0.4\t0.7\n").unwrap();

        let mut state = AppState::new(config());
        state.open_path(&a);
        state.open_path(&b);

        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.colors.len(), 2);
        assert_eq!(state.selected, Some(1));
        assert_eq!(state.selected_entry().unwrap().name, "b.dat");
        assert_eq!(state.selected_entry().unwrap().analysis.result.len(), 10);

        state.select(0);
        assert_eq!(state.selected_entry().unwrap().name, "a.dat");
        state.select(7);
        assert_eq!(state.selected, Some(0));
    }

    #[test]
    fn failed_open_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.dat");
        std::fs::write(&bad, "not\tnumbers\n").unwrap();

        let mut state = AppState::new(config());
        state.open_path(&bad);
        assert!(state.entries.is_empty());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
