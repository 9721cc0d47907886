use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::model::PeriodogramResult;
use crate::error::{Error, Result};

/// Write `frequency<TAB>power` rows, newline-terminated, no header.
///
/// The rows go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written file.
pub fn write_periodogram(result: &PeriodogramResult, path: &Path) -> Result<()> {
    write_atomically(path, |file| {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));
        for point in result.points() {
            writer
                .write_record([point.frequency.to_string(), point.power.to_string()])
                .map_err(csv_to_io)?;
        }
        writer.flush()
    })
}

/// Run `fill` against a temporary file next to `path`, then rename it over
/// `path`. On any failure the temporary file is removed.
pub fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let tmp = temp_path(path);
    let outcome = File::create(&tmp)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    outcome.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::io(path, e)
    })
}

/// `<dir>/.<file name>.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn csv_to_io(e: csv::Error) -> std::io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(err) => err,
        kind => std::io::Error::new(std::io::ErrorKind::Other, format!("{kind:?}")),
    }
}
