use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, Float32Array, Float64Array};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;

use super::model::{Sample, SampleSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Row-level parse failures (recovered locally)
// ---------------------------------------------------------------------------

/// Why a single row was dropped. Never escapes the loader.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),
    #[error("'{0}' is not a finite number")]
    NotANumber(String),
    #[error("unreadable row: {0}")]
    Malformed(String),
}

/// Samples read from one source plus the number of rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedSamples {
    pub samples: SampleSet,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the samples of one input file. Dispatch by extension.
///
/// Supported formats:
/// * `.dat` / `.tsv` / `.txt` – `amplitude<TAB>time` rows, no header
/// * `.csv`     – `amplitude,time` rows, no header
/// * `.json`    – `[{ "amplitude": .., "time": .. }, ...]` or `[[amplitude, time], ...]`
/// * `.parquet` – `amplitude` and `time` float columns
///
/// Malformed rows are dropped. A file left with no valid sample at all is
/// rejected here rather than handed to the engine.
pub fn load_file(path: &Path) -> Result<SampleSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "dat" | "tsv" | "txt" => load_delimited(path, b'\t'),
        "csv" => load_delimited(path, b','),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(Error::invalid(format!("unsupported file extension: .{other}"))),
    }?;

    if parsed.skipped > 0 {
        log::warn!(
            "{}: skipped {} malformed row(s)",
            path.display(),
            parsed.skipped
        );
    }
    if parsed.samples.is_empty() {
        return Err(Error::invalid(format!(
            "no valid samples in {}",
            path.display()
        )));
    }
    Ok(parsed.samples)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<ParsedSamples> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_delimited(file, delimiter, path)
}

/// Parse `amplitude<delim>time` rows. `origin` only labels errors and logs.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<ParsedSamples> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let row = match result {
            Ok(record) => parse_row(&record),
            Err(e) => match e.into_kind() {
                csv::ErrorKind::Io(source) => return Err(Error::io(origin, source)),
                kind => Err(ParseError::Malformed(format!("{kind:?}"))),
            },
        };
        match row {
            Ok(sample) => samples.push(sample),
            Err(reason) => {
                log::debug!("{}: row {row_no} dropped: {reason}", origin.display());
                skipped += 1;
            }
        }
    }

    Ok(ParsedSamples {
        samples: SampleSet::from_samples(samples),
        skipped,
    })
}

fn parse_row(record: &csv::StringRecord) -> std::result::Result<Sample, ParseError> {
    if record.len() != 2 {
        return Err(ParseError::FieldCount(record.len()));
    }
    Ok(Sample {
        amplitude: parse_field(&record[0])?,
        time: parse_field(&record[1])?,
    })
}

fn parse_field(field: &str) -> std::result::Result<f64, ParseError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::NotANumber(field.to_string()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<ParsedSamples> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let records = root
        .as_array()
        .ok_or_else(|| Error::invalid("expected a top-level JSON array"))?;

    let mut samples = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (i, rec) in records.iter().enumerate() {
        match json_sample(rec) {
            Some(sample) => samples.push(sample),
            None => {
                log::debug!("{}: entry {i} dropped", path.display());
                skipped += 1;
            }
        }
    }

    Ok(ParsedSamples {
        samples: SampleSet::from_samples(samples),
        skipped,
    })
}

fn json_sample(rec: &JsonValue) -> Option<Sample> {
    let (amplitude, time) = match rec {
        JsonValue::Object(obj) => (obj.get("amplitude")?, obj.get("time")?),
        JsonValue::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
        _ => return None,
    };
    Sample::new(amplitude.as_f64()?, time.as_f64()?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expects float `amplitude` and `time` columns; null cells drop the row.
fn load_parquet(path: &Path) -> Result<ParsedSamples> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut samples = Vec::new();
    let mut skipped = 0;

    for batch in reader {
        let batch = batch.map_err(|e| ParquetError::External(Box::new(e)))?;
        let schema = batch.schema();
        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx).clone())
                .map_err(|_| Error::invalid(format!("parquet file missing '{name}' column")))
        };

        let amplitudes = float_values(&column("amplitude")?)?;
        let times = float_values(&column("time")?)?;

        for (amplitude, time) in amplitudes.into_iter().zip(times) {
            match amplitude.zip(time).and_then(|(a, t)| Sample::new(a, t)) {
                Some(sample) => samples.push(sample),
                None => skipped += 1,
            }
        }
    }

    Ok(ParsedSamples {
        samples: SampleSet::from_samples(samples),
        skipped,
    })
}

/// Float64 or Float32 column as optional `f64`s (nulls → `None`).
fn float_values(col: &ArrayRef) -> Result<Vec<Option<f64>>> {
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.iter().collect())
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.iter().map(|v| v.map(f64::from)).collect())
    } else {
        Err(Error::invalid(format!(
            "column type is {:?}, expected Float64 or Float32",
            col.data_type()
        )))
    }
}
