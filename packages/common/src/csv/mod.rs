//! Decoder for MangoHud-style benchmark captures.
//!
//! A capture has three header sections followed by sample rows:
//!
//! ```text
//! os,cpu,gpu,ram,kernel,driver,cpuscheduler
//! Arch Linux,Ryzen 7 5800X3D,RX 7900 XTX,16777216,6.9.7-arch1-1,Mesa 24.3,scx_lavd
//! fps,frametime,cpu_load,gpu_load,cpu_temp,gpu_temp,gpu_core_clock,gpu_mem_clock,gpu_vram_used,gpu_power,ram_used,swap_used,process_rss,elapsed
//! 143.2,6.98,31,97,64,71,2650,1250,9.1,310,11.2,0,1.4,1000
//! ```

mod error;

use std::io::BufRead;

pub use error::ParseError;

use crate::format::{humanize_bytes, truncate};
use crate::run::{BenchmarkRun, Column, RunSpec};

/// A run is rejected once it reaches this many sample rows.
pub const MAX_SAMPLES: usize = 100_000;

const SPEC_COLUMNS: usize = 7;
const DATA_COLUMNS: usize = 14;

const ERR_MISSING_SPEC_HEADER: u8 = 1;
const ERR_SPEC_HEADER_WIDTH: u8 = 2;
const ERR_MISSING_SPEC_VALUES: u8 = 3;
const ERR_MISSING_DATA_HEADER: u8 = 5;
const ERR_DATA_HEADER_WIDTH: u8 = 6;
const ERR_SAMPLE_WIDTH: u8 = 7;

/// One file from a multipart upload.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Decoded upload: one run per file, plus the spec used for the benchmark row.
#[derive(Debug)]
pub struct ParsedUpload {
    pub runs: Vec<BenchmarkRun>,
    /// Spec of the last file processed.
    pub spec: RunSpec,
}

/// Decode every file of an upload, failing on the first invalid one.
pub fn parse_uploads(files: &[UploadedFile]) -> Result<ParsedUpload, ParseError> {
    let mut runs = Vec::with_capacity(files.len());
    let mut capacity_hint = 0;

    for file in files {
        let run = parse_run(&file.name, file.data.as_slice(), capacity_hint)?;
        tracing::debug!(file = %file.name, samples = run.len(), "Parsed benchmark run");
        capacity_hint = capacity_hint.max(run.len());
        runs.push(run);
    }

    let spec = runs.last().map(|run| run.spec.clone()).unwrap_or_default();
    Ok(ParsedUpload { runs, spec })
}

/// Decode a single capture.
///
/// `capacity_hint` pre-sizes the column buffers, typically the longest run
/// seen so far in the same upload.
pub fn parse_run<R: BufRead>(
    file_name: &str,
    reader: R,
    capacity_hint: usize,
) -> Result<BenchmarkRun, ParseError> {
    let mut lines = reader.lines();

    let spec_header =
        next_line(&mut lines)?.ok_or(ParseError::Invalid(ERR_MISSING_SPEC_HEADER))?;
    if header_width(&spec_header) != SPEC_COLUMNS {
        return Err(ParseError::Invalid(ERR_SPEC_HEADER_WIDTH));
    }

    let spec_values =
        next_line(&mut lines)?.ok_or(ParseError::Invalid(ERR_MISSING_SPEC_VALUES))?;
    let spec = parse_spec(&spec_values)?;

    let data_header =
        next_line(&mut lines)?.ok_or(ParseError::Invalid(ERR_MISSING_DATA_HEADER))?;
    if header_width(&data_header) != DATA_COLUMNS {
        return Err(ParseError::Invalid(ERR_DATA_HEADER_WIDTH));
    }

    let mut run = BenchmarkRun::with_capacity(label_from_file_name(file_name), spec, capacity_hint);
    let mut row = [0.0; 12];
    let mut samples = 0;

    for line in lines {
        let line = line?;
        if line.split(',').count() != DATA_COLUMNS {
            return Err(ParseError::Invalid(ERR_SAMPLE_WIDTH));
        }

        for ((slot, column), token) in row.iter_mut().zip(Column::ALL).zip(line.split(',')) {
            *slot = parse_value(column, token)?;
        }
        run.push_sample(&row);

        samples += 1;
        if samples == MAX_SAMPLES {
            return Err(ParseError::TooLarge);
        }
    }

    if run.is_empty() {
        return Err(ParseError::Empty);
    }

    Ok(run)
}

/// Strip the capture extension and bound the label length.
pub fn label_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".csv")
        .or_else(|| file_name.strip_suffix(".htm"))
        .unwrap_or(file_name);
    truncate(stem)
}

fn next_line<I>(lines: &mut I) -> Result<Option<String>, ParseError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    Ok(lines.next().transpose()?)
}

/// Column count of a header line; trailing commas are tolerated.
fn header_width(line: &str) -> usize {
    line.trim_end_matches(',').split(',').count()
}

fn parse_spec(line: &str) -> Result<RunSpec, ParseError> {
    let mut spec = RunSpec::default();

    for (i, value) in line.split(',').enumerate() {
        let value = value.trim();
        match i {
            0 => spec.os = truncate(value),
            1 => spec.cpu = truncate(value),
            2 => spec.gpu = truncate(value),
            3 => spec.ram = parse_ram(value)?,
            4 => spec.kernel = truncate(value),
            // 5 is the driver, which is not kept.
            6 => spec.scheduler = truncate(value),
            _ => {}
        }
    }

    Ok(spec)
}

/// Convert a kilobyte count of any length into a humanized byte size.
fn parse_ram(value: &str) -> Result<String, ParseError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidRam(value.to_string()));
    }

    // Digits only, so the sole failure mode is overflow.
    let kilobytes = digits.parse::<u128>().unwrap_or(u128::MAX);
    let bytes = u64::try_from(kilobytes.saturating_mul(1024)).unwrap_or(u64::MAX);
    Ok(humanize_bytes(bytes))
}

fn parse_value(column: Column, token: &str) -> Result<f64, ParseError> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidValue {
            field: column.display_name(),
            value: token.to_string(),
        })
}
