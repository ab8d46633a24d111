//! Re-export of stored runs as a ZIP of CSV captures.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::run::{BenchmarkRun, Column};

const SPEC_HEADER: &str = "os,cpu,gpu,ram,kernel,driver,cpuscheduler";
const TRAILING_HEADERS: &str = "process_rss,elapsed";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create file in zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("could not write CSV data: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a deflated ZIP holding one `<label>.csv` per run.
///
/// Repeated labels get a ` (n)` suffix so every entry name is unique.
pub fn export_zip(runs: &[BenchmarkRun]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::new();

    for run in runs {
        let name = unique_name(&run.label, &mut used);
        writer.start_file(name, options)?;
        writer.write_all(render_csv(run).as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

fn unique_name(label: &str, used: &mut HashSet<String>) -> String {
    let label = entry_stem(label);
    let mut name = format!("{label}.csv");
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{label} ({n}).csv");
        n += 1;
    }
    name
}

/// Final path component of a label, so entries always land at the archive root.
fn entry_stem(label: &str) -> &str {
    match label.rsplit(['/', '\\']).next().unwrap_or_default() {
        "" | "." | ".." => "run",
        stem => stem,
    }
}

/// Render a run in the capture layout accepted by the upload parser.
pub fn render_csv(run: &BenchmarkRun) -> String {
    let spec = &run.spec;
    let mut out = String::with_capacity(run.len() * 96 + 512);

    out.push_str(SPEC_HEADER);
    out.push('\n');
    let _ = writeln!(
        out,
        "{},{},{},{},{},,{}",
        spec.os, spec.cpu, spec.gpu, spec.ram, spec.kernel, spec.scheduler
    );

    for column in Column::ALL {
        out.push_str(column.header_name());
        out.push(',');
    }
    out.push_str(TRAILING_HEADERS);
    out.push('\n');

    for i in 0..run.len() {
        for column in Column::ALL {
            let value = run.column(column).get(i).copied().unwrap_or(0.0);
            let _ = write!(out, "{value:.4},");
        }
        out.push_str("0,0\n");
    }

    out
}
