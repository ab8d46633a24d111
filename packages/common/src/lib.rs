pub mod csv;
pub mod export;
pub mod format;
pub mod run;
pub mod stats;
pub mod storage;

pub use run::{BenchmarkRun, Column, RunSpec};
pub use stats::ColumnStats;
