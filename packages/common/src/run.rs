use serde::{Deserialize, Serialize};

/// Hardware and OS descriptors taken from the first two lines of a capture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RunSpec {
    #[schema(example = "Arch Linux")]
    pub os: String,
    #[schema(example = "AMD Ryzen 7 5800X3D 8-Core Processor")]
    pub cpu: String,
    #[schema(example = "AMD Radeon RX 7900 XTX")]
    pub gpu: String,
    /// Humanized total RAM.
    #[schema(example = "17 GB")]
    pub ram: String,
    #[schema(example = "6.9.7-arch1-1")]
    pub kernel: String,
    #[schema(example = "scx_lavd")]
    pub scheduler: String,
}

/// One numeric telemetry column of a run, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Fps,
    FrameTime,
    CpuLoad,
    GpuLoad,
    CpuTemp,
    GpuTemp,
    GpuCoreClock,
    GpuMemClock,
    GpuVramUsed,
    GpuPower,
    RamUsed,
    SwapUsed,
}

impl Column {
    /// All columns, ordered as they appear in the CSV data section.
    pub const ALL: [Column; 12] = [
        Column::Fps,
        Column::FrameTime,
        Column::CpuLoad,
        Column::GpuLoad,
        Column::CpuTemp,
        Column::GpuTemp,
        Column::GpuCoreClock,
        Column::GpuMemClock,
        Column::GpuVramUsed,
        Column::GpuPower,
        Column::RamUsed,
        Column::SwapUsed,
    ];

    /// Human-readable name used in error messages and LLM prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Column::Fps => "FPS",
            Column::FrameTime => "Frame time",
            Column::CpuLoad => "CPU load",
            Column::GpuLoad => "GPU load",
            Column::CpuTemp => "CPU temp",
            Column::GpuTemp => "GPU temp",
            Column::GpuCoreClock => "GPU core clock",
            Column::GpuMemClock => "GPU mem clock",
            Column::GpuVramUsed => "GPU VRAM used",
            Column::GpuPower => "GPU power",
            Column::RamUsed => "RAM used",
            Column::SwapUsed => "Swap used",
        }
    }

    /// Column name in the CSV data header.
    pub fn header_name(self) -> &'static str {
        match self {
            Column::Fps => "fps",
            Column::FrameTime => "frametime",
            Column::CpuLoad => "cpu_load",
            Column::GpuLoad => "gpu_load",
            Column::CpuTemp => "cpu_temp",
            Column::GpuTemp => "gpu_temp",
            Column::GpuCoreClock => "gpu_core_clock",
            Column::GpuMemClock => "gpu_mem_clock",
            Column::GpuVramUsed => "gpu_vram_used",
            Column::GpuPower => "gpu_power",
            Column::RamUsed => "ram_used",
            Column::SwapUsed => "swap_used",
        }
    }
}

/// Telemetry captured by a single CSV file.
///
/// All twelve data columns always have the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BenchmarkRun {
    /// File name without its extension.
    #[schema(example = "lavd-defaults")]
    pub label: String,
    pub spec: RunSpec,

    pub fps: Vec<f64>,
    pub frame_time: Vec<f64>,
    pub cpu_load: Vec<f64>,
    pub gpu_load: Vec<f64>,
    pub cpu_temp: Vec<f64>,
    pub gpu_temp: Vec<f64>,
    pub gpu_core_clock: Vec<f64>,
    pub gpu_mem_clock: Vec<f64>,
    pub gpu_vram_used: Vec<f64>,
    pub gpu_power: Vec<f64>,
    pub ram_used: Vec<f64>,
    pub swap_used: Vec<f64>,
}

impl BenchmarkRun {
    /// Create an empty run whose columns are pre-sized for `capacity` samples.
    pub fn with_capacity(label: String, spec: RunSpec, capacity: usize) -> Self {
        Self {
            label,
            spec,
            fps: Vec::with_capacity(capacity),
            frame_time: Vec::with_capacity(capacity),
            cpu_load: Vec::with_capacity(capacity),
            gpu_load: Vec::with_capacity(capacity),
            cpu_temp: Vec::with_capacity(capacity),
            gpu_temp: Vec::with_capacity(capacity),
            gpu_core_clock: Vec::with_capacity(capacity),
            gpu_mem_clock: Vec::with_capacity(capacity),
            gpu_vram_used: Vec::with_capacity(capacity),
            gpu_power: Vec::with_capacity(capacity),
            ram_used: Vec::with_capacity(capacity),
            swap_used: Vec::with_capacity(capacity),
        }
    }

    pub fn column(&self, column: Column) -> &[f64] {
        match column {
            Column::Fps => &self.fps,
            Column::FrameTime => &self.frame_time,
            Column::CpuLoad => &self.cpu_load,
            Column::GpuLoad => &self.gpu_load,
            Column::CpuTemp => &self.cpu_temp,
            Column::GpuTemp => &self.gpu_temp,
            Column::GpuCoreClock => &self.gpu_core_clock,
            Column::GpuMemClock => &self.gpu_mem_clock,
            Column::GpuVramUsed => &self.gpu_vram_used,
            Column::GpuPower => &self.gpu_power,
            Column::RamUsed => &self.ram_used,
            Column::SwapUsed => &self.swap_used,
        }
    }

    pub fn column_mut(&mut self, column: Column) -> &mut Vec<f64> {
        match column {
            Column::Fps => &mut self.fps,
            Column::FrameTime => &mut self.frame_time,
            Column::CpuLoad => &mut self.cpu_load,
            Column::GpuLoad => &mut self.gpu_load,
            Column::CpuTemp => &mut self.cpu_temp,
            Column::GpuTemp => &mut self.gpu_temp,
            Column::GpuCoreClock => &mut self.gpu_core_clock,
            Column::GpuMemClock => &mut self.gpu_mem_clock,
            Column::GpuVramUsed => &mut self.gpu_vram_used,
            Column::GpuPower => &mut self.gpu_power,
            Column::RamUsed => &mut self.ram_used,
            Column::SwapUsed => &mut self.swap_used,
        }
    }

    /// Number of samples in the run.
    pub fn len(&self) -> usize {
        self.fps.len()
    }

    pub fn is_empty(&self) -> bool {
        Column::ALL.iter().all(|&c| self.column(c).is_empty())
    }

    /// Append one parsed sample row, keeping the columns parallel.
    pub(crate) fn push_sample(&mut self, values: &[f64; 12]) {
        for (column, value) in Column::ALL.iter().zip(values) {
            self.column_mut(*column).push(*value);
        }
    }
}
