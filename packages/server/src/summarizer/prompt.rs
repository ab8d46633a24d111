use std::fmt::Write as _;

use bench_common::{BenchmarkRun, Column, ColumnStats};

/// Instructions sent as the system message of every summary request.
pub const SYSTEM_MESSAGE: &str = r#"
You are given a summary of PC benchmark data. Your task is to provide conclusion and overview of the given data:

0. Your summary must consist of max 3 segments - "Highest and Smoothest FPS", "Anomalies" and "Summary".
1. Provide which run has the highest (average) fps and which has the smoothest fps (based on fps/frametime std.dev. and variance). Do not hesitate to mention multiple runs if they are incredibly similar. Also provide overall the best run. Try to understand which one has the best sweet "average" in terms of being smoothest and highest FPS.
2. Anomalies in the data (if any). For example, if all benchmarks uses the same hardware/software? Or of certain run has lower/higher FPS that correlates to higher/lower VRAM usage, core clock, mem clock, etc. Try to figure out why is it so, by looking ONLY at the provided data. Do NOT mention anything if it's not an anomaly.
3. If certain run had much worse FPS/Frametime than others, then exclude it from consideration in point 1. In point 2, try to figure out why it is so (first consider GPU VRAM, core clock, mem clock, then RAM/SWAP and other factors, while lastly CPU and GPU usage). If you can't figure out why, then just say so.
4. Point 3 must be your TOP priority. Do NOT provide any other information than requested.
5. You can mention labels in a natural way. E.g. you can call "lavd-defaults" just "LAVD" (if this makes sense).
6. Use bullet points for point 1 and 2. Use paragraph for point 3.
7. NEVER provide actual number or "higher/lower than". Instead, ALWAYS provide exact/approximate percentage in comparison to others.
8. NEVER guess the issue outside of the provided data. If you can't figure out why, then just say so.
9. ALWAYS mention in "anomalies" if certain run has correlation of higher/lower FPS with certain metrics (e.g. VRAM usage, core clock, mem clock, ram, swap, cpu, gpu). Only mention if there is significant correlation, at least 5 percent.
10. Provide an extended summary overview of all runs, but avoid repeating yourself of what you mentioned in point 1 and 2.

Do not provide numbers or visualize anything - user can already see charts.
"#;

/// Render the user message: benchmark metadata, then per run its spec
/// and one statistics line per telemetry column.
pub fn build_user_prompt(title: &str, description: &str, runs: &[BenchmarkRun]) -> String {
    let mut sb = String::new();

    let _ = write!(
        sb,
        "Benchmark title: {title}\nBenchmark description: \n{description}\n\n\
         Benchmark contains {} runs:\n",
        runs.len()
    );

    for run in runs {
        let spec = &run.spec;
        let _ = write!(
            sb,
            "\nLabel: {}\nOS: {}\nGPU: {}\nCPU: {}\nRAM: {}\nLinux kernel: {}\nLinux scheduler: {}\n",
            run.label, spec.os, spec.gpu, spec.cpu, spec.ram, spec.kernel, spec.scheduler
        );

        for column in Column::ALL {
            let mut values = run.column(column).to_vec();
            let stats = ColumnStats::compute(&mut values);
            let _ = writeln!(sb, "{}: {stats}", column.display_name());
        }
    }

    sb
}
