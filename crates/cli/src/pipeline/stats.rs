//! Conversion run statistics.

use std::path::PathBuf;
use std::time::Duration;

use contracts::WideTable;

/// Statistics from one conversion run
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    /// Number of input sources read
    pub sources: usize,

    /// Output frames written
    pub frames: usize,

    /// Output channels (markers or plate components)
    pub channels: usize,

    /// Cells with no honest value (written as blanks / NaN)
    pub invalid_cells: usize,

    /// Output sample rate in Hz
    pub rate_hz: f64,

    /// Total duration of the run
    pub duration: Duration,

    /// Files written
    pub outputs: Vec<PathBuf>,
}

impl ConversionStats {
    /// Collect table-shape statistics from the merged result
    pub fn from_table(table: &WideTable, sources: usize) -> Self {
        Self {
            sources,
            frames: table.num_frames(),
            channels: table.num_columns(),
            invalid_cells: table.invalid_cell_count(),
            rate_hz: table.timebase().rate_hz(),
            ..Default::default()
        }
    }

    /// Share of cells carrying no data, as a percentage
    pub fn invalid_rate(&self) -> f64 {
        let total = self.frames * self.channels;
        if total > 0 {
            (self.invalid_cells as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Conversion Statistics                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Sources: {}", self.sources);
        println!("   ├─ Frames: {}", self.frames);
        println!("   ├─ Channels: {}", self.channels);
        println!("   ├─ Rate: {} Hz", self.rate_hz);
        println!(
            "   └─ Missing cells: {} ({:.2}%)",
            self.invalid_cells,
            self.invalid_rate()
        );

        if !self.outputs.is_empty() {
            println!("\n📤 Outputs ({})", self.outputs.len());
            for (i, path) in self.outputs.iter().enumerate() {
                let prefix = if i == self.outputs.len() - 1 { "└─" } else { "├─" };
                println!("   {} {}", prefix, path.display());
            }
        }

        println!();
    }
}
