use clap::Parser;
use std::path::PathBuf;

/// Personal budget, habit and goal tracker.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct AppConfig {
    /// File path to the SQLite database holding the tracker data.
    #[arg(long = "data", env = "POCKET_DATA", default_value = "pocket_tracker.db")]
    pub data_path: PathBuf,

    /// Keep everything in memory and ignore `--data`. Nothing is written to disk.
    #[arg(long)]
    pub in_memory: bool,

    /// Directory that CSV exports are written to.
    #[arg(long, env = "POCKET_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Log level or filter directive, e.g. `debug` or `pocket=trace`.
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, env = "POCKET_LOG", default_value = "info")]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, env = "POCKET_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}
