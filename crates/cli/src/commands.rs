use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Where settings come from.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    #[arg(long, default_value = "config", help = "Directory holding config.json and mapping.json")]
    pub config_dir: PathBuf,

    #[arg(long, help = "Optional .env file with SQL2DOC_* overrides")]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the source table into the destination collection and build its indexes
    Migrate {
        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(long, help = "Number of concurrent workers")]
        workers: Option<usize>,

        #[arg(long, help = "Upper bound for documents per bulk insert")]
        batch_size: Option<usize>,

        #[arg(long, help = "Emit a progress line every N records")]
        report_threshold: Option<u64>,

        #[arg(long, help = "Cancel the run after this many seconds")]
        timeout: Option<u64>,

        #[arg(
            long,
            help = "If specified, writes the JSON summary to this file instead of stdout"
        )]
        summary: Option<PathBuf>,
    },
    /// Connect to one side of the migration and ping it
    TestConn {
        /// Target: "mysql" or "mongodb"
        #[arg(long)]
        target: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Count source records and show how a run would split them
    Plan {
        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(long, help = "Number of concurrent workers")]
        workers: Option<usize>,

        #[arg(long, help = "Upper bound for documents per bulk insert")]
        batch_size: Option<usize>,
    },
}
