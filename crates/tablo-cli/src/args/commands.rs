use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Explore the bundled CRM sample dashboard")]
    Demo,

    #[command(about = "Browse a collection described by a dashboard config")]
    Browse {
        /// Dashboard config (TOML) declaring fields, filters, and board
        #[arg(long, default_value = "tablo.toml")]
        config: PathBuf,

        /// Records file (JSON array); overrides the config's data path
        #[arg(long)]
        data: Option<PathBuf>,
    },
}
