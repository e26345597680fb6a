// NOTE: Command Organization Rationale
//
// Why a flat command set (not namespaced)?
// - tablo exposes two entry points (demo, browse); namespaces would be
//   ceremony without discoverability gain at this size
// - Global flags (--format, --view) apply uniformly to both

mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "tablo")]
#[command(about = "Browse resource collections as tables, lists, grids, and kanban boards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format for non-interactive rendering
    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Initial view mode (table, list, grid, board)
    #[arg(long, global = true)]
    pub view: Option<String>,

    /// Never start the interactive TUI, even on a terminal
    #[arg(long, global = true)]
    pub no_tui: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
