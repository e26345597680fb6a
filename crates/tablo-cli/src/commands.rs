use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::handlers;

pub async fn run(cli: Cli) -> Result<()> {
    let route = match cli.view.as_deref() {
        Some(mode) => format!("view={}", mode),
        None => String::new(),
    };

    match cli.command {
        Some(Commands::Demo) | None => {
            handlers::demo::handle(cli.format, cli.no_tui, &route).await
        }
        Some(Commands::Browse { config, data }) => {
            handlers::browse::handle(&config, data.as_deref(), cli.format, cli.no_tui, &route)
                .await
        }
    }
}
