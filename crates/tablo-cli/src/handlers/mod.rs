pub mod browse;
pub mod demo;

use std::sync::Arc;

use is_terminal::IsTerminal;

use anyhow::Result;

use tablo_adapters::StaticAdapter;
use tablo_runtime::{Browser, BrowserConfig, ConsoleNotifier, RecordingNotifier};
use tablo_types::ViewMode;

use crate::args::OutputFormat;
use crate::presentation::components::BrowserComponent;
use crate::presentation::console::{
    render_board_plain, render_collection_json, render_collection_plain,
};
use crate::presentation::presenters::{present_board, present_collection};
use crate::tui;

/// Shared tail of every handler: interactive TUI on a terminal,
/// plain/JSON console output otherwise.
pub(crate) async fn run_dashboard(
    adapter: Arc<StaticAdapter>,
    config: BrowserConfig,
    per_page: Option<u64>,
    format: OutputFormat,
    no_tui: bool,
    route: &str,
) -> Result<()> {
    let interactive =
        format == OutputFormat::Plain && !no_tui && std::io::stdout().is_terminal();

    if interactive {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut browser = Browser::new(adapter, config, route, notifier.clone());
        if let Some(per_page) = per_page {
            browser.set_per_page(per_page);
        }
        let mut component = BrowserComponent::new(browser, notifier);
        return tui::run_component(&mut component).await;
    }

    let mut browser = Browser::new(adapter, config, route, Arc::new(ConsoleNotifier::new()));
    if let Some(per_page) = per_page {
        browser.set_per_page(per_page);
    }
    browser.sync();
    wait_settled(&browser).await;

    let records = browser.visible();
    let snapshot = browser.snapshot();
    let collection = present_collection(
        browser.endpoint(),
        browser.query(),
        browser.sort(),
        &browser.config().fields,
        &records,
        &snapshot,
        browser.config().has_edit_form,
        browser.config().card_render.as_ref(),
    );

    match format {
        // JSON ignores the view mode: always the complete view model.
        OutputFormat::Json => {
            println!("{}", render_collection_json(&collection)?);
        }
        OutputFormat::Plain => {
            if browser.view_mode() == ViewMode::Board
                && let Some(board_spec) = browser.config().board.clone()
            {
                let board = present_board(
                    &board_spec,
                    &records,
                    None,
                    &snapshot,
                    &browser.config().fields,
                    browser.config().card_render.as_ref(),
                );
                print!("{}", render_board_plain(&board));
            } else {
                print!("{}", render_collection_plain(&collection));
            }
        }
    }
    Ok(())
}

async fn wait_settled(browser: &Browser<StaticAdapter>) {
    let mut rx = browser.subscribe();
    loop {
        let snapshot = browser.snapshot();
        if !snapshot.loading && snapshot.key.is_some() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
