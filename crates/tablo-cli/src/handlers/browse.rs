use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use tablo_adapters::StaticAdapter;
use tablo_runtime::{BrowserConfig, StatusHandler};
use tablo_types::FieldPath;

use crate::args::OutputFormat;
use crate::config::{DashboardConfig, infer_fields, load_records};

pub async fn handle(
    config_path: &Path,
    data_override: Option<&Path>,
    format: OutputFormat,
    no_tui: bool,
    route: &str,
) -> Result<()> {
    let dashboard = DashboardConfig::load(config_path)?;

    let data_path = match data_override {
        Some(path) => path.to_path_buf(),
        None => {
            let relative = dashboard
                .data
                .clone()
                .context("config declares no data file; pass --data")?;
            config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(relative)
        }
    };

    let records = load_records(&data_path)?;
    if records.is_empty() && dashboard.fields.is_empty() {
        bail!(
            "{}: no records and no declared fields; nothing to show",
            data_path.display()
        );
    }

    let fields = if dashboard.fields.is_empty() {
        infer_fields(&records)
    } else {
        dashboard.field_specs()
    };

    let adapter = Arc::new(StaticAdapter::new(dashboard.endpoint.clone(), records));

    let mut config = BrowserConfig::new(fields).filters(dashboard.filter_specs());
    if let Some(board) = dashboard.board_spec() {
        let group_by = board.group_by.clone();
        let handler: StatusHandler = {
            let adapter = adapter.clone();
            Arc::new(move |change| {
                let adapter = adapter.clone();
                let group_by: FieldPath = group_by.clone();
                Box::pin(async move {
                    let value = serde_json::to_value(&change.to)?;
                    adapter
                        .set_field(&change.id, &group_by, value)
                        .map_err(anyhow::Error::new)
                })
            })
        };
        config = config.board(board).on_status_change(handler);
    }

    super::run_dashboard(adapter, config, dashboard.per_page, format, no_tui, route).await
}
