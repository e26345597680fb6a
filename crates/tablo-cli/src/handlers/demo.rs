use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use tablo_adapters::StaticAdapter;
use tablo_engine::BoardSpec;
use tablo_runtime::{BrowserConfig, StatusHandler};
use tablo_types::{CardRender, ColumnSpec, FieldPath, FieldSpec, FilterSpec, Key, Record};

use crate::args::OutputFormat;

/// Bundled CRM pipeline: enough shape to exercise every view: nested
/// grouping keys, a sparse column, and one lead whose stage matches no
/// declared column.
fn demo_records() -> Vec<Record> {
    let rows = [
        (1, "Acme Corp", "Dana", 12000, 1, "New", "2025-06-01T10:30:00Z"),
        (2, "Globex", "Lee", 8000, 1, "New", "2025-06-03T09:12:00Z"),
        (3, "Initech", "Dana", 23000, 2, "Qualified", "2025-05-21T16:45:00Z"),
        (4, "Umbrella", "Sam", 41000, 3, "Won", "2025-04-11T11:00:00Z"),
        (5, "Hooli", "Lee", 5000, 3, "Won", "2025-05-02T14:20:00Z"),
        (6, "Stark Industries", "Dana", 97000, 3, "Won", "2025-03-28T08:05:00Z"),
        (7, "Wayne Enterprises", "Sam", 64000, 99, "Archived", "2025-01-15T13:40:00Z"),
        (8, "Soylent", "Lee", 15500, 2, "Qualified", "2025-06-10T10:00:00Z"),
        (9, "Tyrell", "Sam", 88000, 1, "New", "2025-06-12T15:30:00Z"),
        (10, "Cyberdyne", "Dana", 27000, 2, "Qualified", "2025-05-30T12:10:00Z"),
        (11, "Wonka Industries", "Lee", 9900, 1, "New", "2025-06-14T09:55:00Z"),
        (12, "Gringotts", "Sam", 120000, 3, "Won", "2025-02-19T17:25:00Z"),
    ];
    rows.into_iter()
        .map(|(id, name, owner, value, stage_id, stage_name, created)| {
            Record::new(json!({
                "id": id,
                "name": name,
                "owner": {"name": owner},
                "value": value,
                "stage": {"id": stage_id, "name": stage_name},
                "created_at": created,
            }))
            .expect("demo lead is a valid record")
        })
        .collect()
}

fn demo_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", "Name").sortable().width(20),
        FieldSpec::new("owner.name", "Owner").width(8),
        FieldSpec::new("stage.name", "Stage").width(10),
        FieldSpec::new("value", "Value")
            .sortable()
            .width(10)
            .render(|record| {
                record
                    .text(&FieldPath::new("value"))
                    .map(|v| format!("${}", v))
                    .unwrap_or_default()
            }),
        FieldSpec::new("created_at", "Created")
            .sortable()
            .width(10)
            .render(|record| {
                record
                    .text(&FieldPath::new("created_at"))
                    .and_then(|raw| chrono::DateTime::parse_from_rfc3339(&raw).ok())
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            }),
    ]
}

fn demo_filters() -> Vec<FilterSpec> {
    vec![
        FilterSpec::new("stage.id", "Stage")
            .option("New", 1i64)
            .option("Qualified", 2i64)
            .option("Won", 3i64),
        FilterSpec::new("owner.name", "Owner")
            .option("Dana", "Dana")
            .option("Lee", "Lee")
            .option("Sam", "Sam"),
    ]
}

fn demo_board() -> BoardSpec {
    BoardSpec::new(
        vec![
            ColumnSpec::new(1i64, "New").color("cyan"),
            ColumnSpec::new(2i64, "Qualified").color("yellow"),
            ColumnSpec::new(3i64, "Won").color("green"),
        ],
        "stage.id",
    )
}

fn demo_card() -> CardRender {
    Arc::new(|record: &Record| {
        let name = record
            .text(&FieldPath::new("name"))
            .unwrap_or_else(|| record.id().to_string());
        let value = record
            .text(&FieldPath::new("value"))
            .map(|v| format!("${}", v))
            .unwrap_or_default();
        let owner = record
            .text(&FieldPath::new("owner.name"))
            .unwrap_or_default();
        vec![name, format!("{}  {}", value, owner)]
    })
}

pub async fn handle(format: OutputFormat, no_tui: bool, route: &str) -> Result<()> {
    let adapter = Arc::new(StaticAdapter::new("leads", demo_records()));

    // The authoritative stage change: what a real deployment does with
    // a PATCH against the backend, the demo does against the in-memory
    // collection. The browser invalidates afterwards either way.
    let handler: StatusHandler = {
        let adapter = adapter.clone();
        Arc::new(move |change| {
            let adapter = adapter.clone();
            Box::pin(async move {
                adapter
                    .set_field(
                        &change.id,
                        &FieldPath::new("stage.id"),
                        key_to_value(&change.to),
                    )
                    .map_err(anyhow::Error::new)
            })
        })
    };

    let config = BrowserConfig::new(demo_fields())
        .filters(demo_filters())
        .board(demo_board())
        .card_render(demo_card())
        .with_edit_form()
        .on_status_change(handler);

    super::run_dashboard(adapter, config, None, format, no_tui, route).await
}

fn key_to_value(key: &Key) -> serde_json::Value {
    match key {
        Key::Int(i) => json!(i),
        Key::Str(s) => json!(s),
    }
}
