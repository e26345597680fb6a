use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use tablo_engine::BoardSpec;
use tablo_types::{ColumnSpec, FieldSpec, FilterSpec, Key, Record};

/// Dashboard description: which collection to browse and how to
/// project it. Everything here is declarative; behavior (custom cell
/// renderers, predicates, status handlers) is code and attaches via
/// `BrowserConfig` in the embedding program.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub title: Option<String>,
    pub endpoint: String,
    /// Records file (JSON array), relative to the config file.
    pub data: Option<PathBuf>,
    pub per_page: Option<u64>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    pub board: Option<BoardConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    pub width: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<FilterOptionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterOptionConfig {
    pub label: String,
    pub value: Key,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    pub group_by: String,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub id: Key,
    pub label: String,
    pub color: Option<String>,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn field_specs(&self) -> Vec<FieldSpec> {
        self.fields
            .iter()
            .map(|f| {
                let mut spec = FieldSpec::new(f.key.as_str(), f.label.as_str());
                if f.sortable {
                    spec = spec.sortable();
                }
                if let Some(width) = f.width {
                    spec = spec.width(width);
                }
                spec
            })
            .collect()
    }

    pub fn filter_specs(&self) -> Vec<FilterSpec> {
        self.filters
            .iter()
            .map(|f| {
                let mut spec = FilterSpec::new(f.key.as_str(), f.label.as_str());
                for option in &f.options {
                    spec = spec.option(option.label.as_str(), option.value.clone());
                }
                spec
            })
            .collect()
    }

    pub fn board_spec(&self) -> Option<BoardSpec> {
        self.board.as_ref().map(|board| {
            let columns = board
                .columns
                .iter()
                .map(|c| {
                    let mut spec = ColumnSpec::new(c.id.clone(), c.label.as_str());
                    if let Some(color) = &c.color {
                        spec = spec.color(color.as_str());
                    }
                    spec
                })
                .collect();
            BoardSpec::new(columns, board.group_by.as_str())
        })
    }
}

/// Load a records file: either a bare JSON array or an object with a
/// `data`/`items` collection (the shapes backends commonly dump).
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read records {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse records {}", path.display()))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("items")) {
            Some(serde_json::Value::Array(items)) => items,
            _ => anyhow::bail!(
                "{}: expected a JSON array or an object with a data array",
                path.display()
            ),
        },
        _ => anyhow::bail!("{}: expected a JSON array", path.display()),
    };

    items
        .into_iter()
        .map(|item| Record::new(item).map_err(anyhow::Error::new))
        .collect()
}

/// Infer field specs from the first record when the config declares
/// none: one column per top-level scalar, in key order.
pub fn infer_fields(records: &[Record]) -> Vec<FieldSpec> {
    let Some(first) = records.first() else {
        return vec![FieldSpec::new("id", "Id")];
    };
    let Some(object) = first.value().as_object() else {
        return vec![FieldSpec::new("id", "Id")];
    };
    object
        .iter()
        .filter(|(_, value)| !value.is_object() && !value.is_array())
        .map(|(key, _)| FieldSpec::new(key.as_str(), titlecase(key)).sortable())
        .collect()
}

fn titlecase(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
