use serde_json::json;
use tablo_types::{Page, PageMeta, Record};

/// Seven CRM leads with stages {1, 1, 2, 3, 3, 3, 99}: the canonical
/// grouping scenario (two columns populated, one sparse, one record
/// whose stage matches no declared column).
pub fn sample_leads() -> Vec<Record> {
    vec![
        lead(10, "Acme Corp", 1, "Dana", 12000),
        lead(11, "Globex", 1, "Lee", 8000),
        lead(12, "Initech", 2, "Dana", 23000),
        lead(13, "Umbrella", 3, "Sam", 41000),
        lead(14, "Hooli", 3, "Lee", 5000),
        lead(15, "Stark Industries", 3, "Dana", 97000),
        lead(16, "Wayne Enterprises", 99, "Sam", 64000),
    ]
}

/// Wrap records as a single-page collection result with full metadata.
pub fn leads_page(records: Vec<Record>) -> Page {
    let total = records.len() as u64;
    Page::new(
        records,
        PageMeta {
            total: Some(total),
            last_page: Some(1),
            current_page: Some(1),
            per_page: Some(10),
        },
    )
}

fn lead(id: i64, name: &str, stage: i64, owner: &str, value: i64) -> Record {
    Record::new(json!({
        "id": id,
        "name": name,
        "stage": {"id": stage},
        "owner": {"name": owner},
        "value": value,
    }))
    .expect("sample lead is a valid record")
}
