use tablo_engine::{BoardSpec, partition};
use tablo_runtime::CacheSnapshot;
use tablo_types::{CardRender, FieldSpec, Key, Record};

use crate::presentation::view_models::{BoardColumnViewModel, BoardViewModel};

use super::build_card;

/// Project the filtered page into kanban columns.
pub fn present_board(
    spec: &BoardSpec,
    records: &[Record],
    dragging: Option<&Key>,
    snapshot: &CacheSnapshot,
    fields: &[FieldSpec],
    card_render: Option<&CardRender>,
) -> BoardViewModel {
    let buckets = partition(records, spec);
    let columns = spec
        .columns
        .iter()
        .zip(buckets.iter())
        .map(|(column, bucket)| BoardColumnViewModel {
            id: column.id.clone(),
            label: column.label.clone(),
            color: column.color.clone(),
            count: bucket.len(),
            cards: bucket
                .iter()
                .map(|record| build_card(record, fields, card_render))
                .collect(),
        })
        .collect();

    BoardViewModel {
        columns,
        dragging: dragging.cloned(),
        total: records.len(),
        loading: snapshot.loading,
        error: snapshot.error.clone(),
    }
}
