pub mod board;
pub mod filter;
pub mod sort;

pub use board::{
    BoardSpec, DRAG_THRESHOLD, DragGesture, DropOutcome, DropTarget, StatusChange,
    displayed_column_index, partition, resolve_drop_target,
};
pub use filter::{FetchPlan, apply_client_filters};
pub use sort::SortState;
