mod board;
mod dialog;
mod grid;
mod list;
mod status_bar;
mod table;

pub use board::{BoardLayout, BoardView, DragOverlayView, color_from_name};
pub use dialog::DialogView;
pub use grid::GridView;
pub use list::ListView;
pub use status_bar::StatusBarView;
pub use table::TableView;
