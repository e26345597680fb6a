mod board;
mod collection;

pub use board::present_board;
pub use collection::{build_card, present_collection};
