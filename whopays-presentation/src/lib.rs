#![warn(clippy::uninlined_format_args)]

pub mod summary_presenter;
pub mod text_table;

pub use summary_presenter::SummaryPresenter;
pub use text_table::{Alignment, TextTableBuilder};
