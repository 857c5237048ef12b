// Summaries module - persisted analysis records

mod export;
mod json_store;
mod store;

pub use export::{export_file_name, export_summary, render_markdown, EXPORTS_DIR};
pub use json_store::{JsonSummaryStore, SUMMARIES_FILE};
pub use store::{Summary, SummaryStore};
