//! Human and machine-readable output for finished runs.
mod export;
mod progress;
mod summary;


pub use export::export_json;
pub use progress::{ProgressLine, finish_progress_line};
pub use summary::{print_summary, render_summary};
