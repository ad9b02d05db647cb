//! HTTP handlers for unmark-api.

pub mod remove_watermark;
pub mod stats;
pub mod status_page;

pub use remove_watermark::remove_watermark;
pub use stats::{get_stats, health};
pub use status_page::{render_dashboard, status_page};
