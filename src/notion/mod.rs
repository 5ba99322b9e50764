//! Notion export through the clipboard and the browser
//!
//! Nothing here talks to the Notion API. The formatted cases are copied to the
//! clipboard and the configured board is opened for a manual paste.

pub mod config;
pub mod export;

pub use config::{NotionConfig, database_id_from_url};
pub use export::{
    BrowserOpener, ExportOrigin, ExportReport, ExportSource, SystemBrowser, export_cases,
    format_cases_for_notion, resolve_export_source, sample_cases,
};
