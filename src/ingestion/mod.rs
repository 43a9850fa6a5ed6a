pub mod cache;
pub mod loader;

pub use cache::ReportCache;
pub use loader::{load_sources, parse_log, read_source};
