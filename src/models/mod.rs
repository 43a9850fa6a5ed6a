pub mod dataset;
pub mod source;
pub mod trade;

pub use dataset::{LoadOutcome, MergedDataset, SortOrder};
pub use source::LogSource;
pub use trade::{TradeRecord, TradeStatus};
