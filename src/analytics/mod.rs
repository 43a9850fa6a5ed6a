pub mod filters;
pub mod report;
pub mod series;
pub mod stats;

pub use filters::{BotFilter, ReportFilter, StatusFilter, TimeWindow};
pub use report::{build_report, DashboardReport, RecordQuery, RecordRow};
pub use series::{daily_pnl, equity_curve, DailyPnl, EquitySeries};
pub use stats::{summarize, SummaryStats};
