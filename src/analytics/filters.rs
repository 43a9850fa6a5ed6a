use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::models::TradeRecord;

// ---------------------------------------------------------------------------
// BotFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BotFilter {
    #[default]
    All,
    Bot(String),
}

impl BotFilter {
    pub fn matches(&self, record: &TradeRecord) -> bool {
        self.matches_label(&record.bot_type)
    }

    pub fn matches_label(&self, label: &str) -> bool {
        match self {
            BotFilter::All => true,
            BotFilter::Bot(wanted) => wanted == label,
        }
    }
}

impl FromStr for BotFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(BotFilter::All)
        } else {
            Ok(BotFilter::Bot(s.to_string()))
        }
    }
}

impl fmt::Display for BotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotFilter::All => write!(f, "all"),
            BotFilter::Bot(label) => write!(f, "{label}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Today,
    /// Same ISO week number as today. The year is not compared, so week 10
    /// of last year matches week 10 of this year.
    Week,
    /// Same month number as today; the year is not compared either.
    Month,
    #[default]
    All,
}

impl TimeWindow {
    /// Whether a record stamped `ts` falls in the window as seen on `today`.
    /// Unknown timestamps only match `All`.
    pub fn matches(&self, ts: Option<NaiveDateTime>, today: NaiveDate) -> bool {
        if *self == TimeWindow::All {
            return true;
        }
        let Some(ts) = ts else {
            return false;
        };
        let date = ts.date();

        match self {
            TimeWindow::Today => date == today,
            TimeWindow::Week => date.iso_week().week() == today.iso_week().week(),
            TimeWindow::Month => date.month() == today.month(),
            TimeWindow::All => true,
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(TimeWindow::Today),
            "week" | "this_week" => Ok(TimeWindow::Week),
            "month" | "this_month" => Ok(TimeWindow::Month),
            "" | "all" => Ok(TimeWindow::All),
            other => Err(format!("unknown time window: {other}")),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeWindow::Today => "today",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::All => "all",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// StatusFilter (record table only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    pub fn matches(&self, record: &TradeRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => record.is_open(),
            StatusFilter::Closed => record.is_closed(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "open" => Ok(StatusFilter::Open),
            "closed" => Ok(StatusFilter::Closed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ReportFilter
// ---------------------------------------------------------------------------

/// Bot and time-window selection applied to the merged dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub bot: BotFilter,
    pub window: TimeWindow,
}

impl ReportFilter {
    pub fn new(bot: BotFilter, window: TimeWindow) -> Self {
        Self { bot, window }
    }

    pub fn matches(&self, record: &TradeRecord, today: NaiveDate) -> bool {
        self.bot.matches(record) && self.window.matches(record.timestamp, today)
    }

    /// Matching records, borrowed from `records` in their original order.
    pub fn apply<'a>(&self, records: &'a [TradeRecord], today: NaiveDate) -> Vec<&'a TradeRecord> {
        records.iter().filter(|r| self.matches(r, today)).collect()
    }
}
