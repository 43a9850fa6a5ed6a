use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Shown in place of an absent diagnostic field.
pub const MISSING_DISPLAY: &str = "-";

// ---------------------------------------------------------------------------
// TradeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed,
    /// Anything the bots wrote that is neither OPEN nor CLOSED.
    Other(String),
}

impl TradeStatus {
    pub fn from_log_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => TradeStatus::Open,
            "CLOSED" => TradeStatus::Closed,
            _ => TradeStatus::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "OPEN"),
            TradeStatus::Closed => write!(f, "CLOSED"),
            TradeStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for TradeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// TradeRecord: one row of a bot's trade log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    /// `None` when the log value could not be parsed.
    pub timestamp: Option<NaiveDateTime>,
    /// Label of the log the row came from.
    pub bot_type: String,
    pub status: TradeStatus,
    pub action: String,
    /// Realized P/L; unparseable values are already zero here.
    pub profit_loss: Decimal,

    // Diagnostics, display only
    pub sl: Option<String>,
    pub tp: Option<String>,
    pub rsi: Option<String>,
    pub sentiment_score: Option<String>,
    pub thought_process: Option<String>,
    pub reason_text: Option<String>,
}

impl TradeRecord {
    /// Bare record with no diagnostics attached.
    pub fn new(
        timestamp: Option<NaiveDateTime>,
        bot_type: impl Into<String>,
        status: TradeStatus,
        action: impl Into<String>,
        profit_loss: Decimal,
    ) -> Self {
        Self {
            timestamp,
            bot_type: bot_type.into(),
            status,
            action: action.into(),
            profit_loss,
            sl: None,
            tp: None,
            rsi: None,
            sentiment_score: None,
            thought_process: None,
            reason_text: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn is_win(&self) -> bool {
        self.profit_loss > Decimal::ZERO
    }
}

/// Display value of an optional diagnostic field.
pub fn display_or_missing(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING_DISPLAY.to_string())
}
