use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use metrics::{counter, gauge};
use rust_decimal::Decimal;

use crate::errors::SourceError;
use crate::models::{LoadOutcome, LogSource, TradeRecord, TradeStatus};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Rows read from one trade log.
#[derive(Debug, Default)]
pub struct SourceLoad {
    pub records: Vec<TradeRecord>,
    /// Lines dropped by the lenient parser (too many fields, undecodable).
    pub skipped_lines: usize,
}

/// Load every source and merge the rows. A source that cannot be read
/// contributes zero rows; it never prevents the others from loading.
pub fn load_sources(sources: &[LogSource]) -> LoadOutcome {
    let mut records = Vec::new();
    let mut skipped_total = 0usize;

    for source in sources {
        match read_source(source) {
            Ok(load) => {
                tracing::debug!(
                    label = %source.label,
                    rows = load.records.len(),
                    skipped = load.skipped_lines,
                    "Trade log read"
                );
                skipped_total += load.skipped_lines;
                records.extend(load.records);
            }
            Err(e) => {
                tracing::warn!(
                    label = %source.label,
                    path = %source.path.display(),
                    error = %e,
                    "Trade log unavailable, contributing no rows"
                );
                counter!("source_failures_total").increment(1);
            }
        }
    }

    counter!("report_loads_total").increment(1);
    counter!("csv_lines_skipped_total").increment(skipped_total as u64);
    gauge!("merged_records").set(records.len() as f64);

    tracing::info!(
        sources = sources.len(),
        rows = records.len(),
        skipped = skipped_total,
        "Trade logs loaded"
    );

    LoadOutcome::from_records(records)
}

/// Read one trade log from disk, tagging every row with the source label.
pub fn read_source(source: &LogSource) -> Result<SourceLoad, SourceError> {
    let file = File::open(&source.path)?;
    parse_log(file, &source.label)
}

/// Parse a trade log. The header row is required and must carry the
/// `timestamp`, `status`, `action` and `profit_loss` columns.
pub fn parse_log<R: Read>(reader: R, label: &str) -> Result<SourceLoad, SourceError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut load = SourceLoad::default();

    for (line, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                tracing::debug!(label, line = line + 2, error = %e, "Skipping undecodable line");
                load.skipped_lines += 1;
                continue;
            }
        };

        if row.len() > headers.len() {
            tracing::debug!(
                label,
                line = line + 2,
                fields = row.len(),
                expected = headers.len(),
                "Skipping line with extra fields"
            );
            load.skipped_lines += 1;
            continue;
        }

        load.records.push(columns.to_record(&row, label));
    }

    Ok(load)
}

/// Column positions resolved from the header row.
struct Columns {
    timestamp: usize,
    status: usize,
    action: usize,
    profit_loss: usize,
    sl: Option<usize>,
    tp: Option<usize>,
    rsi: Option<usize>,
    sentiment_score: Option<usize>,
    thought_process: Option<usize>,
    reason_text: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, SourceError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().trim_start_matches('\u{feff}');
                names.iter().any(|n| h.eq_ignore_ascii_case(n))
            })
        };
        let require = |name: &str| {
            find(&[name]).ok_or_else(|| SourceError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            timestamp: require("timestamp")?,
            status: require("status")?,
            action: require("action")?,
            profit_loss: require("profit_loss")?,
            sl: find(&["sl"]),
            tp: find(&["tp"]),
            rsi: find(&["rsi", "rsi_fast"]),
            sentiment_score: find(&["sentiment_score"]),
            thought_process: find(&["thought_process"]),
            reason_text: find(&["reason_text", "reason"]),
        })
    }

    fn to_record(&self, row: &StringRecord, label: &str) -> TradeRecord {
        TradeRecord {
            timestamp: parse_timestamp(cell(row, self.timestamp)),
            bot_type: label.to_string(),
            status: TradeStatus::from_log_str(cell(row, self.status)),
            action: cell(row, self.action).to_string(),
            profit_loss: parse_profit_loss(cell(row, self.profit_loss)),
            sl: optional(row, self.sl),
            tp: optional(row, self.tp),
            rsi: optional(row, self.rsi),
            sentiment_score: optional(row, self.sentiment_score),
            thought_process: optional(row, self.thought_process),
            reason_text: optional(row, self.reason_text),
        }
    }
}

/// Short rows are padded with empty cells.
fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn optional(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = cell(row, idx?);
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a log timestamp; `None` when no known format matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a P/L cell. Anything non-numeric is zero, never an error.
pub fn parse_profit_loss(raw: &str) -> Decimal {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}
