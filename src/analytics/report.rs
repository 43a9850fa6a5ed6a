use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::filters::{ReportFilter, StatusFilter};
use crate::analytics::series::{daily_pnl, equity_curve, DailyPnl, EquitySeries};
use crate::analytics::stats::{summarize, SummaryStats};
use crate::models::dataset::sort_by_timestamp;
use crate::models::trade::display_or_missing;
use crate::models::{LoadOutcome, MergedDataset, SortOrder, TradeRecord};

/// Everything the dashboard needs for one view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub no_data: bool,
    pub filter: FilterEcho,
    pub bots: Vec<String>,
    pub summary: SummaryStats,
    pub per_bot: Vec<BotSummary>,
    pub latest: Vec<BotSnapshot>,
    pub open_trades: Vec<RecordRow>,
    pub records: Vec<RecordRow>,
    pub equity_curve: Vec<EquitySeries>,
    pub daily_pnl: Vec<DailyPnl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterEcho {
    pub bot: String,
    pub window: String,
}

impl From<&ReportFilter> for FilterEcho {
    fn from(f: &ReportFilter) -> Self {
        Self {
            bot: f.bot.to_string(),
            window: f.window.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BotSummary {
    pub bot: String,
    pub summary: SummaryStats,
}

/// The most recent thing a bot logged.
#[derive(Debug, Clone, Serialize)]
pub struct BotSnapshot {
    pub bot: String,
    pub timestamp: String,
    pub status: String,
    pub action: String,
    pub rsi: String,
    pub sentiment_score: String,
    pub thought_process: String,
}

/// A trade as shown in a table: missing values already replaced by their
/// display fallback. Only closed trades carry a P/L.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow {
    pub timestamp: String,
    pub bot_type: String,
    pub status: String,
    pub action: String,
    pub profit_loss: Option<Decimal>,
    pub sl: String,
    pub tp: String,
    pub rsi: String,
    pub sentiment_score: String,
    pub thought_process: String,
    pub reason_text: String,
}

impl From<&TradeRecord> for RecordRow {
    fn from(r: &TradeRecord) -> Self {
        Self {
            timestamp: format_timestamp(r.timestamp),
            bot_type: r.bot_type.clone(),
            status: r.status.to_string(),
            action: r.action.clone(),
            profit_loss: r.is_closed().then_some(r.profit_loss),
            sl: display_or_missing(&r.sl),
            tp: display_or_missing(&r.tp),
            rsi: display_or_missing(&r.rsi),
            sentiment_score: display_or_missing(&r.sentiment_score),
            thought_process: display_or_missing(&r.thought_process),
            reason_text: display_or_missing(&r.reason_text),
        }
    }
}

fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Table options for the record list.
#[derive(Debug, Clone, Copy)]
pub struct RecordQuery {
    pub order: SortOrder,
    pub limit: usize,
    pub status: StatusFilter,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            order: SortOrder::Desc,
            limit: 200,
            status: StatusFilter::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Assemble the full report for `filter` as seen on `today`.
pub fn build_report(
    outcome: &LoadOutcome,
    filter: &ReportFilter,
    records: RecordQuery,
    today: NaiveDate,
) -> DashboardReport {
    let Some(ds) = outcome.dataset() else {
        return DashboardReport {
            no_data: true,
            filter: filter.into(),
            bots: Vec::new(),
            summary: SummaryStats::default(),
            per_bot: Vec::new(),
            latest: Vec::new(),
            open_trades: Vec::new(),
            records: Vec::new(),
            equity_curve: Vec::new(),
            daily_pnl: Vec::new(),
        };
    };

    let subset = filter.apply(ds.records(), today);

    DashboardReport {
        no_data: false,
        filter: filter.into(),
        bots: ds.labels().to_vec(),
        summary: summarize(subset.iter().copied()).for_display(),
        per_bot: per_bot_summaries(ds, filter, today),
        latest: latest_snapshots(ds, filter),
        open_trades: record_rows(
            &subset,
            RecordQuery {
                order: SortOrder::Desc,
                limit: usize::MAX,
                status: StatusFilter::Open,
            },
        ),
        records: record_rows(&subset, records),
        equity_curve: equity_curve(subset.iter().copied()),
        daily_pnl: daily_pnl(subset.iter().copied()),
    }
}

/// One summary per bot label selected by the filter, each restricted to the
/// filter's time window.
pub fn per_bot_summaries(
    ds: &MergedDataset,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Vec<BotSummary> {
    ds.labels()
        .iter()
        .filter(|label| filter.bot.matches_label(label))
        .map(|label| {
            let trades = ds
                .records()
                .iter()
                .filter(|r| r.bot_type == *label && filter.window.matches(r.timestamp, today));
            BotSummary {
                bot: label.clone(),
                summary: summarize(trades).for_display(),
            }
        })
        .collect()
}

/// Latest record per selected bot, regardless of time window. A record with
/// a known timestamp always beats one without.
pub fn latest_snapshots(ds: &MergedDataset, filter: &ReportFilter) -> Vec<BotSnapshot> {
    ds.labels()
        .iter()
        .filter(|label| filter.bot.matches_label(label))
        .filter_map(|label| {
            let mine: Vec<&TradeRecord> =
                ds.records().iter().filter(|r| r.bot_type == *label).collect();
            let latest = mine
                .iter()
                .rev()
                .find(|r| r.timestamp.is_some())
                .or_else(|| mine.last())?;

            Some(BotSnapshot {
                bot: label.clone(),
                timestamp: format_timestamp(latest.timestamp),
                status: latest.status.to_string(),
                action: latest.action.clone(),
                rsi: display_or_missing(&latest.rsi),
                sentiment_score: display_or_missing(&latest.sentiment_score),
                thought_process: display_or_missing(&latest.thought_process),
            })
        })
        .collect()
}

/// Table rows for `subset`, status-filtered, sorted and truncated.
pub fn record_rows(subset: &[&TradeRecord], query: RecordQuery) -> Vec<RecordRow> {
    let mut rows: Vec<&TradeRecord> = subset
        .iter()
        .copied()
        .filter(|r| query.status.matches(r))
        .collect();
    sort_by_timestamp(&mut rows, query.order);

    rows.into_iter().take(query.limit).map(RecordRow::from).collect()
}
