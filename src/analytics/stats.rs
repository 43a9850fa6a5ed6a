use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::dataset::sort_by_timestamp;
use crate::models::{SortOrder, TradeRecord};

/// Summary of a set of closed trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub net_profit: Decimal,
    /// Percentage, 0..=100.
    pub win_rate: Decimal,
    pub total_closed: usize,
    pub max_drawdown: Decimal,
    pub max_win_streak: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub avg_profit: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
}

impl SummaryStats {
    /// Same figures with the win rate and average profit rounded for display.
    pub fn for_display(mut self) -> Self {
        self.win_rate = self.win_rate.round_dp(2);
        self.avg_profit = self.avg_profit.round_dp(2);
        self
    }
}

/// Compute all summary statistics over the closed trades among `records`.
/// Open and unknown-status rows are ignored; order of the input is irrelevant.
pub fn summarize<'a, I>(records: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let trades = closed_chronological(records);
    let total_closed = trades.len();

    if total_closed == 0 {
        return SummaryStats::default();
    }

    let net = net_profit(&trades);
    let win_count = trades.iter().filter(|t| t.is_win()).count();

    SummaryStats {
        net_profit: net,
        win_rate: win_rate(&trades),
        total_closed,
        max_drawdown: max_drawdown(&trades),
        max_win_streak: max_win_streak(&trades),
        win_count,
        loss_count: total_closed - win_count,
        avg_profit: net / Decimal::from(total_closed as i64),
        best_trade: trades.iter().map(|t| t.profit_loss).max().unwrap_or(Decimal::ZERO),
        worst_trade: trades.iter().map(|t| t.profit_loss).min().unwrap_or(Decimal::ZERO),
    }
}

/// Closed trades only, ascending by timestamp (unknown timestamps last).
pub fn closed_chronological<'a, I>(records: I) -> Vec<&'a TradeRecord>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut trades: Vec<&TradeRecord> = records.into_iter().filter(|r| r.is_closed()).collect();
    sort_by_timestamp(&mut trades, SortOrder::Asc);
    trades
}

// ---------------------------------------------------------------------------
// Individual metrics. Inputs are closed trades in chronological order.
// ---------------------------------------------------------------------------

/// Sums saturate at `Decimal::MAX`/`MIN` instead of overflowing.
pub fn net_profit(trades: &[&TradeRecord]) -> Decimal {
    trades
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.profit_loss))
}

/// Share of trades with positive P/L, as a percentage. Zero when empty.
pub fn win_rate(trades: &[&TradeRecord]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }

    let wins = trades.iter().filter(|t| t.is_win()).count();
    Decimal::from(wins as i64) * Decimal::ONE_HUNDRED / Decimal::from(trades.len() as i64)
}

/// Running sum of P/L.
pub fn cumulative_pnl(trades: &[&TradeRecord]) -> Vec<Decimal> {
    trades
        .iter()
        .scan(Decimal::ZERO, |acc, t| {
            *acc = acc.saturating_add(t.profit_loss);
            Some(*acc)
        })
        .collect()
}

/// Distance below the running peak of the cumulative P/L at each trade.
/// The peak starts at the first cumulative value, not at zero.
pub fn drawdowns(trades: &[&TradeRecord]) -> Vec<Decimal> {
    let mut peak: Option<Decimal> = None;

    cumulative_pnl(trades)
        .into_iter()
        .map(|cum| {
            let p = peak.map_or(cum, |p| p.max(cum));
            peak = Some(p);
            p.saturating_sub(cum)
        })
        .collect()
}

pub fn max_drawdown(trades: &[&TradeRecord]) -> Decimal {
    drawdowns(trades)
        .into_iter()
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Longest run of consecutive winning trades.
pub fn max_win_streak(trades: &[&TradeRecord]) -> usize {
    let mut current = 0usize;
    let mut best = 0usize;

    for t in trades {
        if t.is_win() {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
