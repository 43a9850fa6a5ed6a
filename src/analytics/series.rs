use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::stats::closed_chronological;
use crate::models::TradeRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: Option<NaiveDateTime>,
    pub profit_loss: Decimal,
    pub cumulative: Decimal,
}

/// Cumulative P/L of one bot over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquitySeries {
    pub bot: String,
    pub points: Vec<EquityPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub bot: String,
    pub profit_loss: Decimal,
    pub trades: usize,
}

/// Per-bot equity curves over closed trades, bots sorted alphabetically.
/// Each curve accumulates only its own bot's trades.
pub fn equity_curve<'a, I>(records: I) -> Vec<EquitySeries>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut by_bot: BTreeMap<&str, Vec<EquityPoint>> = BTreeMap::new();

    for trade in closed_chronological(records) {
        let points = by_bot.entry(trade.bot_type.as_str()).or_default();
        let prev = points.last().map_or(Decimal::ZERO, |p| p.cumulative);
        points.push(EquityPoint {
            timestamp: trade.timestamp,
            profit_loss: trade.profit_loss,
            cumulative: prev.saturating_add(trade.profit_loss),
        });
    }

    by_bot
        .into_iter()
        .map(|(bot, points)| EquitySeries {
            bot: bot.to_string(),
            points,
        })
        .collect()
}

/// Closed-trade P/L summed per (calendar date, bot), ascending by date then
/// bot. Trades with an unknown timestamp have no date and are left out.
pub fn daily_pnl<'a, I>(records: I) -> Vec<DailyPnl>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut buckets: BTreeMap<(NaiveDate, &str), (Decimal, usize)> = BTreeMap::new();

    for trade in records.into_iter().filter(|r| r.is_closed()) {
        let Some(ts) = trade.timestamp else {
            continue;
        };
        let bucket = buckets
            .entry((ts.date(), trade.bot_type.as_str()))
            .or_insert((Decimal::ZERO, 0));
        bucket.0 = bucket.0.saturating_add(trade.profit_loss);
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((date, bot), (profit_loss, trades))| DailyPnl {
            date,
            bot: bot.to_string(),
            profit_loss,
            trades,
        })
        .collect()
}
