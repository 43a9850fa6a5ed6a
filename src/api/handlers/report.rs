use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analytics::report::{per_bot_summaries, record_rows, BotSummary, FilterEcho};
use crate::analytics::{
    build_report, daily_pnl, equity_curve, summarize, BotFilter, DailyPnl, DashboardReport,
    EquitySeries, RecordQuery, RecordRow, ReportFilter, StatusFilter, SummaryStats, TimeWindow,
};
use crate::errors::AppError;
use crate::models::{LoadOutcome, SortOrder, TradeRecord};
use crate::AppState;

/// Query string shared by all report endpoints. Values are validated here so
/// that a bad value yields the JSON error body rather than a bare rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub bot: Option<String>,
    pub window: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

impl ReportParams {
    pub fn filter(&self) -> Result<ReportFilter, AppError> {
        let bot = match self.bot.as_deref() {
            Some(s) => s.parse::<BotFilter>().unwrap_or_default(),
            None => BotFilter::All,
        };
        let window = match self.window.as_deref() {
            Some(s) => s.parse::<TimeWindow>().map_err(AppError::BadRequest)?,
            None => TimeWindow::All,
        };
        Ok(ReportFilter::new(bot, window))
    }

    pub fn record_query(&self, default_limit: usize) -> Result<RecordQuery, AppError> {
        let order = match self.order.as_deref() {
            Some(s) => s.parse::<SortOrder>().map_err(AppError::BadRequest)?,
            None => SortOrder::Desc,
        };
        let limit = match self.limit.as_deref() {
            Some(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| AppError::BadRequest(format!("invalid limit: {s}")))?,
            None => default_limit,
        };
        let status = match self.status.as_deref() {
            Some(s) => s.parse::<StatusFilter>().map_err(AppError::BadRequest)?,
            None => StatusFilter::All,
        };
        Ok(RecordQuery {
            order,
            limit,
            status,
        })
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub no_data: bool,
    pub filter: FilterEcho,
    pub summary: SummaryStats,
    pub per_bot: Vec<BotSummary>,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub no_data: bool,
    pub filter: FilterEcho,
    pub records: Vec<RecordRow>,
}

#[derive(Serialize)]
pub struct EquityResponse {
    pub no_data: bool,
    pub filter: FilterEcho,
    pub equity_curve: Vec<EquitySeries>,
}

#[derive(Serialize)]
pub struct DailyPnlResponse {
    pub no_data: bool,
    pub filter: FilterEcho,
    pub daily_pnl: Vec<DailyPnl>,
}

/// Filtered records of a load; empty for "no data".
fn subset<'a>(
    outcome: &'a LoadOutcome,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Vec<&'a TradeRecord> {
    outcome
        .dataset()
        .map(|ds| filter.apply(ds.records(), today))
        .unwrap_or_default()
}

async fn load(state: &AppState) -> Result<Arc<LoadOutcome>, AppError> {
    Ok(state.cache.get().await?)
}

pub async fn full(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<DashboardReport>, AppError> {
    let filter = params.filter()?;
    let records = params.record_query(state.config.records_limit)?;
    let outcome = load(&state).await?;

    Ok(Json(build_report(&outcome, &filter, records, (state.today)())))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<SummaryResponse>, AppError> {
    let filter = params.filter()?;
    let outcome = load(&state).await?;

    let today = (state.today)();
    let per_bot = outcome
        .dataset()
        .map(|ds| per_bot_summaries(ds, &filter, today))
        .unwrap_or_default();
    let trades = subset(&outcome, &filter, today);

    Ok(Json(SummaryResponse {
        no_data: outcome.is_no_data(),
        filter: (&filter).into(),
        summary: summarize(trades).for_display(),
        per_bot,
    }))
}

pub async fn records(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<RecordsResponse>, AppError> {
    let filter = params.filter()?;
    let query = params.record_query(state.config.records_limit)?;
    let outcome = load(&state).await?;

    let trades = subset(&outcome, &filter, (state.today)());

    Ok(Json(RecordsResponse {
        no_data: outcome.is_no_data(),
        filter: (&filter).into(),
        records: record_rows(&trades, query),
    }))
}

pub async fn equity(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<EquityResponse>, AppError> {
    let filter = params.filter()?;
    let outcome = load(&state).await?;

    let trades = subset(&outcome, &filter, (state.today)());

    Ok(Json(EquityResponse {
        no_data: outcome.is_no_data(),
        filter: (&filter).into(),
        equity_curve: equity_curve(trades),
    }))
}

pub async fn daily(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<DailyPnlResponse>, AppError> {
    let filter = params.filter()?;
    let outcome = load(&state).await?;

    let trades = subset(&outcome, &filter, (state.today)());

    Ok(Json(DailyPnlResponse {
        no_data: outcome.is_no_data(),
        filter: (&filter).into(),
        daily_pnl: daily_pnl(trades),
    }))
}

pub async fn refresh(State(state): State<AppState>) -> Json<Value> {
    state.cache.invalidate().await;
    Json(json!({ "success": true }))
}
