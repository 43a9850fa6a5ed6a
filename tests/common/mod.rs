use std::path::PathBuf;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tempfile::TempDir;

use botreport::config::AppConfig;
use botreport::models::LogSource;
use botreport::AppState;

pub const HEADER: &str = "timestamp,status,action,profit_loss,sl,tp,rsi,sentiment_score,thought_process,reason_text";

/// Write a trade log into `dir` and return its path.
#[allow(dead_code)]
pub fn write_log(dir: &TempDir, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    std::fs::write(&path, body).expect("Failed to write trade log");
    path
}

/// Reference date the test app treats as "today" (a Wednesday).
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
}

/// Timestamp `days_ago` days before `fixed_today` at the given hour, in log format.
#[allow(dead_code)]
pub fn stamp(days_ago: i64, hour: u32) -> String {
    let date = fixed_today() - ChronoDuration::days(days_ago);
    format!("{} {:02}:00:00", date.format("%Y-%m-%d"), hour)
}

/// App state over the given sources, caching disabled, no global recorder.
#[allow(dead_code)]
pub fn test_state(sources: Vec<LogSource>) -> AppState {
    let mut config = AppConfig::with_sources(sources);
    config.cache_ttl = Duration::ZERO;
    test_state_with(config)
}

#[allow(dead_code)]
pub fn test_state_with(config: AppConfig) -> AppState {
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
    test_state_with_handle(config, metrics_handle)
}

#[allow(dead_code)]
pub fn test_state_with_handle(config: AppConfig, metrics_handle: PrometheusHandle) -> AppState {
    AppState::new(config, metrics_handle).with_today(fixed_today)
}

/// Two bots: a scalper with today's trades and a swing bot with older ones.
#[allow(dead_code)]
pub fn seed_two_bots(dir: &TempDir) -> Vec<LogSource> {
    let scalping = write_log(
        dir,
        "trade_log_scalping.csv",
        &[
            &format!("{},CLOSED,BUY,10,2300,2310,31.5,0.2,dip buy,TP hit", stamp(0, 9)),
            &format!("{},CLOSED,SELL,-5,,,,,,SL hit", stamp(0, 10)),
            &format!("{},CLOSED,BUY,20,,,,,,", stamp(0, 11)),
            &format!("{},CLOSED,SELL,-30,,,,,,", stamp(0, 12)),
            &format!("{},OPEN,BUY,,2290,2330,45.1,0.6,trend up,", stamp(0, 13)),
        ],
    );
    let swing = write_log(
        dir,
        "trade_log_swing.csv",
        &[
            &format!("{},CLOSED,BUY,100,,,,,,", stamp(40, 9)),
            &format!("{},CLOSED,SELL,abc,,,,,,", stamp(40, 15)),
            "garbage-time,CLOSED,BUY,7,,,,,,",
        ],
    );

    vec![
        LogSource::new("Scalping", scalping),
        LogSource::new("Swing", swing),
    ]
}
