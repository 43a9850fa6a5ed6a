mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use botreport::api::router::create_router;
use botreport::config::AppConfig;
use botreport::models::LogSource;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn dec(value: &Value) -> Decimal {
    value.as_str().expect("decimal rendered as string").parse().unwrap()
}

fn seeded_app() -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sources = common::seed_two_bots(&dir);
    (create_router(common::test_state(sources)), dir)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _dir) = seeded_app();
    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["sources"], 2);
    assert_eq!(json["sources_present"], 2);
}

#[tokio::test]
async fn test_full_report_all_bots() {
    let (app, _dir) = seeded_app();
    let (status, json) = get_json(app, "/api/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["no_data"], false);
    assert_eq!(json["bots"], serde_json::json!(["Scalping", "Swing"]));
    assert_eq!(json["summary"]["total_closed"], 7);
    assert_eq!(json["summary"]["net_profit"], "102");
    assert_eq!(json["per_bot"][0]["bot"], "Scalping");
    assert_eq!(json["per_bot"][0]["summary"]["net_profit"], "-5");
    assert_eq!(json["per_bot"][0]["summary"]["max_drawdown"], "30");
    assert_eq!(json["per_bot"][0]["summary"]["max_win_streak"], 1);
    assert_eq!(json["per_bot"][1]["summary"]["net_profit"], "107");
    assert_eq!(json["open_trades"].as_array().unwrap().len(), 1);
    assert_eq!(json["records"].as_array().unwrap().len(), 8);
    assert_eq!(json["latest"][0]["thought_process"], "trend up");
}

#[tokio::test]
async fn test_summary_today_window() {
    let (app, _dir) = seeded_app();
    let (status, json) = get_json(app, "/api/report/summary?window=today").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filter"]["window"], "today");
    assert_eq!(json["summary"]["total_closed"], 4);
    assert_eq!(json["summary"]["net_profit"], "-5");
    assert_eq!(dec(&json["summary"]["win_rate"]), Decimal::from(50));
    // Swing has nothing today but still gets a zeroed row
    assert_eq!(json["per_bot"][1]["bot"], "Swing");
    assert_eq!(json["per_bot"][1]["summary"]["total_closed"], 0);
    assert_eq!(dec(&json["per_bot"][1]["summary"]["win_rate"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_records_for_one_bot() {
    let (app, _dir) = seeded_app();
    let (status, json) =
        get_json(app, "/api/report/records?bot=Swing&order=asc&status=closed").await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["records"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["bot_type"] == "Swing"));
    assert_eq!(rows[0]["profit_loss"], "100");
    // Unparseable P/L kept as zero
    assert_eq!(rows[1]["profit_loss"], "0");
    // Unknown timestamp sorts last and renders empty
    assert_eq!(rows[2]["timestamp"], "");
    assert_eq!(rows[2]["sl"], "-");
}

#[tokio::test]
async fn test_records_limit_and_open_rows() {
    let (app, _dir) = seeded_app();
    let (_, json) = get_json(app, "/api/report/records?status=open&limit=5").await;

    let rows = json["records"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "OPEN");
    assert!(rows[0]["profit_loss"].is_null());
    assert_eq!(rows[0]["rsi"], "45.1");
}

#[tokio::test]
async fn test_equity_curve_and_daily_pnl() {
    let (app, _dir) = seeded_app();
    let (_, json) = get_json(app.clone(), "/api/report/equity-curve?bot=Scalping").await;

    let series = json["equity_curve"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    let cumulative: Vec<&str> = series[0]["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["cumulative"].as_str().unwrap())
        .collect();
    assert_eq!(cumulative, vec!["10", "5", "25", "-5"]);

    let (_, json) = get_json(app, "/api/report/daily-pnl").await;
    let daily = json["daily_pnl"].as_array().unwrap();
    // Scalping today, Swing 40 days ago; the undated Swing row has no day
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["bot"], "Swing");
    assert_eq!(daily[0]["profit_loss"], "100");
    assert_eq!(daily[1]["bot"], "Scalping");
    assert_eq!(daily[1]["profit_loss"], "-5");
}

#[tokio::test]
async fn test_bad_window_is_bad_request() {
    let (app, _dir) = seeded_app();
    let (status, json) = get_json(app, "/api/report?window=yesterday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_bad_limit_is_bad_request() {
    let (app, _dir) = seeded_app();
    let (status, _) = get_json(app, "/api/report/records?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_data_state() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(vec![
        LogSource::new("Scalping", dir.path().join("missing_a.csv")),
        LogSource::new("Swing", dir.path().join("missing_b.csv")),
    ]);
    let app = create_router(state);

    let (status, json) = get_json(app.clone(), "/api/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["no_data"], true);
    assert_eq!(json["summary"]["net_profit"], "0");
    assert!(json["records"].as_array().unwrap().is_empty());

    let (_, json) = get_json(app, "/health").await;
    assert_eq!(json["sources_present"], 0);
}

#[tokio::test]
async fn test_refresh_picks_up_new_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_log(&dir, "bot.csv", &["2024-03-01 09:00:00,CLOSED,BUY,5,,,,,,"]);
    let mut config = AppConfig::with_sources(vec![LogSource::new("Bot", &path)]);
    config.cache_ttl = std::time::Duration::from_secs(3600);
    let app = create_router(common::test_state_with(config));

    let (_, json) = get_json(app.clone(), "/api/report/summary").await;
    assert_eq!(json["summary"]["total_closed"], 1);

    common::write_log(
        &dir,
        "bot.csv",
        &["2024-03-01 09:00:00,CLOSED,BUY,5,,,,,,", "2024-03-01 10:00:00,CLOSED,BUY,6,,,,,,"],
    );
    let (_, json) = get_json(app.clone(), "/api/report/summary").await;
    assert_eq!(json["summary"]["total_closed"], 1, "cached load still fresh");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/report/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, json) = get_json(app, "/api/report/summary").await;
    assert_eq!(json["summary"]["total_closed"], 2);
}

#[tokio::test]
async fn test_token_required_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::with_sources(common::seed_two_bots(&dir));
    config.api_token = Some("s3cret".into());
    let app = create_router(common::test_state_with(config));

    let (status, _) = get_json(app.clone(), "/api/report").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/report/summary")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Health stays public
    let (status, _) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_cache_hits() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::with_sources(common::seed_two_bots(&dir));
    let app = create_router(common::test_state_with_handle(config, recorder.handle()));

    // Second read inside the 60 s window is served from the cache
    for _ in 0..2 {
        let (status, _) = get_json(app.clone(), "/api/report/summary").await;
        assert_eq!(status, StatusCode::OK);
    }

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/plain; version=0.0.4");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("report_cache_hits_total 1"), "{text}");
}

#[tokio::test]
async fn test_windows_follow_pinned_today() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_log(
        &dir,
        "bot.csv",
        &[
            "2024-03-06 09:00:00,CLOSED,BUY,5,,,,,,",
            "2024-03-04 09:00:00,CLOSED,BUY,7,,,,,,",
            "2024-02-28 09:00:00,CLOSED,BUY,11,,,,,,",
        ],
    );
    let state = common::test_state(vec![LogSource::new("Bot", path)]);

    let (_, json) = get_json(create_router(state.clone()), "/api/report/summary?window=today").await;
    assert_eq!(json["summary"]["net_profit"], "5");

    // 2024-03-04 is the Monday of the same ISO week
    let (_, json) = get_json(create_router(state.clone()), "/api/report/summary?window=week").await;
    assert_eq!(json["summary"]["net_profit"], "12");

    let (_, json) = get_json(create_router(state), "/api/report/summary?window=month").await;
    assert_eq!(json["summary"]["net_profit"], "12");
}
