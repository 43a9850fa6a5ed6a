pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod ingestion;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::ingestion::cache::ReportCache;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: Arc<ReportCache>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    /// Reference date for the today/week/month windows.
    pub today: fn() -> NaiveDate,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl AppState {
    pub fn new(
        config: AppConfig,
        metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        let cache = ReportCache::new(config.sources.clone(), config.cache_ttl);
        Self {
            config,
            cache: Arc::new(cache),
            metrics_handle,
            today: local_today,
        }
    }

    /// Pin the reference date, e.g. so tests do not depend on the wall clock.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}
