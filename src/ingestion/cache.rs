use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::counter;
use tokio::sync::Mutex;

use crate::ingestion::loader::load_sources;
use crate::models::{LoadOutcome, LogSource};

struct CachedLoad {
    built_at: Instant,
    outcome: Arc<LoadOutcome>,
}

/// Last merged dataset and when it was built. Reads inside the freshness
/// window reuse it; anything older re-reads every trade log.
pub struct ReportCache {
    sources: Vec<LogSource>,
    ttl: Duration,
    slot: Mutex<Option<CachedLoad>>,
}

impl ReportCache {
    pub fn new(sources: Vec<LogSource>, ttl: Duration) -> Self {
        Self {
            sources,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn sources(&self) -> &[LogSource] {
        &self.sources
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached load if still fresh, otherwise a rebuild from disk.
    pub async fn get(&self) -> anyhow::Result<Arc<LoadOutcome>> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            let age = cached.built_at.elapsed();
            if age < self.ttl {
                tracing::debug!(age_ms = age.as_millis() as u64, "Report cache hit");
                counter!("report_cache_hits_total").increment(1);
                return Ok(Arc::clone(&cached.outcome));
            }
        }

        let sources = self.sources.clone();
        let outcome = tokio::task::spawn_blocking(move || load_sources(&sources)).await?;
        let outcome = Arc::new(outcome);

        tracing::info!(
            no_data = outcome.is_no_data(),
            "Report dataset rebuilt"
        );

        *slot = Some(CachedLoad {
            built_at: Instant::now(),
            outcome: Arc::clone(&outcome),
        });

        Ok(outcome)
    }

    /// Drop the cached dataset; the next read rebuilds it.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
        tracing::info!("Report cache invalidated");
    }
}
