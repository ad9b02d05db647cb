//! Usage counters stored as one JSON record in the key-value store.
//!
//! Every mutation re-reads and rewrites the whole record. There is no
//! locking, so concurrent requests can lose increments.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use unmark_core::defaults::STATISTICS_KEY;
use unmark_core::{Counter, DailyField, KvStore, Result, Statistics};

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Read-modify-write access to the statistics record.
#[derive(Clone)]
pub struct StatisticsStore {
    kv: Arc<dyn KvStore>,
    clock: Clock,
}

impl StatisticsStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_clock(kv, Arc::new(Utc::now))
    }

    pub fn with_clock(kv: Arc<dyn KvStore>, clock: Clock) -> Self {
        Self { kv, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Current calendar date (UTC) used for `dailyStats` keys.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Load the record, creating and persisting a zeroed one when absent.
    pub async fn get(&self) -> Result<Statistics> {
        match self.kv.get(STATISTICS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let stats = Statistics::default();
                self.save(&stats).await?;
                debug!("Initialized statistics record");
                Ok(stats)
            }
        }
    }

    async fn save(&self, stats: &Statistics) -> Result<()> {
        let raw = serde_json::to_string(stats)?;
        self.kv.put(STATISTICS_KEY, raw).await
    }

    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Statistics),
    {
        let mut stats = self.get().await?;
        mutate(&mut stats);
        self.save(&stats).await
    }

    pub async fn increment_counter(&self, counter: Counter) -> Result<()> {
        self.update(|stats| stats.increment(counter)).await
    }

    pub async fn touch_timestamp(&self) -> Result<()> {
        let now = self.now();
        self.update(|stats| stats.last_run_timestamp = Some(now)).await
    }

    /// Increment a field of today's entry, creating the entry at zero first.
    pub async fn increment_daily(&self, field: DailyField) -> Result<()> {
        let today = self.today();
        self.update(|stats| stats.increment_daily(today, field)).await
    }

    /// Counters applied when a request arrives, before validation.
    pub async fn record_run_started(&self) {
        self.log_failure("totalRuns", self.increment_counter(Counter::TotalRuns).await);
        self.log_failure("lastRunTimestamp", self.touch_timestamp().await);
        self.log_failure("daily.total", self.increment_daily(DailyField::Total).await);
    }

    /// Counters applied once the outcome of a request is known.
    pub async fn record_outcome(&self, success: bool) {
        let (counter, field) = if success {
            (Counter::SuccessfulRuns, DailyField::Successful)
        } else {
            (Counter::FailedRuns, DailyField::Failed)
        };
        self.log_failure(&counter.to_string(), self.increment_counter(counter).await);
        self.log_failure(&format!("daily.{}", field), self.increment_daily(field).await);
    }

    fn log_failure(&self, field: &str, result: Result<()>) {
        if let Err(e) = result {
            warn!(
                stat = field,
                backend = self.kv.backend_name(),
                error = %e,
                "Failed to update statistics"
            );
        }
    }
}
