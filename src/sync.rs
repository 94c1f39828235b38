//! Sync orchestrator.
//!
//! Wires the paginated fetch, the field mapper, and the persistence sink
//! together for one entity type: connect → ensure schema → fetch all pages →
//! flatten → re-validate the store connection → upsert batch → disconnect.
//! Only store-connection failures are fatal; a fetch that ends early or
//! comes back empty still produces a normal (logged) run.

use crate::config::{ApiOpts, StoreOpts};
use crate::fetch::{fetch_all, HttpPageFetcher};
use crate::flatten::flatten;
use crate::sink;
use crate::target::SyncTarget;
use crate::value::FlatRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Terminal outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Records were fetched and the batch was persisted.
    Completed,
    /// Nothing came back from the API; no write was attempted.
    Empty,
}

/// Summary of one orchestrator invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub entity: &'static str,
    pub pages_fetched: u32,
    pub records_fetched: usize,
    /// Records handed to the sink (attempted, not necessarily written).
    pub records_attempted: usize,
    pub outcome: SyncOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Run one full fetch-and-upsert cycle for the given target.
pub async fn run_sync(
    api: &ApiOpts,
    store: &StoreOpts,
    target: &SyncTarget,
    max_pages: Option<u32>,
) -> Result<SyncReport> {
    let started_at = Utc::now();
    info!("=== Starting {} sync with the Acelerato API ===", target.entity);

    let pool = sink::new_pool(store);
    let mut conn = pool.get_conn().await.with_context(|| {
        format!(
            "Failed to connect to MySQL at {}:{}/{}",
            store.db_host, store.db_port, store.db_name
        )
    })?;
    sink::ensure_schema(&mut conn, target).await?;
    drop(conn);

    let fetcher = HttpPageFetcher::new(api, target);
    let fetched = fetch_all(&fetcher, target, max_pages).await;

    if fetched.records.is_empty() {
        warn!("No {} found to sync.", target.entity);
        pool.disconnect()
            .await
            .context("Failed to close connection pool")?;
        info!("=== {} sync finished ===", target.entity);
        return Ok(SyncReport {
            entity: target.entity,
            pages_fetched: fetched.pages,
            records_fetched: 0,
            records_attempted: 0,
            outcome: SyncOutcome::Empty,
            started_at,
            finished_at: Utc::now(),
        });
    }

    let records_fetched = fetched.records.len();
    let flat: Vec<FlatRecord> = fetched
        .records
        .iter()
        .map(|raw| flatten(raw, target))
        .collect();

    // The fetch phase may have outlived the store's idle timeout.
    let mut conn = sink::reconnect(&pool).await?;
    let records_attempted = sink::upsert_batch(&mut conn, target, &flat).await?;
    drop(conn);

    pool.disconnect()
        .await
        .context("Failed to close connection pool")?;

    info!(
        "=== {} sync finished: {} pages, {} records ===",
        target.entity, fetched.pages, records_attempted
    );

    Ok(SyncReport {
        entity: target.entity,
        pages_fetched: fetched.pages,
        records_fetched,
        records_attempted,
        outcome: SyncOutcome::Completed,
        started_at,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_outcomes() {
        let now = Utc::now();
        let report = SyncReport {
            entity: "tickets",
            pages_fetched: 0,
            records_fetched: 0,
            records_attempted: 0,
            outcome: SyncOutcome::Empty,
            started_at: now,
            finished_at: now,
        };
        assert_eq!(report.outcome, SyncOutcome::Empty);
        assert_eq!(report.records_attempted, 0);
    }

    #[test]
    fn test_report_serializes_for_run_logs() {
        let now = Utc::now();
        let report = SyncReport {
            entity: "feedbacks",
            pages_fetched: 2,
            records_fetched: 150,
            records_attempted: 150,
            outcome: SyncOutcome::Completed,
            started_at: now,
            finished_at: now,
        };
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["entity"], "feedbacks");
        assert_eq!(json["outcome"], "Completed");
        assert_eq!(json["records_attempted"], 150);
    }
}
