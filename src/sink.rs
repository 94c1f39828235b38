//! MySQL persistence sink.
//!
//! Schema creation and batch upserts are generated from the entity's
//! [`SyncTarget`] column specs. Upserts use `REPLACE INTO`: a row with a
//! conflicting primary key is fully replaced, never partially merged, so
//! repeated runs converge to the same table state. Per-row failures are
//! logged and skipped; the batch always commits as one transaction.

use crate::config::StoreOpts;
use crate::target::SyncTarget;
use crate::value::FlatRecord;
use anyhow::{Context, Result};
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Pool, TxOpts};
use std::time::Duration;
use tracing::{error, info, warn};

const RECONNECT_ATTEMPTS: u32 = 3;
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Build a connection pool from the store options.
pub fn new_pool(store: &StoreOpts) -> Pool {
    let opts = OptsBuilder::default()
        .ip_or_hostname(store.db_host.clone())
        .tcp_port(store.db_port)
        .user(Some(store.db_user.clone()))
        .pass(Some(store.db_password.clone()))
        .db_name(Some(store.db_name.clone()));
    Pool::new(opts)
}

/// `CREATE TABLE IF NOT EXISTS` statement for the target's table.
pub fn create_table_ddl(target: &SyncTarget) -> String {
    let columns: Vec<String> = target
        .columns
        .iter()
        .map(|column| {
            if column.name == target.primary_key {
                format!("    {} {} PRIMARY KEY", column.name, column.ty.ddl())
            } else {
                format!("    {} {}", column.name, column.ty.ddl())
            }
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        target.table,
        columns.join(",\n")
    )
}

/// `REPLACE INTO` statement with one positional placeholder per column.
pub fn replace_stmt(target: &SyncTarget) -> String {
    let names: Vec<&str> = target.columns.iter().map(|c| c.name).collect();
    let placeholders = vec!["?"; target.columns.len()].join(", ");
    format!(
        "REPLACE INTO {} ({}) VALUES ({})",
        target.table,
        names.join(", "),
        placeholders
    )
}

/// A record is only persistable when its primary key flattened to a value.
pub fn has_primary_key(target: &SyncTarget, record: &FlatRecord) -> bool {
    record
        .get(target.primary_key)
        .is_some_and(|value| !value.is_null())
}

/// Idempotent schema creation; safe to call on every run.
pub async fn ensure_schema(conn: &mut Conn, target: &SyncTarget) -> Result<()> {
    conn.query_drop(create_table_ddl(target))
        .await
        .with_context(|| format!("Failed to create table {}", target.table))?;
    info!("Table {} verified/created.", target.table);
    Ok(())
}

/// Upsert a batch of flat records inside one transaction.
///
/// Records without a primary key value and records whose write fails are
/// logged and skipped without aborting the rest of the batch. Returns the
/// number of records attempted (the input size), mirroring what the run
/// summary reports.
pub async fn upsert_batch(
    conn: &mut Conn,
    target: &SyncTarget,
    records: &[FlatRecord],
) -> Result<usize> {
    let stmt = replace_stmt(target);
    let mut tx = conn
        .start_transaction(TxOpts::default())
        .await
        .context("Failed to start upsert transaction")?;

    for record in records {
        if !has_primary_key(target, record) {
            error!(
                "Skipping {} record with null primary key ({})",
                target.entity, target.primary_key
            );
            continue;
        }

        if let Err(e) = tx.exec_drop(stmt.as_str(), record.sql_params()).await {
            error!(
                "Failed to upsert {} record ({} = {:?}): {e}",
                target.entity,
                target.primary_key,
                record.get(target.primary_key)
            );
        }
    }

    tx.commit()
        .await
        .context("Failed to commit upsert transaction")?;

    info!(
        "{} {} upserted into {}.",
        records.len(),
        target.entity,
        target.table
    );
    Ok(records.len())
}

/// Re-establish a working connection from the pool, with bounded retry.
///
/// The fetch phase can outlive the store's idle timeout, so the orchestrator
/// calls this right before persisting. Exhausting the retries is fatal for
/// the run.
pub async fn reconnect(pool: &Pool) -> Result<Conn> {
    let mut last_err: Option<anyhow::Error> = None;

    for attempt in 1..=RECONNECT_ATTEMPTS {
        match pool.get_conn().await {
            Ok(mut conn) => match conn.ping().await {
                Ok(()) => return Ok(conn),
                Err(e) => last_err = Some(e.into()),
            },
            Err(e) => last_err = Some(e.into()),
        }

        if attempt < RECONNECT_ATTEMPTS {
            warn!("Store connection check failed (attempt {attempt}/{RECONNECT_ATTEMPTS}), retrying.");
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    Err(last_err
        .unwrap_or_else(|| anyhow::anyhow!("no connection attempt made"))
        .context(format!(
            "Store connection could not be re-established after {RECONNECT_ATTEMPTS} attempts"
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target;
    use crate::value::FieldValue;

    fn feedbacks_target() -> SyncTarget {
        target::feedbacks(
            "https://example.acelerato.com/api".to_string(),
            "02/04/2025".to_string(),
        )
    }

    #[test]
    fn test_create_table_ddl() {
        let ddl = create_table_ddl(&feedbacks_target());
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS feedbacks ("));
        assert!(ddl.contains("ticketId INT PRIMARY KEY"));
        assert!(ddl.contains("avaliacaoMedia DECIMAL(5,2)"));
        assert!(ddl.contains("comentarios TEXT"));
        // exactly one primary key
        assert_eq!(ddl.matches("PRIMARY KEY").count(), 1);
    }

    #[test]
    fn test_replace_stmt_full_column_list() {
        let target = feedbacks_target();
        let stmt = replace_stmt(&target);
        assert!(stmt.starts_with("REPLACE INTO feedbacks (ticketId, "));
        assert_eq!(stmt.matches('?').count(), target.columns.len());
    }

    #[test]
    fn test_has_primary_key() {
        let target = feedbacks_target();
        let with_pk = crate::flatten(&serde_json::json!({"ticketId": 1}), &target);
        assert!(has_primary_key(&target, &with_pk));

        let without_pk = crate::flatten(&serde_json::json!({"pesquisaId": 2}), &target);
        assert!(!has_primary_key(&target, &without_pk));

        let null_pk = crate::flatten(&serde_json::json!({"ticketId": null}), &target);
        assert!(!has_primary_key(&target, &null_pk));
    }

    #[test]
    fn test_ddl_uses_datetime_for_ticket_dates() {
        let target = target::tickets(
            "https://example.acelerato.com/api".to_string(),
            "02/04/2025".to_string(),
        );
        let ddl = create_table_ddl(&target);
        assert!(ddl.contains("dataDeCriacao DATETIME"));
        assert!(ddl.contains("agenteUltimoAcessoEm DATETIME"));
        assert!(ddl.contains("ticketKey INT PRIMARY KEY"));
    }

    #[test]
    fn test_replace_stmt_params_align_with_record() {
        let target = feedbacks_target();
        let record = crate::flatten(&serde_json::json!({"ticketId": 1}), &target);
        // every declared column gets exactly one value, in order
        assert_eq!(record.len(), target.columns.len());
        assert_eq!(record.get("ticketId"), Some(&FieldValue::Int(1)));
    }
}
