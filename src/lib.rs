//! acelerato-sync library
//!
//! A library for syncing records from the Acelerato helpdesk REST API into
//! MySQL. Three record types are supported, each landing in its own table:
//!
//! - Tickets (`chamados`)
//! - Time entries (`apontamentos`)
//! - Survey feedbacks (`feedbacks`)
//!
//! All three share one pipeline: fetch every page from a paginated endpoint,
//! flatten each nested JSON record into a flat row through a per-entity rule
//! table, then upsert the whole batch keyed on the record's natural identifier.
//! Repeated runs converge to the same table state (`REPLACE INTO` semantics:
//! a conflicting key fully replaces the stored row).
//!
//! # CLI Usage
//!
//! ```bash
//! # Sync all tickets created since the baseline date
//! acelerato-sync tickets
//!
//! # Bounded test run against the time-entries endpoint
//! acelerato-sync time-entries --max-pages 5
//!
//! # Override the baseline filter for feedbacks
//! acelerato-sync feedbacks --min-creation-date 01/01/2025
//! ```
//!
//! Endpoints, credentials, and store parameters come from the environment
//! (`API_URL_*`, `API_EMAIL`, `API_TOKEN`, `DB_*`), loaded once at startup.

pub mod config;
pub mod fetch;
pub mod flatten;
pub mod sink;
pub mod sync;
pub mod target;
pub mod value;

pub use config::{ApiOpts, StoreOpts};
pub use fetch::{fetch_all, FetchResult, HttpPageFetcher, PageFetcher, PageResponse};
pub use flatten::flatten;
pub use sink::{ensure_schema, new_pool, reconnect, upsert_batch};
pub use sync::{run_sync, SyncOutcome, SyncReport};
pub use target::{ColumnSpec, FieldPath, RecordsWrapper, SqlType, SyncTarget};
pub use value::{FieldValue, FlatRecord};
