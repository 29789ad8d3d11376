//! Best-effort activity logging backed by SQLite.
//!
//! [`ActivityLogger`] accepts leveled, categorized events (optionally
//! carrying the acting user, IP, and user agent of an inbound request),
//! persists them to an append-only SQLite table, and mirrors every event
//! to a secondary sink built on the `log` crate. Persistence failures are
//! reported through the sink and swallowed, so a logging call can never
//! fail the caller.

pub mod logger;
pub mod models;
pub mod repo;
pub mod sink;

pub use logger::ActivityLogger;
pub use models::config::{setup_config, LoggerConfig};
pub use models::error::{ActivityLogError, Result};
pub use models::log_entry::{ContextMap, LogLevel, LogRow, NewLogEntry, RequestContext};
pub use repo::sqlite::{LogQuery, SqliteLogStore};
pub use repo::LogStore;
pub use sink::{LogSink, ProcessLogSink};
