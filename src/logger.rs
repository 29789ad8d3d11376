use crate::models::config::LoggerConfig;
use crate::models::error::Result;
use crate::models::log_entry::{ContextMap, LogLevel, NewLogEntry, RequestContext};
use crate::repo::sqlite::SqliteLogStore;
use crate::repo::LogStore;
use crate::sink::{LogSink, ProcessLogSink};

/// Leveled, categorized activity logging over a durable store and a
/// best-effort secondary sink.
///
/// Every call attempts one durable write and always mirrors the event to
/// the sink. A failed durable write is reported to the sink at error
/// severity and then swallowed: no call on this type ever returns an
/// error or panics on behalf of the store. Pass a logger handle to the
/// components that need one; there is no process-wide instance.
pub struct ActivityLogger<S: LogStore, K: LogSink> {
    store: S,
    sink: K,
}

impl ActivityLogger<SqliteLogStore, ProcessLogSink> {
    /// Wire up the SQLite store and process-level sink from configuration.
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        Ok(ActivityLogger::new(
            SqliteLogStore::open(config)?,
            ProcessLogSink::new(),
        ))
    }
}

impl<S: LogStore, K: LogSink> ActivityLogger<S, K> {
    pub fn new(store: S, sink: K) -> Self {
        ActivityLogger { store, sink }
    }

    /// Record one event. `context` defaults to an empty map; `request`
    /// carries optional actor/network metadata extracted by the caller.
    pub fn record(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        context: Option<ContextMap>,
        request: Option<&RequestContext>,
    ) {
        let mut entry = NewLogEntry::new(level, category, message);
        if let Some(context) = context {
            entry = entry.with_context(context);
        }
        if let Some(request) = request {
            entry = entry.with_request(request);
        }

        // Durable write first. A failure becomes a sink record and nothing
        // more; logging must not interrupt the calling business logic.
        if let Err(cause) = self.store.insert(&entry) {
            self.sink.write(
                LogLevel::Error,
                &format!("Failed to persist log entry: {}", cause),
                &ContextMap::new(),
            );
        }

        // The original event always reaches the sink, whether or not the
        // durable write succeeded.
        self.sink.write(
            entry.level,
            &format!("[{}] {}", entry.category, entry.message),
            &entry.context,
        );
    }

    pub fn debug(&self, category: &str, message: &str, context: Option<ContextMap>) {
        self.record(LogLevel::Debug, category, message, context, None);
    }

    pub fn info(&self, category: &str, message: &str, context: Option<ContextMap>) {
        self.record(LogLevel::Info, category, message, context, None);
    }

    pub fn warning(&self, category: &str, message: &str, context: Option<ContextMap>) {
        self.record(LogLevel::Warning, category, message, context, None);
    }

    pub fn error(&self, category: &str, message: &str, context: Option<ContextMap>) {
        self.record(LogLevel::Error, category, message, context, None);
    }

    pub fn log_user_activity(
        &self,
        message: &str,
        context: Option<ContextMap>,
        request: Option<&RequestContext>,
    ) {
        self.record(LogLevel::Info, "user", message, context, request);
    }

    pub fn log_translation_activity(
        &self,
        message: &str,
        context: Option<ContextMap>,
        request: Option<&RequestContext>,
    ) {
        self.record(LogLevel::Info, "translation", message, context, request);
    }

    pub fn log_performance(&self, metric: &str, value: f64, unit: &str) {
        let message = format!("Performance metric: {} = {} {}", metric, value, unit);
        self.record(LogLevel::Info, "performance", &message, None, None);
    }

    pub fn log_system_error(&self, message: &str, context: Option<ContextMap>) {
        self.record(LogLevel::Error, "system", message, context, None);
    }
}
