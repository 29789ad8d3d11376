use crate::models::log_entry::{ContextMap, LogLevel};
use serde_json::Value;

/// The best-effort secondary output. Implementations must be treated as
/// always-available: `write` has no failure path.
pub trait LogSink {
    fn write(&self, level: LogLevel, message: &str, context: &ContextMap);
}

impl<K: LogSink + ?Sized> LogSink for &K {
    fn write(&self, level: LogLevel, message: &str, context: &ContextMap) {
        (**self).write(level, message, context)
    }
}

/// Sink that forwards to the `log` crate macros, so events reach whatever
/// process-level logger the host application installed (env_logger etc.).
/// Non-empty context is appended as a JSON object.
pub struct ProcessLogSink;

impl ProcessLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ProcessLogSink {
    fn write(&self, level: LogLevel, message: &str, context: &ContextMap) {
        if context.is_empty() {
            log::log!(level.to_log_level(), "{}", message);
        } else {
            log::log!(
                level.to_log_level(),
                "{} {}",
                message,
                Value::Object(context.clone())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_sink_writes_do_not_panic() {
        let _ = env_logger::builder().is_test(true).try_init();
        let sink = ProcessLogSink::new();

        sink.write(LogLevel::Info, "[user] logged in", &ContextMap::new());

        let mut context = ContextMap::new();
        context.insert("attempt".to_string(), json!(3));
        sink.write(LogLevel::Warning, "[user] login retried", &context);
        sink.write(LogLevel::Error, "[system] store offline", &context);
        sink.write(LogLevel::Debug, "[system] cache warm", &ContextMap::new());
    }
}
