use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use serde_json::{Map, Value};

/// Arbitrary key-value context attached to a log entry. Opaque to the
/// logger, stored as a JSON object.
pub type ContextMap = Map<String, Value>;

/// Severity of a log entry. The store only accepts these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }

    /// Map onto the `log` crate's levels for the secondary sink.
    pub fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown log level '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

impl ToSql for LogLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LogLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<LogLevel>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Actor and network metadata extracted from an inbound request by the
/// caller. The logger itself never parses requests.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// A log entry ready for persistence. `created_at` is assigned by the
/// store at write time, not carried here.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub context: ContextMap,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewLogEntry {
    pub fn new(level: LogLevel, category: impl Into<String>, message: impl Into<String>) -> Self {
        NewLogEntry {
            level,
            category: category.into(),
            message: message.into(),
            context: ContextMap::new(),
            user_id: None,
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn with_context(mut self, context: ContextMap) -> Self {
        self.context = context;
        self
    }

    pub fn with_request(mut self, request: &RequestContext) -> Self {
        self.user_id = request.user_id;
        self.ip_address = request.ip.clone();
        self.user_agent = request.user_agent.clone();
        self
    }
}

/// A persisted log entry as read back from the store.
#[derive(Debug, Clone, Serialize)]
pub struct LogRow {
    pub id: i64,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub context: ContextMap,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_string_round_trip() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!("critical".parse::<LogLevel>().is_err());
        assert!("INFO".parse::<LogLevel>().is_err());
        assert!("".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_warning_maps_to_log_warn() {
        assert_eq!(LogLevel::Warning.to_log_level(), log::Level::Warn);
        assert_eq!(LogLevel::Debug.to_log_level(), log::Level::Debug);
        assert_eq!(LogLevel::Info.to_log_level(), log::Level::Info);
        assert_eq!(LogLevel::Error.to_log_level(), log::Level::Error);
    }

    #[test]
    fn test_new_entry_defaults_to_empty_context_and_no_request_fields() {
        let entry = NewLogEntry::new(LogLevel::Info, "user", "logged in");

        assert!(entry.context.is_empty());
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.ip_address, None);
        assert_eq!(entry.user_agent, None);
    }

    #[test]
    fn test_with_request_copies_present_fields() {
        let request = RequestContext {
            user_id: Some(42),
            ip: Some("10.0.0.1".to_string()),
            user_agent: Some("curl/8.5.0".to_string()),
        };

        let entry = NewLogEntry::new(LogLevel::Info, "user", "logged in").with_request(&request);

        assert_eq!(entry.user_id, Some(42));
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
    }

    #[test]
    fn test_with_request_keeps_absent_fields_absent() {
        let request = RequestContext {
            user_id: None,
            ip: None,
            user_agent: None,
        };

        let entry = NewLogEntry::new(LogLevel::Debug, "system", "tick").with_request(&request);

        assert_eq!(entry.user_id, None);
        assert_eq!(entry.ip_address, None);
        assert_eq!(entry.user_agent, None);
    }

    #[test]
    fn test_with_context_replaces_default() {
        let mut context = ContextMap::new();
        context.insert("paper_id".to_string(), json!(17));

        let entry =
            NewLogEntry::new(LogLevel::Info, "translation", "paper translated").with_context(context);

        assert_eq!(entry.context.get("paper_id"), Some(&json!(17)));
    }
}
