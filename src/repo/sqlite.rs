use crate::models::config::LoggerConfig;
use crate::models::error::{ActivityLogError, Result};
use crate::models::log_entry::{ContextMap, LogLevel, LogRow, NewLogEntry};
use crate::repo::LogStore;
use log::{debug, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

type DbPool = Pool<SqliteConnectionManager>;

/// SQLite-backed log store. Owns its connection pool; create one per
/// database file and share it by reference.
pub struct SqliteLogStore {
    pool: DbPool,
}

impl SqliteLogStore {
    /// Open (or create) the database at `db_file` and ensure the log
    /// schema exists. WAL is enabled for on-disk databases only.
    pub fn new(db_file: &str, max_connections: usize) -> Result<Self> {
        if db_file.is_empty() {
            return Err(ActivityLogError::EmptyDatabasePath);
        }

        // r2d2 panics on a zero max_size, and the u32 cast below would
        // silently truncate anything larger
        if max_connections == 0 || max_connections > u32::MAX as usize {
            return Err(ActivityLogError::InvalidPoolSize(max_connections));
        }

        info!("Initializing log store connection pool: {}", db_file);

        let is_in_memory = db_file == ":memory:" || db_file.starts_with("file::memory:");
        let use_wal = !is_in_memory;

        let manager = SqliteConnectionManager::file(db_file).with_init(move |conn| {
            let mut pragmas = String::from(
                "PRAGMA busy_timeout = 5000;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA foreign_keys = ON;",
            );

            if use_wal {
                pragmas.push_str(" PRAGMA journal_mode = WAL;");
            }

            conn.execute_batch(&pragmas)
        });

        let pool = r2d2::Pool::builder()
            .max_size(max_connections as u32)
            .build(manager)
            .map_err(|cause| ActivityLogError::PoolBuild {
                path: db_file.to_string(),
                cause,
            })?;

        let store = SqliteLogStore { pool };
        store.setup_schema()?;

        Ok(store)
    }

    pub fn open(config: &LoggerConfig) -> Result<Self> {
        Self::new(&config.database_file, config.max_connections)
    }

    fn connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(ActivityLogError::PoolCheckout)
    }

    fn setup_schema(&self) -> Result<()> {
        info!("Initializing log store schema");
        let setup_queries = "BEGIN;
        PRAGMA ENCODING = 'UTF-8';

        CREATE TABLE IF NOT EXISTS Activity_Logs(
            ID            integer not null
                constraint Activity_Logs_ID_pk
                    primary key autoincrement,
            Level         TEXT    not null,
            Category      TEXT    not null,
            Message       TEXT    not null,
            Context       TEXT    not null,
            User_Agent    TEXT,
            Ip_Address    TEXT,
            User_Id       integer,
            Created_At    integer not null,
            Updated_At    integer not null,
            constraint Activity_Logs_Level_Check
                check (Level IN ('debug', 'info', 'warning', 'error')));

        CREATE INDEX IF NOT EXISTS Activity_Logs_Level_Created_At_index
                on Activity_Logs (Level, Created_At DESC);

        CREATE INDEX IF NOT EXISTS Activity_Logs_Category_Created_At_index
                on Activity_Logs (Category, Created_At DESC);

        CREATE INDEX IF NOT EXISTS Activity_Logs_User_Id_Created_At_index
                on Activity_Logs (User_Id, Created_At DESC);

        COMMIT;";

        let conn = self.connection()?;
        conn.execute_batch(setup_queries)
            .map_err(|cause| ActivityLogError::Query {
                operation: "create tables".to_string(),
                cause,
            })?;
        info!("Log store schema initialized successfully");
        Ok(())
    }

    /// Query persisted entries with optional filtering, most recent first.
    pub fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogRow>> {
        let conn = self.connection()?;

        // Build dynamic SQL query
        let mut sql = String::from(
            "SELECT ID, Level, Category, Message, Context, User_Agent, Ip_Address, User_Id, Created_At
             FROM Activity_Logs WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(level) = query.level {
            sql.push_str(" AND Level = ?");
            params.push(Box::new(level));
        }

        if let Some(category) = &query.category {
            sql.push_str(" AND Category = ?");
            params.push(Box::new(category.clone()));
        }

        if let Some(user_id) = query.user_id {
            sql.push_str(" AND User_Id = ?");
            params.push(Box::new(user_id));
        }

        if let Some(ts) = query.since {
            sql.push_str(" AND Created_At >= ?");
            params.push(Box::new(ts));
        }

        if let Some(search_term) = &query.search {
            sql.push_str(" AND Message LIKE ?");
            params.push(Box::new(format!("%{}%", search_term)));
        }

        sql.push_str(" ORDER BY Created_At DESC, ID DESC");

        if let Some(lim) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(lim as i64));
        } else if query.offset.is_some() {
            // SQLite requires a LIMIT clause before OFFSET; -1 means unbounded
            sql.push_str(" LIMIT -1");
        }

        if let Some(off) = query.offset {
            sql.push_str(" OFFSET ?");
            params.push(Box::new(off as i64));
        }

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|cause| ActivityLogError::Query {
                operation: "query logs".to_string(),
                cause,
            })?;

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let context: String = row.get(4)?;
                let context: ContextMap = serde_json::from_str(&context).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

                Ok(LogRow {
                    id: row.get(0)?,
                    level: row.get(1)?,
                    category: row.get(2)?,
                    message: row.get(3)?,
                    context,
                    user_agent: row.get(5)?,
                    ip_address: row.get(6)?,
                    user_id: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })
            .map_err(|cause| ActivityLogError::Query {
                operation: "query logs".to_string(),
                cause,
            })?;

        rows.collect::<rusqlite::Result<Vec<LogRow>>>()
            .map_err(|cause| ActivityLogError::Query {
                operation: "collect log rows".to_string(),
                cause,
            })
    }

    /// Total number of persisted entries.
    pub fn count_logs(&self) -> Result<u64> {
        let conn = self.connection()?;

        conn.query_row("SELECT COUNT(*) FROM Activity_Logs", [], |row| row.get(0))
            .map_err(|cause| ActivityLogError::Query {
                operation: "count logs".to_string(),
                cause,
            })
    }
}

impl LogStore for SqliteLogStore {
    /// Append one entry. `Created_At` is assigned here, at write time, and
    /// `Updated_At` is set equal to it; neither is ever touched again.
    fn insert(&self, entry: &NewLogEntry) -> Result<()> {
        let conn = self.connection()?;
        let context = serde_json::to_string(&entry.context)?;
        let created_at = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO Activity_Logs
                (Level, Category, Message, Context, User_Agent, Ip_Address, User_Id, Created_At, Updated_At)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            (
                entry.level,
                &entry.category,
                &entry.message,
                &context,
                &entry.user_agent,
                &entry.ip_address,
                entry.user_id,
                created_at,
                created_at,
            ),
        )
        .map_err(|cause| ActivityLogError::Insert {
            table: "Activity_Logs".to_string(),
            cause,
        })?;

        debug!(
            "Persisted {} entry for category '{}'",
            entry.level, entry.category
        );
        Ok(())
    }
}

/// Filters for [`SqliteLogStore::query_logs`]. All fields optional; the
/// default queries everything.
#[derive(Debug, Default)]
pub struct LogQuery {
    pub level: Option<LogLevel>,
    pub category: Option<String>,
    pub user_id: Option<i64>,
    /// Unix timestamp lower bound on `Created_At`, inclusive.
    pub since: Option<i64>,
    /// Substring match on the message.
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
