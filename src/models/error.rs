use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivityLogError {
    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Database file path cannot be empty. Provide a valid path or use ':memory:' for an in-memory database.")]
    EmptyDatabasePath,

    #[error("Invalid pool size {0}: must be between 1 and {max}", max = u32::MAX)]
    InvalidPoolSize(usize),

    #[error("Failed to create database connection pool for '{path}': {cause}")]
    PoolBuild { path: String, cause: r2d2::Error },

    #[error("Failed to get database connection from pool: {0}")]
    PoolCheckout(r2d2::Error),

    #[error("Database query failed for '{operation}': {cause}")]
    Query {
        operation: String,
        cause: rusqlite::Error,
    },

    #[error("Failed to insert into {table}: {cause}")]
    Insert {
        table: String,
        cause: rusqlite::Error,
    },

    #[error("Failed to serialize log context: {0}")]
    ContextSerialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ActivityLogError>;
