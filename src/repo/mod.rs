pub mod sqlite;

use crate::models::error::Result;
use crate::models::log_entry::NewLogEntry;

/// The durable store collaborator. One operation: append a log entry.
/// Entries are never updated or deleted through this interface.
pub trait LogStore {
    fn insert(&self, entry: &NewLogEntry) -> Result<()>;
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn insert(&self, entry: &NewLogEntry) -> Result<()> {
        (**self).insert(entry)
    }
}
