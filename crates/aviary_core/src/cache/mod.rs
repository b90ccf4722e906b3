//! Local durable cache: the whole collection as one aggregate blob.
//!
//! # Responsibility
//! - Persist and restore the full item collection verbatim when no remote
//!   store is configured.
//!
//! # Invariants
//! - One snapshot slot; a save replaces the previous snapshot whole.
//! - Restore reproduces ids, field values and collection ordering exactly.
//! - No partial read or write of the blob.

use crate::db::DbError;
use crate::model::item::Item;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "snapshot blob did not round-trip: {err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Serializes the collection into the single snapshot slot, replacing any
/// previous snapshot.
pub fn save_snapshot(conn: &Connection, items: &[Item]) -> CacheResult<()> {
    let payload = serde_json::to_string(items)?;

    conn.execute(
        "INSERT OR REPLACE INTO snapshot (slot, payload, saved_at)
         VALUES (0, ?1, strftime('%s', 'now') * 1000);",
        params![payload],
    )?;

    info!(
        "event=cache_save module=cache status=ok items={} bytes={}",
        items.len(),
        payload.len()
    );
    Ok(())
}

/// Restores the collection from the snapshot slot.
///
/// Returns `None` when no snapshot has ever been saved.
pub fn load_snapshot(conn: &Connection) -> CacheResult<Option<Vec<Item>>> {
    let payload: Option<String> = conn
        .query_row("SELECT payload FROM snapshot WHERE slot = 0;", [], |row| {
            row.get(0)
        })
        .optional()?;

    let Some(payload) = payload else {
        info!("event=cache_load module=cache status=ok items=none");
        return Ok(None);
    };

    let items: Vec<Item> = serde_json::from_str(&payload)?;
    info!(
        "event=cache_load module=cache status=ok items={}",
        items.len()
    );
    Ok(Some(items))
}
