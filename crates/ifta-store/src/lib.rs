//! Darul Ifta Storage Layer
//!
//! Implements the [`RequestStore`] trait on SQLite.
//!
//! # Architecture
//!
//! - One `requests` table keyed by a 16-byte UUIDv7 blob
//! - A monotonically increasing `seq` column recording insertion order
//! - `CHECK` constraints mirroring the domain invariants (non-empty mandatory
//!   fields, answer fields present exactly when answered)
//! - Review transitions as a single conditional `UPDATE ... RETURNING`
//!
//! File-backed stores run in WAL mode with a separate read connection, so
//! listing queries and writes do not wait on each other. In-memory stores
//! share a single connection.
//!
//! # Examples
//!
//! ```no_run
//! use ifta_store::SqliteStore;
//!
//! let store = SqliteStore::open("darul-ifta.db").unwrap();
//! // Store is now ready for request operations
//! store.close().unwrap();
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use ifta_domain::traits::{
    RequestOrder, RequestQuery, RequestStore, StatusCounts, TransitionOutcome,
};
use ifta_domain::{timestamp_now, NewRequest, Request, RequestId, RequestStatus, Transition};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Columns selected for every request read, in `row_to_request` order
const REQUEST_COLUMNS: &str =
    "id, name, email, phone, category, question, status, answer, mufti_name, created_at, answered_at";

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A connection mutex was poisoned by a panicking holder
    #[error("Store connection lock poisoned")]
    Lock,

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of RequestStore
///
/// The handle owns its connections; share it with `Arc` and call
/// [`SqliteStore::close`] on shutdown.
///
/// # Thread Safety
///
/// Connections sit behind mutexes that are only held for the duration of a
/// single statement, never across an `.await`.
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ifta_store::SqliteStore;
    ///
    /// let store = SqliteStore::open("darul-ifta.db").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path == Path::new(":memory:") {
            return Self::open_in_memory();
        }

        let writer = Connection::open(path)?;
        writer.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            writer.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Self::initialize_schema(&writer)?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        reader.busy_timeout(BUSY_TIMEOUT)?;

        debug!(path = %path.display(), journal_mode = %mode, "Opened request store");

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Some(Mutex::new(reader)),
        })
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        debug!("Opened in-memory request store");
        Ok(Self {
            writer: Mutex::new(conn),
            reader: None,
        })
    }

    /// Close the store, flushing and releasing its connections
    pub fn close(self) -> Result<(), StoreError> {
        if let Some(reader) = self.reader {
            let conn = reader.into_inner().map_err(|_| StoreError::Lock)?;
            conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        }
        let conn = self.writer.into_inner().map_err(|_| StoreError::Lock)?;
        conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        debug!("Closed request store");
        Ok(())
    }

    /// Initialize the database schema
    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn write_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.writer.lock().map_err(|_| StoreError::Lock)
    }

    fn read_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.reader
            .as_ref()
            .unwrap_or(&self.writer)
            .lock()
            .map_err(|_| StoreError::Lock)
    }

    /// Convert RequestId to bytes for storage
    fn id_to_bytes(id: RequestId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to RequestId
    fn bytes_to_id(bytes: &[u8]) -> Result<RequestId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!(
                "Expected 16 bytes for RequestId, got {}",
                bytes.len()
            ))
        })?;
        Ok(RequestId::from_value(u128::from_be_bytes(arr)))
    }

    fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, StoreError> {
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| StoreError::InvalidData(format!("Timestamp out of range: {}", millis)))
    }

    fn conversion_failure(column: usize, ty: Type, err: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
    }

    /// Map a row selected with [`REQUEST_COLUMNS`] to a Request
    fn row_to_request(row: &Row<'_>) -> rusqlite::Result<Request> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_id(&id_bytes)
            .map_err(|e| Self::conversion_failure(0, Type::Blob, e))?;

        let status_str: String = row.get(6)?;
        let status = RequestStatus::parse(&status_str).ok_or_else(|| {
            Self::conversion_failure(
                6,
                Type::Text,
                StoreError::InvalidData(format!("Unknown status: {}", status_str)),
            )
        })?;

        let created_at = Self::millis_to_datetime(row.get(9)?)
            .map_err(|e| Self::conversion_failure(9, Type::Integer, e))?;
        let answered_at = row
            .get::<_, Option<i64>>(10)?
            .map(Self::millis_to_datetime)
            .transpose()
            .map_err(|e| Self::conversion_failure(10, Type::Integer, e))?;

        Ok(Request {
            id,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            category: row.get(4)?,
            question: row.get(5)?,
            status,
            answer: row.get(7)?,
            mufti_name: row.get(8)?,
            created_at,
            answered_at,
        })
    }
}

impl RequestStore for SqliteStore {
    type Error = StoreError;

    fn insert(&self, request: NewRequest) -> Result<Request, Self::Error> {
        let stored = Request {
            id: RequestId::new(),
            name: request.name().to_string(),
            email: request.email().to_string(),
            phone: request.phone().map(str::to_string),
            category: request.category().to_string(),
            question: request.question().to_string(),
            status: RequestStatus::Pending,
            answer: None,
            mufti_name: None,
            created_at: timestamp_now(),
            answered_at: None,
        };

        self.write_conn()?.execute(
            "INSERT INTO requests (id, name, email, phone, category, question, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &Self::id_to_bytes(stored.id),
                &stored.name,
                &stored.email,
                &stored.phone,
                &stored.category,
                &stored.question,
                stored.status.as_str(),
                stored.created_at.timestamp_millis(),
            ],
        )?;

        Ok(stored)
    }

    fn find_by_id(&self, id: RequestId) -> Result<Option<Request>, Self::Error> {
        let request = self
            .read_conn()?
            .query_row(
                &format!("SELECT {} FROM requests WHERE id = ?1", REQUEST_COLUMNS),
                params![&Self::id_to_bytes(id)],
                Self::row_to_request,
            )
            .optional()?;

        Ok(request)
    }

    fn query(&self, query: &RequestQuery) -> Result<Vec<Request>, Self::Error> {
        let mut sql = format!("SELECT {} FROM requests WHERE 1=1", REQUEST_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        match query.order {
            RequestOrder::AnsweredAtDesc => sql.push_str(" ORDER BY answered_at DESC, seq DESC"),
            RequestOrder::CreatedAtDesc => sql.push_str(" ORDER BY created_at DESC, seq DESC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let conn = self.read_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let requests = stmt
            .query_map(&param_refs[..], Self::row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(requests)
    }

    fn transition(
        &self,
        id: RequestId,
        expected: RequestStatus,
        transition: Transition,
    ) -> Result<TransitionOutcome, Self::Error> {
        let id_bytes = Self::id_to_bytes(id);
        let target = transition.target_status();
        let conn = self.write_conn()?;

        let updated = match &transition {
            Transition::Answer {
                answer,
                mufti_name,
                answered_at,
            } => conn
                .query_row(
                    &format!(
                        "UPDATE requests
                         SET status = ?1, answer = ?2, mufti_name = ?3, answered_at = ?4
                         WHERE id = ?5 AND status = ?6
                         RETURNING {}",
                        REQUEST_COLUMNS
                    ),
                    params![
                        target.as_str(),
                        answer,
                        mufti_name,
                        answered_at.timestamp_millis(),
                        &id_bytes,
                        expected.as_str(),
                    ],
                    Self::row_to_request,
                )
                .optional()?,
            Transition::Reject => conn
                .query_row(
                    &format!(
                        "UPDATE requests
                         SET status = ?1
                         WHERE id = ?2 AND status = ?3
                         RETURNING {}",
                        REQUEST_COLUMNS
                    ),
                    params![target.as_str(), &id_bytes, expected.as_str()],
                    Self::row_to_request,
                )
                .optional()?,
        };

        if let Some(request) = updated {
            return Ok(TransitionOutcome::Applied(request));
        }

        // Nothing matched: either the id is unknown or the status moved on
        let current: Option<String> = conn
            .query_row(
                "SELECT status FROM requests WHERE id = ?1",
                params![&id_bytes],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            None => Ok(TransitionOutcome::NotFound),
            Some(status) => RequestStatus::parse(&status)
                .map(TransitionOutcome::Conflict)
                .ok_or_else(|| StoreError::InvalidData(format!("Unknown status: {}", status))),
        }
    }

    fn count_by_status(&self) -> Result<StatusCounts, Self::Error> {
        let conn = self.read_conn()?;
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM requests GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or_default();
            match RequestStatus::parse(&status) {
                Some(RequestStatus::Pending) => counts.pending = count,
                Some(RequestStatus::Answered) => counts.answered = count,
                Some(RequestStatus::Rejected) => counts.rejected = count,
                None => {
                    return Err(StoreError::InvalidData(format!("Unknown status: {}", status)))
                }
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_round_trip() {
        let id = RequestId::new();
        let bytes = SqliteStore::id_to_bytes(id);
        assert_eq!(SqliteStore::bytes_to_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bytes_to_id_rejects_wrong_length() {
        assert!(matches!(
            SqliteStore::bytes_to_id(&[0u8; 4]),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.write_conn().unwrap();
        SqliteStore::initialize_schema(&conn).unwrap();
    }

    #[test]
    fn test_schema_rejects_inconsistent_answer() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.write_conn().unwrap();
        let result = conn.execute(
            "INSERT INTO requests (id, name, email, category, question, status, created_at)
             VALUES (?1, 'Ali', 'a@b.com', 'Fasting', 'Q?', 'Answered', 0)",
            params![SqliteStore::id_to_bytes(RequestId::new())],
        );
        assert!(result.is_err(), "Answered row without an answer must be rejected");
    }

    #[test]
    fn test_schema_rejects_blank_mandatory_field() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.write_conn().unwrap();
        let result = conn.execute(
            "INSERT INTO requests (id, name, email, category, question, created_at)
             VALUES (?1, '   ', 'a@b.com', 'Fasting', 'Q?', 0)",
            params![SqliteStore::id_to_bytes(RequestId::new())],
        );
        assert!(result.is_err());
    }
}
