// 🗄️ Document Store - SQLite + WAL
// Schemaless JSON documents grouped in named collections

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StorageError;

/// A JSON object as stored in a collection
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A document together with the id the store assigned to it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

// ============================================================================
// STORE COLLABORATOR
// ============================================================================

/// DocumentStore - insert / get / list-by-field, nothing more
///
/// No transactions and no filters beyond ordering. Ids are opaque strings
/// generated by the store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document and return its new id
    async fn insert(&self, collection: &str, data: Document) -> Result<String, StorageError>;

    /// Fetch one document; `None` when the id is unknown
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StorageError>;

    /// Every document of the collection, ordered by `field` descending
    async fn list_desc(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<StoredDocument>, StorageError>;
}

// ============================================================================
// SQLITE SCHEMA & QUERIES
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<(), StorageError> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT UNIQUE NOT NULL,
            collection TEXT NOT NULL,
            data TEXT NOT NULL,
            inserted_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;

    Ok(())
}

pub fn insert_document(
    conn: &Connection,
    collection: &str,
    data: &Document,
) -> Result<String, StorageError> {
    let doc_id = uuid::Uuid::new_v4().to_string();
    let json = serde_json::to_string(data)?;

    conn.execute(
        "INSERT INTO documents (doc_id, collection, data) VALUES (?1, ?2, ?3)",
        params![doc_id, collection, json],
    )?;

    Ok(doc_id)
}

pub fn get_document(
    conn: &Connection,
    collection: &str,
    doc_id: &str,
) -> Result<Option<StoredDocument>, StorageError> {
    let row: Option<String> = conn
        .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND doc_id = ?2",
            params![collection, doc_id],
            |row| row.get(0),
        )
        .optional()?;

    match row {
        Some(json) => Ok(Some(StoredDocument {
            id: doc_id.to_string(),
            data: serde_json::from_str(&json)?,
        })),
        None => Ok(None),
    }
}

/// Later inserts win ties on the ordering field
pub fn list_documents_desc(
    conn: &Connection,
    collection: &str,
    field: &str,
) -> Result<Vec<StoredDocument>, StorageError> {
    let path = format!("$.{}", field);
    let mut stmt = conn.prepare(
        "SELECT doc_id, data
         FROM documents
         WHERE collection = ?1
         ORDER BY json_extract(data, ?2) DESC, id DESC",
    )?;

    let rows = stmt
        .query_map(params![collection, path], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, json)| -> Result<StoredDocument, StorageError> {
            Ok(StoredDocument {
                id,
                data: serde_json::from_str(&json)?,
            })
        })
        .collect()
}

pub fn count_documents(conn: &Connection, collection: &str) -> Result<i64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;

    Ok(count)
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed [`DocumentStore`]; cheap to clone, one shared connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        setup_database(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn count(&self, collection: &str) -> Result<i64, StorageError> {
        count_documents(&*self.lock()?, collection)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, data: Document) -> Result<String, StorageError> {
        let id = insert_document(&*self.lock()?, collection, &data)?;
        tracing::debug!(collection, id = %id, "document inserted");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StorageError> {
        get_document(&*self.lock()?, collection, id)
    }

    async fn list_desc(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        list_documents_desc(&*self.lock()?, collection, field)
    }
}
