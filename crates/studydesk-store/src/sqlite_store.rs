use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};

use crate::document::{DocId, Document, NewDocument, Payload};
use crate::query::DocQuery;
use crate::sql_query::{compile_query, FOLD_CASE_FN};
use crate::store::{DocumentStore, FieldMutation, StoreError};

const SELECT_COLUMNS: &str = "SELECT id, collection, payload, created, modified FROM documents";

/// SQLite-backed implementation of the DocumentStore trait.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                payload TEXT NOT NULL,
                created INTEGER NOT NULL,
                modified INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created);
            CREATE INDEX IF NOT EXISTS idx_documents_modified ON documents(modified);
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        conn.create_scalar_function(
            FOLD_CASE_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                Ok(match ctx.get_raw(0) {
                    ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                    _ => None,
                })
            },
        )
        .map_err(|e| StoreError::Storage(format!("register {}: {}", FOLD_CASE_FN, e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    /// Read a document from a row result.
    fn row_to_document(row: &rusqlite::Row<'_>) -> Result<Document, StoreError> {
        let id_str: String = row
            .get(0)
            .map_err(|e| StoreError::Storage(format!("row id: {}", e)))?;
        let id: DocId =
            uuid::Uuid::parse_str(&id_str).map_err(|e| StoreError::Storage(e.to_string()))?;
        let collection: String = row
            .get(1)
            .map_err(|e| StoreError::Storage(format!("row collection: {}", e)))?;
        let payload_json: String = row
            .get(2)
            .map_err(|e| StoreError::Storage(format!("row payload: {}", e)))?;
        let payload: Payload = serde_json::from_str(&payload_json)
            .map_err(|e| StoreError::Storage(format!("parse payload: {}", e)))?;
        let created_ms: i64 = row
            .get(3)
            .map_err(|e| StoreError::Storage(format!("row created: {}", e)))?;
        let modified_ms: i64 = row
            .get(4)
            .map_err(|e| StoreError::Storage(format!("row modified: {}", e)))?;

        let created = Utc
            .timestamp_millis_opt(created_ms)
            .single()
            .ok_or_else(|| StoreError::Storage(format!("bad created timestamp: {}", created_ms)))?;
        let modified = Utc
            .timestamp_millis_opt(modified_ms)
            .single()
            .ok_or_else(|| {
                StoreError::Storage(format!("bad modified timestamp: {}", modified_ms))
            })?;

        Ok(Document {
            id,
            collection,
            payload,
            created,
            modified,
        })
    }

    fn collect_rows(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<Document>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Storage(format!("prepare query: {} (sql: {})", e, sql)))?;
        let rows = stmt
            .query_map(params, |row| Ok(Self::row_to_document(row)))
            .map_err(|e| StoreError::Storage(format!("query: {}", e)))?;

        let mut docs = Vec::new();
        for row_result in rows {
            let doc_result = row_result.map_err(|e| StoreError::Storage(format!("row: {}", e)))?;
            docs.push(doc_result?);
        }
        Ok(docs)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn create(&self, collection: &str, doc: NewDocument) -> Result<DocId, StoreError> {
        let conn = self.lock()?;
        let id = uuid::Uuid::new_v4();
        let payload_json =
            serde_json::to_string(&doc.payload).map_err(|e| StoreError::Storage(e.to_string()))?;
        conn.execute(
            "INSERT INTO documents (id, collection, payload, created, modified)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                collection,
                payload_json,
                doc.created.timestamp_millis(),
                doc.modified.timestamp_millis(),
            ],
        )
        .map_err(|e| StoreError::Storage(format!("insert: {}", e)))?;
        Ok(id)
    }

    fn get(&self, collection: &str, id: DocId) -> Result<Option<Document>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("{} WHERE id = ?1 AND collection = ?2", SELECT_COLUMNS);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare get: {}", e)))?;

        let doc = stmt
            .query_row(params![id.to_string(), collection], |row| {
                Ok(Self::row_to_document(row))
            })
            .optional()
            .map_err(|e| StoreError::Storage(format!("query get: {}", e)))?;

        doc.transpose()
    }

    fn update(
        &self,
        collection: &str,
        id: DocId,
        mutations: Vec<FieldMutation>,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let id_str = id.to_string();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StoreError::Storage(format!("begin tx: {}", e)))?;

        let exists: bool = tx
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE id = ?1 AND collection = ?2",
                params![&id_str, collection],
                |row| row.get::<_, i64>(0),
            )
            .map(|c| c > 0)
            .map_err(|e| StoreError::Storage(format!("check exists: {}", e)))?;
        if !exists {
            return Err(StoreError::NotFound(id));
        }

        for mutation in &mutations {
            match mutation {
                FieldMutation::SetPayload(field, value) => {
                    let json_val = serde_json::to_string(value)
                        .map_err(|e| StoreError::Storage(e.to_string()))?;
                    let path = format!("$.{}", field);
                    tx.execute(
                        "UPDATE documents SET payload = json_set(payload, ?1, json(?2)) WHERE id = ?3",
                        params![path, json_val, &id_str],
                    )
                    .map_err(|e| StoreError::Storage(format!("set payload: {}", e)))?;
                }
                FieldMutation::RemovePayload(field) => {
                    let path = format!("$.{}", field);
                    tx.execute(
                        "UPDATE documents SET payload = json_remove(payload, ?1) WHERE id = ?2",
                        params![path, &id_str],
                    )
                    .map_err(|e| StoreError::Storage(format!("remove payload: {}", e)))?;
                }
                FieldMutation::SetModified(at) => {
                    tx.execute(
                        "UPDATE documents SET modified = ?1 WHERE id = ?2",
                        params![at.timestamp_millis(), &id_str],
                    )
                    .map_err(|e| StoreError::Storage(format!("set modified: {}", e)))?;
                }
            }
        }

        tx.commit()
            .map_err(|e| StoreError::Storage(format!("commit: {}", e)))
    }

    fn delete(&self, collection: &str, id: DocId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "DELETE FROM documents WHERE id = ?1 AND collection = ?2",
                params![id.to_string(), collection],
            )
            .map_err(|e| StoreError::Storage(format!("delete: {}", e)))?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn query(&self, q: &DocQuery) -> Result<Vec<Document>, StoreError> {
        let conn = self.lock()?;
        let compiled = compile_query(q);
        let sql = format!(
            "{} {} {} {}",
            SELECT_COLUMNS, compiled.where_clause, compiled.order_clause, compiled.limit_offset
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> = compiled
            .params
            .iter()
            .map(|p| p as &dyn rusqlite::types::ToSql)
            .collect();
        Self::collect_rows(&conn, &sql, params_ref.as_slice())
    }

    fn count(&self, q: &DocQuery) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let compiled = compile_query(q);
        let sql = format!("SELECT COUNT(*) FROM documents {}", compiled.where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> = compiled
            .params
            .iter()
            .map(|p| p as &dyn rusqlite::types::ToSql)
            .collect();
        let count: i64 = conn
            .query_row(&sql, params_ref.as_slice(), |row| row.get(0))
            .map_err(|e| StoreError::Storage(format!("count: {}", e)))?;
        Ok(count as usize)
    }
}
