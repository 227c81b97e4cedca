use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use docvault_types::{ContentHash, Version};

use super::{Database, DocumentStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{Document, DocumentId, NewDocument};

const DOCUMENT_COLUMNS: &str = "id, path, title, version, author, hash, created_at, updated_at";

/// [`DocumentStore`] backed by the `documents` table.
#[derive(Clone, Debug)]
pub struct SqliteDocumentStore {
    db: Database,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let units: i64 = row.get(3)?;
    let version = u32::try_from(units)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))
        .and_then(|units| {
            Version::from_units(units).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e))
            })
        })?;
    let hash: String = row.get(5)?;
    let hash = ContentHash::parse(&hash)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Document {
        id: DocumentId::new(row.get(0)?),
        path: row.get(1)?,
        title: row.get(2)?,
        version,
        author: row.get(4)?,
        hash,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn select_by_id(conn: &Connection, id: DocumentId) -> rusqlite::Result<Option<Document>> {
    conn.query_row(
        &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
        params![id.get()],
        document_from_row,
    )
    .optional()
}

impl DocumentStore for SqliteDocumentStore {
    fn find_by_hash(&self, hash: &ContentHash) -> StoreResult<Option<Document>> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE hash = ?1
                     ORDER BY updated_at DESC, id DESC LIMIT 1"
                ),
                params![hash.as_str()],
                document_from_row,
            )
            .optional()
        })
    }

    fn find_by_title(&self, title: &str) -> StoreResult<Option<Document>> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE title = ?1"),
                params![title],
                document_from_row,
            )
            .optional()
        })
    }

    fn insert(&self, document: &NewDocument) -> StoreResult<Document> {
        let now = Utc::now();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (path, title, version, author, hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    document.path,
                    document.title,
                    document.version.units(),
                    document.author,
                    document.hash.as_str(),
                    now,
                ],
            )?;
            Ok(Document {
                id: DocumentId::new(conn.last_insert_rowid()),
                path: document.path.clone(),
                title: document.title.clone(),
                version: document.version,
                author: document.author.clone(),
                hash: document.hash.clone(),
                created_at: now,
                updated_at: now,
            })
        })
    }

    fn update_by_id(
        &self,
        id: DocumentId,
        document: &NewDocument,
    ) -> StoreResult<Option<Document>> {
        let now = Utc::now();
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE documents
                 SET path = ?2, title = ?3, version = ?4, author = ?5, hash = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    id.get(),
                    document.path,
                    document.title,
                    document.version.units(),
                    document.author,
                    document.hash.as_str(),
                    now,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_by_id(conn, id)
        })
    }

    fn update_if_version(
        &self,
        id: DocumentId,
        expected: Version,
        document: &NewDocument,
    ) -> StoreResult<Option<Document>> {
        let now = Utc::now();
        let (changed, current) = self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE documents
                 SET path = ?2, title = ?3, version = ?4, author = ?5, hash = ?6, updated_at = ?7
                 WHERE id = ?1 AND version = ?8",
                params![
                    id.get(),
                    document.path,
                    document.title,
                    document.version.units(),
                    document.author,
                    document.hash.as_str(),
                    now,
                    expected.units(),
                ],
            )?;
            Ok((changed, select_by_id(conn, id)?))
        })?;

        match current {
            Some(current) if changed == 0 => Err(StoreError::Conflict(format!(
                "document {id} is at version {}, expected {expected}",
                current.version
            ))),
            current => Ok(current),
        }
    }

    fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        self.db.with_conn(|conn| select_by_id(conn, id))
    }

    fn list(&self) -> StoreResult<Vec<Document>> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"))?;
            let rows = stmt.query_map([], document_from_row)?;
            let mut documents = Vec::new();
            for row in rows {
                documents.push(row?);
            }
            Ok(documents)
        })
    }

    fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM documents WHERE id = ?1", params![id.get()])?;
            Ok(removed > 0)
        })
    }
}
