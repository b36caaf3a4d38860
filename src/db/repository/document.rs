use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde_json::{Map, Value};

use crate::db::DatabaseError;
use crate::models::enums::{DocumentType, DocumentUuidType};
use crate::models::{DocumentFilter, DocumentRecord, DocumentUpdate, NewDocument};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Insert a new document record and return it with its assigned id.
///
/// Duplicate (document_type, document_uuid) pairs are permitted; callers
/// needing idempotent ingest check `get_document_by_uuid` first.
pub fn insert_document(conn: &Connection, doc: &NewDocument) -> Result<DocumentRecord, DatabaseError> {
    let now = Utc::now().naive_utc();
    conn.execute(
        "INSERT INTO freight_documents (connector_id, document_type, document_uuid,
         document_uuid_type, document_data, document_metadata, processing_status,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doc.connector_id,
            doc.document_type.as_str(),
            doc.document_uuid,
            doc.document_uuid_type.as_str(),
            doc.document_data.as_ref().map(serde_json::to_string).transpose()?,
            doc.document_metadata.as_ref().map(serde_json::to_string).transpose()?,
            doc.processing_status,
            now.format(TIMESTAMP_FORMAT).to_string(),
            now.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    let id = conn.last_insert_rowid();

    tracing::info!(
        id,
        document_type = doc.document_type.as_str(),
        document_uuid = %doc.document_uuid,
        "Document record created"
    );

    Ok(DocumentRecord {
        id,
        connector_id: doc.connector_id.clone(),
        document_type: doc.document_type.clone(),
        document_uuid: doc.document_uuid.clone(),
        document_uuid_type: doc.document_uuid_type.clone(),
        document_data: doc.document_data.clone(),
        document_metadata: doc.document_metadata.clone(),
        processing_status: doc.processing_status.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a document record by its id.
pub fn get_document(conn: &Connection, id: i64) -> Result<Option<DocumentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, connector_id, document_type, document_uuid, document_uuid_type,
         document_data, document_metadata, processing_status, created_at, updated_at
         FROM freight_documents WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], read_row);

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get a document record by its business identifier, optionally narrowed by type.
///
/// Duplicate business keys break to the most recent record (highest id).
pub fn get_document_by_uuid(
    conn: &Connection,
    document_uuid: &str,
    document_type: Option<DocumentType>,
) -> Result<Option<DocumentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, connector_id, document_type, document_uuid, document_uuid_type,
         document_data, document_metadata, processing_status, created_at, updated_at
         FROM freight_documents
         WHERE document_uuid = ?1 AND (?2 IS NULL OR document_type = ?2)
         ORDER BY id DESC LIMIT 1",
    )?;

    let result = stmt.query_row(
        params![document_uuid, document_type.map(|t| t.as_str())],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List document records, most recently created first.
pub fn list_documents(
    conn: &Connection,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, connector_id, document_type, document_uuid, document_uuid_type,
         document_data, document_metadata, processing_status, created_at, updated_at
         FROM freight_documents
         WHERE (?1 IS NULL OR document_type = ?1)
           AND (?2 IS NULL OR connector_id = ?2)
         ORDER BY id DESC LIMIT ?3 OFFSET ?4",
    )?;

    let rows = stmt.query_map(
        params![
            filter.document_type.as_ref().map(|t| t.as_str()),
            filter.connector_id,
            filter.limit,
            filter.offset,
        ],
        read_row,
    )?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

/// Partially update a document record, returning the updated record.
///
/// `document_data` and `processing_status` overwrite; `document_metadata` is
/// merged key-by-key into the existing mapping (created if absent).
/// Returns `None` when no record has the given id.
pub fn update_document(
    conn: &Connection,
    id: i64,
    update: &DocumentUpdate,
) -> Result<Option<DocumentRecord>, DatabaseError> {
    let mut doc = match get_document(conn, id)? {
        Some(doc) => doc,
        None => return Ok(None),
    };

    if let Some(data) = &update.document_data {
        doc.document_data = Some(data.clone());
    }

    if let Some(status) = &update.processing_status {
        doc.processing_status = status.clone();
    }

    if let Some(metadata) = &update.document_metadata {
        let merged = doc.document_metadata.get_or_insert_with(Map::new);
        for (key, value) in metadata {
            merged.insert(key.clone(), value.clone());
        }
    }

    doc.updated_at = Utc::now().naive_utc();

    conn.execute(
        "UPDATE freight_documents
         SET document_data = ?2, document_metadata = ?3, processing_status = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            id,
            doc.document_data.as_ref().map(serde_json::to_string).transpose()?,
            doc.document_metadata.as_ref().map(serde_json::to_string).transpose()?,
            doc.processing_status,
            doc.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;

    tracing::debug!(id, "Document record updated");
    Ok(Some(doc))
}

/// Resolve any reference to the canonical connector id (B/L number).
///
/// An invoice's recorded link takes precedence: reference numbers and B/L
/// numbers occupy the same string space, so the input is first treated as an
/// invoice reference and only then as a B/L number itself.
pub fn find_connector_id(
    conn: &Connection,
    reference: &str,
) -> Result<Option<String>, DatabaseError> {
    if let Some(invoice) = get_document_by_uuid(conn, reference, Some(DocumentType::Invoice))? {
        if let Some(connector_id) = invoice.connector_id.filter(|c| !c.is_empty()) {
            return Ok(Some(connector_id));
        }
    }

    // A master bill's own business identifier is the connector id
    if let Some(master_bill) = get_document_by_uuid(conn, reference, Some(DocumentType::MasterBill))? {
        return Ok(Some(master_bill.document_uuid));
    }

    Ok(None)
}

/// Record a processing status under the `processing_status` metadata key.
///
/// The top-level `processing_status` column is left untouched; that column
/// only changes through [`update_document`].
pub fn set_processing_status(
    conn: &Connection,
    id: i64,
    status: &str,
) -> Result<Option<DocumentRecord>, DatabaseError> {
    let mut metadata = Map::new();
    metadata.insert("processing_status".into(), Value::String(status.into()));

    tracing::debug!(id, status, "Processing status recorded");
    update_document(
        conn,
        id,
        &DocumentUpdate {
            document_metadata: Some(metadata),
            ..Default::default()
        },
    )
}

// Internal row type for DocumentRecord mapping
struct DocumentRow {
    id: i64,
    connector_id: Option<String>,
    document_type: String,
    document_uuid: String,
    document_uuid_type: String,
    document_data: Option<String>,
    document_metadata: Option<String>,
    processing_status: String,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        connector_id: row.get(1)?,
        document_type: row.get(2)?,
        document_uuid: row.get(3)?,
        document_uuid_type: row.get(4)?,
        document_data: row.get(5)?,
        document_metadata: row.get(6)?,
        processing_status: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<DocumentRecord, DatabaseError> {
    Ok(DocumentRecord {
        id: row.id,
        connector_id: row.connector_id,
        document_type: DocumentType::from_str(&row.document_type)?,
        document_uuid: row.document_uuid,
        document_uuid_type: DocumentUuidType::from_str(&row.document_uuid_type)?,
        document_data: parse_json_column(row.document_data)?,
        document_metadata: parse_json_column(row.document_metadata)?,
        processing_status: row.processing_status,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
    })
}

fn parse_json_column(raw: Option<String>) -> Result<Option<Map<String, Value>>, DatabaseError> {
    match raw {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

fn parse_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .unwrap_or_default()
}
