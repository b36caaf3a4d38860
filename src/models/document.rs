use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{DocumentType, DocumentUuidType};

/// A tracked shipping document: a master bill of lading or an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    /// B/L number linking an invoice back to its master bill.
    pub connector_id: Option<String>,
    pub document_type: DocumentType,
    /// Business identifier: a B/L number (master bill) or reference number (invoice).
    pub document_uuid: String,
    pub document_uuid_type: DocumentUuidType,
    /// Extracted document contents. Replaced wholesale on update.
    pub document_data: Option<Map<String, Value>>,
    /// File metadata (original_filename, content_type, file_size, ...).
    /// Merged key-by-key on update.
    pub document_metadata: Option<Map<String, Value>>,
    pub processing_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DocumentRecord {
    /// Original filename recorded at ingestion, if present in the metadata.
    pub fn original_filename(&self) -> Option<&str> {
        self.document_metadata
            .as_ref()
            .and_then(|m| m.get("original_filename"))
            .and_then(Value::as_str)
    }
}

/// Parameters for inserting a new document record.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub document_type: DocumentType,
    pub document_uuid: String,
    pub document_uuid_type: DocumentUuidType,
    pub connector_id: Option<String>,
    pub document_data: Option<Map<String, Value>>,
    pub document_metadata: Option<Map<String, Value>>,
    pub processing_status: String,
}

impl NewDocument {
    pub fn new(
        document_type: DocumentType,
        document_uuid: impl Into<String>,
        document_uuid_type: DocumentUuidType,
    ) -> Self {
        Self {
            document_type,
            document_uuid: document_uuid.into(),
            document_uuid_type,
            connector_id: None,
            document_data: None,
            document_metadata: None,
            processing_status: "pending".into(),
        }
    }
}

/// Partial update for a document record. Fields left as `None` are untouched.
///
/// `document_data` replaces the stored payload; `document_metadata` is a
/// shallow key-level merge into the existing mapping.
#[derive(Debug, Default)]
pub struct DocumentUpdate {
    pub document_data: Option<Map<String, Value>>,
    pub document_metadata: Option<Map<String, Value>>,
    pub processing_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_document_defaults_to_pending() {
        let doc = NewDocument::new(
            DocumentType::Invoice,
            "REF-001",
            DocumentUuidType::ReferenceNumber,
        );
        assert_eq!(doc.processing_status, "pending");
        assert!(doc.connector_id.is_none());
        assert!(doc.document_data.is_none());
        assert!(doc.document_metadata.is_none());
    }

    #[test]
    fn original_filename_reads_metadata_key() {
        let mut metadata = Map::new();
        metadata.insert("original_filename".into(), json!("invoice_scan.pdf"));
        metadata.insert("file_size".into(), json!(48213));

        let record = DocumentRecord {
            id: 1,
            connector_id: None,
            document_type: DocumentType::Invoice,
            document_uuid: "REF-001".into(),
            document_uuid_type: DocumentUuidType::ReferenceNumber,
            document_data: None,
            document_metadata: Some(metadata),
            processing_status: "pending".into(),
            created_at: Default::default(),
            updated_at: Default::default(),
        };
        assert_eq!(record.original_filename(), Some("invoice_scan.pdf"));
    }

    #[test]
    fn original_filename_absent() {
        let record = DocumentRecord {
            id: 1,
            connector_id: None,
            document_type: DocumentType::MasterBill,
            document_uuid: "BL-001".into(),
            document_uuid_type: DocumentUuidType::BlNumber,
            document_data: None,
            document_metadata: None,
            processing_status: "pending".into(),
            created_at: Default::default(),
            updated_at: Default::default(),
        };
        assert_eq!(record.original_filename(), None);
    }
}
