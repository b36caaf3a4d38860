use super::enums::DocumentType;

/// Filter and pagination for document listings.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    pub document_type: Option<DocumentType>,
    pub connector_id: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            document_type: None,
            connector_id: None,
            limit: 50,
            offset: 0,
        }
    }
}
