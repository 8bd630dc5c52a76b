//! JSON rendering for document records.

use crate::error::{Error, Result};

use super::DocumentRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document record to JSON.
pub fn to_json(record: &DocumentRecord, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(record),
        JsonFormat::Compact => serde_json::to_string(record),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentMetadata, DocumentResult, LogicalLinks};

    fn record() -> DocumentRecord {
        let doc = DocumentResult::new(
            DocumentMetadata {
                title: Some("Tagebuch".to_string()),
                ..Default::default()
            },
            Vec::new(),
            LogicalLinks::new(),
            Vec::new(),
        );
        DocumentRecord::from(&doc)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Tagebuch\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&record(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_umlauts_are_not_escaped() {
        let mut record = record();
        record.mets_metadata.title = Some("Brief über Österreich".to_string());
        let json = to_json(&record, JsonFormat::Compact).unwrap();
        assert!(json.contains("Brief über Österreich"));
    }
}
