use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChompError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema error in {record}.{field}: {msg}")]
    SchemaError {
        record: String,
        field:  String,
        msg:    String,
    },

    #[error("Validation error on field \"{field}\": {msg}")]
    ValidationError {
        field: String,
        msg:   String,
    },

    #[error("Type mismatch on field \"{field}\": expected {expected}, found {found}")]
    TypeMismatch {
        field:    String,
        expected: String,
        found:    String,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Reader is not bound to a record type")]
    Unbound,
}

impl ChompError {
    pub(crate) fn schema(record: &str, field: &str, msg: impl Into<String>) -> ChompError {
        ChompError::SchemaError {
            record: record.to_owned(),
            field:  field.to_owned(),
            msg:    msg.into(),
        }
    }

    pub fn validation(field: &str, msg: impl Into<String>) -> ChompError {
        ChompError::ValidationError {
            field: field.to_owned(),
            msg:   msg.into(),
        }
    }

    pub fn mismatch(field: &str, expected: impl Into<String>, found: impl Into<String>) -> ChompError {
        ChompError::TypeMismatch {
            field:    field.to_owned(),
            expected: expected.into(),
            found:    found.into(),
        }
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(self, ChompError::SchemaError { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, ChompError::ValidationError { .. })
    }
}
