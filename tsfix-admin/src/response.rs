use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

pub const CODE_OK: u16 = 200;

/// Envelope every admin operation answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub code: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            code: CODE_OK,
        }
    }

    pub fn fail(err: &ValidationError) -> Self {
        Self {
            success: false,
            data: None,
            message: err.to_string(),
            code: err.code(),
        }
    }

    pub fn from_result(result: Result<T, ValidationError>, message: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data, message),
            Err(err) => Self::fail(&err),
        }
    }
}

/// Outcome of a batch delete that removed at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeleted {
    pub deleted: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl BatchDeleted {
    pub fn message(&self, entity: &str) -> String {
        if self.skipped.is_empty() {
            format!("deleted {} {entity}", self.deleted)
        } else {
            format!(
                "deleted {} {entity}; {}",
                self.deleted,
                self.skipped.join("; ")
            )
        }
    }
}

/// Entry of a select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption<V> {
    pub label: String,
    pub value: V,
}
