use thiserror::Error;

/// Why an admin request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("role \"{name}\" still has {users} user(s) and cannot be deleted")]
    RoleInUse { name: String, users: u32 },

    #[error("no {entity} deleted{}", format_details(.details))]
    NothingDeleted {
        entity: &'static str,
        details: Vec<String>,
    },
}

fn format_details(details: &[String]) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(": {}", details.join("; "))
    }
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Envelope status code for this error.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::NothingDeleted { details, .. } if details.is_empty() => 404,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn codes_and_messages() {
        let nf = ValidationError::NotFound {
            entity: "user",
            id: 9,
        };
        assert_eq!(nf.code(), 404);
        assert_eq!(nf.to_string(), "user 9 not found");

        let blocked = ValidationError::NothingDeleted {
            entity: "roles",
            details: vec!["a".into(), "b".into()],
        };
        assert_eq!(blocked.code(), 400);
        assert_eq!(blocked.to_string(), "no roles deleted: a; b");

        assert_eq!(
            ValidationError::invalid("phone", "must match ^1[3-9]\\d{9}$").code(),
            400
        );
    }
}
