use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One error reported by the external type-checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file_path: Utf8PathBuf,
    /// 1-based.
    pub line: u32,
    /// 1-based.
    pub column: u32,
    /// Numeric checker code without the `TS` prefix, e.g. `"6133"`.
    pub code: String,
    pub message: String,

    /// The trimmed checker output line this was parsed from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw: String,
}

impl Diagnostic {
    /// Code as the checker prints it (`TS6133`).
    pub fn display_code(&self) -> String {
        format!("TS{}", self.code)
    }

    /// Key used to match the same issue across two checker runs.
    ///
    /// Line and column are left out since an applied fix can shift them.
    pub fn identity(&self) -> DiagnosticIdentity {
        DiagnosticIdentity {
            file_path: self.file_path.clone(),
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {} {}",
            self.file_path,
            self.line,
            self.column,
            self.display_code(),
            self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticIdentity {
    pub file_path: Utf8PathBuf,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagnostic {
        Diagnostic {
            file_path: "/repo/src/main.ts".into(),
            line: 3,
            column: 7,
            code: "6133".to_string(),
            message: "'x' is declared but its value is never read.".to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn display_uses_ts_prefix() {
        let d = sample();
        assert_eq!(d.display_code(), "TS6133");
        assert_eq!(
            d.to_string(),
            "/repo/src/main.ts:3:7 TS6133 'x' is declared but its value is never read."
        );
    }

    #[test]
    fn identity_ignores_position() {
        let a = sample();
        let mut b = sample();
        b.line = 10;
        b.column = 1;
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn raw_is_omitted_when_empty() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert!(json.get("raw").is_none());
    }
}
