use serde::Serialize;

use crate::{ErrorKind, MidweekError, Result};

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Error body shared by every JSON surface: `{"error": ..., "kind": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonError {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&MidweekError> for JsonError {
    fn from(err: &MidweekError) -> Self {
        Self { error: err.to_string(), kind: err.kind() }
    }
}

/// Serialize any program record to JSON.
pub fn convert_to_json<T: Serialize + ?Sized>(value: &T, config: &JsonConfig) -> Result<String> {
    let json = if config.pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    json.map_err(|e| MidweekError::Format(e.to_string()))
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        convert_to_json(value, &self.config)
    }

    pub fn error(&self, err: &MidweekError) -> Result<String> {
        convert_to_json(&JsonError::from(err), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::sample_program;

    #[test]
    fn test_convert_to_json_camel_case() {
        let json = convert_to_json(&sample_program(), &JsonConfig::default()).unwrap();
        assert!(json.contains(r#""weekDateSpan":"week 1: 2022-01-03 - 2022-01-09""#));
        assert!(json.contains(r#""timeBoxMinutes":10"#));
        assert!(json.contains(r#""isStudentTask":true"#));
        assert!(json.contains(r#""studyPoint":null"#));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_convert_to_json_pretty() {
        let program = sample_program();
        let json = convert_to_json(&program.treasures_talk, &JsonConfig { pretty: true }).unwrap();
        assert!(json.contains("\n  \"sectionNumber\": 1"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["footnotes"]["1"], "In the beginning God created the heavens and the earth.");
    }

    #[test]
    fn test_error_body() {
        let err = MidweekError::RangeShape { region: "treasures span", expected: 4, actual: 3 };
        let formatter = JsonFormatter::new(JsonConfig::default());
        let json = formatter.error(&err).unwrap();
        assert!(json.contains(r#""kind":"structural""#));
        assert!(json.contains("expected 4, got 3"));
    }
}
