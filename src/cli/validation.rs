//! CLI argument validation functions
//!
//! This module provides custom value parsers for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

use crate::notifications::{EventData, EventType};

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

pub fn parse_event_type(value: &str) -> Result<EventType, String> {
    value.parse::<EventType>().map_err(|e| e.to_string())
}

/// Parse event data from inline JSON or from `@path`
pub fn parse_event_data(value: &str) -> Result<EventData, String> {
    let json = match value.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Cannot read event data file '{}': {}", path, e))?,
        None => value.to_string(),
    };

    serde_json::from_str(&json).map_err(|e| format!("Invalid event data JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_config_file_path() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        let dir = tempfile::tempdir().unwrap();
        let err = validate_config_file_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not a file"));

        let err = validate_config_file_path("/definitely/missing.toml").unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_parse_inline_event_data() {
        let data = parse_event_data(r#"{"trackingNumber":"TRK-1","signedBy":"J. Doe"}"#).unwrap();
        assert_eq!(data.tracking_number.as_deref(), Some("TRK-1"));
        assert_eq!(data.signed_by.as_deref(), Some("J. Doe"));

        assert!(parse_event_data("{oops").unwrap_err().starts_with("Invalid event data JSON"));
    }

    #[test]
    fn test_parse_event_data_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"invoiceNumber":"INV-9","amount":12}}"#).unwrap();

        let arg = format!("@{}", file.path().display());
        let data = parse_event_data(&arg).unwrap();
        assert_eq!(data.invoice_number.as_deref(), Some("INV-9"));
        assert_eq!(data.amount, Some(12.0));

        assert!(parse_event_data("@/definitely/missing.json").is_err());
    }

    #[test]
    fn test_parse_event_type() {
        assert_eq!(parse_event_type("order_confirmation"), Ok(EventType::OrderConfirmation));
        assert!(parse_event_type("nope").unwrap_err().contains("Unknown event type"));
    }
}
