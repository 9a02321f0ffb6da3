// Tests for output formatting and the writer

use super::*;
use apidecl_core::ErrorKind;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Writer that keeps everything written to it
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, Captured) {
    let captured = Captured::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(captured.clone()));
    (writer, captured)
}

fn invalid_report() -> CastReport {
    let mut error = ValidationError::new("username", ErrorKind::TooShort);
    error.options.insert("count".to_string(), json!(3));
    CastReport {
        schema: "Signup".to_string(),
        valid: false,
        value: json!({ "username": "ab", "password": "hunter22" }),
        errors: vec![ErrorEntry {
            error,
            message: "Username is too short (minimum is 3 characters)".to_string(),
        }],
    }
}

#[test]
fn test_cast_report_human() {
    let formatted = format_cast_report_human(&invalid_report()).unwrap();
    assert!(formatted.contains("❌ Signup is invalid - 1 error(s)"));
    assert!(formatted.contains("  • Username is too short (minimum is 3 characters)"));
    assert!(formatted.contains("📝 Value:"));
    assert!(formatted.contains("\"username\": \"ab\""));
}

#[test]
fn test_cast_report_json() {
    let formatted = OutputFormat::Json.format_cast_report(&invalid_report()).unwrap();
    let parsed: Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(parsed["valid"], false);
    assert_eq!(parsed["errors"][0]["type"], "too_short");
    assert_eq!(parsed["errors"][0]["options"]["count"], 3);
}

#[test]
fn test_valid_report_omits_error_list() {
    let report = CastReport {
        schema: "Pet".to_string(),
        valid: true,
        value: json!({ "name": "Rex" }),
        errors: Vec::new(),
    };
    let formatted = format_cast_report_human(&report).unwrap();
    assert!(formatted.starts_with("✅ Pet is valid"));
    assert!(!formatted.contains("•"));
}

#[test]
fn test_status_lines_only_in_human_mode() {
    let (mut human, captured) = writer(OutputFormat::Human, false);
    human.info("Loading").unwrap();
    human.success("Done").unwrap();
    assert_eq!(captured.text(), "INFO: Loading\nDone\n");

    let (mut json, captured) = writer(OutputFormat::Json, false);
    json.info("Loading").unwrap();
    json.success("Done").unwrap();
    json.data(&json!({ "ok": true })).unwrap();
    assert_eq!(captured.text(), "{\"ok\":true}\n");
}

#[test]
fn test_quiet_suppresses_info() {
    let (mut quiet, captured) = writer(OutputFormat::Human, true);
    quiet.info("Loading").unwrap();
    quiet.warning("Careful").unwrap();
    assert_eq!(captured.text(), "WARNING: Careful\n");
}

#[test]
fn test_yaml_data() {
    let (mut yaml, captured) = writer(OutputFormat::Yaml, false);
    yaml.data(&json!({ "title": "Pets" })).unwrap();
    assert_eq!(captured.text(), "title: Pets\n");
}
