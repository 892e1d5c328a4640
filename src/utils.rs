use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::ShellError;

/// Writes `value` as JSON indented by four spaces, followed by a newline.
pub fn write_json<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}

/// Loads a JSON or YAML payload from disk; `.yaml`/`.yml` files are read as YAML.
pub fn read_payload(path: &Path) -> Result<Value, ShellError> {
    let content = fs::read_to_string(path).map_err(|err| {
        ShellError::input(format!("failed to read {}: {err}", path.display()))
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml" | "yml") => from_yaml(&content)
            .map_err(|err| ShellError::input(format!("malformed YAML in {}: {err}", path.display()))),
        Some("json") => serde_json::from_str(&content)
            .map_err(|err| ShellError::input(format!("malformed JSON in {}: {err}", path.display()))),
        _ => parse_document(&content).map_err(|err| {
            ShellError::input(format!("malformed payload in {}: {err}", path.display()))
        }),
    }
}

/// Parses an inline JSON string, accepting YAML as a fallback.
pub fn parse_inline(name: &str, text: &str) -> Result<Value, ShellError> {
    parse_document(text).map_err(|err| ShellError::input(format!("malformed {name}: {err}")))
}

fn parse_document(text: &str) -> Result<Value, String> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => from_yaml(text).map_err(|_| json_err.to_string()),
    }
}

fn from_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn write_json_indents_by_four_spaces() {
        let mut out = Vec::new();
        write_json(&mut out, &json!({"a": [1, 2]})).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n    \"a\": [\n        1,\n        2\n    ]\n}\n"
        );
    }

    #[test]
    fn read_payload_handles_json_and_yaml_files() {
        let dir = TempDir::new().unwrap();
        let json_file = dir.path().join("topology.json");
        let yaml_file = dir.path().join("topology.yaml");
        fs::write(&json_file, r#"{"nodes": ["r1"]}"#).unwrap();
        fs::write(&yaml_file, "nodes:\n  - r1\n").unwrap();

        assert_eq!(read_payload(&json_file).unwrap(), json!({"nodes": ["r1"]}));
        assert_eq!(read_payload(&yaml_file).unwrap(), json!({"nodes": ["r1"]}));
    }

    #[test]
    fn read_payload_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{nodes: ").unwrap();

        let err = read_payload(&file).unwrap_err();
        assert!(matches!(err, ShellError::Input(_)));
        assert!(err.to_string().contains("malformed JSON"));
    }

    #[test]
    fn read_payload_reports_missing_file() {
        let err = read_payload(Path::new("/nonexistent/topology.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn parse_inline_accepts_json_then_yaml() {
        assert_eq!(
            parse_inline("--host-json", r#"{"host": "h1"}"#).unwrap(),
            json!({"host": "h1"})
        );
        assert_eq!(
            parse_inline("--params", "image: eos").unwrap(),
            json!({"image": "eos"})
        );
        assert!(parse_inline("--params", "{unclosed: [").is_err());
    }
}
