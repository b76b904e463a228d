//! Java-style `.properties` file parsing.
//!
//! Connector deployments ship configuration as flat properties files;
//! the CLI reads them into the same string map the host framework would
//! hand to the connector.

use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

/// Parse properties text into a key/value map.
///
/// Supports `key=value` and `key: value` lines; `#` and `!` start
/// comments; blank lines are ignored. Later occurrences of a key win.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..split].trim();
        let value = line[split + 1..].trim();
        if !key.is_empty() {
            props.insert(key.to_string(), value.to_string());
        }
    }
    props
}

/// Read and parse a properties file.
pub fn load_properties(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read properties file {path:?}"))?;
    Ok(parse_properties(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let props = parse_properties(
            "# sink connector\n\
             voltdb.servers=h1:21212,h2:21212\n\
             voltdb.procedure: Insert\n\
             \n\
             ! trailing comment\n\
             tasks.max = 2\n",
        );
        assert_eq!(props.get("voltdb.servers").unwrap(), "h1:21212,h2:21212");
        assert_eq!(props.get("voltdb.procedure").unwrap(), "Insert");
        assert_eq!(props.get("tasks.max").unwrap(), "2");
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_later_key_wins() {
        let props = parse_properties("a=1\na=2\n");
        assert_eq!(props.get("a").unwrap(), "2");
    }

    #[test]
    fn test_lines_without_separator_ignored() {
        let props = parse_properties("not a property\n");
        assert!(props.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "voltdb.servers=h1:21212").unwrap();
        writeln!(file, "voltdb.procedure=Insert").unwrap();

        let props = load_properties(file.path()).unwrap();
        assert_eq!(props.get("voltdb.servers").unwrap(), "h1:21212");
        assert_eq!(props.get("voltdb.procedure").unwrap(), "Insert");
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load_properties(std::path::Path::new("/nonexistent/sink.properties")).is_err());
    }
}
