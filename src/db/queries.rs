//! Named SQL queries.
//!
//! Queries live in `.sql` files where each statement is introduced by a
//! `-- name: <QueryName> :<kind>` line. The catalog is parsed once at startup
//! and handed to the [`Store`](super::Store); it never changes afterwards.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const CREATE_USER_AUTO_ADMIN: &str = "CreateUserAutoAdmin";
pub const LIST_MODELS: &str = "ListModels";
pub const LIST_DEVICES: &str = "ListDevices";

/// Every query the store issues by name.
const REQUIRED: &[&str] = &[CREATE_USER_AUTO_ADMIN, LIST_MODELS, LIST_DEVICES];

const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "users.sql",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/db/queries/users.sql")),
    ),
    (
        "inventory.sql",
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/db/queries/inventory.sql"
        )),
    ),
];

static NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--\s*name:\s*([A-Za-z0-9_]+)\s*:").expect("valid query name regex")
});

#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    queries: HashMap<String, String>,
}

impl QueryCatalog {
    /// Catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        for (file, source) in BUILTIN_SOURCES {
            catalog
                .extend_from_source(source)
                .with_context(|| format!("Failed to parse built-in queries from {file}"))?;
        }
        catalog.ensure_complete()?;
        Ok(catalog)
    }

    /// Built-in catalog with every `.sql` file in `dir` layered on top.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut catalog = Self::builtin()?;

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read queries directory: {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
                files.push(path);
            }
        }
        files.sort();

        for path in &files {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let parsed = catalog
                .extend_from_source(&source)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            debug!("Loaded {} queries from {}", parsed, path.display());
        }

        if !files.is_empty() {
            info!(
                "Query overrides loaded from {} ({} files)",
                dir.display(),
                files.len()
            );
        }

        Ok(catalog)
    }

    /// Parses annotated SQL and merges it in, returning how many queries were found.
    pub fn extend_from_source(&mut self, source: &str) -> Result<usize> {
        let parsed = parse_named_queries(source);
        if parsed.is_empty() && !source.trim().is_empty() {
            anyhow::bail!("no named queries found (expected '-- name: <QueryName> :<kind>')");
        }

        let count = parsed.len();
        self.queries.extend(parsed);
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.queries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| anyhow::anyhow!("Missing SQL query: {name}"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| !self.queries.contains_key(*name))
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing SQL queries: {}", missing.join(", "));
        }
        Ok(())
    }
}

fn parse_named_queries(source: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();
    let mut current: Option<String> = None;
    let mut buf = String::new();

    let mut flush = |name: Option<String>, buf: &mut String| {
        if let Some(name) = name {
            let text = buf.trim();
            if !text.is_empty() {
                result.insert(name, text.to_string());
            }
        }
        buf.clear();
    };

    for line in source.lines() {
        if let Some(caps) = NAME_LINE.captures(line) {
            flush(current.take(), &mut buf);
            current = Some(caps[1].to_string());
            continue;
        }

        if current.is_some() {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    flush(current, &mut buf);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_required_queries() {
        let catalog = QueryCatalog::builtin().unwrap();
        for name in REQUIRED {
            assert!(catalog.get(name).is_ok(), "missing {name}");
        }
        assert!(catalog.get(LIST_DEVICES).unwrap().contains("FROM devices"));
    }

    #[test]
    fn test_parse_splits_on_name_lines() {
        let source = "\
-- leading comment is ignored
-- name: First :one
SELECT 1;

--name:Second :many
SELECT 2
FROM t;
";
        let parsed = parse_named_queries(source);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["First"], "SELECT 1;");
        assert_eq!(parsed["Second"], "SELECT 2\nFROM t;");
    }

    #[test]
    fn test_empty_body_is_skipped() {
        let parsed = parse_named_queries("-- name: Empty :exec\n\n-- name: Real :one\nSELECT 1");
        assert!(!parsed.contains_key("Empty"));
        assert_eq!(parsed["Real"], "SELECT 1");
    }

    #[test]
    fn test_source_without_names_is_rejected() {
        let mut catalog = QueryCatalog::default();
        assert!(catalog.extend_from_source("SELECT 1;").is_err());
        assert_eq!(catalog.extend_from_source("   ").unwrap(), 0);
    }

    #[test]
    fn test_missing_query_is_an_error() {
        let catalog = QueryCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.get("Nope").is_err());
    }

    #[test]
    fn test_overrides_replace_builtin_text() {
        let dir = std::env::temp_dir().join(format!("telecombase-sql-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("custom.sql"),
            "-- name: ListModels :many\nSELECT 42;\n",
        )
        .unwrap();
        std::fs::write(dir.join("notes.txt"), "not sql").unwrap();

        let catalog = QueryCatalog::with_overrides(&dir).unwrap();
        assert_eq!(catalog.get(LIST_MODELS).unwrap(), "SELECT 42;");
        assert!(catalog.get(CREATE_USER_AUTO_ADMIN).is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }
}
