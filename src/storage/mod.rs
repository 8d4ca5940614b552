//! # Local State Files
//!
//! Two files carry state between independently launched steps:
//!
//! - the key=value session file (credentials, user id, token), rewritten in
//!   full on every save with first-seen key order preserved;
//! - the ISBN-to-title catalog, a pretty-printed JSON object with sorted keys.
//!
//! Steps never run concurrently, so neither file is locked.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::FlowError;

const COMMENT_MARKER: char = '#';

/// Ordered key/value pairs as they appear in the session file.
pub type EnvValues = IndexMap<String, String>;

/// ISBN to title, ordered by ISBN.
pub type BookCatalog = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
}

impl EnvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the file, returning an empty map when it does not exist yet.
    pub fn load(&self) -> Result<EnvValues, FlowError> {
        if !self.path.exists() {
            return Ok(EnvValues::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| FlowError::CorruptFile {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(parse_env_lines(&raw))
    }

    /// Merge `updates` into the existing values and rewrite the whole file.
    /// Existing keys keep their position; new keys are appended.
    pub fn save<I, K, V>(&self, updates: I) -> Result<(), FlowError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = self.load()?;
        for (key, value) in updates {
            values.insert(key.into(), value.into());
        }

        fs::write(&self.path, render_env_lines(&values)).map_err(|e| FlowError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), keys = values.len(), "session file written");
        Ok(())
    }
}

fn parse_env_lines(input: &str) -> EnvValues {
    let mut values = EnvValues::new();

    for line in input.lines() {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with(COMMENT_MARKER) {
            continue;
        }

        let Some((key, value)) = raw.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), value.trim().to_string());
    }

    values
}

fn render_env_lines(values: &EnvValues) -> String {
    let mut out = String::new();
    for (key, value) in values {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Replace the catalog file with `books`.
pub fn save_books(path: &Path, books: &BookCatalog) -> Result<(), FlowError> {
    let raw = serde_json::to_string_pretty(books).map_err(|e| FlowError::CorruptFile {
        path: path.to_path_buf(),
        reason: format!("Failed to serialize books: {e}"),
    })?;
    fs::write(path, raw).map_err(|e| FlowError::io(path, e))
}

/// Read the catalog file. It must hold a non-empty JSON object.
pub fn load_books(path: &Path) -> Result<BookCatalog, FlowError> {
    if !path.exists() {
        return Err(FlowError::MissingFile(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path).map_err(|e| FlowError::CorruptFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let data: serde_json::Value = serde_json::from_str(&raw).map_err(|e| FlowError::CorruptFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match data {
        serde_json::Value::Object(map) if !map.is_empty() => Ok(map
            .into_iter()
            .map(|(isbn, title)| {
                let title = match title {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (isbn, title)
            })
            .collect()),
        _ => Err(FlowError::Validation(
            "Books file must contain a non-empty ISBN-to-title mapping.".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> EnvStore {
        EnvStore::new(dir.path().join(".env"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_skips_comments_blanks_and_separatorless_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            "# header\n\nDEMOQA_USERNAME = alice \njunk line\nDEMOQA_TOKEN=a=b\n",
        )
        .unwrap();

        let values = store.load().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["DEMOQA_USERNAME"], "alice");
        assert_eq!(values["DEMOQA_TOKEN"], "a=b");
    }

    #[test]
    fn save_merges_and_keeps_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save([("A", "1"), ("B", "2")]).unwrap();
        store.save([("A", "9"), ("C", "3")]).unwrap();

        let values = store.load().unwrap();
        let keys: Vec<_> = values.keys().cloned().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(values["A"], "9");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A=9\nB=2\nC=3\n");
    }

    #[test]
    fn saving_what_was_loaded_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save([("X", "1"), ("Y", "two")]).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let loaded = store.load().unwrap();
        store.save(loaded.clone()).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.load().unwrap(), loaded);
    }

    #[test]
    fn books_are_written_sorted_and_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let mut books = BookCatalog::new();
        books.insert("b".into(), "Second".into());
        books.insert("a".into(), "First".into());

        save_books(&path, &books).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n  \"a\": \"First\",\n  \"b\": \"Second\"\n}");
        assert_eq!(load_books(&path).unwrap(), books);
    }

    #[test]
    fn load_books_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        assert!(matches!(load_books(&path), Err(FlowError::MissingFile(_))));

        fs::write(&path, "{}").unwrap();
        assert!(matches!(load_books(&path), Err(FlowError::Validation(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_books(&path), Err(FlowError::CorruptFile { .. })));
    }
}
