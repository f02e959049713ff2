// Parsed result set: keyword -> (value, found-in-source, triggered-warning)

use crate::error::{Error, Result};
use crate::value::{Value, ValueType};
use serde::Serialize;
use std::collections::HashMap;

/// One parsed keyword entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub value: Value,
    /// False only for defaults inserted by the missing-keyword pass
    pub found_in_source: bool,
    /// True when a warning-policy violation touched this entry
    pub triggered_warning: bool,
}

/// Typed, queryable result of one parse invocation.
///
/// Carries no reference back to the schema that produced it; keys are stored
/// as the reader committed them (uppercased unless case sensitivity was on).
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileContent {
    source: String,
    entries: HashMap<String, Entry>,
}

impl FileContent {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: HashMap::new(),
        }
    }

    /// Source identifier this content was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keywords present, in no particular order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entry(&self, keyword: &str) -> Option<&Entry> {
        self.entries.get(keyword)
    }

    pub fn value_type(&self, keyword: &str) -> Option<ValueType> {
        self.entries.get(keyword).map(|e| e.value.value_type())
    }

    pub fn found_in_source(&self, keyword: &str) -> bool {
        self.entries
            .get(keyword)
            .is_some_and(|e| e.found_in_source)
    }

    pub fn triggered_warning(&self, keyword: &str) -> bool {
        self.entries
            .get(keyword)
            .is_some_and(|e| e.triggered_warning)
    }

    pub fn get_string(&self, keyword: &str) -> Result<&str> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_str()
            .ok_or_else(|| self.mismatch(keyword, ValueType::String, entry))
    }

    pub fn get_integer(&self, keyword: &str) -> Result<i64> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_integer()
            .ok_or_else(|| self.mismatch(keyword, ValueType::Integer, entry))
    }

    pub fn get_real(&self, keyword: &str) -> Result<f64> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_real()
            .ok_or_else(|| self.mismatch(keyword, ValueType::Real, entry))
    }

    pub fn get_boolean(&self, keyword: &str) -> Result<bool> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_boolean()
            .ok_or_else(|| self.mismatch(keyword, ValueType::Boolean, entry))
    }

    pub fn get_string_list(&self, keyword: &str) -> Result<&[String]> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_string_list()
            .ok_or_else(|| self.mismatch(keyword, ValueType::StringList, entry))
    }

    pub fn get_integer_list(&self, keyword: &str) -> Result<&[i64]> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_integer_list()
            .ok_or_else(|| self.mismatch(keyword, ValueType::IntegerList, entry))
    }

    pub fn get_real_list(&self, keyword: &str) -> Result<&[f64]> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_real_list()
            .ok_or_else(|| self.mismatch(keyword, ValueType::RealList, entry))
    }

    pub fn get_boolean_list(&self, keyword: &str) -> Result<&[bool]> {
        let entry = self.lookup(keyword)?;
        entry
            .value
            .as_boolean_list()
            .ok_or_else(|| self.mismatch(keyword, ValueType::BooleanList, entry))
    }

    pub(crate) fn insert(&mut self, keyword: impl Into<String>, entry: Entry) {
        self.entries.insert(keyword.into(), entry);
    }

    fn lookup(&self, keyword: &str) -> Result<&Entry> {
        self.entries.get(keyword).ok_or_else(|| Error::MissingKeyword {
            keyword: keyword.to_string(),
            message: format!("keyword not present in parsed content of `{}`", self.source),
        })
    }

    fn mismatch(&self, keyword: &str, requested: ValueType, entry: &Entry) -> Error {
        Error::TypeMismatch {
            keyword: keyword.to_string(),
            requested,
            stored: entry.value.value_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileContent {
        let mut content = FileContent::new("test.conf");
        content.insert(
            "PORT",
            Entry {
                value: Value::Integer(8080),
                found_in_source: true,
                triggered_warning: false,
            },
        );
        content.insert(
            "RATIO",
            Entry {
                value: Value::Real(0.5),
                found_in_source: false,
                triggered_warning: true,
            },
        );
        content
    }

    #[test]
    fn test_typed_accessors() {
        let content = sample();
        assert_eq!(content.get_integer("PORT").unwrap(), 8080);
        assert_eq!(content.get_real("RATIO").unwrap(), 0.5);
    }

    #[test]
    fn test_type_mismatch() {
        let content = sample();
        let err = content.get_string("PORT").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_absent_keyword() {
        let content = sample();
        assert!(!content.has("ABSENT"));
        let err = content.get_integer("ABSENT").unwrap_err();
        assert!(matches!(err, Error::MissingKeyword { .. }));
    }

    #[test]
    fn test_flags() {
        let content = sample();
        assert!(content.found_in_source("PORT"));
        assert!(!content.found_in_source("RATIO"));
        assert!(content.triggered_warning("RATIO"));
        assert!(!content.triggered_warning("PORT"));
        assert!(!content.found_in_source("ABSENT"));
    }

    #[test]
    fn test_keywords_listing() {
        let content = sample();
        let mut keys: Vec<_> = content.keywords().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["PORT", "RATIO"]);
    }
}
