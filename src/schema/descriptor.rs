// Schema entry for one keyword: type, default, restrictions, substitutions,
// pre-parse hook, and formatting metadata

use crate::error::{Error, Result};
use crate::schema::restriction::{Restriction, ViolationPolicy};
use crate::value::{Value, ValueType};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whether a membership list names the values that pass or the values that fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Allow,
    Forbid,
}

/// User-supplied transform applied to the raw value before conversion
pub type PreParseHook = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Per-keyword formatting and matching flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Keep the keyword's case when the reader registers it
    pub key_case_sensitive: bool,
    /// Keep the raw value's case; folding uppercases before substitution
    pub value_case_sensitive: bool,
    pub trim_leading: bool,
    pub trim_trailing: bool,
    pub mandatory: bool,
    /// Element separator for the four list types
    pub list_separator: char,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            key_case_sensitive: false,
            value_case_sensitive: true,
            trim_leading: true,
            trim_trailing: true,
            mandatory: false,
            list_separator: ',',
        }
    }
}

/// Schema entry describing one keyword.
///
/// Built once by the caller, then owned by the reader's descriptor collection
/// and treated as immutable for the duration of a parse. The default value
/// and the value type are always mutually consistent; changing either clears
/// restrictions and substitutions, since those were validated against the
/// prior type.
#[derive(Clone)]
pub struct Descriptor {
    key: String,
    value_type: ValueType,
    default: Value,
    restrictions: Vec<Restriction>,
    substitutions: Vec<(String, String)>,
    pre_parse_hook: Option<PreParseHook>,
    meta: Metadata,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("key", &self.key)
            .field("value_type", &self.value_type)
            .field("default", &self.default)
            .field("restrictions", &self.restrictions)
            .field("substitutions", &self.substitutions)
            .field("pre_parse_hook", &self.pre_parse_hook.as_ref().map(|_| ".."))
            .field("meta", &self.meta)
            .finish()
    }
}

impl Descriptor {
    /// Descriptor without a default value; mandatory until overridden
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Result<Self> {
        if value_type == ValueType::None {
            return Err(Error::Schema(
                "descriptor needs a concrete value type".to_string(),
            ));
        }
        let mut descriptor = Self {
            key: String::new(),
            value_type,
            default: Value::None,
            restrictions: Vec::new(),
            substitutions: Vec::new(),
            pre_parse_hook: None,
            meta: Metadata {
                mandatory: true,
                ..Metadata::default()
            },
        };
        descriptor.set_key(key)?;
        Ok(descriptor)
    }

    /// Descriptor with a default value; type inferred, non-mandatory
    pub fn with_default(key: impl Into<String>, default: impl Into<Value>) -> Result<Self> {
        let default = default.into();
        if default.is_none() {
            return Err(Error::Schema(
                "default value must carry a payload".to_string(),
            ));
        }
        let mut descriptor = Self {
            key: String::new(),
            value_type: default.value_type(),
            default,
            restrictions: Vec::new(),
            substitutions: Vec::new(),
            pre_parse_hook: None,
            meta: Metadata::default(),
        };
        descriptor.set_key(key)?;
        Ok(descriptor)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }

    pub fn pre_parse_hook(&self) -> Option<&PreParseHook> {
        self.pre_parse_hook.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    pub fn mandatory(&self) -> bool {
        self.meta.mandatory
    }

    pub fn set_mandatory(&mut self, mandatory: bool) {
        self.meta.mandatory = mandatory;
    }

    /// Set the keyword; trimmed, must be non-empty
    pub fn set_key(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(Error::Schema("descriptor key must not be empty".to_string()));
        }
        self.key = key;
        Ok(())
    }

    pub(crate) fn normalize_key(&mut self) {
        if !self.meta.key_case_sensitive {
            self.key = self.key.to_uppercase();
        }
    }

    /// Replace the default value, inferring the type through rectification.
    ///
    /// Restrictions and substitutions are cleared because they were checked
    /// against the previous type; metadata resets to defaults.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.set_value_keep_metadata(value);
        self.reset_metadata();
    }

    /// Same as [`set_value`](Self::set_value) but preserving metadata flags
    pub fn set_value_keep_metadata(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.value_type = value.value_type();
        self.default = value;
        self.restrictions.clear();
        self.substitutions.clear();
    }

    /// Restore every partition to its defaults
    pub fn reset(&mut self) {
        self.reset_key();
        self.reset_value();
        self.reset_metadata();
        self.reset_parsing_rules();
    }

    /// Clear the keyword; the descriptor is unusable until re-keyed
    pub fn reset_key(&mut self) {
        self.key.clear();
    }

    /// Drop the default and the type; clears restrictions and substitutions
    pub fn reset_value(&mut self) {
        self.default = Value::None;
        self.value_type = ValueType::None;
        self.restrictions.clear();
        self.substitutions.clear();
    }

    pub fn reset_metadata(&mut self) {
        self.meta = Metadata::default();
    }

    /// Clear restrictions, substitutions, and the pre-parse hook
    pub fn reset_parsing_rules(&mut self) {
        self.restrictions.clear();
        self.substitutions.clear();
        self.pre_parse_hook = None;
    }

    /// Attach a restriction after checking domain compatibility against the
    /// descriptor's value type. Fails at schema-build time, never at parse
    /// time.
    pub fn add_restriction(&mut self, restriction: Restriction) -> Result<()> {
        let domain = restriction.domain();
        if !domain.admits(self.value_type) {
            return Err(Error::Schema(format!(
                "restriction domain {:?} does not admit {} keyword `{}`",
                domain, self.value_type, self.key
            )));
        }
        self.restrictions.push(restriction);
        Ok(())
    }

    /// Append a (find, replace) pair; pairs apply in declaration order
    pub fn add_substitution(&mut self, find: impl Into<String>, replace: impl Into<String>) {
        self.substitutions.push((find.into(), replace.into()));
    }

    pub fn set_pre_parse_hook<F>(&mut self, hook: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.pre_parse_hook = Some(Arc::new(hook));
    }

    /// Mandatory keyword constrained to an inclusive numeric range
    pub fn ranged(
        key: impl Into<String>,
        default: impl Into<Value>,
        min: impl Into<Value>,
        max: impl Into<Value>,
        policy: ViolationPolicy,
    ) -> Result<Self> {
        let mut descriptor = Self::with_default(key, default)?;
        descriptor.add_restriction(Restriction::ranged(min, max, policy)?)?;
        descriptor.set_mandatory(true);
        Ok(descriptor)
    }

    /// Mandatory keyword whose raw text must (or must not) appear in a list
    pub fn pre_list_bound(
        key: impl Into<String>,
        default: impl Into<Value>,
        values: Vec<String>,
        mode: ListMode,
        policy: ViolationPolicy,
    ) -> Result<Self> {
        let mut descriptor = Self::with_default(key, default)?;
        descriptor.reject_boolean("membership")?;
        let restriction = match mode {
            ListMode::Allow => Restriction::allowed_strings(values, policy),
            ListMode::Forbid => Restriction::forbidden_strings(values, policy),
        };
        descriptor.add_restriction(restriction)?;
        descriptor.set_mandatory(true);
        Ok(descriptor)
    }

    /// Mandatory keyword whose converted value must (or must not) appear in a
    /// typed list
    pub fn post_list_bound(
        key: impl Into<String>,
        default: impl Into<Value>,
        values: Vec<Value>,
        mode: ListMode,
        policy: ViolationPolicy,
    ) -> Result<Self> {
        let mut descriptor = Self::with_default(key, default)?;
        let mut restriction = Restriction::new(policy);
        match mode {
            ListMode::Allow => restriction.set_post_allowed(values)?,
            ListMode::Forbid => restriction.set_post_forbidden(values)?,
        }
        descriptor.add_restriction(restriction)?;
        descriptor.set_mandatory(true);
        Ok(descriptor)
    }

    /// Mandatory keyword gated by a predicate over the raw text
    pub fn pre_predicate_bound<F>(
        key: impl Into<String>,
        default: impl Into<Value>,
        predicate: F,
        policy: ViolationPolicy,
    ) -> Result<Self>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let mut descriptor = Self::with_default(key, default)?;
        descriptor.reject_boolean("predicate")?;
        descriptor.add_restriction(Restriction::string_predicate(predicate, policy))?;
        descriptor.set_mandatory(true);
        Ok(descriptor)
    }

    /// Mandatory keyword gated by a predicate over the converted value
    pub fn post_predicate_bound<F>(
        key: impl Into<String>,
        default: impl Into<Value>,
        predicate: F,
        policy: ViolationPolicy,
    ) -> Result<Self>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let mut descriptor = Self::with_default(key, default)?;
        descriptor.reject_boolean("predicate")?;
        descriptor.add_restriction(Restriction::value_predicate(predicate, policy))?;
        descriptor.set_mandatory(true);
        Ok(descriptor)
    }

    // booleans admit no restriction at all, including string-domain ones
    fn reject_boolean(&self, kind: &str) -> Result<()> {
        if matches!(
            self.value_type,
            ValueType::Boolean | ValueType::BooleanList
        ) {
            return Err(Error::Schema(format!(
                "{} restriction cannot guard {} keyword `{}`",
                kind, self.value_type, self.key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_default_infers_type() {
        let descriptor = Descriptor::with_default("PORT", 8080).unwrap();
        assert_eq!(descriptor.key(), "PORT");
        assert_eq!(descriptor.value_type(), ValueType::Integer);
        assert_eq!(descriptor.default(), &Value::Integer(8080));
        assert!(!descriptor.mandatory());
    }

    #[test]
    fn test_new_without_default_is_mandatory() {
        let descriptor = Descriptor::new("HOST", ValueType::String).unwrap();
        assert!(descriptor.mandatory());
        assert!(descriptor.default().is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(Descriptor::with_default("  ", 1).is_err());
        assert!(Descriptor::new("", ValueType::String).is_err());
    }

    #[test]
    fn test_key_is_trimmed() {
        let descriptor = Descriptor::with_default("  PORT  ", 1).unwrap();
        assert_eq!(descriptor.key(), "PORT");
    }

    #[test]
    fn test_set_value_clears_parsing_rules() {
        let mut descriptor = Descriptor::ranged("N", 5, 0, 10, ViolationPolicy::Warning).unwrap();
        descriptor.add_substitution("k", "1000");
        assert_eq!(descriptor.restrictions().len(), 1);

        descriptor.set_value("now a string");
        assert_eq!(descriptor.value_type(), ValueType::String);
        assert!(descriptor.restrictions().is_empty());
        assert!(descriptor.substitutions().is_empty());
        assert!(!descriptor.mandatory());
    }

    #[test]
    fn test_set_value_keep_metadata() {
        let mut descriptor = Descriptor::with_default("N", 5).unwrap();
        descriptor.metadata_mut().list_separator = ';';
        descriptor.set_mandatory(true);
        descriptor.set_value_keep_metadata(1.25);
        assert_eq!(descriptor.value_type(), ValueType::Real);
        assert_eq!(descriptor.metadata().list_separator, ';');
        assert!(descriptor.mandatory());
    }

    #[test]
    fn test_range_on_string_is_schema_error() {
        let result = Descriptor::ranged("NAME", "x", 0, 9, ViolationPolicy::Warning);
        assert!(result.is_err());
    }

    #[test]
    fn test_range_on_real_list_is_accepted() {
        let descriptor = Descriptor::ranged(
            "WEIGHTS",
            vec![0.5f64],
            0.0,
            1.0,
            ViolationPolicy::Exception,
        )
        .unwrap();
        assert_eq!(descriptor.value_type(), ValueType::RealList);
        assert_eq!(descriptor.restrictions().len(), 1);
    }

    #[test]
    fn test_list_restriction_on_boolean_is_schema_error() {
        let result = Descriptor::pre_list_bound(
            "FLAG",
            true,
            vec!["yes".to_string()],
            ListMode::Allow,
            ViolationPolicy::Warning,
        );
        assert!(result.is_err());

        let result = Descriptor::post_list_bound(
            "FLAG",
            true,
            vec![Value::Boolean(true)],
            ListMode::Allow,
            ViolationPolicy::Warning,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_factories_set_mandatory() {
        let descriptor = Descriptor::pre_list_bound(
            "LEVEL",
            "INFO",
            vec!["DEBUG".to_string(), "INFO".to_string()],
            ListMode::Allow,
            ViolationPolicy::WarningRevert,
        )
        .unwrap();
        assert!(descriptor.mandatory());
    }

    #[test]
    fn test_reset_partitions() {
        let mut descriptor = Descriptor::ranged("N", 5, 0, 10, ViolationPolicy::Warning).unwrap();
        descriptor.set_pre_parse_hook(|s| s.to_string());
        descriptor.reset();
        assert_eq!(descriptor.key(), "");
        assert!(descriptor.default().is_none());
        assert_eq!(descriptor.value_type(), ValueType::None);
        assert!(descriptor.restrictions().is_empty());
        assert!(descriptor.pre_parse_hook().is_none());
        assert_eq!(descriptor.metadata(), &Metadata::default());
    }
}
