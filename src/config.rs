// Configuration file handling

use crate::reader::{ErrorCategory, ErrorPolicy, Reader};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub markers: MarkersConfig,

    #[serde(default)]
    pub keywords: KeywordsConfig,

    #[serde(default)]
    pub booleans: BooleansConfig,

    #[serde(default)]
    pub policies: PoliciesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Full-line comment marker
    #[serde(default = "default_comment_marker")]
    pub comment: char,

    /// Soft line-join marker
    #[serde(default = "default_continuation_marker")]
    pub continuation: char,

    /// Keyword/value separator
    #[serde(default = "default_assignment_marker")]
    pub assignment: char,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            comment: default_comment_marker(),
            continuation: default_continuation_marker(),
            assignment: default_assignment_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeywordsConfig {
    /// Match keywords exactly instead of uppercasing them
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooleansConfig {
    /// Tokens recognized as true (case-insensitive)
    #[serde(default = "default_true_tokens")]
    pub true_tokens: Vec<String>,

    /// Tokens recognized as false (case-insensitive)
    #[serde(default = "default_false_tokens")]
    pub false_tokens: Vec<String>,
}

impl Default for BooleansConfig {
    fn default() -> Self {
        Self {
            true_tokens: default_true_tokens(),
            false_tokens: default_false_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliciesConfig {
    #[serde(default = "default_exception_policy")]
    pub missing_mandatory_keyword: ErrorPolicy,

    #[serde(default = "default_silent_policy")]
    pub missing_optional_keyword: ErrorPolicy,

    #[serde(default = "default_warning_policy")]
    pub unexpected_keyword: ErrorPolicy,

    #[serde(default = "default_warning_policy")]
    pub duplicate_keyword: ErrorPolicy,

    #[serde(default = "default_warning_policy")]
    pub conversion_failure: ErrorPolicy,
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            missing_mandatory_keyword: default_exception_policy(),
            missing_optional_keyword: default_silent_policy(),
            unexpected_keyword: default_warning_policy(),
            duplicate_keyword: default_warning_policy(),
            conversion_failure: default_warning_policy(),
        }
    }
}

// Default values
fn default_comment_marker() -> char {
    '#'
}

fn default_continuation_marker() -> char {
    '\\'
}

fn default_assignment_marker() -> char {
    '='
}

fn default_true_tokens() -> Vec<String> {
    vec!["TRUE".to_string(), "YES".to_string(), "ON".to_string()]
}

fn default_false_tokens() -> Vec<String> {
    vec!["FALSE".to_string(), "NO".to_string(), "OFF".to_string()]
}

fn default_exception_policy() -> ErrorPolicy {
    ErrorPolicy::Exception
}

fn default_silent_policy() -> ErrorPolicy {
    ErrorPolicy::Silent
}

fn default_warning_policy() -> ErrorPolicy {
    ErrorPolicy::Warning
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .confspecrc (current directory)
        // 2. ~/.confspecrc (home directory)
        // 3. .confspecrc.toml (current directory)
        // 4. ~/.confspecrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".confspecrc"),
            home.join(".confspecrc"),
            cwd.join(".confspecrc.toml"),
            home.join(".confspecrc.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Push every setting onto a reader
    pub fn apply(&self, reader: &mut Reader) {
        reader.set_comment_marker(self.markers.comment);
        reader.set_continuation_marker(self.markers.continuation);
        reader.set_assignment_marker(self.markers.assignment);
        reader.set_keyword_case_sensitive(self.keywords.case_sensitive);
        reader.set_boolean_tokens(
            self.booleans.true_tokens.clone(),
            self.booleans.false_tokens.clone(),
        );
        reader.set_policy(
            ErrorCategory::MissingMandatoryKeyword,
            self.policies.missing_mandatory_keyword,
        );
        reader.set_policy(
            ErrorCategory::MissingOptionalKeyword,
            self.policies.missing_optional_keyword,
        );
        reader.set_policy(
            ErrorCategory::UnexpectedKeyword,
            self.policies.unexpected_keyword,
        );
        reader.set_policy(
            ErrorCategory::DuplicateKeyword,
            self.policies.duplicate_keyword,
        );
        reader.set_policy(
            ErrorCategory::ConversionFailure,
            self.policies.conversion_failure,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[markers]
comment = ";"
assignment = ":"

[keywords]
case_sensitive = true

[booleans]
true_tokens = ["JA"]
false_tokens = ["NEIN"]

[policies]
duplicate_keyword = "exception"
conversion_failure = "ignore"
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.markers.comment, ';');
        assert_eq!(config.markers.assignment, ':');
        assert_eq!(config.markers.continuation, '\\');
        assert!(config.keywords.case_sensitive);
        assert_eq!(config.booleans.true_tokens, vec!["JA".to_string()]);
        assert_eq!(config.policies.duplicate_keyword, ErrorPolicy::Exception);
        assert_eq!(config.policies.conversion_failure, ErrorPolicy::Ignore);
        assert_eq!(
            config.policies.missing_mandatory_keyword,
            ErrorPolicy::Exception
        );
    }

    #[test]
    fn test_apply_to_reader() {
        let toml = r#"
[markers]
comment = ";"

[policies]
unexpected_keyword = "silent"
"#;
        let config = Config::parse(toml).unwrap();
        let mut reader = Reader::new();
        config.apply(&mut reader);
        assert_eq!(reader.comment_marker(), ';');
        assert_eq!(
            reader.policy(ErrorCategory::UnexpectedKeyword),
            ErrorPolicy::Silent
        );
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let toml_str = config.to_toml();
        assert!(toml_str.contains("[markers]"));
        assert!(toml_str.contains("[policies]"));
        let parsed = Config::parse(&toml_str).unwrap();
        assert_eq!(parsed.markers.assignment, '=');
    }
}
