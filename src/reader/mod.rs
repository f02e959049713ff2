// Reader module - schema-driven line parser
// Owns the descriptor collection, markers, and per-category error policies

pub mod content;
mod context;

pub use content::{Entry, FileContent};

use crate::diagnostics::{self, MessageContext};
use crate::error::{Error, Result};
use crate::schema::{Descriptor, Outcome, ViolationPolicy};
use crate::value::Value;
use context::ParseContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// What happens when a structural parse error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Drop the occurrence without a trace
    Ignore,
    /// Absorb the occurrence, applying the category's fallback behavior
    Silent,
    /// Absorb like Silent, but emit the templated diagnostic
    Warning,
    /// Abort the parse with the matching error
    Exception,
}

/// Structural parse error categories, each with its own policy and template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    MissingMandatoryKeyword,
    MissingOptionalKeyword,
    UnexpectedKeyword,
    DuplicateKeyword,
    ConversionFailure,
}

#[derive(Debug, Clone)]
struct CategoryRule {
    policy: ErrorPolicy,
    template: String,
}

impl CategoryRule {
    fn new(policy: ErrorPolicy, template: &str) -> Self {
        Self {
            policy,
            template: template.to_string(),
        }
    }
}

/// Per-run statistics useful for inspection and linting
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseDiagnostics {
    pub source: String,
    pub total_lines: usize,
    pub logical_lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    /// Logical lines skipped because no assignment marker was present
    pub missing_assignment: usize,
    /// Source ended while a continuation chain was still open
    pub unterminated_continuation: bool,
}

/// Schema-driven parser for line-oriented `KEY=VALUE` sources.
///
/// The descriptor collection and all configuration are immutable during a
/// parse; per-invocation scratch lives in a context value local to the call,
/// so one Reader can parse any number of sources sequentially.
pub struct Reader {
    descriptors: Vec<Descriptor>,
    index: HashMap<String, usize>,
    comment_marker: char,
    continuation_marker: char,
    assignment_marker: char,
    keyword_case_sensitive: bool,
    true_tokens: Vec<String>,
    false_tokens: Vec<String>,
    missing_mandatory: CategoryRule,
    missing_optional: CategoryRule,
    unexpected: CategoryRule,
    duplicate: CategoryRule,
    conversion: CategoryRule,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            index: HashMap::new(),
            comment_marker: '#',
            continuation_marker: '\\',
            assignment_marker: '=',
            keyword_case_sensitive: false,
            true_tokens: vec!["TRUE".to_string(), "YES".to_string(), "ON".to_string()],
            false_tokens: vec!["FALSE".to_string(), "NO".to_string(), "OFF".to_string()],
            missing_mandatory: CategoryRule::new(
                ErrorPolicy::Exception,
                diagnostics::DEFAULT_MISSING_MANDATORY_TEMPLATE,
            ),
            missing_optional: CategoryRule::new(
                ErrorPolicy::Silent,
                diagnostics::DEFAULT_MISSING_OPTIONAL_TEMPLATE,
            ),
            unexpected: CategoryRule::new(
                ErrorPolicy::Warning,
                diagnostics::DEFAULT_UNEXPECTED_TEMPLATE,
            ),
            duplicate: CategoryRule::new(
                ErrorPolicy::Warning,
                diagnostics::DEFAULT_DUPLICATE_TEMPLATE,
            ),
            conversion: CategoryRule::new(
                ErrorPolicy::Warning,
                diagnostics::DEFAULT_CONVERSION_TEMPLATE,
            ),
        }
    }

    /// Register a descriptor.
    ///
    /// The key is uppercased at insertion unless keyword case sensitivity is
    /// enabled on the reader or on the descriptor itself. Duplicate and empty
    /// keys are rejected here, at schema-build time.
    pub fn add_descriptor(&mut self, mut descriptor: Descriptor) -> Result<()> {
        if descriptor.key().is_empty() {
            return Err(Error::Schema("descriptor key must not be empty".to_string()));
        }
        if !self.keyword_case_sensitive {
            descriptor.normalize_key();
        }
        let key = descriptor.key().to_string();
        if self.index.contains_key(&key) {
            return Err(Error::Schema(format!("duplicate descriptor key `{}`", key)));
        }
        self.index.insert(key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn add_descriptors(&mut self, descriptors: impl IntoIterator<Item = Descriptor>) -> Result<()> {
        for descriptor in descriptors {
            self.add_descriptor(descriptor)?;
        }
        Ok(())
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Look up a registered descriptor by keyword (folded like parse input)
    pub fn descriptor(&self, keyword: &str) -> Option<&Descriptor> {
        let key = self.fold_keyword(keyword);
        self.index.get(&key).map(|&idx| &self.descriptors[idx])
    }

    pub fn comment_marker(&self) -> char {
        self.comment_marker
    }

    pub fn set_comment_marker(&mut self, marker: char) {
        self.comment_marker = marker;
    }

    pub fn continuation_marker(&self) -> char {
        self.continuation_marker
    }

    pub fn set_continuation_marker(&mut self, marker: char) {
        self.continuation_marker = marker;
    }

    pub fn assignment_marker(&self) -> char {
        self.assignment_marker
    }

    pub fn set_assignment_marker(&mut self, marker: char) {
        self.assignment_marker = marker;
    }

    pub fn keyword_case_sensitive(&self) -> bool {
        self.keyword_case_sensitive
    }

    /// Affects descriptors added and sources parsed after the call
    pub fn set_keyword_case_sensitive(&mut self, sensitive: bool) {
        self.keyword_case_sensitive = sensitive;
    }

    pub fn true_tokens(&self) -> &[String] {
        &self.true_tokens
    }

    pub fn false_tokens(&self) -> &[String] {
        &self.false_tokens
    }

    /// Replace the boolean token lists; matching is case-insensitive
    pub fn set_boolean_tokens(&mut self, true_tokens: Vec<String>, false_tokens: Vec<String>) {
        self.true_tokens = true_tokens;
        self.false_tokens = false_tokens;
    }

    pub fn policy(&self, category: ErrorCategory) -> ErrorPolicy {
        self.rule(category).policy
    }

    pub fn set_policy(&mut self, category: ErrorCategory, policy: ErrorPolicy) {
        self.rule_mut(category).policy = policy;
    }

    pub fn template(&self, category: ErrorCategory) -> &str {
        &self.rule(category).template
    }

    pub fn set_template(&mut self, category: ErrorCategory, template: impl Into<String>) {
        self.rule_mut(category).template = template.into();
    }

    /// Parse a file to completion and return its typed content
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<FileContent> {
        self.parse_file_with_diagnostics(path).map(|(content, _)| content)
    }

    /// Like [`parse_file`](Self::parse_file), also returning per-run statistics
    pub fn parse_file_with_diagnostics(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(FileContent, ParseDiagnostics)> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::SourceAccess {
            source_name: source.clone(),
            reason: e,
        })?;
        self.run(&source, BufReader::new(file).lines())
    }

    /// Parse in-memory content under a caller-supplied source name
    pub fn parse_str(&self, source_name: &str, content: &str) -> Result<FileContent> {
        self.parse_str_with_diagnostics(source_name, content)
            .map(|(content, _)| content)
    }

    /// Like [`parse_str`](Self::parse_str), also returning per-run statistics
    pub fn parse_str_with_diagnostics(
        &self,
        source_name: &str,
        content: &str,
    ) -> Result<(FileContent, ParseDiagnostics)> {
        self.run(source_name, content.lines().map(|l| Ok(l.to_string())))
    }

    fn run(
        &self,
        source: &str,
        lines: impl Iterator<Item = std::io::Result<String>>,
    ) -> Result<(FileContent, ParseDiagnostics)> {
        let mut ctx = ParseContext::new(source, self.descriptors.len());
        let mut diag = ParseDiagnostics {
            source: source.to_string(),
            ..ParseDiagnostics::default()
        };

        for line in lines {
            let line = line.map_err(|e| Error::SourceAccess {
                source_name: source.to_string(),
                reason: e,
            })?;
            ctx.lineno += 1;
            diag.total_lines += 1;

            let stripped = line.trim();
            if ctx.pending.is_empty() {
                if stripped.is_empty() {
                    diag.blank_lines += 1;
                    continue;
                }
                if stripped.starts_with(self.comment_marker) {
                    diag.comment_lines += 1;
                    continue;
                }
            }

            // soft join: strip the marker, buffer the trimmed content, read on
            if let Some(rest) = stripped.strip_suffix(self.continuation_marker) {
                if ctx.pending.is_empty() {
                    ctx.pending_lineno = ctx.lineno;
                }
                ctx.pending.push_str(rest.trim_end());
                continue;
            }

            let logical = if ctx.pending.is_empty() {
                line.clone()
            } else {
                let mut joined = std::mem::take(&mut ctx.pending);
                joined.push_str(stripped);
                joined
            };
            diag.logical_lines += 1;
            self.process_line(&mut ctx, &mut diag, &logical)?;
            ctx.pending_lineno = 0;
        }

        // a trailing continuation marker leaves a buffered logical line
        if !ctx.pending.is_empty() {
            diag.unterminated_continuation = true;
            diag.logical_lines += 1;
            let logical = std::mem::take(&mut ctx.pending);
            self.process_line(&mut ctx, &mut diag, &logical)?;
        }

        self.finalize(&mut ctx)?;
        Ok((ctx.content, diag))
    }

    fn process_line(
        &self,
        ctx: &mut ParseContext,
        diag: &mut ParseDiagnostics,
        line: &str,
    ) -> Result<()> {
        let Some(pos) = line.find(self.assignment_marker) else {
            diag.missing_assignment += 1;
            debug!(
                "skipping line {} of {}: no `{}` marker",
                ctx.logical_lineno(),
                ctx.source,
                self.assignment_marker
            );
            return Ok(());
        };

        let keyword = self.fold_keyword(line[..pos].trim());
        let raw_value = &line[pos + self.assignment_marker.len_utf8()..];

        let Some(&idx) = self.index.get(&keyword) else {
            return self.handle_unexpected(ctx, line, &keyword, raw_value.trim());
        };
        let descriptor = &self.descriptors[idx];
        let mut warned = false;

        if ctx.found[idx] {
            let message = diagnostics::render(
                &self.duplicate.template,
                &self.message_context(ctx, line, &keyword, Some(descriptor), raw_value.trim()),
            );
            // every non-exception policy reparses and overwrites in place
            match self.duplicate.policy {
                ErrorPolicy::Ignore | ErrorPolicy::Silent => {}
                ErrorPolicy::Warning => {
                    warn!("{message}");
                    warned = true;
                }
                ErrorPolicy::Exception => {
                    return Err(Error::DuplicateKeyword { keyword, message });
                }
            }
        } else {
            ctx.found[idx] = true;
        }

        // trim and fold per descriptor, then substitutions in order, then hook
        let meta = *descriptor.metadata();
        let mut value = raw_value.to_string();
        if meta.trim_leading {
            value = value.trim_start().to_string();
        }
        if meta.trim_trailing {
            value = value.trim_end().to_string();
        }
        if !meta.value_case_sensitive {
            value = value.to_uppercase();
        }
        for (find, replace) in descriptor.substitutions() {
            value = value.replace(find.as_str(), replace.as_str());
        }
        if let Some(hook) = descriptor.pre_parse_hook() {
            value = hook(&value);
        }

        for restriction in descriptor.restrictions() {
            if restriction.check_pre(&value) == Outcome::Violation {
                let message = diagnostics::render(
                    restriction.message(),
                    &self.message_context(ctx, line, &keyword, Some(descriptor), &value),
                );
                match restriction.policy() {
                    ViolationPolicy::Warning => {
                        warn!("{message}");
                        warned = true;
                    }
                    ViolationPolicy::WarningRevert => {
                        warn!("{message}");
                        warned = true;
                        value = descriptor.default().render();
                    }
                    ViolationPolicy::Exception => {
                        return Err(Error::RestrictionViolation { keyword, message });
                    }
                }
            }
        }

        let converted = Value::parse(
            &value,
            descriptor.value_type(),
            meta.list_separator,
            &self.true_tokens,
            &self.false_tokens,
        );
        let mut typed = match converted {
            Some(v) => v,
            None => {
                let message = diagnostics::render(
                    &self.conversion.template,
                    &self.message_context(ctx, line, &keyword, Some(descriptor), &value),
                );
                match self.conversion.policy {
                    ErrorPolicy::Ignore => return Ok(()),
                    ErrorPolicy::Silent => descriptor.default().clone(),
                    ErrorPolicy::Warning => {
                        warn!("{message}");
                        warned = true;
                        descriptor.default().clone()
                    }
                    ErrorPolicy::Exception => {
                        return Err(Error::KeywordParse { keyword, message });
                    }
                }
            }
        };

        for restriction in descriptor.restrictions() {
            if restriction.check_post(&typed) == Outcome::Violation {
                let message = diagnostics::render(
                    restriction.message(),
                    &self.message_context(ctx, line, &keyword, Some(descriptor), &value),
                );
                match restriction.policy() {
                    ViolationPolicy::Warning => {
                        warn!("{message}");
                        warned = true;
                    }
                    ViolationPolicy::WarningRevert => {
                        warn!("{message}");
                        warned = true;
                        typed = descriptor.default().clone();
                    }
                    ViolationPolicy::Exception => {
                        return Err(Error::RestrictionViolation { keyword, message });
                    }
                }
            }
        }

        ctx.content.insert(
            keyword,
            Entry {
                value: typed,
                found_in_source: true,
                triggered_warning: warned,
            },
        );
        Ok(())
    }

    fn handle_unexpected(
        &self,
        ctx: &mut ParseContext,
        line: &str,
        keyword: &str,
        raw_value: &str,
    ) -> Result<()> {
        let message = diagnostics::render(
            &self.unexpected.template,
            &self.message_context(ctx, line, keyword, None, raw_value),
        );
        let warned = match self.unexpected.policy {
            ErrorPolicy::Ignore => return Ok(()),
            ErrorPolicy::Silent => false,
            ErrorPolicy::Warning => {
                warn!("{message}");
                true
            }
            ErrorPolicy::Exception => {
                return Err(Error::UndefinedKeyword {
                    keyword: keyword.to_string(),
                    message,
                });
            }
        };
        // non-schema entries keep the raw text as a plain string
        ctx.content.insert(
            keyword,
            Entry {
                value: Value::String(raw_value.to_string()),
                found_in_source: true,
                triggered_warning: warned,
            },
        );
        Ok(())
    }

    fn finalize(&self, ctx: &mut ParseContext) -> Result<()> {
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if ctx.found[idx] {
                continue;
            }
            let rule = if descriptor.mandatory() {
                &self.missing_mandatory
            } else {
                &self.missing_optional
            };
            let message = diagnostics::render(
                &rule.template,
                &MessageContext {
                    source: ctx.source.clone(),
                    line: String::new(),
                    lineno: ctx.lineno,
                    key: descriptor.key().to_string(),
                    default: descriptor.default().render(),
                    value: String::new(),
                    type_name: descriptor.value_type().as_str().to_string(),
                },
            );
            let warned = match rule.policy {
                ErrorPolicy::Ignore => continue,
                ErrorPolicy::Silent => false,
                ErrorPolicy::Warning => {
                    warn!("{message}");
                    true
                }
                ErrorPolicy::Exception => {
                    return Err(Error::MissingKeyword {
                        keyword: descriptor.key().to_string(),
                        message,
                    });
                }
            };
            ctx.content.insert(
                descriptor.key(),
                Entry {
                    value: descriptor.default().clone(),
                    found_in_source: false,
                    triggered_warning: warned,
                },
            );
        }
        Ok(())
    }

    fn fold_keyword(&self, keyword: &str) -> String {
        if self.keyword_case_sensitive {
            keyword.to_string()
        } else {
            keyword.to_uppercase()
        }
    }

    fn message_context(
        &self,
        ctx: &ParseContext,
        line: &str,
        keyword: &str,
        descriptor: Option<&Descriptor>,
        value: &str,
    ) -> MessageContext {
        MessageContext {
            source: ctx.source.clone(),
            line: line.to_string(),
            lineno: ctx.logical_lineno(),
            key: keyword.to_string(),
            default: descriptor.map(|d| d.default().render()).unwrap_or_default(),
            value: value.to_string(),
            type_name: descriptor
                .map(|d| d.value_type().as_str().to_string())
                .unwrap_or_default(),
        }
    }

    fn rule(&self, category: ErrorCategory) -> &CategoryRule {
        match category {
            ErrorCategory::MissingMandatoryKeyword => &self.missing_mandatory,
            ErrorCategory::MissingOptionalKeyword => &self.missing_optional,
            ErrorCategory::UnexpectedKeyword => &self.unexpected,
            ErrorCategory::DuplicateKeyword => &self.duplicate,
            ErrorCategory::ConversionFailure => &self.conversion,
        }
    }

    fn rule_mut(&mut self, category: ErrorCategory) -> &mut CategoryRule {
        match category {
            ErrorCategory::MissingMandatoryKeyword => &mut self.missing_mandatory,
            ErrorCategory::MissingOptionalKeyword => &mut self.missing_optional,
            ErrorCategory::UnexpectedKeyword => &mut self.unexpected,
            ErrorCategory::DuplicateKeyword => &mut self.duplicate,
            ErrorCategory::ConversionFailure => &mut self.conversion,
        }
    }
}
