// Diagnostic message templates with placeholder substitution
// Placeholders: {source} {line} {lineno} {key} {default} {value} {type}

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(source|line|lineno|key|default|value|type)\}")
        .expect("invalid placeholder regex")
});

/// Context substituted into a message template at violation time
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    /// Source identifier (file path or caller-supplied name)
    pub source: String,
    /// Raw text of the offending logical line
    pub line: String,
    /// One-based line number of the offending line
    pub lineno: usize,
    /// Keyword the diagnostic concerns
    pub key: String,
    /// Rendered default value of the keyword's descriptor
    pub default: String,
    /// Raw value text as it stood when the violation fired
    pub value: String,
    /// Name of the keyword's expected value type
    pub type_name: String,
}

/// Substitute every known placeholder in `template` from `ctx`.
///
/// Unknown brace sequences are left untouched.
pub fn render(template: &str, ctx: &MessageContext) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "source" => ctx.source.clone(),
            "line" => ctx.line.clone(),
            "lineno" => ctx.lineno.to_string(),
            "key" => ctx.key.clone(),
            "default" => ctx.default.clone(),
            "value" => ctx.value.clone(),
            "type" => ctx.type_name.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Default template for restriction violations
pub const DEFAULT_RESTRICTION_TEMPLATE: &str =
    "value `{value}` of keyword `{key}` ({source}, line {lineno}) violates a restriction; default is `{default}`";

/// Default template for keywords not present in the schema
pub const DEFAULT_UNEXPECTED_TEMPLATE: &str =
    "unexpected keyword `{key}` ({source}, line {lineno}): `{line}`";

/// Default template for repeated keywords
pub const DEFAULT_DUPLICATE_TEMPLATE: &str =
    "duplicate keyword `{key}` ({source}, line {lineno}); value `{value}` replaces the earlier one";

/// Default template for absent mandatory keywords
pub const DEFAULT_MISSING_MANDATORY_TEMPLATE: &str =
    "mandatory keyword `{key}` not found in {source}";

/// Default template for absent optional keywords
pub const DEFAULT_MISSING_OPTIONAL_TEMPLATE: &str =
    "keyword `{key}` not found in {source}; using default `{default}`";

/// Default template for values that do not convert to the declared type
pub const DEFAULT_CONVERSION_TEMPLATE: &str =
    "cannot convert `{value}` of keyword `{key}` ({source}, line {lineno}) to {type}; default is `{default}`";

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> MessageContext {
        MessageContext {
            source: "app.conf".to_string(),
            line: "PORT=99999".to_string(),
            lineno: 12,
            key: "PORT".to_string(),
            default: "8080".to_string(),
            value: "99999".to_string(),
            type_name: "integer".to_string(),
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let rendered = render(
            "{source}:{lineno} {key}={value} ({type}, default {default}) in `{line}`",
            &sample_context(),
        );
        assert_eq!(
            rendered,
            "app.conf:12 PORT=99999 (integer, default 8080) in `PORT=99999`"
        );
    }

    #[test]
    fn test_render_leaves_unknown_braces() {
        let rendered = render("{key} {unknown} {}", &sample_context());
        assert_eq!(rendered, "PORT {unknown} {}");
    }

    #[test]
    fn test_default_templates_render() {
        let ctx = sample_context();
        let msg = render(DEFAULT_RESTRICTION_TEMPLATE, &ctx);
        assert!(msg.contains("PORT"));
        assert!(msg.contains("99999"));
        assert!(msg.contains("line 12"));
    }
}
