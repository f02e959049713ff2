// Closed value model for configuration entries
// A value's tag and payload never disagree; rectification collapses native widths

use serde::Serialize;
use std::fmt;

/// Semantic type of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// No value (descriptor without a default)
    None,
    String,
    Integer,
    Real,
    Boolean,
    StringList,
    IntegerList,
    RealList,
    BooleanList,
}

impl ValueType {
    /// Get type name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Real => "real",
            ValueType::Boolean => "boolean",
            ValueType::StringList => "string list",
            ValueType::IntegerList => "integer list",
            ValueType::RealList => "real list",
            ValueType::BooleanList => "boolean list",
        }
    }

    /// Check if this is one of the four list types
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ValueType::StringList
                | ValueType::IntegerList
                | ValueType::RealList
                | ValueType::BooleanList
        )
    }

    /// Scalar type of a list type; scalars map to themselves
    pub fn element_type(&self) -> ValueType {
        match self {
            ValueType::StringList => ValueType::String,
            ValueType::IntegerList => ValueType::Integer,
            ValueType::RealList => ValueType::Real,
            ValueType::BooleanList => ValueType::Boolean,
            other => *other,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain class restricting which value types a validation rule may guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionDomain {
    /// Attaches to any value type
    None,
    String,
    Integer,
    Real,
    /// Integer or Real, scalar or list
    Numeric,
    Boolean,
    StringList,
    IntegerList,
    RealList,
    BooleanList,
}

impl RestrictionDomain {
    /// Compatibility table between a domain class and a value type.
    ///
    /// Boolean and BooleanList values admit no restriction at all; the two
    /// boolean domain classes exist for completeness but never match.
    pub fn admits(&self, value_type: ValueType) -> bool {
        match self {
            RestrictionDomain::None => true,
            RestrictionDomain::String => {
                matches!(value_type, ValueType::String | ValueType::StringList)
            }
            RestrictionDomain::Integer => {
                matches!(value_type, ValueType::Integer | ValueType::IntegerList)
            }
            RestrictionDomain::Real => {
                matches!(value_type, ValueType::Real | ValueType::RealList)
            }
            RestrictionDomain::Numeric => matches!(
                value_type,
                ValueType::Integer
                    | ValueType::IntegerList
                    | ValueType::Real
                    | ValueType::RealList
            ),
            RestrictionDomain::StringList => matches!(value_type, ValueType::StringList),
            RestrictionDomain::IntegerList => matches!(value_type, ValueType::IntegerList),
            RestrictionDomain::RealList => matches!(value_type, ValueType::RealList),
            RestrictionDomain::Boolean | RestrictionDomain::BooleanList => false,
        }
    }
}

/// A typed configuration value
///
/// The payload shape is exactly determined by the tag; `None` carries none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    None,
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    StringList(Vec<String>),
    IntegerList(Vec<i64>),
    RealList(Vec<f64>),
    BooleanList(Vec<bool>),
}

impl Value {
    /// Tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Real(_) => ValueType::Real,
            Value::Boolean(_) => ValueType::Boolean,
            Value::StringList(_) => ValueType::StringList,
            Value::IntegerList(_) => ValueType::IntegerList,
            Value::RealList(_) => ValueType::RealList,
            Value::BooleanList(_) => ValueType::BooleanList,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Render the value as text.
    ///
    /// Integers and reals use decimal text, booleans "true"/"false", lists a
    /// bracketed comma-joined form. Boolean lists render as a marker string of
    /// '1' (true) and 'o' (false); the asymmetry is load-bearing for
    /// compatibility with existing files and must not be "fixed".
    pub fn render(&self) -> String {
        match self {
            Value::None => String::new(),
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Value::StringList(items) => render_list(items),
            Value::IntegerList(items) => render_list(items),
            Value::RealList(items) => render_list(items),
            Value::BooleanList(items) => items.iter().map(|b| if *b { '1' } else { 'o' }).collect(),
        }
    }

    /// Numeric view of a scalar value, if it has one
    pub fn as_real_lossy(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Value::StringList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_integer_list(&self) -> Option<&[i64]> {
        match self {
            Value::IntegerList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_real_list(&self) -> Option<&[f64]> {
        match self {
            Value::RealList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_boolean_list(&self) -> Option<&[bool]> {
        match self {
            Value::BooleanList(items) => Some(items),
            _ => None,
        }
    }

    /// Convert text into a value of the requested type.
    ///
    /// Integer and real parsing is locale independent. Booleans match the
    /// supplied token lists case-insensitively. List types split on
    /// `separator` and convert each trimmed element; any element failure
    /// fails the whole conversion. Returns `None` on conversion failure.
    pub fn parse(
        text: &str,
        value_type: ValueType,
        separator: char,
        true_tokens: &[String],
        false_tokens: &[String],
    ) -> Option<Value> {
        match value_type {
            ValueType::None => Some(Value::None),
            ValueType::String => Some(Value::String(text.to_string())),
            ValueType::Integer => parse_integer(text).map(Value::Integer),
            ValueType::Real => parse_real(text).map(Value::Real),
            ValueType::Boolean => {
                parse_boolean(text, true_tokens, false_tokens).map(Value::Boolean)
            }
            ValueType::StringList => Some(Value::StringList(
                text.split(separator).map(|e| e.trim().to_string()).collect(),
            )),
            ValueType::IntegerList => text
                .split(separator)
                .map(|e| parse_integer(e.trim()))
                .collect::<Option<Vec<_>>>()
                .map(Value::IntegerList),
            ValueType::RealList => text
                .split(separator)
                .map(|e| parse_real(e.trim()))
                .collect::<Option<Vec<_>>>()
                .map(Value::RealList),
            ValueType::BooleanList => text
                .split(separator)
                .map(|e| parse_boolean(e.trim(), true_tokens, false_tokens))
                .collect::<Option<Vec<_>>>()
                .map(Value::BooleanList),
        }
    }
}

fn render_list<T: fmt::Display>(items: &[T]) -> String {
    let joined = items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

fn parse_integer(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

fn parse_real(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

fn parse_boolean(text: &str, true_tokens: &[String], false_tokens: &[String]) -> Option<bool> {
    if true_tokens.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        return Some(true);
    }
    if false_tokens.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        return Some(false);
    }
    None
}

// Rectification: every native integer width collapses to i64, every float
// width to f64, string-likes to String/StringList.

macro_rules! impl_from_integer {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Integer(i64::from(v))
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(v: Vec<$ty>) -> Self {
                    Value::IntegerList(v.into_iter().map(i64::from).collect())
                }
            }
        )+
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::RealList(v.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::RealList(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::BooleanList(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::StringList(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringList(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectification_collapses_widths() {
        assert_eq!(Value::from(7u8), Value::Integer(7));
        assert_eq!(Value::from(-3i16), Value::Integer(-3));
        assert_eq!(Value::from(1.5f32), Value::Real(1.5));
        assert_eq!(
            Value::from(vec![1u16, 2, 3]),
            Value::IntegerList(vec![1, 2, 3])
        );
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::StringList(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_tag_matches_payload() {
        assert_eq!(Value::from(42i64).value_type(), ValueType::Integer);
        assert_eq!(Value::from(true).value_type(), ValueType::Boolean);
        assert_eq!(Value::from(vec![1.0f64]).value_type(), ValueType::RealList);
        assert_eq!(Value::None.value_type(), ValueType::None);
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(Value::Integer(-17).render(), "-17");
        assert_eq!(Value::Real(2.5).render(), "2.5");
        assert_eq!(Value::Boolean(true).render(), "true");
        assert_eq!(Value::Boolean(false).render(), "false");
        assert_eq!(Value::String("plain".into()).render(), "plain");
        assert_eq!(Value::None.render(), "");
    }

    #[test]
    fn test_render_lists() {
        assert_eq!(Value::IntegerList(vec![1, 2, 3]).render(), "[1, 2, 3]");
        assert_eq!(
            Value::StringList(vec!["a".into(), "b".into()]).render(),
            "[a, b]"
        );
        // boolean lists use the historical marker string, not brackets
        assert_eq!(
            Value::BooleanList(vec![true, false, true]).render(),
            "1o1"
        );
    }

    #[test]
    fn test_parse_scalars() {
        let yes = vec!["TRUE".to_string(), "YES".to_string(), "ON".to_string()];
        let no = vec!["FALSE".to_string(), "NO".to_string(), "OFF".to_string()];

        assert_eq!(
            Value::parse("8080", ValueType::Integer, ',', &yes, &no),
            Some(Value::Integer(8080))
        );
        assert_eq!(
            Value::parse("-0.25", ValueType::Real, ',', &yes, &no),
            Some(Value::Real(-0.25))
        );
        assert_eq!(
            Value::parse("yes", ValueType::Boolean, ',', &yes, &no),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            Value::parse("Off", ValueType::Boolean, ',', &yes, &no),
            Some(Value::Boolean(false))
        );
        assert_eq!(Value::parse("maybe", ValueType::Boolean, ',', &yes, &no), None);
        assert_eq!(Value::parse("12x", ValueType::Integer, ',', &yes, &no), None);
    }

    #[test]
    fn test_parse_lists() {
        let yes = vec!["TRUE".to_string(), "YES".to_string(), "ON".to_string()];
        let no = vec!["FALSE".to_string(), "NO".to_string(), "OFF".to_string()];

        assert_eq!(
            Value::parse("1, 2,3", ValueType::IntegerList, ',', &yes, &no),
            Some(Value::IntegerList(vec![1, 2, 3]))
        );
        assert_eq!(
            Value::parse("yes,no,on", ValueType::BooleanList, ',', &yes, &no),
            Some(Value::BooleanList(vec![true, false, true]))
        );
        // one bad element fails the whole conversion
        assert_eq!(
            Value::parse("1,two,3", ValueType::IntegerList, ',', &yes, &no),
            None
        );
        // alternative separator
        assert_eq!(
            Value::parse("a;b", ValueType::StringList, ';', &yes, &no),
            Some(Value::StringList(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn test_domain_table() {
        assert!(RestrictionDomain::Numeric.admits(ValueType::Integer));
        assert!(RestrictionDomain::Numeric.admits(ValueType::RealList));
        assert!(!RestrictionDomain::Numeric.admits(ValueType::String));
        assert!(RestrictionDomain::String.admits(ValueType::StringList));
        assert!(!RestrictionDomain::Integer.admits(ValueType::Real));
        assert!(RestrictionDomain::None.admits(ValueType::Boolean));
    }

    #[test]
    fn test_booleans_are_never_restrictable() {
        for vt in [ValueType::Boolean, ValueType::BooleanList] {
            assert!(!RestrictionDomain::Boolean.admits(vt));
            assert!(!RestrictionDomain::BooleanList.admits(vt));
        }
    }
}
