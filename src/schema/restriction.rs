// A single validation rule: a string-domain check before conversion,
// a typed-domain check after, one violation policy, one message template

use crate::diagnostics::DEFAULT_RESTRICTION_TEMPLATE;
use crate::error::{Error, Result};
use crate::value::{RestrictionDomain, Value, ValueType};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// What happens when a restriction's check fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Abort the parse with a `RestrictionViolation` error
    Exception,
    /// Emit the templated message and keep the offending value
    Warning,
    /// Emit the templated message and fall back to the descriptor's default
    WarningRevert,
}

/// Shape of the check held in a restriction slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    None,
    AllowedList,
    ForbiddenList,
    Range,
    Function,
}

/// Caller-supplied predicate over the raw value text; `true` means acceptable
pub type StringPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Caller-supplied predicate over the converted value; `true` means acceptable
pub type ValuePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Result of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Violation,
}

/// Check applied to the raw string before type conversion
#[derive(Clone, Default)]
pub enum PreCheck {
    #[default]
    None,
    Allowed(Vec<String>),
    Forbidden(Vec<String>),
    Predicate(StringPredicate),
}

/// Check applied to the converted, typed value
#[derive(Clone, Default)]
pub enum PostCheck {
    #[default]
    None,
    Allowed(Vec<Value>),
    Forbidden(Vec<Value>),
    Range { min: Value, max: Value },
    Predicate(ValuePredicate),
}

impl fmt::Debug for PreCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreCheck::None => write!(f, "PreCheck::None"),
            PreCheck::Allowed(items) => write!(f, "PreCheck::Allowed({:?})", items),
            PreCheck::Forbidden(items) => write!(f, "PreCheck::Forbidden({:?})", items),
            PreCheck::Predicate(_) => write!(f, "PreCheck::Predicate(..)"),
        }
    }
}

impl fmt::Debug for PostCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostCheck::None => write!(f, "PostCheck::None"),
            PostCheck::Allowed(items) => write!(f, "PostCheck::Allowed({:?})", items),
            PostCheck::Forbidden(items) => write!(f, "PostCheck::Forbidden({:?})", items),
            PostCheck::Range { min, max } => write!(f, "PostCheck::Range({:?}, {:?})", min, max),
            PostCheck::Predicate(_) => write!(f, "PostCheck::Predicate(..)"),
        }
    }
}

/// One validation rule attached to a keyword descriptor.
///
/// The pre slot and the post slot are independent; setting a new check on a
/// slot discards whatever that slot held before.
#[derive(Debug, Clone)]
pub struct Restriction {
    pre: PreCheck,
    post: PostCheck,
    policy: ViolationPolicy,
    message: String,
}

impl Restriction {
    /// Restriction with no check, only a policy
    pub fn new(policy: ViolationPolicy) -> Self {
        Self {
            pre: PreCheck::None,
            post: PostCheck::None,
            policy,
            message: DEFAULT_RESTRICTION_TEMPLATE.to_string(),
        }
    }

    /// Inclusive numeric range check on the converted value.
    ///
    /// Both bounds must rectify to an integer or a real. The bounds are taken
    /// as given: a reversed range (min > max) rejects every value and is a
    /// caller error, not a detected one.
    pub fn ranged(min: impl Into<Value>, max: impl Into<Value>, policy: ViolationPolicy) -> Result<Self> {
        let mut restriction = Self::new(policy);
        restriction.set_post_range(min, max)?;
        Ok(restriction)
    }

    /// Membership check on the raw string: only the listed values pass
    pub fn allowed_strings(values: Vec<String>, policy: ViolationPolicy) -> Self {
        let mut restriction = Self::new(policy);
        restriction.set_pre_allowed(values);
        restriction
    }

    /// Membership check on the raw string: the listed values fail
    pub fn forbidden_strings(values: Vec<String>, policy: ViolationPolicy) -> Self {
        let mut restriction = Self::new(policy);
        restriction.set_pre_forbidden(values);
        restriction
    }

    /// Caller-supplied predicate over the raw string
    pub fn string_predicate<F>(predicate: F, policy: ViolationPolicy) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let mut restriction = Self::new(policy);
        restriction.set_pre_predicate(predicate);
        restriction
    }

    /// Caller-supplied predicate over the converted value
    pub fn value_predicate<F>(predicate: F, policy: ViolationPolicy) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let mut restriction = Self::new(policy);
        restriction.set_post_predicate(predicate);
        restriction
    }

    pub fn set_pre_allowed(&mut self, values: Vec<String>) {
        self.pre = PreCheck::Allowed(values);
    }

    pub fn set_pre_forbidden(&mut self, values: Vec<String>) {
        self.pre = PreCheck::Forbidden(values);
    }

    pub fn set_pre_predicate<F>(&mut self, predicate: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.pre = PreCheck::Predicate(Arc::new(predicate));
    }

    /// Typed membership check: only the listed values (or list elements) pass
    pub fn set_post_allowed(&mut self, values: Vec<Value>) -> Result<()> {
        validate_membership_values(&values)?;
        self.post = PostCheck::Allowed(values);
        Ok(())
    }

    /// Typed membership check: the listed values (or list elements) fail
    pub fn set_post_forbidden(&mut self, values: Vec<Value>) -> Result<()> {
        validate_membership_values(&values)?;
        self.post = PostCheck::Forbidden(values);
        Ok(())
    }

    pub fn set_post_range(&mut self, min: impl Into<Value>, max: impl Into<Value>) -> Result<()> {
        let min = min.into();
        let max = max.into();
        for bound in [&min, &max] {
            if bound.as_real_lossy().is_none() {
                return Err(Error::Schema(format!(
                    "range bound must be numeric, got {}",
                    bound.value_type()
                )));
            }
        }
        self.post = PostCheck::Range { min, max };
        Ok(())
    }

    pub fn set_post_predicate<F>(&mut self, predicate: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.post = PostCheck::Predicate(Arc::new(predicate));
    }

    pub fn policy(&self) -> ViolationPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ViolationPolicy) {
        self.policy = policy;
    }

    /// Message template rendered when a check fails
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, template: impl Into<String>) {
        self.message = template.into();
    }

    pub fn pre_kind(&self) -> RestrictionKind {
        match &self.pre {
            PreCheck::None => RestrictionKind::None,
            PreCheck::Allowed(_) => RestrictionKind::AllowedList,
            PreCheck::Forbidden(_) => RestrictionKind::ForbiddenList,
            PreCheck::Predicate(_) => RestrictionKind::Function,
        }
    }

    pub fn post_kind(&self) -> RestrictionKind {
        match &self.post {
            PostCheck::None => RestrictionKind::None,
            PostCheck::Allowed(_) => RestrictionKind::AllowedList,
            PostCheck::Forbidden(_) => RestrictionKind::ForbiddenList,
            PostCheck::Range { .. } => RestrictionKind::Range,
            PostCheck::Predicate(_) => RestrictionKind::Function,
        }
    }

    /// Domain class this restriction may attach to.
    ///
    /// Pre-slot checks run on raw text, which every value type has, so they
    /// do not constrain the domain. The post slot decides: a range is
    /// numeric, a typed membership list takes the scalar domain of its
    /// elements, a typed predicate attaches anywhere.
    pub fn domain(&self) -> RestrictionDomain {
        match &self.post {
            PostCheck::None | PostCheck::Predicate(_) => RestrictionDomain::None,
            PostCheck::Range { .. } => RestrictionDomain::Numeric,
            PostCheck::Allowed(values) | PostCheck::Forbidden(values) => values
                .first()
                .map(|v| scalar_domain(v.value_type()))
                .unwrap_or(RestrictionDomain::None),
        }
    }

    /// Evaluate the pre-slot check against the transformed raw string
    pub fn check_pre(&self, raw: &str) -> Outcome {
        let passed = match &self.pre {
            PreCheck::None => true,
            PreCheck::Allowed(values) => values.iter().any(|v| v == raw),
            PreCheck::Forbidden(values) => !values.iter().any(|v| v == raw),
            PreCheck::Predicate(predicate) => predicate(raw),
        };
        if passed { Outcome::Pass } else { Outcome::Violation }
    }

    /// Evaluate the post-slot check against the converted value.
    ///
    /// Membership and range checks apply element-wise to list values; a
    /// predicate sees the whole value.
    pub fn check_post(&self, value: &Value) -> Outcome {
        let passed = match &self.post {
            PostCheck::None => true,
            PostCheck::Allowed(values) => each_scalar(value, |v| values.contains(v)),
            PostCheck::Forbidden(values) => each_scalar(value, |v| !values.contains(v)),
            PostCheck::Range { min, max } => each_scalar(value, |v| in_range(v, min, max)),
            PostCheck::Predicate(predicate) => predicate(value),
        };
        if passed { Outcome::Pass } else { Outcome::Violation }
    }
}

fn validate_membership_values(values: &[Value]) -> Result<()> {
    let mut element_type = None;
    for value in values {
        let ty = value.value_type();
        if ty.is_list() || ty == ValueType::None {
            return Err(Error::Schema(format!(
                "membership values must be scalars, got {}",
                ty
            )));
        }
        match element_type {
            None => element_type = Some(ty),
            Some(expected) if expected != ty => {
                return Err(Error::Schema(format!(
                    "membership values must share one type, got {} and {}",
                    expected, ty
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn scalar_domain(value_type: ValueType) -> RestrictionDomain {
    match value_type {
        ValueType::String => RestrictionDomain::String,
        ValueType::Integer => RestrictionDomain::Integer,
        ValueType::Real => RestrictionDomain::Real,
        ValueType::Boolean => RestrictionDomain::Boolean,
        _ => RestrictionDomain::None,
    }
}

/// Apply `check` to the scalar itself, or to every element of a list
fn each_scalar(value: &Value, check: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::StringList(items) => items.iter().all(|i| check(&Value::String(i.clone()))),
        Value::IntegerList(items) => items.iter().all(|i| check(&Value::Integer(*i))),
        Value::RealList(items) => items.iter().all(|i| check(&Value::Real(*i))),
        Value::BooleanList(items) => items.iter().all(|i| check(&Value::Boolean(*i))),
        scalar => check(scalar),
    }
}

fn in_range(value: &Value, min: &Value, max: &Value) -> bool {
    // exact comparison when everything is integral, promoted otherwise
    if let (Value::Integer(v), Value::Integer(lo), Value::Integer(hi)) = (value, min, max) {
        return lo <= v && v <= hi;
    }
    match (value.as_real_lossy(), min.as_real_lossy(), max.as_real_lossy()) {
        (Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
        _ => false,
    }
}
