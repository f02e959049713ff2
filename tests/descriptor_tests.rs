use confspec::error::Error;
use confspec::schema::{Descriptor, ListMode, Restriction, RestrictionKind, ViolationPolicy};
use confspec::value::{RestrictionDomain, Value, ValueType};

#[test]
fn test_range_restriction_on_string_fails() {
    let mut descriptor = Descriptor::with_default("NAME", "x").unwrap();
    let restriction = Restriction::ranged(0, 9, ViolationPolicy::Warning).unwrap();
    let result = descriptor.add_restriction(restriction);
    assert!(matches!(result, Err(Error::Schema(_))));
    assert!(descriptor.restrictions().is_empty());
}

#[test]
fn test_range_restriction_on_real_and_real_list_succeeds() {
    let mut real = Descriptor::with_default("RATIO", 0.5).unwrap();
    real.add_restriction(Restriction::ranged(0.0, 1.0, ViolationPolicy::Warning).unwrap())
        .unwrap();

    let mut real_list = Descriptor::with_default("WEIGHTS", vec![0.5f64]).unwrap();
    real_list
        .add_restriction(Restriction::ranged(0.0, 1.0, ViolationPolicy::Warning).unwrap())
        .unwrap();

    assert_eq!(real.restrictions().len(), 1);
    assert_eq!(real_list.restrictions().len(), 1);
}

#[test]
fn test_typed_membership_domain_must_match() {
    // integer membership on a string keyword fails at schema-build time
    let result = Descriptor::post_list_bound(
        "NAME",
        "x",
        vec![Value::Integer(1)],
        ListMode::Allow,
        ViolationPolicy::Warning,
    );
    assert!(matches!(result, Err(Error::Schema(_))));

    // string membership on a string-list keyword is allowed
    let descriptor = Descriptor::post_list_bound(
        "NAMES",
        vec!["a"],
        vec![Value::String("a".to_string()), Value::String("b".to_string())],
        ListMode::Allow,
        ViolationPolicy::Warning,
    )
    .unwrap();
    assert_eq!(descriptor.restrictions()[0].post_kind(), RestrictionKind::AllowedList);
}

#[test]
fn test_no_restriction_attaches_to_booleans() {
    let result = Descriptor::pre_predicate_bound(
        "FLAG",
        true,
        |s: &str| !s.is_empty(),
        ViolationPolicy::Warning,
    );
    assert!(matches!(result, Err(Error::Schema(_))));

    let result = Descriptor::post_list_bound(
        "FLAGS",
        vec![true],
        vec![Value::Boolean(true)],
        ListMode::Allow,
        ViolationPolicy::Warning,
    );
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn test_policy_only_restriction_attaches_anywhere() {
    let mut descriptor = Descriptor::with_default("FLAG", true).unwrap();
    descriptor
        .add_restriction(Restriction::new(ViolationPolicy::Warning))
        .unwrap();
    assert_eq!(descriptor.restrictions().len(), 1);
}

#[test]
fn test_restriction_domains() {
    let range = Restriction::ranged(1, 2, ViolationPolicy::Warning).unwrap();
    assert_eq!(range.domain(), RestrictionDomain::Numeric);

    let strings = Restriction::allowed_strings(vec!["a".to_string()], ViolationPolicy::Warning);
    assert_eq!(strings.domain(), RestrictionDomain::None);

    let mut typed = Restriction::new(ViolationPolicy::Warning);
    typed
        .set_post_allowed(vec![Value::Real(1.0)])
        .unwrap();
    assert_eq!(typed.domain(), RestrictionDomain::Real);
}

#[test]
fn test_factory_rejects_default_outside_its_own_type() {
    // the range factory validates bound types eagerly
    let result = Descriptor::ranged("PORT", 8080, "low", "high", ViolationPolicy::Warning);
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn test_restriction_message_template_override() {
    let mut restriction = Restriction::ranged(1, 10, ViolationPolicy::Warning).unwrap();
    restriction.set_message("{key} must stay between 1 and 10, got {value}");
    assert_eq!(
        restriction.message(),
        "{key} must stay between 1 and 10, got {value}"
    );
}

#[test]
fn test_schema_mutation_clears_validated_rules() {
    let mut descriptor = Descriptor::ranged("N", 5, 0, 10, ViolationPolicy::Warning).unwrap();
    descriptor.add_substitution("a", "b");
    descriptor.set_value("text now");
    assert_eq!(descriptor.value_type(), ValueType::String);
    assert!(descriptor.restrictions().is_empty());
    assert!(descriptor.substitutions().is_empty());
}

#[test]
fn test_descriptor_key_rules() {
    assert!(Descriptor::with_default("", 1).is_err());
    assert!(Descriptor::with_default("   ", 1).is_err());
    let descriptor = Descriptor::with_default(" KEY ", 1).unwrap();
    assert_eq!(descriptor.key(), "KEY");
}
