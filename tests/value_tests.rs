use confspec::value::{Value, ValueType};

fn default_tokens() -> (Vec<String>, Vec<String>) {
    (
        vec!["TRUE".to_string(), "YES".to_string(), "ON".to_string()],
        vec!["FALSE".to_string(), "NO".to_string(), "OFF".to_string()],
    )
}

#[test]
fn test_scalar_round_trips() {
    let (yes, no) = default_tokens();
    let cases: Vec<(Value, &str, ValueType)> = vec![
        (Value::from(42i64), "42", ValueType::Integer),
        (Value::from(-7i32), "-7", ValueType::Integer),
        (Value::from(2.5f64), "2.5", ValueType::Real),
        (Value::from(true), "true", ValueType::Boolean),
        (Value::from(false), "false", ValueType::Boolean),
        (Value::from("hello"), "hello", ValueType::String),
    ];

    for (value, text, value_type) in cases {
        assert_eq!(value.value_type(), value_type);
        assert_eq!(value.render(), text);
        if value_type != ValueType::Boolean {
            assert_eq!(
                Value::parse(text, value_type, ',', &yes, &no).unwrap(),
                value
            );
        }
    }

    // boolean text round-trips through the token lists, not "true"/"false"
    assert_eq!(
        Value::parse("yes", ValueType::Boolean, ',', &yes, &no).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_list_rendering() {
    assert_eq!(Value::from(vec![1i64, 2, 3]).render(), "[1, 2, 3]");
    assert_eq!(Value::from(vec![0.5f64, 1.5]).render(), "[0.5, 1.5]");
    assert_eq!(Value::from(vec!["a", "b"]).render(), "[a, b]");
    // boolean lists keep the historical marker rendering
    assert_eq!(Value::from(vec![true, true, false]).render(), "11o");
}

#[test]
fn test_list_parsing_trims_elements() {
    let (yes, no) = default_tokens();
    assert_eq!(
        Value::parse(" 1 , 2 ,3 ", ValueType::IntegerList, ',', &yes, &no).unwrap(),
        Value::IntegerList(vec![1, 2, 3])
    );
    assert_eq!(
        Value::parse("0.5, 1", ValueType::RealList, ',', &yes, &no).unwrap(),
        Value::RealList(vec![0.5, 1.0])
    );
}

#[test]
fn test_integer_parsing_is_strict() {
    let (yes, no) = default_tokens();
    assert!(Value::parse("1.5", ValueType::Integer, ',', &yes, &no).is_none());
    assert!(Value::parse("0x10", ValueType::Integer, ',', &yes, &no).is_none());
    assert!(Value::parse("", ValueType::Integer, ',', &yes, &no).is_none());
}

#[test]
fn test_real_parsing_accepts_exponents() {
    let (yes, no) = default_tokens();
    assert_eq!(
        Value::parse("1e3", ValueType::Real, ',', &yes, &no).unwrap(),
        Value::Real(1000.0)
    );
    assert_eq!(
        Value::parse("-2.5E-1", ValueType::Real, ',', &yes, &no).unwrap(),
        Value::Real(-0.25)
    );
}

#[test]
fn test_single_element_list() {
    let (yes, no) = default_tokens();
    assert_eq!(
        Value::parse("only", ValueType::StringList, ',', &yes, &no).unwrap(),
        Value::StringList(vec!["only".to_string()])
    );
}
