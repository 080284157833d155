use serde_json::Value;

/// Accepts or rejects a candidate property value.
///
/// `null` never reaches a validator; clearing a property is always legal
/// and required-ness is checked at save time.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Accepts any value.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyValidator;

impl Validator for AnyValidator {
    fn validate(&self, _value: &Value) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StringValidator {
    max_chars: Option<usize>,
}

impl StringValidator {
    pub fn max_chars(max: usize) -> Self {
        Self {
            max_chars: Some(max),
        }
    }
}

impl Validator for StringValidator {
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.max_chars.map_or(true, |max| s.chars().count() <= max),
            _ => false,
        }
    }
}

/// Integral numbers, optionally bounded (inclusive).
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerValidator {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerValidator {
    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl Validator for IntegerValidator {
    fn validate(&self, value: &Value) -> bool {
        let Some(n) = value.as_i64() else {
            return false;
        };
        self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanValidator;

impl Validator for BooleanValidator {
    fn validate(&self, value: &Value) -> bool {
        value.is_boolean()
    }
}

/// Arrays whose every element passes the inner validator.
pub struct ArrayValidator<V> {
    element: V,
}

impl<V: Validator> ArrayValidator<V> {
    pub fn new(element: V) -> Self {
        Self { element }
    }
}

impl<V: Validator> Validator for ArrayValidator<V> {
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.element.validate(item)),
            _ => false,
        }
    }
}

/// One of a fixed set of values.
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
    choices: Vec<Value>,
}

impl ChoiceValidator {
    pub fn new<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for ChoiceValidator {
    fn validate(&self, value: &Value) -> bool {
        self.choices.contains(value)
    }
}
