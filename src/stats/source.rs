//! Modifier sources.
//!
//! A modifier source is a loosely typed bag of fields: an equipped item, an
//! active event, a blessing. The composer only ever reads the fields it
//! knows about, so any JSON object can act as a source.

use crate::ident::StatId;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Field holding how many times a source applies.
pub const REPEAT_FIELD: &str = "_value";

/// Trait for anything the stat composer can read fields from.
///
/// Only [`field`](ModifierSource::field) is required; the typed accessors
/// are derived from it.
///
/// # Examples
///
/// ```rust
/// use hatchstat::stats::ModifierSource;
/// use serde_json::{json, Value};
///
/// let Value::Object(potion) = json!({"luck": 1.5, "_value": 2, "name": "Lucky"}) else {
///     unreachable!()
/// };
/// assert_eq!(potion.number("luck"), Some(1.5));
/// assert_eq!(potion.number("name"), None);
/// assert_eq!(potion.repeat_count(), Some(2.0));
/// ```
pub trait ModifierSource: Send + Sync {
    /// Raw value of a field, if present.
    fn field(&self, name: &str) -> Option<&Value>;

    /// A field that holds a JSON number.
    fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    /// A field read as a flag: `true`, a non-zero number or a non-empty
    /// string count as set.
    fn flag(&self, name: &str) -> bool {
        match self.field(name) {
            Some(Value::Bool(set)) => *set,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
            Some(Value::Null) | None => false,
        }
    }

    /// How many times the source applies.
    ///
    /// Absent (or null) means once. Numeric strings and booleans are
    /// coerced to numbers. A count of zero, or one that cannot be read as a
    /// number, returns `None` and the source is skipped.
    fn repeat_count(&self) -> Option<f64> {
        let times = match self.field(REPEAT_FIELD) {
            None | Some(Value::Null) => return Some(1.0),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => match s.trim() {
                "" => None,
                text => text.parse::<f64>().ok(),
            },
            Some(Value::Bool(set)) => Some(if *set { 1.0 } else { 0.0 }),
            Some(Value::Array(_)) | Some(Value::Object(_)) => None,
        };
        times.filter(|times| *times != 0.0 && !times.is_nan())
    }
}

impl ModifierSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: ModifierSource + ?Sized> ModifierSource for &S {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }

    fn repeat_count(&self) -> Option<f64> {
        (**self).repeat_count()
    }
}

/// An owned source built in code.
///
/// # Examples
///
/// ```rust
/// use hatchstat::stats::{FieldBag, ModifierSource};
///
/// let bag = FieldBag::new().with("luck", 0.5).with("overwriteMythicChanceMultiplier", true);
/// assert_eq!(bag.number("luck"), Some(0.5));
/// assert!(bag.flag("overwriteMythicChanceMultiplier"));
/// assert!(bag.number("hatchSpeed").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag {
    fields: HashMap<StatId, Value>,
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](FieldBag::insert).
    pub fn with(mut self, name: impl Into<StatId>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<StatId>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl ModifierSource for FieldBag {
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A source applied a fixed number of times, whatever its own `_value`.
#[derive(Debug, Clone, Copy)]
pub struct Repeated<S> {
    inner: S,
    times: f64,
}

impl<S: ModifierSource> Repeated<S> {
    pub fn new(inner: S, times: f64) -> Self {
        Self { inner, times }
    }
}

impl<S: ModifierSource> ModifierSource for Repeated<S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.inner.field(name)
    }

    fn repeat_count(&self) -> Option<f64> {
        Some(self.times).filter(|times| *times != 0.0 && !times.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(source(json!({})).repeat_count(), Some(1.0));
        assert_eq!(source(json!({"_value": null})).repeat_count(), Some(1.0));
        assert_eq!(source(json!({"_value": 3})).repeat_count(), Some(3.0));
        assert_eq!(source(json!({"_value": 0})).repeat_count(), None);
        assert_eq!(source(json!({"_value": "three"})).repeat_count(), None);
    }

    #[test]
    fn test_repeat_count_coerces_strings() {
        assert_eq!(source(json!({"_value": "3"})).repeat_count(), Some(3.0));
        assert_eq!(source(json!({"_value": " 2.5 "})).repeat_count(), Some(2.5));
        assert_eq!(source(json!({"_value": "0"})).repeat_count(), None);
        assert_eq!(source(json!({"_value": ""})).repeat_count(), None);
        assert_eq!(source(json!({"_value": "NaN"})).repeat_count(), None);
        assert_eq!(source(json!({"_value": true})).repeat_count(), Some(1.0));
        assert_eq!(source(json!({"_value": false})).repeat_count(), None);
    }

    #[test]
    fn test_flag_truthiness() {
        let s = source(json!({"a": true, "b": 0, "c": "yes", "d": "", "e": false, "f": 2}));
        assert!(s.flag("a"));
        assert!(!s.flag("b"));
        assert!(s.flag("c"));
        assert!(!s.flag("d"));
        assert!(!s.flag("e"));
        assert!(s.flag("f"));
        assert!(!s.flag("missing"));
    }

    #[test]
    fn test_repeated_overrides_own_count() {
        let s = source(json!({"luck": 0.1, "_value": 0}));
        let repeated = Repeated::new(&s, 4.0);
        assert_eq!(repeated.repeat_count(), Some(4.0));
        assert_eq!(repeated.number("luck"), Some(0.1));
        assert_eq!(Repeated::new(&s, 0.0).repeat_count(), None);
    }

    #[test]
    fn test_string_numbers_are_not_numbers() {
        let s = source(json!({"luck": "5"}));
        assert_eq!(s.number("luck"), None);
    }
}
