//! Sparse partial-update payloads.
//!
//! A [`Patch`] only ever carries keys whose [`Field`] was present. Absence
//! means "leave the server value alone", never "clear it".

use serde::Serialize;
use serde_json::{Map, Value};

/// One attribute of an update: either carried with a value or left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }
}

impl Field<String> {
    /// Empty strings count as "not entered".
    pub fn non_empty(value: Option<String>) -> Self {
        match value {
            Some(text) if !text.is_empty() => Field::Present(text),
            _ => Field::Absent,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

/// JSON body for a PATCH request, built field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Start a patch that always carries the entity key.
    pub fn keyed(key: &str, id: impl Into<Value>) -> Self {
        Self::new().set(key, id)
    }

    /// Unconditionally set `name`.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Set `name` only when the field is present.
    pub fn field<T: Into<Value>>(self, name: &str, field: Field<T>) -> Self {
        match field {
            Field::Present(value) => self.set(name, value),
            Field::Absent => self,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_never_serialized() {
        let patch = Patch::keyed("Id", 5)
            .field("Title", Field::<String>::Absent)
            .field("PressId", Field::from(None::<i64>));

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"Id": 5}));
    }

    #[test]
    fn present_fields_keep_their_values() {
        let patch = Patch::keyed("Id", 5)
            .field("Title", Field::non_empty(Some("Dune".to_string())))
            .field("PressId", Field::from(Some(0_i64)));

        assert_eq!(
            patch.to_value(),
            json!({"Id": 5, "Title": "Dune", "PressId": 0})
        );
    }

    #[test]
    fn empty_string_is_absent() {
        assert_eq!(Field::non_empty(Some(String::new())), Field::Absent);
        assert_eq!(Field::non_empty(None), Field::Absent);
        assert!(Field::non_empty(Some(" ".to_string())).is_present());
    }
}
