//! Shallow diff implementation.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Equality predicate for one field of `T`.
type FieldEq<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Per-field equality overrides for fields without a default comparison.
pub struct FieldEquality<T> {
    predicates: HashMap<&'static str, FieldEq<T>>,
}

impl<T> FieldEquality<T> {
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Register the equality predicate for `name` (the serialized field name).
    pub fn field<F>(mut self, name: &'static str, eq: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name, Box::new(eq));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&FieldEq<T>> {
        self.predicates.get(name)
    }
}

impl<T> Default for FieldEquality<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldEquality<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.predicates.keys()).finish()
    }
}

/// A record type that can be shallow-diffed.
///
/// Types whose fields are all scalars need an empty impl. Types with
/// nested record, map or sequence fields return a table covering each of
/// them.
pub trait ShallowDiff: Serialize + Sized {
    fn field_equality() -> Option<FieldEquality<Self>> {
        None
    }
}

/// One changed field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

/// Changed fields of the record at `index` in a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDiff {
    pub index: usize,
    pub fields: Vec<FieldDiff>,
}

impl ModelDiff {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up the change for a single field.
    pub fn field(&self, name: &str) -> Option<&FieldDiff> {
        self.fields.iter().find(|d| d.field == name)
    }
}

/// Compare `old` and `new` field by field.
///
/// Returns the changed fields in declaration order. Fails if `T` does not
/// serialize as a record, or if a nested record, map or sequence field has
/// no entry in `T::field_equality()`.
pub fn shallow_diff<T: ShallowDiff>(old: &T, new: &T) -> Result<Vec<FieldDiff>> {
    let old_value = serde_json::to_value(old)?;
    let new_value = serde_json::to_value(new)?;
    let old_fields = as_record(&old_value)?;
    let new_fields = as_record(&new_value)?;

    // Fetched once per call.
    let overrides = T::field_equality();

    let mut diffs = Vec::new();
    for (name, old_field) in old_fields {
        let new_field = new_fields.get(name).unwrap_or(&Value::Null);
        if field_changed(name, old_field, new_field, old, new, overrides.as_ref())? {
            diffs.push(FieldDiff {
                field: name.clone(),
                old: old_field.clone(),
                new: new_field.clone(),
            });
        }
    }

    // Fields skipped during serialization of `old` but present in `new`.
    for (name, new_field) in new_fields {
        if old_fields.contains_key(name) {
            continue;
        }
        if field_changed(name, &Value::Null, new_field, old, new, overrides.as_ref())? {
            diffs.push(FieldDiff {
                field: name.clone(),
                old: Value::Null,
                new: new_field.clone(),
            });
        }
    }

    Ok(diffs)
}

fn field_changed<T>(
    name: &str,
    old_field: &Value,
    new_field: &Value,
    old: &T,
    new: &T,
    overrides: Option<&FieldEquality<T>>,
) -> Result<bool> {
    match composite_kind(old_field).or_else(|| composite_kind(new_field)) {
        None => Ok(old_field != new_field),
        Some(kind) => match overrides.and_then(|o| o.get(name)) {
            Some(eq) => Ok(!eq(old, new)),
            None => Err(StoreError::UnsupportedField {
                field: name.to_string(),
                kind,
            }),
        },
    }
}

fn as_record(value: &Value) -> Result<&Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::NotARecord(value_kind(other))),
    }
}

/// Kinds that have no meaningful default equality.
fn composite_kind(value: &Value) -> Option<&'static str> {
    match value {
        Value::Object(_) => Some("nested record or map"),
        Value::Array(_) => Some("sequence"),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Clone, Serialize)]
    struct Player {
        id: String,
        name: String,
        rating: i64,
        online: bool,
    }

    impl ShallowDiff for Player {}

    #[derive(Clone, Serialize)]
    struct Game {
        id: String,
        title: String,
        players: Vec<String>,
        options: BTreeMap<String, String>,
    }

    impl ShallowDiff for Game {
        fn field_equality() -> Option<FieldEquality<Self>> {
            Some(
                FieldEquality::new()
                    .field("players", |a: &Game, b: &Game| a.players == b.players)
                    .field("options", |a: &Game, b: &Game| a.options == b.options),
            )
        }
    }

    #[derive(Clone, Serialize)]
    struct Unsupported {
        id: String,
        tags: Vec<String>,
    }

    impl ShallowDiff for Unsupported {}

    #[derive(Clone, Serialize)]
    struct Wrapper(u32);

    impl ShallowDiff for Wrapper {}

    fn player() -> Player {
        Player {
            id: "p1".to_string(),
            name: "alice".to_string(),
            rating: 1500,
            online: false,
        }
    }

    #[test]
    fn test_diff_against_self_is_empty() {
        let p = player();
        assert!(shallow_diff(&p, &p).unwrap().is_empty());
    }

    #[test]
    fn test_diff_reports_changed_fields_in_order() {
        let old = player();
        let new = Player {
            rating: 1520,
            online: true,
            ..old.clone()
        };

        let diffs = shallow_diff(&old, &new).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].field, "rating");
        assert_eq!(diffs[0].old, json!(1500));
        assert_eq!(diffs[0].new, json!(1520));
        assert_eq!(diffs[1].field, "online");
        assert_eq!(diffs[1].new, json!(true));
    }

    #[test]
    fn test_diff_uses_field_equality_for_collections() {
        let old = Game {
            id: "g1".to_string(),
            title: "ranked".to_string(),
            players: vec!["a".to_string()],
            options: BTreeMap::new(),
        };
        let mut new = old.clone();
        new.players.push("b".to_string());

        let diffs = shallow_diff(&old, &new).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "players");
        assert_eq!(diffs[0].new, json!(["a", "b"]));

        assert!(shallow_diff(&old, &old.clone()).unwrap().is_empty());
    }

    #[test]
    fn test_diff_unsupported_field_without_override() {
        let a = Unsupported {
            id: "x".to_string(),
            tags: vec![],
        };
        let result = shallow_diff(&a, &a.clone());
        match result {
            Err(StoreError::UnsupportedField { field, kind }) => {
                assert_eq!(field, "tags");
                assert_eq!(kind, "sequence");
            }
            other => panic!("Expected UnsupportedField, got {:?}", other),
        }
    }

    #[test]
    fn test_diff_non_record_type() {
        let result = shallow_diff(&Wrapper(1), &Wrapper(2));
        assert!(matches!(result, Err(StoreError::NotARecord("number"))));
    }

    #[test]
    fn test_model_diff_field_lookup() {
        let diff = ModelDiff {
            index: 3,
            fields: vec![FieldDiff {
                field: "name".to_string(),
                old: json!("a"),
                new: json!("b"),
            }],
        };
        assert!(!diff.is_empty());
        assert_eq!(diff.field("name").unwrap().new, json!("b"));
        assert!(diff.field("rating").is_none());
    }
}
