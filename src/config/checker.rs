//! Unknown-property detection.
//!
//! Walks a parsed document alongside a [`Schema`] and collects every
//! mapping key the enclosing type does not declare. The walk never stops
//! early, so one pass reports every offending name.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::schema::{Schema, Shape};

/// Returns the names in `document` that `schema` does not declare.
///
/// Keys under [`Shape::OpenMap`] fields are never inspected.
pub fn unknown_properties(document: &Value, schema: &'static Schema) -> BTreeSet<String> {
    let mut checker = MissingPropertiesChecker::default();
    checker.visit(document, Shape::Object(schema), &mut Vec::new());
    checker.missing
}

#[derive(Debug, Default)]
struct MissingPropertiesChecker {
    missing: BTreeSet<String>,
}

impl MissingPropertiesChecker {
    fn visit(&mut self, value: &Value, shape: Shape, path: &mut Vec<String>) {
        let value = untag(value);
        match (shape, value) {
            (Shape::Object(schema), Value::Mapping(map)) => self.visit_object(map, schema, path),
            (Shape::List(schema), Value::Sequence(items)) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(i.to_string());
                    self.visit(item, Shape::Object(schema), path);
                    path.pop();
                }
            }
            // Leaves, open maps, and shape mismatches (left to the binder).
            _ => {}
        }
    }

    fn visit_object(&mut self, map: &Mapping, schema: &Schema, path: &mut Vec<String>) {
        for (key, value) in map {
            let name = key_name(key);
            path.push(name.clone());
            match schema.field(&name) {
                Some(field) => self.visit(value, field.shape, path),
                None => {
                    debug!(
                        property = %path.join("."),
                        schema = schema.name,
                        "unknown configuration property"
                    );
                    self.missing.insert(name);
                }
            }
            path.pop();
        }
    }
}

/// Drops declared fields whose value is null so they bind to their defaults.
///
/// `base_dir:` with nothing after it reads the same as leaving it out.
/// Undeclared keys and open-map contents are left alone.
pub(crate) fn strip_nulls(document: &mut Value, schema: &'static Schema) {
    strip(document, Shape::Object(schema));
}

fn strip(value: &mut Value, shape: Shape) {
    match (shape, untag_mut(value)) {
        (Shape::Object(schema), Value::Mapping(map)) => {
            let nulls: Vec<Value> = map
                .iter()
                .filter(|(key, value)| value.is_null() && schema.field(&key_name(key)).is_some())
                .map(|(key, _)| key.clone())
                .collect();
            for key in &nulls {
                map.remove(key);
            }
            for (key, value) in map.iter_mut() {
                if let Some(field) = schema.field(&key_name(key)) {
                    strip(value, field.shape);
                }
            }
        }
        (Shape::List(schema), Value::Sequence(items)) => {
            for item in items {
                strip(item, Shape::Object(schema));
            }
        }
        _ => {}
    }
}

fn untag_mut(value: &mut Value) -> &mut Value {
    match value {
        Value::Tagged(tagged) => untag_mut(&mut tagged.value),
        other => other,
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn key_name(key: &Value) -> String {
    match untag(key) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Field;

    static ENGINE: Schema = Schema::new(
        "Engine",
        &[
            Field::value("name"),
            Field::value("enabled"),
            Field::open_map("parameters"),
        ],
    );
    static OPTIONS: Schema = Schema::new("Options", &[Field::value("keystore")]);
    static ROOT: Schema = Schema::new(
        "Root",
        &[
            Field::value("base_dir"),
            Field::object("scheduler", &ENGINE),
            Field::list("engines", &ENGINE),
            Field::object("options", &OPTIONS),
        ],
    );

    fn check(yaml: &str) -> Vec<String> {
        let document: Value = serde_yaml::from_str(yaml).unwrap();
        unknown_properties(&document, &ROOT).into_iter().collect()
    }

    #[test]
    fn test_all_declared() {
        let found = check(
            r#"
            base_dir: data
            scheduler:
              name: default
            engines:
              - name: AOSE
                enabled: true
            options:
              keystore: conf/.keystore
            "#,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_top_level_unknown() {
        assert_eq!(check("base_dir: data\nfoo: 1\n"), ["foo"]);
    }

    #[test]
    fn test_nested_and_top_level_collected_together() {
        let found = check(
            r#"
            foo: 1
            options:
              keystore: conf/.keystore
              bar: 2
            "#,
        );
        assert_eq!(found, ["bar", "foo"]);
    }

    #[test]
    fn test_list_elements_checked() {
        let found = check(
            r#"
            engines:
              - name: AOSE
              - name: AOTE
                page_size: 16k
            "#,
        );
        assert_eq!(found, ["page_size"]);
    }

    #[test]
    fn test_open_map_keys_ignored() {
        let found = check(
            r#"
            scheduler:
              parameters:
                scheduler_count: 8
                anything: goes
            engines:
              - name: AOSE
                parameters:
                  page_size: 16k
                  foo: bar
                  base_dir: shadowed
            "#,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_duplicate_names_deduplicated() {
        let found = check(
            r#"
            engines:
              - name: a
                extra: 1
              - name: b
                extra: 2
            "#,
        );
        assert_eq!(found, ["extra"]);
    }

    #[test]
    fn test_strip_nulls_keeps_open_maps_and_unknowns() {
        let mut document: Value = serde_yaml::from_str(
            r#"
            base_dir:
            foo:
            engines:
              - name:
                parameters:
                  empty:
            "#,
        )
        .unwrap();
        strip_nulls(&mut document, &ROOT);

        let expected: Value = serde_yaml::from_str(
            r#"
            foo:
            engines:
              - parameters:
                  empty:
            "#,
        )
        .unwrap();
        assert_eq!(document, expected);
    }

    #[test]
    fn test_non_string_keys() {
        assert_eq!(check("1: one\ntrue: yes\n"), ["1", "true"]);
    }

    #[test]
    fn test_shape_mismatch_left_to_binder() {
        assert!(check("scheduler: [1, 2]\nengines: {name: x}\n").is_empty());
    }
}
