use serde_json::Value;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Rename every internal schema reference in `value`, in place.
///
/// Only string `$ref` values starting with [`SCHEMA_REF_PREFIX`] are
/// touched; external references and every other string are left alone.
/// Objects and arrays are walked to any depth.
pub fn rewrite_refs(value: &mut Value, rename: &dyn Fn(&str) -> String) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(reference) = child {
                        if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
                            *reference = format!("{SCHEMA_REF_PREFIX}{}", rename(name));
                        }
                        continue;
                    }
                }
                rewrite_refs(child, rename);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_refs(item, rename);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn prefix(service: &'static str) -> impl Fn(&str) -> String {
        move |name| format!("{service}_{name}")
    }

    #[test]
    fn rewrites_nested_objects_and_arrays() {
        let mut doc = json!({
            "paths": {
                "/api/parts": {
                    "get": {
                        "responses": {
                            "200": {"content": {"application/json": {"schema": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/PartResponse"}
                            }}}}
                        }
                    }
                }
            },
            "components": {"schemas": {"PartResponse": {
                "allOf": [
                    {"$ref": "#/components/schemas/Category"},
                    {"$ref": "#/components/schemas/Supplier"}
                ]
            }}}
        });

        rewrite_refs(&mut doc, &prefix("part-service"));

        assert_eq!(
            doc.pointer("/paths/~1api~1parts/get/responses/200/content/application~1json/schema/items/$ref"),
            Some(&json!("#/components/schemas/part-service_PartResponse"))
        );
        assert_eq!(
            doc.pointer("/components/schemas/PartResponse/allOf/1/$ref"),
            Some(&json!("#/components/schemas/part-service_Supplier"))
        );
    }

    #[test]
    fn leaves_external_refs_and_plain_strings_alone() {
        let mut doc = json!({
            "a": {"$ref": "https://example.com/schema.json"},
            "b": {"$ref": 42},
            "c": "#/components/schemas/NotARef",
            "d": ["#/components/schemas/Also"]
        });
        let before = doc.clone();
        rewrite_refs(&mut doc, &prefix("x"));
        assert_eq!(doc, before);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            "[a-z]{0,6}".prop_map(Value::String),
            "[A-Z][a-z]{0,6}".prop_map(|n| json!({"$ref": format!("{SCHEMA_REF_PREFIX}{n}")})),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn refs(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    match (k.as_str(), v) {
                        ("$ref", Value::String(s)) => out.push(s.clone()),
                        _ => refs(v, out),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|i| refs(i, out)),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn every_internal_ref_is_prefixed_exactly_once(mut doc in arb_json()) {
            let mut before = Vec::new();
            refs(&doc, &mut before);

            rewrite_refs(&mut doc, &prefix("svc"));

            let mut after = Vec::new();
            refs(&doc, &mut after);
            prop_assert_eq!(before.len(), after.len());
            for (old, new) in before.iter().zip(&after) {
                let name = old.strip_prefix(SCHEMA_REF_PREFIX).unwrap();
                prop_assert_eq!(new, &format!("{SCHEMA_REF_PREFIX}svc_{name}"));
            }
        }

        #[test]
        fn ref_free_documents_are_unchanged(s in "[a-z ]{0,12}") {
            let mut doc = json!({"k": [s.clone(), {"x": s}]});
            let before = doc.clone();
            rewrite_refs(&mut doc, &prefix("svc"));
            prop_assert_eq!(doc, before);
        }
    }
}
