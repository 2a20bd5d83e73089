use serde_json::{json, Map, Value};

use crate::rewrite::rewrite_refs;

pub const OPENAPI_VERSION: &str = "3.0.1";
pub const TITLE: &str = "Aggregated API gateway";
pub const VERSION: &str = "1.0.0";
pub const DESCRIPTION: &str = "Single entry point to the API descriptions of the spare-parts \
services (categories, suppliers, parts, inventory). Paths are prefixed with the name of the \
owning service and schemas are renamed `<service>_<schema>` so that they cannot collide.";

/// One service's document as fetched; an empty object stands for a failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDoc {
    pub service: String,
    pub doc: Value,
}

impl ServiceDoc {
    pub fn new(service: impl Into<String>, doc: Value) -> Self {
        Self {
            service: service.into(),
            doc,
        }
    }

    fn is_empty(&self) -> bool {
        match &self.doc {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }
}

fn header() -> Value {
    json!({
        "title": TITLE,
        "version": VERSION,
        "description": DESCRIPTION,
        "contact": {
            "name": "Spare parts platform team",
            "email": "platform@sparetrack.dev",
            "url": "https://sparetrack.dev/"
        },
        "license": {
            "name": "Apache 2.0",
            "url": "https://www.apache.org/licenses/LICENSE-2.0"
        }
    })
}

/// Merge documents in the given order.
///
/// Each non-empty document has its schema references renamed, its paths
/// reparented under `/<service>` and its schemas renamed
/// `<service>_<name>`. Empty documents (failed fetches) contribute nothing.
/// Later entries win on (unlikely) key collisions.
pub fn merge(docs: Vec<ServiceDoc>) -> Value {
    let mut paths = Map::new();
    let mut schemas = Map::new();

    for ServiceDoc { service, mut doc } in docs.into_iter().filter(|d| !d.is_empty()) {
        let rename = |name: &str| format!("{service}_{name}");
        rewrite_refs(&mut doc, &rename);

        if let Some(Value::Object(service_paths)) = doc.get_mut("paths").map(Value::take) {
            for (path, item) in service_paths {
                paths.insert(format!("/{service}{path}"), item);
            }
        }

        if let Some(Value::Object(service_schemas)) = doc
            .pointer_mut("/components/schemas")
            .map(Value::take)
        {
            for (name, schema) in service_schemas {
                schemas.insert(rename(&name), schema);
            }
        }
    }

    let mut components = Map::new();
    components.insert("schemas".to_string(), Value::Object(schemas));

    let mut result = Map::new();
    result.insert("openapi".to_string(), Value::from(OPENAPI_VERSION));
    result.insert("info".to_string(), header());
    result.insert("paths".to_string(), Value::Object(paths));
    result.insert("components".to_string(), Value::Object(components));
    Value::Object(result)
}
