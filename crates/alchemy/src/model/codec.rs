//! Default serialize/deserialize hooks.
//!
//! Inbound data is a safelist projection onto the model definition; outbound
//! data is whatever the entity currently holds.

use serde_json::Value;

use super::config::ModelSchema;
use crate::Record;

/// Truthiness as the REST backends this layer targets expect it: `null`,
/// `false`, `0`, and `""` are falsy; every array and object is truthy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Copy the definition's fields out of `data`, skipping absent or falsy ones.
/// Fields not in the definition are dropped. Non-object data is unusable.
pub fn from_server(data: &Value, schema: &ModelSchema) -> Option<Record> {
    let obj = data.as_object()?;
    Some(project(obj, &schema.definition))
}

fn project(obj: &Record, definition: &Record) -> Record {
    definition
        .keys()
        .filter_map(|k| {
            obj.get(k)
                .filter(|v| is_truthy(v))
                .map(|v| (k.clone(), v.clone()))
        })
        .collect()
}

/// Payload for create/update: every field present on the instance.
pub fn to_server(instance: &Record, _schema: &ModelSchema) -> Record {
    instance.clone()
}

/// Deserialize a list response. Accepts a bare array, or an object holding the
/// array under the model name, its lowercase form, or the lowercase plural.
pub fn collection_from_server(data: &Value, schema: &ModelSchema) -> Option<Vec<Record>> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(obj) => {
            let lower = schema.name.to_lowercase();
            let plural = format!("{lower}s");
            [schema.name.as_str(), lower.as_str(), plural.as_str()]
                .into_iter()
                .filter_map(|k| obj.get(k))
                .find(|v| is_truthy(v))?
                .as_array()?
        }
        _ => return None,
    };
    Some(
        items
            .iter()
            .map(|item| match item.as_object() {
                Some(obj) => project(obj, &schema.definition),
                None => Record::new(),
            })
            .collect(),
    )
}

/// Shallow merge returning a new record; keys in `update` win.
pub fn merge(base: &Record, update: Record) -> Record {
    let mut out = base.clone();
    merge_in_place(&mut out, update);
    out
}

pub fn merge_in_place(target: &mut Record, update: Record) {
    for (k, v) in update {
        target.insert(k, v);
    }
}
