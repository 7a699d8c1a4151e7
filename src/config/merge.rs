//! Layer merging for the network config
//!
//! A file layer only has to name the keys it changes. Tables are merged
//! key by key; any other value, the participant list included, is taken
//! from the later layer as a whole.

use serde_json::Value;

/// Overlay `top` onto `base` and return the result.
pub fn deep_merge(mut base: Value, top: Value) -> Value {
    overlay(&mut base, top);
    base
}

fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(fields), Value::Object(top_fields)) => {
            for (key, value) in top_fields {
                match fields.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        fields.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Fold layers lowest precedence first.
pub fn merge_layers(layers: Vec<Value>) -> Value {
    let mut layers = layers.into_iter();
    let first = layers.next().unwrap_or(Value::Null);
    layers.fold(first, deep_merge)
}
