//! Auto-derived validators for the field kinds that do not need an explicit
//! `schema` attribute.

use serde_json::{Map, Value, json};

use crate::domain::{ChoiceOption, MatrixItem, MatrixScale};

/// Synthesizes the validator for a rating matrix: every scale becomes a
/// required literal enum of its option values, every item an object over all
/// scales, and the field an object over all items.
pub fn matrix_schema(items: &[MatrixItem], scales: &[MatrixScale]) -> Value {
    let mut scale_properties = Map::new();
    let mut scale_keys = Vec::new();
    for scale in scales {
        let values: Vec<Value> = scale.options.iter().map(|opt| opt.value.clone()).collect();
        scale_properties.insert(scale.key.clone(), json!({ "enum": values }));
        scale_keys.push(Value::String(scale.key.clone()));
    }
    let item_schema = json!({
        "type": "object",
        "required": scale_keys,
        "properties": scale_properties,
        "additionalProperties": false,
    });

    let mut item_properties = Map::new();
    let mut item_keys = Vec::new();
    for item in items {
        item_properties.insert(item.key.clone(), item_schema.clone());
        item_keys.push(Value::String(item.key.clone()));
    }
    json!({
        "type": "object",
        "required": item_keys,
        "properties": item_properties,
        "additionalProperties": false,
    })
}

/// Ranking values are arrays drawn from the declared option values, with no
/// repeats and no more entries than options.
pub fn ranking_schema(options: &[ChoiceOption]) -> Value {
    let values: Vec<Value> = options.iter().map(|opt| opt.value.clone()).collect();
    json!({
        "type": "array",
        "items": { "enum": values },
        "uniqueItems": true,
        "maxItems": options.len(),
    })
}
