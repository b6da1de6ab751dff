//! Renderer-agnostic JSON description of the widgets a form needs, for
//! consumers that drive their own rendering layer off a plain document
//! instead of the typed config.

use serde_json::{Map, Value};

use crate::domain::{FieldConfig, FormConfig, GroupConfig};
use indexmap::IndexMap;

/// Builds the JSON blueprint for a form configuration: one entry per field
/// key, each carrying its component name, labels, and kind-specific data.
pub fn form_blueprint(config: &FormConfig) -> Value {
    Value::Object(fields_blueprint(&config.fields))
}

fn fields_blueprint(fields: &IndexMap<String, FieldConfig>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, field)| (key.clone(), field_blueprint(field)))
        .collect()
}

fn field_blueprint(field: &FieldConfig) -> Value {
    let mut base = Map::new();
    base.insert(
        "component".into(),
        Value::String(field.kind_name().to_string()),
    );
    if let Some(common) = field.common() {
        base.insert("label".into(), Value::String(common.label.clone()));
        if let Some(description) = &common.description {
            base.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(help_text) = &common.help_text {
            base.insert("helpText".into(), Value::String(help_text.clone()));
        }
        base.insert("required".into(), Value::Bool(common.required));
        if !common.dependencies.is_empty()
            && let Ok(value) = serde_json::to_value(&common.dependencies)
        {
            base.insert("dependencies".into(), value);
        }
    }

    match field {
        FieldConfig::Select { options, .. }
        | FieldConfig::RadioGroup { options, .. }
        | FieldConfig::CheckboxGroup { options, .. }
        | FieldConfig::Ranking { options, .. } => {
            if let Ok(value) = serde_json::to_value(options) {
                base.insert("options".into(), value);
            }
        }
        FieldConfig::Number { min, max, .. } => {
            if let Some(min) = min {
                base.insert("min".into(), Value::from(*min));
            }
            if let Some(max) = max {
                base.insert("max".into(), Value::from(*max));
            }
        }
        FieldConfig::RatingMatrix { items, scales, .. } => {
            if let Ok(value) = serde_json::to_value(items) {
                base.insert("items".into(), value);
            }
            if let Ok(value) = serde_json::to_value(scales) {
                base.insert("scales".into(), value);
            }
        }
        FieldConfig::Object(group) => {
            group_blueprint(&mut base, group);
        }
        FieldConfig::Text { .. } | FieldConfig::Textarea { .. } | FieldConfig::Switch { .. } => {}
    }

    Value::Object(base)
}

fn group_blueprint(base: &mut Map<String, Value>, group: &GroupConfig) {
    base.insert("label".into(), Value::String(group.label.clone()));
    if let Some(description) = &group.description {
        base.insert("description".into(), Value::String(description.clone()));
    }
    base.insert(
        "offerNotApplicable".into(),
        Value::Bool(group.offer_not_applicable),
    );
    base.insert(
        "fields".into(),
        Value::Object(fields_blueprint(&group.fields)),
    );
}
