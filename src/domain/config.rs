use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dependency::Dependency;

/// Reserved value meaning "this field intentionally has no answer".
pub const NOT_APPLICABLE: &str = "not_applicable";

/// Attributes shared by every leaf field kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCommon {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "helpText", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl FieldCommon {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// One selectable option of a choice-style field. The value is a JSON literal
/// so numeric and string options coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: Value,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Row of a rating matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixItem {
    pub key: String,
    pub label: String,
}

impl MatrixItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Column of a rating matrix; the option values form the finite literal set
/// every cell under this scale must draw from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixScale {
    pub key: String,
    pub label: String,
    pub options: Vec<ChoiceOption>,
}

impl MatrixScale {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<ChoiceOption>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options,
        }
    }
}

/// A named group of fields. With `offer_not_applicable` set, a single toggle
/// stamps the [`NOT_APPLICABLE`] sentinel across every leaf in the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "offerNotApplicable")]
    pub offer_not_applicable: bool,
    pub fields: IndexMap<String, FieldConfig>,
}

/// One field descriptor per supported widget kind.
///
/// The union is closed on purpose: the schema compiler and the component
/// binder both match on it exhaustively, so adding a kind without teaching
/// both sides is a compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldConfig {
    Text {
        #[serde(flatten)]
        common: FieldCommon,
        schema: Value,
    },
    Textarea {
        #[serde(flatten)]
        common: FieldCommon,
        schema: Value,
    },
    Number {
        #[serde(flatten)]
        common: FieldCommon,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        schema: Value,
    },
    Select {
        #[serde(flatten)]
        common: FieldCommon,
        options: Vec<ChoiceOption>,
        schema: Value,
    },
    RadioGroup {
        #[serde(flatten)]
        common: FieldCommon,
        options: Vec<ChoiceOption>,
        schema: Value,
    },
    CheckboxGroup {
        #[serde(flatten)]
        common: FieldCommon,
        options: Vec<ChoiceOption>,
        schema: Value,
    },
    Switch {
        #[serde(flatten)]
        common: FieldCommon,
        schema: Value,
    },
    /// `items x scales` grid; the schema is synthesized from the scale
    /// options when not supplied explicitly.
    RatingMatrix {
        #[serde(flatten)]
        common: FieldCommon,
        items: Vec<MatrixItem>,
        scales: Vec<MatrixScale>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Value>,
    },
    /// Ordering of the declared options; auto-derives a unique-items enum
    /// array schema when none is supplied.
    Ranking {
        #[serde(flatten)]
        common: FieldCommon,
        options: Vec<ChoiceOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Value>,
    },
    Object(GroupConfig),
}

impl FieldConfig {
    pub fn common(&self) -> Option<&FieldCommon> {
        match self {
            FieldConfig::Text { common, .. }
            | FieldConfig::Textarea { common, .. }
            | FieldConfig::Number { common, .. }
            | FieldConfig::Select { common, .. }
            | FieldConfig::RadioGroup { common, .. }
            | FieldConfig::CheckboxGroup { common, .. }
            | FieldConfig::Switch { common, .. }
            | FieldConfig::RatingMatrix { common, .. }
            | FieldConfig::Ranking { common, .. } => Some(common),
            FieldConfig::Object(_) => None,
        }
    }

    pub fn dependencies(&self) -> &[Dependency] {
        self.common()
            .map(|common| common.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// The explicitly attached validator, when the kind carries one.
    pub fn schema_value(&self) -> Option<&Value> {
        match self {
            FieldConfig::Text { schema, .. }
            | FieldConfig::Textarea { schema, .. }
            | FieldConfig::Number { schema, .. }
            | FieldConfig::Select { schema, .. }
            | FieldConfig::RadioGroup { schema, .. }
            | FieldConfig::CheckboxGroup { schema, .. }
            | FieldConfig::Switch { schema, .. } => Some(schema),
            FieldConfig::RatingMatrix { schema, .. } | FieldConfig::Ranking { schema, .. } => {
                schema.as_ref()
            }
            FieldConfig::Object(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupConfig> {
        match self {
            FieldConfig::Object(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.as_group().is_none()
    }

    /// Stable widget name, matching the serialized `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldConfig::Text { .. } => "text",
            FieldConfig::Textarea { .. } => "textarea",
            FieldConfig::Number { .. } => "number",
            FieldConfig::Select { .. } => "select",
            FieldConfig::RadioGroup { .. } => "radioGroup",
            FieldConfig::CheckboxGroup { .. } => "checkboxGroup",
            FieldConfig::Switch { .. } => "switch",
            FieldConfig::RatingMatrix { .. } => "ratingMatrix",
            FieldConfig::Ranking { .. } => "ranking",
            FieldConfig::Object(_) => "object",
        }
    }
}

/// The full declarative tree describing a form: a mapping from field key to
/// either a leaf field or a nested group. Authored once, immutable at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormConfig {
    pub fields: IndexMap<String, FieldConfig>,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(key.into(), config);
        self
    }

    /// Parse a JSON form-configuration document.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).context("failed to parse form configuration")
    }

    /// Walks every leaf field depth-first, handing the visitor the field's
    /// dot path and descriptor. Groups themselves are not visited.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&str, &'a FieldConfig)) {
        walk_leaves("", &self.fields, visit);
    }

    /// Resolves a dot path to a leaf descriptor.
    pub fn leaf(&self, path: &str) -> Option<&FieldConfig> {
        let field = self.entry(path)?;
        field.is_leaf().then_some(field)
    }

    /// Resolves a dot path to a group descriptor.
    pub fn group(&self, path: &str) -> Option<&GroupConfig> {
        self.entry(path)?.as_group()
    }

    /// Dot paths of every leaf, in authored order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.for_each_leaf(&mut |path, _| paths.push(path.to_string()));
        paths
    }

    fn entry(&self, path: &str) -> Option<&FieldConfig> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_group()?.fields.get(segment)?;
        }
        Some(current)
    }
}

fn walk_leaves<'a>(
    prefix: &str,
    fields: &'a IndexMap<String, FieldConfig>,
    visit: &mut impl FnMut(&str, &'a FieldConfig),
) {
    for (key, field) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match field.as_group() {
            Some(group) => walk_leaves(&path, &group.fields, visit),
            None => visit(&path, field),
        }
    }
}
