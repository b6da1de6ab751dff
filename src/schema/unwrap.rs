//! Typed schema unwrapping: peels union and null wrappers off a leaf
//! validator and reports its broad shape, so callers never probe validator
//! internals at runtime.

use anyhow::{Context, Result};
use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use serde_json::Value;

use crate::domain::NOT_APPLICABLE;

/// Broad shape of a leaf validator after unwrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Enum,
    /// No instance type declared; the validator accepts by other means.
    Unknown,
}

/// Descriptor produced by [`unwrap_schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaShape {
    pub kind: SchemaKind,
    /// The validator accepts the not-applicable sentinel, either through a
    /// dedicated union variant or an enum member.
    pub has_not_applicable: bool,
    pub nullable: bool,
}

/// Inspects a leaf `schema` attribute and returns its shape. Fails when the
/// value is not a recognized validator object.
pub fn unwrap_schema(schema: &Value) -> Result<SchemaShape> {
    let parsed: Schema = serde_json::from_value(schema.clone())
        .context("schema attribute is not a recognized validator")?;
    match parsed {
        Schema::Bool(_) => Ok(SchemaShape {
            kind: SchemaKind::Unknown,
            has_not_applicable: false,
            nullable: false,
        }),
        Schema::Object(object) => Ok(shape_of(&object)),
    }
}

fn shape_of(object: &SchemaObject) -> SchemaShape {
    if let Some(subschemas) = object.subschemas.as_ref() {
        let variants = subschemas.any_of.as_ref().or(subschemas.one_of.as_ref());
        if let Some(variants) = variants {
            let mut has_not_applicable = false;
            let mut inner: Option<SchemaShape> = None;
            for variant in variants {
                let Schema::Object(candidate) = variant else {
                    continue;
                };
                if is_not_applicable_variant(candidate) {
                    has_not_applicable = true;
                    continue;
                }
                if inner.is_none() {
                    inner = Some(shape_of(candidate));
                }
            }
            let mut shape = inner.unwrap_or(SchemaShape {
                kind: SchemaKind::Unknown,
                has_not_applicable: false,
                nullable: false,
            });
            shape.has_not_applicable |= has_not_applicable;
            return shape;
        }
    }

    let nullable = matches!(
        object.instance_type.as_ref(),
        Some(SingleOrVec::Vec(types)) if types.contains(&InstanceType::Null)
    );

    if object.enum_values.is_some() || object.const_value.is_some() {
        let has_not_applicable = object
            .enum_values
            .as_ref()
            .map(|values| values.iter().any(is_sentinel))
            .unwrap_or(false)
            || object.const_value.as_ref().map(is_sentinel).unwrap_or(false);
        return SchemaShape {
            kind: SchemaKind::Enum,
            has_not_applicable,
            nullable,
        };
    }

    let kind = match primary_instance_type(object) {
        Some(InstanceType::String) => SchemaKind::String,
        Some(InstanceType::Number) => SchemaKind::Number,
        Some(InstanceType::Integer) => SchemaKind::Integer,
        Some(InstanceType::Boolean) => SchemaKind::Boolean,
        Some(InstanceType::Array) => SchemaKind::Array,
        Some(InstanceType::Object) => SchemaKind::Object,
        Some(InstanceType::Null) | None => SchemaKind::Unknown,
    };
    SchemaShape {
        kind,
        has_not_applicable: false,
        nullable,
    }
}

fn is_not_applicable_variant(object: &SchemaObject) -> bool {
    if object.const_value.as_ref().map(is_sentinel).unwrap_or(false) {
        return true;
    }
    object
        .enum_values
        .as_ref()
        .map(|values| values.len() == 1 && is_sentinel(&values[0]))
        .unwrap_or(false)
}

fn is_sentinel(value: &Value) -> bool {
    value.as_str() == Some(NOT_APPLICABLE)
}

fn primary_instance_type(object: &SchemaObject) -> Option<InstanceType> {
    object.instance_type.as_ref().and_then(|kind| match kind {
        SingleOrVec::Single(single) => Some(**single),
        SingleOrVec::Vec(items) => items
            .iter()
            .cloned()
            .find(|item| *item != InstanceType::Null),
    })
}
