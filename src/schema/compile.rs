//! Walks the form configuration and produces the validator pair: a full
//! schema mirroring the config tree 1:1 and a partial variant with every
//! field optional, plus the table of conditional-requirement rules applied
//! as a whole-object pass after structural validation.

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator, validator_for};
use serde_json::{Map, Value, json};

use crate::domain::{FieldConfig, FormConfig, NOT_APPLICABLE};
use crate::snapshot;

use super::matrix::{matrix_schema, ranking_schema};
use super::refine::{RequirementRule, apply_requirements, collect_requirements};
use super::report::ValidationReport;
use super::unwrap::{SchemaKind, SchemaShape, unwrap_schema};

/// A compiled form: deterministic product of [`compile`], safe to reuse for
/// every validation pass over the form's lifetime.
#[derive(Debug)]
pub struct CompiledForm {
    schema: Value,
    partial_schema: Value,
    full: Validator,
    partial: Validator,
    requirements: Vec<RequirementRule>,
}

impl CompiledForm {
    /// Full validation: structural errors per field path, then the
    /// whole-object requirement refinement. All issues are collected; none
    /// halts the pass.
    pub fn validate(&self, value: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        for error in self.full.iter_errors(value) {
            report.push(issue_path(&error), error.to_string());
        }
        apply_requirements(&self.requirements, value, &mut report);
        report
    }

    /// Structural validation with every field optional; used for live
    /// feedback while the form is still being filled in.
    pub fn validate_partial(&self, value: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        for error in self.partial.iter_errors(value) {
            report.push(issue_path(&error), error.to_string());
        }
        report
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_valid()
    }

    /// The generated JSON Schema document (full variant).
    pub fn schema_json(&self) -> &Value {
        &self.schema
    }

    /// The generated JSON Schema document with every field optional.
    pub fn partial_schema_json(&self) -> &Value {
        &self.partial_schema
    }

    pub fn requirements(&self) -> &[RequirementRule] {
        &self.requirements
    }
}

/// Compiles a form configuration. Misconfiguration fails loudly here, before
/// the form ever renders: a `schema` attribute that is not a recognized
/// validator, a schema shape that cannot fit its field kind, or a dependency
/// path that does not resolve to a configured field.
pub fn compile(config: &FormConfig) -> Result<CompiledForm> {
    check_dependency_paths(config)?;
    let schema = build_object_schema(&config.fields, false, false)?;
    let partial_schema = build_object_schema(&config.fields, true, false)?;
    let full = validator_for(&schema).context("failed to compile form schema")?;
    let partial =
        validator_for(&partial_schema).context("failed to compile partial form schema")?;
    Ok(CompiledForm {
        schema,
        partial_schema,
        full,
        partial,
        requirements: collect_requirements(config),
    })
}

fn build_object_schema(
    fields: &IndexMap<String, FieldConfig>,
    partial: bool,
    offer_not_applicable: bool,
) -> Result<Value> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (key, field) in fields {
        let property = match field {
            FieldConfig::Object(group) => build_object_schema(
                &group.fields,
                partial,
                offer_not_applicable || group.offer_not_applicable,
            )?,
            leaf => leaf_schema(key, leaf, offer_not_applicable)?,
        };
        if !partial && field.common().map(|common| common.required).unwrap_or(false) {
            required.push(Value::String(key.clone()));
        }
        properties.insert(key.clone(), property);
    }

    let mut object = Map::new();
    object.insert("type".into(), Value::String("object".into()));
    object.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        object.insert("required".into(), Value::Array(required));
    }
    Ok(Value::Object(object))
}

fn leaf_schema(key: &str, field: &FieldConfig, offer_not_applicable: bool) -> Result<Value> {
    let base = match field {
        FieldConfig::RatingMatrix {
            schema,
            items,
            scales,
            ..
        } => schema
            .clone()
            .unwrap_or_else(|| matrix_schema(items, scales)),
        FieldConfig::Ranking {
            schema, options, ..
        } => schema.clone().unwrap_or_else(|| ranking_schema(options)),
        other => other
            .schema_value()
            .cloned()
            .ok_or_else(|| anyhow!("field '{key}' is missing a schema"))?,
    };

    let shape = unwrap_schema(&base)
        .with_context(|| format!("field '{key}': schema attribute is not a recognized validator"))?;
    check_shape(key, field, shape)?;

    if offer_not_applicable && !shape.has_not_applicable {
        return Ok(json!({ "anyOf": [base, { "const": NOT_APPLICABLE }] }));
    }
    Ok(base)
}

fn check_shape(key: &str, field: &FieldConfig, shape: SchemaShape) -> Result<()> {
    let fits = match field {
        FieldConfig::CheckboxGroup { .. } | FieldConfig::Ranking { .. } => {
            matches!(shape.kind, SchemaKind::Array | SchemaKind::Unknown)
        }
        FieldConfig::Switch { .. } => matches!(
            shape.kind,
            SchemaKind::Boolean | SchemaKind::Enum | SchemaKind::Unknown
        ),
        FieldConfig::Number { .. } => matches!(
            shape.kind,
            SchemaKind::Number | SchemaKind::Integer | SchemaKind::Enum | SchemaKind::Unknown
        ),
        FieldConfig::RatingMatrix { .. } => {
            matches!(shape.kind, SchemaKind::Object | SchemaKind::Unknown)
        }
        FieldConfig::Text { .. }
        | FieldConfig::Textarea { .. }
        | FieldConfig::Select { .. }
        | FieldConfig::RadioGroup { .. }
        | FieldConfig::Object(_) => true,
    };
    if fits {
        Ok(())
    } else {
        bail!(
            "field '{key}': schema shape {:?} does not fit a {} field",
            shape.kind,
            field.kind_name()
        );
    }
}

/// Dot path an error should be reported at. Missing-property violations
/// arrive addressed at the parent object, so the missing property name is
/// appended to land the issue on the field itself.
fn issue_path(error: &ValidationError<'_>) -> String {
    let base = snapshot::pointer_to_path(&error.instance_path.to_string());
    if let ValidationErrorKind::Required { property } = &error.kind
        && let Some(name) = property.as_str()
    {
        return if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}.{name}")
        };
    }
    base
}

fn check_dependency_paths(config: &FormConfig) -> Result<()> {
    let known = known_paths(config);
    let mut problem: Option<(String, String)> = None;
    config.for_each_leaf(&mut |path, field| {
        if problem.is_some() {
            return;
        }
        for rule in field.dependencies() {
            for clause in rule.clauses() {
                if !known.contains(&clause.path) {
                    problem = Some((path.to_string(), clause.path.clone()));
                    return;
                }
            }
        }
    });
    if let Some((field, target)) = problem {
        bail!("field '{field}' depends on '{target}', which does not resolve to a configured field");
    }
    Ok(())
}

fn known_paths(config: &FormConfig) -> HashSet<String> {
    fn walk(
        prefix: &str,
        fields: &IndexMap<String, FieldConfig>,
        known: &mut HashSet<String>,
    ) {
        for (key, field) in fields {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            if let Some(group) = field.as_group() {
                walk(&path, &group.fields, known);
            }
            known.insert(path);
        }
    }

    let mut known = HashSet::new();
    walk("", &config.fields, &mut known);
    known
}
