//! The component binder: owns the committed value snapshot, one binding per
//! leaf field, and the sync machinery between transient local edits and the
//! shared snapshot. All mutation happens on the caller's (single) thread
//! through the methods here; validation only ever reads the snapshot.

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::domain::{FieldConfig, FormConfig, NOT_APPLICABLE, RuleAction};
use crate::schema::ValidationReport;
use crate::{eval, snapshot};

use super::clock::{Clock, SystemClock};
use super::field::{
    BindingKind, BindingView, FieldBinding, SyncPhase, SyncPolicy, serialize_value,
};

/// Idle delay before a debounced text edit reaches the shared snapshot.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct FormBinder {
    config: FormConfig,
    values: Value,
    fields: IndexMap<String, FieldBinding>,
    clock: Box<dyn Clock>,
    debounce: Duration,
    global_errors: Vec<String>,
}

impl FormBinder {
    pub fn new(config: FormConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: FormConfig, clock: Box<dyn Clock>) -> Self {
        let mut fields = IndexMap::new();
        config.for_each_leaf(&mut |path, field| {
            if let Some((component, kind, policy)) = leaf_binding(field) {
                fields.insert(
                    path.to_string(),
                    FieldBinding::new(path, component, kind, policy),
                );
            }
        });
        Self {
            config,
            values: Value::Object(Map::new()),
            fields,
            clock,
            debounce: DEFAULT_DEBOUNCE,
            global_errors: Vec::new(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The committed snapshot, as the validator should see it.
    pub fn committed(&self) -> &Value {
        &self.values
    }

    /// Effective value as the UI should display it: the pending local edit
    /// when one exists, the committed value otherwise.
    pub fn value(&self, path: &str) -> Option<Value> {
        let binding = self.fields.get(path)?;
        if let Some(local) = &binding.local {
            return Some(local.clone());
        }
        snapshot::value_at_path(&self.values, path).cloned()
    }

    /// Records a user edit. Continuous-input fields hold the value locally
    /// and restart their idle timer; discrete fields commit on the next tick.
    /// Editing clears the field's current error.
    pub fn input(&mut self, path: &str, value: Value) {
        let now = self.clock.now();
        let debounce = self.debounce;
        let Some(binding) = self.fields.get_mut(path) else {
            return;
        };
        binding.error = None;
        binding.local = Some(value);
        binding.phase = SyncPhase::LocallyDirty;
        match binding.policy {
            SyncPolicy::Debounce => binding.deadline = Some(now + debounce),
            SyncPolicy::NextTick => binding.deadline = None,
            SyncPolicy::Immediate => {
                commit_into(&mut self.values, binding);
            }
        }
    }

    /// Commits the field's pending edit immediately, regardless of timers.
    /// Returns whether anything was committed.
    pub fn blur(&mut self, path: &str) -> bool {
        let Some(binding) = self.fields.get_mut(path) else {
            return false;
        };
        commit_into(&mut self.values, binding)
    }

    /// Advances the sync boundary: commits every next-tick edit and every
    /// debounced edit whose idle delay has elapsed. Returns the committed
    /// paths in authored order.
    pub fn tick(&mut self) -> Vec<String> {
        let now = self.clock.now();
        let mut committed = Vec::new();
        for binding in self.fields.values_mut() {
            if binding.phase != SyncPhase::LocallyDirty {
                continue;
            }
            let due = match binding.policy {
                SyncPolicy::NextTick | SyncPolicy::Immediate => true,
                SyncPolicy::Debounce => binding
                    .deadline
                    .map(|deadline| now >= deadline)
                    .unwrap_or(false),
            };
            if due && commit_into(&mut self.values, binding) {
                committed.push(binding.path.clone());
            }
        }
        committed
    }

    /// Programmatic write from outside any field's own handler. The touched
    /// field (and any other field whose committed value changed) is forced
    /// back to pristine and loses its pending local edit.
    pub fn set_value(&mut self, path: &str, value: Value) {
        snapshot::insert_at_path(&mut self.values, path, value);
        self.resync();
    }

    /// Loads an existing value tree into committed state, field by field.
    pub fn seed_from_value(&mut self, value: &Value) {
        let paths: Vec<String> = self.fields.keys().cloned().collect();
        for path in paths {
            if let Some(subvalue) = snapshot::value_at_path(value, &path) {
                snapshot::insert_at_path(&mut self.values, &path, subvalue.clone());
            }
        }
        self.resync();
    }

    /// Clears the committed snapshot and every binding back to pristine.
    pub fn reset(&mut self) {
        self.values = Value::Object(Map::new());
        self.global_errors.clear();
        self.resync();
    }

    /// Visibility per the field's `hide` rules, evaluated against the
    /// committed snapshot. Unknown paths fail safe: the field stays visible.
    pub fn visible(&self, path: &str) -> bool {
        let Some(field) = self.config.leaf(path) else {
            return true;
        };
        !eval::evaluate_rules(field.dependencies(), RuleAction::Hide, &self.values)
    }

    pub fn phase(&self, path: &str) -> Option<SyncPhase> {
        self.fields.get(path).map(|binding| binding.phase)
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.fields.get(path).and_then(|binding| binding.error())
    }

    pub fn binding(&self, path: &str) -> Option<BindingView<'_>> {
        let binding = self.fields.get(path)?;
        Some(self.view(binding))
    }

    /// Every leaf binding in authored order; hidden fields are included with
    /// `visible` unset so renderers can unmount them.
    pub fn bindings(&self) -> Vec<BindingView<'_>> {
        self.fields
            .values()
            .map(|binding| self.view(binding))
            .collect()
    }

    /// True when every leaf inside the group currently equals the
    /// not-applicable sentinel.
    pub fn group_not_applicable(&self, group_path: &str) -> bool {
        let leaves = self.group_leaf_paths(group_path);
        !leaves.is_empty()
            && leaves.iter().all(|path| {
                matches!(
                    snapshot::value_at_path(&self.values, path),
                    Some(Value::String(text)) if text == NOT_APPLICABLE
                )
            })
    }

    /// Stamps or clears the sentinel across every leaf of the group in one
    /// update; no partial application. A no-op unless the group is configured
    /// to offer not-applicable.
    pub fn set_group_not_applicable(&mut self, group_path: &str, enabled: bool) {
        let offers = self
            .config
            .group(group_path)
            .map(|group| group.offer_not_applicable)
            .unwrap_or(false);
        if !offers {
            return;
        }
        for path in self.group_leaf_paths(group_path) {
            if enabled {
                snapshot::insert_at_path(
                    &mut self.values,
                    &path,
                    Value::String(NOT_APPLICABLE.to_string()),
                );
            } else {
                snapshot::remove_at_path(&mut self.values, &path);
            }
        }
        self.resync();
    }

    /// Routes validation issues onto field bindings by path. Issues that
    /// address array elements fall back to the owning field; anything left
    /// over lands in the global error list.
    pub fn apply_report(&mut self, report: &ValidationReport) {
        for binding in self.fields.values_mut() {
            binding.error = None;
        }
        self.global_errors.clear();
        for issue in &report.issues {
            if !self.set_field_error(&issue.path, &issue.message) {
                let label = if issue.path.is_empty() {
                    "<root>".to_string()
                } else {
                    issue.path.clone()
                };
                self.global_errors.push(format!("{label}: {}", issue.message));
            }
        }
    }

    pub fn clear_errors(&mut self) {
        for binding in self.fields.values_mut() {
            binding.error = None;
        }
        self.global_errors.clear();
    }

    pub fn global_errors(&self) -> &[String] {
        &self.global_errors
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|binding| binding.is_dirty())
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .values()
            .filter(|binding| binding.error.is_some())
            .count()
            + self.global_errors.len()
    }

    fn view<'a>(&'a self, binding: &'a FieldBinding) -> BindingView<'a> {
        BindingView {
            path: &binding.path,
            component: binding.component,
            kind: &binding.kind,
            value: self.value(&binding.path),
            visible: self.visible(&binding.path),
            error: binding.error(),
            phase: binding.phase,
        }
    }

    /// Re-reads committed values. Any field whose committed value changed
    /// through something other than its own commit is forced to pristine and
    /// loses pending local edits. Serialized text is compared, not identity,
    /// so a rewrite of a structurally equal array does not reset the field.
    fn resync(&mut self) {
        for binding in self.fields.values_mut() {
            let current = serialize_value(snapshot::value_at_path(&self.values, &binding.path));
            if current != binding.last_synced {
                binding.reset_external(snapshot::value_at_path(&self.values, &binding.path));
            }
        }
    }

    fn set_field_error(&mut self, path: &str, message: &str) -> bool {
        let mut candidate = path.to_string();
        loop {
            if let Some(binding) = self.fields.get_mut(&candidate) {
                if binding.error.is_none() {
                    binding.error = Some(message.to_string());
                }
                return true;
            }
            match candidate.rfind('.') {
                Some(split) => candidate.truncate(split),
                None => return false,
            }
        }
    }

    fn group_leaf_paths(&self, group_path: &str) -> Vec<String> {
        let prefix = format!("{group_path}.");
        self.fields
            .keys()
            .filter(|path| path.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

fn commit_into(values: &mut Value, binding: &mut FieldBinding) -> bool {
    let Some(value) = binding.local.take() else {
        return false;
    };
    snapshot::insert_at_path(values, &binding.path, value);
    binding.phase = SyncPhase::Committed;
    binding.deadline = None;
    binding.last_synced = serialize_value(snapshot::value_at_path(values, &binding.path));
    true
}

fn leaf_binding(field: &FieldConfig) -> Option<(&'static str, BindingKind, SyncPolicy)> {
    let (kind, policy) = match field {
        FieldConfig::Text { .. } => (BindingKind::Text { multiline: false }, SyncPolicy::Debounce),
        FieldConfig::Textarea { .. } => {
            (BindingKind::Text { multiline: true }, SyncPolicy::Debounce)
        }
        FieldConfig::Number { min, max, .. } => (
            BindingKind::Number {
                min: *min,
                max: *max,
            },
            SyncPolicy::Debounce,
        ),
        FieldConfig::Select { options, .. } | FieldConfig::RadioGroup { options, .. } => (
            BindingKind::Choice {
                options: options.clone(),
                multiple: false,
            },
            SyncPolicy::NextTick,
        ),
        FieldConfig::CheckboxGroup { options, .. } => (
            BindingKind::Choice {
                options: options.clone(),
                multiple: true,
            },
            SyncPolicy::NextTick,
        ),
        FieldConfig::Switch { .. } => (BindingKind::Toggle, SyncPolicy::Immediate),
        FieldConfig::RatingMatrix { items, scales, .. } => (
            BindingKind::Matrix {
                items: items.clone(),
                scales: scales.clone(),
            },
            SyncPolicy::NextTick,
        ),
        FieldConfig::Ranking { options, .. } => (
            BindingKind::Ranking {
                options: options.clone(),
            },
            SyncPolicy::NextTick,
        ),
        FieldConfig::Object(_) => return None,
    };
    Some((field.kind_name(), kind, policy))
}
