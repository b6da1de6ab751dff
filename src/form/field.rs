use std::time::Instant;

use serde_json::Value;

use crate::domain::{ChoiceOption, MatrixItem, MatrixScale};

/// How edits travel from a field's local buffer to the shared snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Continuous input: hold edits locally, commit after an idle delay or
    /// on blur. Editing again restarts the delay (last write wins).
    Debounce,
    /// Discrete selection: commit on the next `tick` call.
    NextTick,
    /// Commit as part of the edit itself.
    Immediate,
}

/// Sync lifecycle of one leaf field. `Committed` re-enters `LocallyDirty` on
/// the next edit; an external write forces `Pristine` regardless of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Pristine,
    LocallyDirty,
    Committed,
}

/// Widget descriptor handed to the rendering layer alongside the bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    Text { multiline: bool },
    Number { min: Option<f64>, max: Option<f64> },
    Choice { options: Vec<ChoiceOption>, multiple: bool },
    Toggle,
    Matrix { items: Vec<MatrixItem>, scales: Vec<MatrixScale> },
    Ranking { options: Vec<ChoiceOption> },
}

/// Per-leaf binding state: the transient local value, its sync phase, and the
/// serialized form of the last committed value this field itself observed.
/// The serialized copy is what external-change detection compares against,
/// because callers rebuild array and object values wholesale.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    pub(crate) path: String,
    pub(crate) component: &'static str,
    pub(crate) kind: BindingKind,
    pub(crate) policy: SyncPolicy,
    pub(crate) phase: SyncPhase,
    pub(crate) local: Option<Value>,
    pub(crate) deadline: Option<Instant>,
    pub(crate) last_synced: String,
    pub(crate) error: Option<String>,
}

impl FieldBinding {
    pub(crate) fn new(
        path: impl Into<String>,
        component: &'static str,
        kind: BindingKind,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            path: path.into(),
            component,
            kind,
            policy,
            phase: SyncPhase::Pristine,
            local: None,
            deadline: None,
            last_synced: String::new(),
            error: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.phase != SyncPhase::Pristine
    }

    pub(crate) fn reset_external(&mut self, committed: Option<&Value>) {
        self.phase = SyncPhase::Pristine;
        self.local = None;
        self.deadline = None;
        self.error = None;
        self.last_synced = serialize_value(committed);
    }
}

/// Snapshot of one field handed to the rendering layer. Mutations go back
/// through the binder (`input`, `blur`, `set_value`); bindings must be
/// re-queried after every snapshot mutation.
#[derive(Debug, Clone)]
pub struct BindingView<'a> {
    pub path: &'a str,
    pub component: &'static str,
    pub kind: &'a BindingKind,
    pub value: Option<Value>,
    pub visible: bool,
    pub error: Option<&'a str>,
    pub phase: SyncPhase,
}

pub(crate) fn serialize_value(value: Option<&Value>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
