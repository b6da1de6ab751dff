#![deny(rust_2018_idioms)]

//! Compiles a declarative form configuration into a validator pair and a set
//! of renderable field bindings. The config tree is the single source of
//! truth: the schema compiler derives full and partial JSON Schema
//! validators (plus a whole-object conditional-requirement pass) from it,
//! and the component binder derives per-field bindings that read and write
//! through a shared value snapshot, with conditional visibility and
//! debounced local edit state.

mod domain;
mod eval;
mod form;
mod schema;
mod snapshot;


pub use domain::{
    ChoiceOption, Clause, Dependency, FieldCommon, FieldConfig, FormConfig, GroupConfig,
    MatrixItem, MatrixScale, NOT_APPLICABLE, Operator, RuleAction,
};
pub use eval::{evaluate_operator, evaluate_rule, evaluate_rules};
pub use form::{
    BindingKind, BindingView, Clock, DEFAULT_DEBOUNCE, FieldBinding, FormBinder, ManualClock,
    SyncPhase, SyncPolicy, SystemClock,
};
pub use schema::{
    CompiledForm, FieldIssue, REQUIRED_MESSAGE, RequirementRule, SchemaKind, SchemaShape,
    ValidationReport, compile, form_blueprint, matrix_schema, ranking_schema, unwrap_schema,
};
pub use snapshot::{insert_at_path, value_at_path};

pub mod prelude {
    pub use super::{
        Clause, CompiledForm, Dependency, FieldCommon, FieldConfig, FormBinder, FormConfig,
        GroupConfig, Operator, RuleAction, compile,
    };
}
