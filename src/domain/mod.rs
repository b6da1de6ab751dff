mod config;
mod dependency;

pub use config::{
    ChoiceOption, FieldCommon, FieldConfig, FormConfig, GroupConfig, MatrixItem, MatrixScale,
    NOT_APPLICABLE,
};
pub use dependency::{Clause, Dependency, Operator, RuleAction};
