mod blueprint;
mod compile;
mod matrix;
mod refine;
mod report;
mod unwrap;

pub use blueprint::form_blueprint;
pub use compile::{CompiledForm, compile};
pub use matrix::{matrix_schema, ranking_schema};
pub use refine::{REQUIRED_MESSAGE, RequirementRule};
pub use report::{FieldIssue, ValidationReport};
pub use unwrap::{SchemaKind, SchemaShape, unwrap_schema};
