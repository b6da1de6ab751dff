//! The whole-object refinement pass: after structural validation, every field
//! carrying `require` rules is re-checked against the full snapshot and an
//! issue is raised where a conditionally-required field is empty.

use serde_json::Value;

use crate::domain::{Dependency, FormConfig, RuleAction};
use crate::{eval, snapshot};

use super::report::ValidationReport;

/// Message attached to conditional-requirement issues. Generic on purpose so
/// consumers can localize it by key.
pub const REQUIRED_MESSAGE: &str = "this field is required";

/// A field whose presence is demanded by at least one `require` rule.
#[derive(Debug, Clone)]
pub struct RequirementRule {
    pub path: String,
    pub rules: Vec<Dependency>,
}

/// Collects every leaf carrying `require` dependencies, in authored order.
pub fn collect_requirements(config: &FormConfig) -> Vec<RequirementRule> {
    let mut requirements = Vec::new();
    config.for_each_leaf(&mut |path, field| {
        let rules: Vec<Dependency> = field
            .dependencies()
            .iter()
            .filter(|rule| rule.then == RuleAction::Require)
            .cloned()
            .collect();
        if !rules.is_empty() {
            requirements.push(RequirementRule {
                path: path.to_string(),
                rules,
            });
        }
    });
    requirements
}

/// Runs the requirement rules against a read-only snapshot and appends one
/// issue per conditionally-required empty field. Fields that already carry a
/// structural issue at the same path are skipped.
pub fn apply_requirements(
    requirements: &[RequirementRule],
    snapshot: &Value,
    report: &mut ValidationReport,
) {
    for requirement in requirements {
        if !eval::evaluate_rules(&requirement.rules, RuleAction::Require, snapshot) {
            continue;
        }
        if report.has_issue_at(&requirement.path) {
            continue;
        }
        if snapshot::is_empty_value(snapshot::value_at_path(snapshot, &requirement.path)) {
            report.push(&requirement.path, REQUIRED_MESSAGE);
        }
    }
}
