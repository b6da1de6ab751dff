//! Dependency evaluation: pure, total functions that decide whether a field's
//! conditional rules match the current value snapshot. Nothing here fails;
//! unresolvable paths read as absent values, and the safe default for a rule
//! set that matches nothing is `false` (do not hide, do not require).

use serde_json::Value;

use crate::domain::{Clause, Dependency, Operator, RuleAction};
use crate::snapshot;

/// Applies `operator` to a value read from the snapshot (`dependency_value`)
/// and the comparison literal from the rule.
///
/// Absent values (`None` or JSON null) never satisfy `equals`/`contains` and
/// always satisfy `not-equals`/`not-contains`: an unanswered field is
/// definitely not the comparison value. Absent values are never coerced to
/// the text "undefined", so a comparison value containing that substring does
/// not accidentally match.
pub fn evaluate_operator(
    operator: Operator,
    dependency_value: Option<&Value>,
    expected: &Value,
) -> bool {
    match operator {
        Operator::Equals => matches_equals(dependency_value, expected),
        Operator::NotEquals => !matches_equals(dependency_value, expected),
        Operator::Contains => matches_contains(dependency_value, expected),
        Operator::NotContains => !matches_contains(dependency_value, expected),
    }
}

/// Evaluates every rule whose `then` matches `action` against the snapshot;
/// the overall result is the OR across those rules. An empty rule list is
/// `false`.
pub fn evaluate_rules(rules: &[Dependency], action: RuleAction, snapshot: &Value) -> bool {
    rules
        .iter()
        .filter(|rule| rule.then == action)
        .any(|rule| evaluate_rule(rule, snapshot))
}

/// One rule: `if` OR'd with `or`/`or2`, the result AND'd with `and`/`and2`.
pub fn evaluate_rule(rule: &Dependency, snapshot: &Value) -> bool {
    let mut satisfied = clause_matches(&rule.if_clause, snapshot);
    for clause in rule.or.iter().chain(rule.or2.iter()) {
        satisfied = satisfied || clause_matches(clause, snapshot);
    }
    for clause in rule.and.iter().chain(rule.and2.iter()) {
        satisfied = satisfied && clause_matches(clause, snapshot);
    }
    satisfied
}

fn clause_matches(clause: &Clause, snapshot: &Value) -> bool {
    evaluate_operator(
        clause.operator,
        snapshot::value_at_path(snapshot, &clause.path),
        &clause.value,
    )
}

fn matches_equals(dependency_value: Option<&Value>, expected: &Value) -> bool {
    match dependency_value {
        None | Some(Value::Null) => false,
        Some(actual) => actual == expected,
    }
}

fn matches_contains(dependency_value: Option<&Value>, expected: &Value) -> bool {
    let needle = comparable_string(expected).to_lowercase();
    match dependency_value {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| comparable_string(item).to_lowercase().contains(&needle)),
        Some(other) => comparable_string(other).to_lowercase().contains(&needle),
    }
}

fn comparable_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
