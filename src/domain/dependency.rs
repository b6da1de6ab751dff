use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator used by conditional rules.
///
/// `Contains`/`NotContains` test case-insensitive substring containment; when
/// the dependency value is an array, membership of any element counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

/// What a matching rule does to the field that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Hide,
    Require,
}

/// A single `path operator value` comparison against the value snapshot.
/// `path` is dot-addressable ("group.field").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub path: String,
    pub operator: Operator,
    pub value: Value,
}

impl Clause {
    pub fn new(path: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A conditional rule attached to a field.
///
/// The `if` clause is OR-combined with `or`/`or2` when present; the result is
/// then AND-combined with `and`/`and2`. Evaluation is boolean and never fails;
/// paths that do not resolve read as absent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "if")]
    pub if_clause: Clause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Clause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or2: Option<Clause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Clause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and2: Option<Clause>,
    pub then: RuleAction,
}

impl Dependency {
    pub fn new(if_clause: Clause, then: RuleAction) -> Self {
        Self {
            if_clause,
            or: None,
            or2: None,
            and: None,
            and2: None,
            then,
        }
    }

    /// Adds an `or` clause. A rule carries at most two of them.
    pub fn or(mut self, clause: Clause) -> Self {
        debug_assert!(self.or2.is_none(), "a rule carries at most two or clauses");
        if self.or.is_none() {
            self.or = Some(clause);
        } else {
            self.or2 = Some(clause);
        }
        self
    }

    /// Adds an `and` clause. A rule carries at most two of them.
    pub fn and(mut self, clause: Clause) -> Self {
        debug_assert!(self.and2.is_none(), "a rule carries at most two and clauses");
        if self.and.is_none() {
            self.and = Some(clause);
        } else {
            self.and2 = Some(clause);
        }
        self
    }

    /// Every clause the rule reads, in evaluation order.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        std::iter::once(&self.if_clause)
            .chain(self.or.iter())
            .chain(self.or2.iter())
            .chain(self.and.iter())
            .chain(self.and2.iter())
    }
}
