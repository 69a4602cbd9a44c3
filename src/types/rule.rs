use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::error::CompileError;
use super::tree::FilterObject;
use crate::WardenError;

/// Wildcard action matching every action.
pub const MANAGE: &str = "manage";

/// Wildcard subject matching every subject type.
pub const ALL: &str = "all";

/// One allow/deny statement of a policy.
///
/// `conditions` is a caller-authored filter object restricting which records
/// the rule applies to; absent conditions apply unconditionally. A rule with
/// `inverted == true` is a deny rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub action: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Json>,
    #[serde(default)]
    pub inverted: bool,
}

impl Rule {
    pub(crate) fn matches(&self, action: &str, subject: &str) -> bool {
        (self.action == action || self.action == MANAGE)
            && (self.subject == subject || self.subject == ALL)
    }
}

/// An ordered collection of rules for one caller/session.
///
/// Immutable once built and safe to share behind `Arc`; every operation on a
/// policy is a pure function of its rules.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden::Policy;
///
/// let policy = Policy::builder()
///     .allow_when("read", "Article", json!({"published": true}))
///     .deny_when("read", "Article", json!({"archived": true}))
///     .build();
///
/// let filter = policy.accessible_by("read", "Article").unwrap();
/// assert!(policy.can("read", "Article", &json!({"published": true})).unwrap());
/// # let _ = filter;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    rules: Vec<Rule>,
}

impl Policy {
    /// Create a policy from an already-ordered rule list.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Start building a policy rule by rule.
    #[must_use]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// The rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Merge this policy's rules for `action` on `subject` into a single
    /// backend-facing filter object.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Forbidden`] when no combination of rules is
    /// satisfiable for the pair, and [`CompileError::Parse`] when a rule's
    /// conditions are malformed.
    pub fn accessible_by(
        &self,
        action: &str,
        subject: &str,
    ) -> Result<FilterObject, CompileError> {
        crate::compile::compile(self, action, subject)
    }

    /// In-memory permission check: may the caller perform `action` on this
    /// specific `record` of type `subject`?
    ///
    /// An unsatisfiable action/subject pair is an ordinary `false` here, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError`] when a rule's conditions are malformed or a
    /// non-total operator meets an unexpected field value.
    pub fn can(&self, action: &str, subject: &str, record: &Json) -> Result<bool, WardenError> {
        match crate::compile::merge(self, action, subject) {
            Ok(tree) => Ok(tree.evaluate(record)?),
            Err(CompileError::Forbidden { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Builder for a [`Policy`]. Rules keep their declaration order.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    rules: Vec<Rule>,
}

impl PolicyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `action` on `subject` unconditionally.
    #[must_use]
    pub fn allow(self, action: &str, subject: &str) -> Self {
        self.push(action, subject, None, false)
    }

    /// Allow `action` on `subject` for records matching `conditions`.
    #[must_use]
    pub fn allow_when(self, action: &str, subject: &str, conditions: Json) -> Self {
        self.push(action, subject, Some(conditions), false)
    }

    /// Deny `action` on `subject` unconditionally.
    #[must_use]
    pub fn deny(self, action: &str, subject: &str) -> Self {
        self.push(action, subject, None, true)
    }

    /// Deny `action` on `subject` for records matching `conditions`.
    #[must_use]
    pub fn deny_when(self, action: &str, subject: &str, conditions: Json) -> Self {
        self.push(action, subject, Some(conditions), true)
    }

    #[must_use]
    pub fn build(self) -> Policy {
        Policy { rules: self.rules }
    }

    fn push(
        mut self,
        action: &str,
        subject: &str,
        conditions: Option<Json>,
        inverted: bool,
    ) -> Self {
        self.rules.push(Rule {
            action: action.to_owned(),
            subject: subject.to_owned(),
            conditions,
            inverted,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let policy = Policy::builder()
            .allow("read", "Article")
            .deny_when("read", "Article", json!({"id": 2}))
            .allow_when("update", "Article", json!({"authorId": 7}))
            .build();

        assert_eq!(policy.rules().len(), 3);
        assert_eq!(policy.rules()[0].action, "read");
        assert!(!policy.rules()[0].inverted);
        assert!(policy.rules()[1].inverted);
        assert_eq!(policy.rules()[2].action, "update");
    }

    #[test]
    fn rule_matches_exact_and_wildcards() {
        let rule = Rule {
            action: "read".into(),
            subject: "Article".into(),
            conditions: None,
            inverted: false,
        };
        assert!(rule.matches("read", "Article"));
        assert!(!rule.matches("update", "Article"));
        assert!(!rule.matches("read", "Comment"));

        let manage_all = Rule {
            action: MANAGE.into(),
            subject: ALL.into(),
            conditions: None,
            inverted: false,
        };
        assert!(manage_all.matches("read", "Article"));
        assert!(manage_all.matches("delete", "Comment"));
    }

    #[test]
    fn policy_deserializes_from_json() {
        let policy: Policy = serde_json::from_value(json!({
            "rules": [
                {"action": "read", "subject": "Article"},
                {"action": "read", "subject": "Article", "conditions": {"id": 2}, "inverted": true},
            ]
        }))
        .unwrap();

        assert_eq!(policy.rules().len(), 2);
        assert_eq!(policy.rules()[0].conditions, None);
        assert!(!policy.rules()[0].inverted);
        assert_eq!(policy.rules()[1].conditions, Some(json!({"id": 2})));
        assert!(policy.rules()[1].inverted);
    }

    #[test]
    fn rule_serialization_skips_absent_conditions() {
        let rule = Rule {
            action: "read".into(),
            subject: "Article".into(),
            conditions: None,
            inverted: false,
        };
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value,
            json!({"action": "read", "subject": "Article", "inverted": false})
        );
    }
}
