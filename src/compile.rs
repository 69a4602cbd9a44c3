use crate::parse;
use crate::types::{CompileError, ConditionTree, FilterObject, Policy};

pub(crate) fn compile(
    policy: &Policy,
    action: &str,
    subject: &str,
) -> Result<FilterObject, CompileError> {
    let tree = merge(policy, action, subject)?;
    Ok(crate::serial::serialize(&tree))
}

/// Merge the policy's rules for one action + subject pair into a single
/// condition tree: allows fold under `OR`, denies under `AND`-of-`NOT`.
pub(crate) fn merge(
    policy: &Policy,
    action: &str,
    subject: &str,
) -> Result<ConditionTree, CompileError> {
    let forbidden = || CompileError::Forbidden {
        action: action.to_owned(),
        subject: subject.to_owned(),
    };

    let mut allows = Vec::new();
    let mut denies = Vec::new();
    let mut any_allow = false;
    let mut unconditional_allow = false;

    for rule in policy.rules().iter().filter(|r| r.matches(action, subject)) {
        let tree = match &rule.conditions {
            Some(conditions) => Some(parse::parse(conditions)?),
            None => None,
        };
        if rule.inverted {
            match tree {
                Some(t) if !t.is_empty() => denies.push(t),
                // A deny with no conditions leaves nothing satisfiable.
                _ => return Err(forbidden()),
            }
        } else {
            any_allow = true;
            match tree {
                Some(t) if !t.is_empty() => allows.push(t),
                // An unconditional allow absorbs the whole OR group.
                _ => unconditional_allow = true,
            }
        }
    }

    if !any_allow {
        return Err(forbidden());
    }

    let mut parts = Vec::new();
    if !unconditional_allow {
        parts.push(ConditionTree::or(allows));
    }
    for deny in denies {
        parts.push(ConditionTree::not(deny));
    }
    Ok(ConditionTree::and(parts))
}
