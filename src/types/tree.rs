use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::error::EvalError;
use super::instruction::FieldOp;

/// Caller-facing nested filter shape: field names (or `AND`/`OR`/`NOT`
/// keywords) mapped to JSON values. Both the parser's input and the rule
/// compiler's output use this shape.
pub type FilterObject = serde_json::Map<String, Json>;

/// Boolean connective of a compound node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
    Not,
}

impl Connective {
    /// Keyword spelling used in filter objects.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Not => "NOT",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Operand of a field leaf: a scalar/list payload for value operators, or a
/// nested tree for the relation operators (`is`, `some`, `every`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(Json),
    Tree(Box<ConditionTree>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Tree(t) => write!(f, "{t}"),
        }
    }
}

/// Condition AST produced by the parser.
///
/// Field leaves pair a field name with an operator and its operand; compound
/// nodes combine children under a connective. Trees are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionTree {
    Field {
        field: String,
        op: FieldOp,
        operand: Operand,
    },
    Compound {
        connective: Connective,
        children: Vec<ConditionTree>,
    },
}

impl ConditionTree {
    pub(crate) fn leaf(field: impl Into<String>, op: FieldOp, operand: Operand) -> Self {
        ConditionTree::Field {
            field: field.into(),
            op,
            operand,
        }
    }

    /// The empty condition, satisfied by every record. Serializes to `{}`.
    #[must_use]
    pub fn empty() -> Self {
        ConditionTree::Compound {
            connective: Connective::And,
            children: Vec::new(),
        }
    }

    /// True for the empty condition.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            ConditionTree::Compound { connective: Connective::And, children } if children.is_empty()
        )
    }

    /// Conjoin children, collapsing the trivial single-child wrapper.
    pub(crate) fn and(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.pop().expect("len checked")
        } else {
            ConditionTree::Compound {
                connective: Connective::And,
                children,
            }
        }
    }

    /// Disjoin children, collapsing the trivial single-child wrapper.
    pub(crate) fn or(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.pop().expect("len checked")
        } else {
            ConditionTree::Compound {
                connective: Connective::Or,
                children,
            }
        }
    }

    /// Negate a single child.
    pub(crate) fn not(child: Self) -> Self {
        ConditionTree::Compound {
            connective: Connective::Not,
            children: vec![child],
        }
    }

    /// Evaluate this tree against an in-memory record.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] only for the documented non-total operators
    /// (the `startsWith` family on a present non-string field value).
    pub fn evaluate(&self, record: &Json) -> Result<bool, EvalError> {
        crate::evaluate::evaluate(self, record)
    }

    /// Re-express this tree in the caller-facing nested filter shape.
    #[must_use]
    pub fn to_filter(&self) -> FilterObject {
        crate::serial::serialize(self)
    }
}

impl fmt::Display for ConditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTree::Field { field, op, operand } => {
                write!(f, "({field} {op} {operand})")
            }
            ConditionTree::Compound { connective, children } => {
                if children.is_empty() {
                    return write!(f, "({connective})");
                }
                if *connective == Connective::Not {
                    write!(f, "(NOT ")?;
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{child}")?;
                    }
                    return write!(f, ")");
                }
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {connective} ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
