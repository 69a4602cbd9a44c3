use std::fmt;

use serde::{Deserialize, Serialize};

use super::tree::Connective;

/// Field-level operators supported in filter objects.
///
/// Every operator the parser can emit is a variant here, including the
/// case-insensitive string variants produced by the `mode: "insensitive"`
/// rewrite and the negated forms (`NotIn`, `NotLike`, `NotIlike`, `IsNot`,
/// `None`), which the registry resolves back to their base operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldOp {
    Eq,
    Ne,
    /// Field-scoped negation: its operand re-parses against the same field
    /// and the parser wraps the result in a `NOT` compound, so this variant
    /// never appears in a built tree.
    Not,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    StartsWith,
    EndsWith,
    Contains,
    IStartsWith,
    IEndsWith,
    IContains,
    Like,
    Ilike,
    NotLike,
    NotIlike,
    Has,
    HasSome,
    HasEvery,
    ArrayOverlaps,
    ArrayContains,
    ArrayContained,
    IsEmpty,
    IsNull,
    IsNotNull,
    IsSet,
    Is,
    IsNot,
    Some,
    None,
    Every,
    Raw,
}

impl FieldOp {
    /// Public spelling of this operator, as written in filter objects and
    /// emitted by the serializer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FieldOp::Eq => "eq",
            FieldOp::Ne => "ne",
            FieldOp::Not => "not",
            FieldOp::Lt => "lt",
            FieldOp::Lte => "lte",
            FieldOp::Gt => "gt",
            FieldOp::Gte => "gte",
            FieldOp::In => "in",
            FieldOp::NotIn => "notIn",
            FieldOp::StartsWith => "startsWith",
            FieldOp::EndsWith => "endsWith",
            FieldOp::Contains => "contains",
            FieldOp::IStartsWith => "istartsWith",
            FieldOp::IEndsWith => "iendsWith",
            FieldOp::IContains => "icontains",
            FieldOp::Like => "like",
            FieldOp::Ilike => "ilike",
            FieldOp::NotLike => "notLike",
            FieldOp::NotIlike => "notIlike",
            FieldOp::Has => "has",
            FieldOp::HasSome => "hasSome",
            FieldOp::HasEvery => "hasEvery",
            FieldOp::ArrayOverlaps => "arrayOverlaps",
            FieldOp::ArrayContains => "arrayContains",
            FieldOp::ArrayContained => "arrayContained",
            FieldOp::IsEmpty => "isEmpty",
            FieldOp::IsNull => "isNull",
            FieldOp::IsNotNull => "isNotNull",
            FieldOp::IsSet => "isSet",
            FieldOp::Is => "is",
            FieldOp::IsNot => "isNot",
            FieldOp::Some => "some",
            FieldOp::None => "none",
            FieldOp::Every => "every",
            FieldOp::Raw => "RAW",
        }
    }

    /// Case-insensitive counterpart of a string operator. Operators without
    /// one are returned unchanged.
    #[must_use]
    pub const fn case_insensitive(self) -> FieldOp {
        match self {
            FieldOp::StartsWith => FieldOp::IStartsWith,
            FieldOp::EndsWith => FieldOp::IEndsWith,
            FieldOp::Contains => FieldOp::IContains,
            FieldOp::Like => FieldOp::Ilike,
            FieldOp::NotLike => FieldOp::NotIlike,
            other => other,
        }
    }

    /// The base operator this operator negates, resolved through the
    /// registry. `None` for direct (non-negated) operators.
    #[must_use]
    pub fn inverts(self) -> Option<FieldOp> {
        lookup(self.name()).and_then(|inst| inst.inverts)
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an instruction is: a field-level operator, a boolean connective, or
/// the `mode` case-sensitivity pseudo-operator consumed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Field(FieldOp),
    Compound(Connective),
    Mode,
}

/// Operand validation rule, carried as data on each instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// Any JSON value.
    Any,
    /// A number or a string (dates are RFC 3339 strings).
    Comparable,
    /// A JSON array.
    List,
    /// A string pattern.
    Pattern,
    /// A boolean.
    Bool,
    /// A nested filter object.
    Relation,
    /// Opaque backend payload, never decomposed.
    Raw,
    /// The string `"insensitive"` or `"default"`.
    CaseMode,
}

impl OperandShape {
    /// Human description used in invalid-argument errors.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            OperandShape::Any | OperandShape::Raw => "any value",
            OperandShape::Comparable => "a number, string, or date",
            OperandShape::List => "a list",
            OperandShape::Pattern => "a string",
            OperandShape::Bool => "a boolean",
            OperandShape::Relation => "a nested filter object",
            OperandShape::CaseMode => "\"insensitive\" or \"default\"",
        }
    }
}

/// One entry in the instruction registry: an operator's public name, its
/// kind, its operand validation rule, and the base operator it negates (for
/// the `not*`-style forms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub name: &'static str,
    pub kind: Kind,
    pub shape: OperandShape,
    pub inverts: Option<FieldOp>,
}

const fn field(name: &'static str, op: FieldOp, shape: OperandShape) -> Instruction {
    Instruction {
        name,
        kind: Kind::Field(op),
        shape,
        inverts: Option::None,
    }
}

const fn inverted(
    name: &'static str,
    op: FieldOp,
    shape: OperandShape,
    base: FieldOp,
) -> Instruction {
    Instruction {
        name,
        kind: Kind::Field(op),
        shape,
        inverts: Option::Some(base),
    }
}

const fn compound(name: &'static str, connective: Connective) -> Instruction {
    Instruction {
        name,
        kind: Kind::Compound(connective),
        shape: OperandShape::Any,
        inverts: Option::None,
    }
}

/// The closed set of built-in instructions. Negated operators carry the same
/// operand shape as their base so validation never needs to chase the link.
const INSTRUCTIONS: &[Instruction] = &[
    field("eq", FieldOp::Eq, OperandShape::Any),
    field("ne", FieldOp::Ne, OperandShape::Any),
    field("not", FieldOp::Not, OperandShape::Any),
    field("lt", FieldOp::Lt, OperandShape::Comparable),
    field("lte", FieldOp::Lte, OperandShape::Comparable),
    field("gt", FieldOp::Gt, OperandShape::Comparable),
    field("gte", FieldOp::Gte, OperandShape::Comparable),
    field("in", FieldOp::In, OperandShape::List),
    inverted("notIn", FieldOp::NotIn, OperandShape::List, FieldOp::In),
    field("startsWith", FieldOp::StartsWith, OperandShape::Pattern),
    field("endsWith", FieldOp::EndsWith, OperandShape::Pattern),
    field("contains", FieldOp::Contains, OperandShape::Pattern),
    field("istartsWith", FieldOp::IStartsWith, OperandShape::Pattern),
    field("iendsWith", FieldOp::IEndsWith, OperandShape::Pattern),
    field("icontains", FieldOp::IContains, OperandShape::Pattern),
    field("like", FieldOp::Like, OperandShape::Pattern),
    field("ilike", FieldOp::Ilike, OperandShape::Pattern),
    inverted("notLike", FieldOp::NotLike, OperandShape::Pattern, FieldOp::Like),
    inverted("notIlike", FieldOp::NotIlike, OperandShape::Pattern, FieldOp::Ilike),
    field("has", FieldOp::Has, OperandShape::Any),
    field("hasSome", FieldOp::HasSome, OperandShape::List),
    field("hasEvery", FieldOp::HasEvery, OperandShape::List),
    field("arrayOverlaps", FieldOp::ArrayOverlaps, OperandShape::List),
    field("arrayContains", FieldOp::ArrayContains, OperandShape::List),
    field("arrayContained", FieldOp::ArrayContained, OperandShape::List),
    field("isEmpty", FieldOp::IsEmpty, OperandShape::Bool),
    field("isNull", FieldOp::IsNull, OperandShape::Bool),
    field("isNotNull", FieldOp::IsNotNull, OperandShape::Bool),
    field("isSet", FieldOp::IsSet, OperandShape::Bool),
    field("is", FieldOp::Is, OperandShape::Relation),
    inverted("isNot", FieldOp::IsNot, OperandShape::Relation, FieldOp::Is),
    field("some", FieldOp::Some, OperandShape::Relation),
    inverted("none", FieldOp::None, OperandShape::Relation, FieldOp::Some),
    field("every", FieldOp::Every, OperandShape::Relation),
    field("RAW", FieldOp::Raw, OperandShape::Raw),
    Instruction {
        name: "mode",
        kind: Kind::Mode,
        shape: OperandShape::CaseMode,
        inverts: Option::None,
    },
    compound("AND", Connective::And),
    compound("OR", Connective::Or),
    compound("NOT", Connective::Not),
];

/// Resolve an operator name to its registry entry. Callers strip the `$`
/// alias prefix before lookup.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Instruction> {
    INSTRUCTIONS.iter().find(|inst| inst.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_operator() {
        let inst = lookup("gte").unwrap();
        assert_eq!(inst.kind, Kind::Field(FieldOp::Gte));
        assert_eq!(inst.shape, OperandShape::Comparable);
        assert_eq!(inst.inverts, None);
    }

    #[test]
    fn lookup_unknown_operator() {
        assert!(lookup("between").is_none());
        assert!(lookup("$eq").is_none(), "aliases are stripped before lookup");
    }

    #[test]
    fn lookup_compound() {
        assert_eq!(lookup("AND").unwrap().kind, Kind::Compound(Connective::And));
        assert_eq!(lookup("NOT").unwrap().kind, Kind::Compound(Connective::Not));
    }

    #[test]
    fn every_op_round_trips_through_its_name() {
        for inst in INSTRUCTIONS {
            if let Kind::Field(op) = inst.kind {
                assert_eq!(op.name(), inst.name);
                assert_eq!(lookup(op.name()), Some(inst));
            }
        }
    }

    #[test]
    fn inverted_operators_share_base_shape() {
        for inst in INSTRUCTIONS {
            if let Some(base) = inst.inverts {
                let base_inst = lookup(base.name()).unwrap();
                assert_eq!(inst.shape, base_inst.shape, "shape mismatch for {}", inst.name);
            }
        }
    }

    #[test]
    fn inverts_resolves_through_registry() {
        assert_eq!(FieldOp::NotIn.inverts(), Some(FieldOp::In));
        assert_eq!(FieldOp::None.inverts(), Some(FieldOp::Some));
        assert_eq!(FieldOp::IsNot.inverts(), Some(FieldOp::Is));
        assert_eq!(FieldOp::Eq.inverts(), None);
    }

    #[test]
    fn case_insensitive_rewrites() {
        assert_eq!(FieldOp::Contains.case_insensitive(), FieldOp::IContains);
        assert_eq!(FieldOp::StartsWith.case_insensitive(), FieldOp::IStartsWith);
        assert_eq!(FieldOp::Like.case_insensitive(), FieldOp::Ilike);
        assert_eq!(FieldOp::NotLike.case_insensitive(), FieldOp::NotIlike);
        assert_eq!(FieldOp::Eq.case_insensitive(), FieldOp::Eq);
    }

    #[test]
    fn display_uses_public_spelling() {
        assert_eq!(FieldOp::NotIn.to_string(), "notIn");
        assert_eq!(FieldOp::Raw.to_string(), "RAW");
    }
}
