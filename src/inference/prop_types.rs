//! Declared propTypes: the raw descriptors emitted by static analysis and
//! their validated form.
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::ShapeError;
use crate::ir::{Literal, Shape, ShapeValue, TypeTag};

pub type PropTypeMap = IndexMap<String, PropTypeDecl>;

/// Raw declaration for one prop.
///
/// Wire forms:
/// - `"string_isRequired"` (any tag name)
/// - `{"kind": "call", "callee": "one_of", "args": [["a", "b"]]}`
/// - `{"kind": "call", "callee": "shape", "args": [{"x": "string"}]}`
/// - `{"kind": "conditional"}` / `{"kind": "abstract_unknown"}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropTypeDecl {
    Tag(TypeTag),
    Unrecognized(String),
    Descriptor(Descriptor),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Call {
        callee: String,
        #[serde(default)]
        args: Vec<CallArg>,
    },
    Conditional,
    AbstractUnknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArg {
    Values(Vec<Literal>),
    Fields(IndexMap<String, PropTypeDecl>),
    Other(serde_json::Value),
}

/// Validated declaration. `Shape` fields are scalar by construction.
#[derive(Clone, Debug, PartialEq)]
pub enum PropTypeEntry {
    Tag(TypeTag),
    OneOf(IndexSet<Literal>),
    Shape(IndexMap<String, TypeTag>),
    Unknown(Degraded),
}

/// Why a declaration fell back to `any`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Degraded {
    Conditional,
    AbstractUnknown,
    /// A plain string outside the known tag set (`"custom"`). Tags form a
    /// closed enum, so the string is not carried through as its own tag; it
    /// is kept here for the log and the prop becomes `any`.
    UnrecognizedTag(String),
    UnrecognizedCallee(String),
    MalformedArgs(TypeTag),
}

impl fmt::Display for Degraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degraded::Conditional => f.write_str("conditional expression"),
            Degraded::AbstractUnknown => f.write_str("statically unknown value"),
            Degraded::UnrecognizedTag(s) => write!(f, "unrecognized type `{s}`"),
            Degraded::UnrecognizedCallee(s) => write!(f, "unrecognized call `{s}`"),
            Degraded::MalformedArgs(tag) => write!(f, "malformed `{tag}` arguments"),
        }
    }
}

impl PropTypeEntry {
    /// Validate the declaration of `prop`.
    ///
    /// Fails only on a `shape` call whose field is itself a descriptor.
    pub fn resolve(prop: &str, decl: &PropTypeDecl) -> Result<Self, ShapeError> {
        let entry = match decl {
            PropTypeDecl::Tag(tag) => PropTypeEntry::Tag(*tag),
            PropTypeDecl::Unrecognized(s) => PropTypeEntry::Unknown(Degraded::UnrecognizedTag(s.clone())),
            PropTypeDecl::Descriptor(Descriptor::Conditional) => PropTypeEntry::Unknown(Degraded::Conditional),
            PropTypeDecl::Descriptor(Descriptor::AbstractUnknown) => {
                PropTypeEntry::Unknown(Degraded::AbstractUnknown)
            }
            PropTypeDecl::Descriptor(Descriptor::Call { callee, args }) => {
                resolve_call(prop, callee, args.first())?
            }
        };
        Ok(entry)
    }

    /// Shape value this entry contributes under its prop name.
    pub fn into_shape_value(self) -> ShapeValue {
        match self {
            PropTypeEntry::Tag(tag) => ShapeValue::Leaf(tag),
            PropTypeEntry::OneOf(lits) if lits.is_empty() => ShapeValue::Leaf(TypeTag::Any),
            PropTypeEntry::OneOf(lits) => {
                let members: Shape = lits.iter().map(|l| (l.key(), ShapeValue::Leaf(TypeTag::Any))).collect();
                ShapeValue::Nested(members)
            }
            PropTypeEntry::Shape(fields) if fields.is_empty() => ShapeValue::Leaf(TypeTag::Any),
            PropTypeEntry::Shape(fields) => {
                ShapeValue::Nested(fields.into_iter().map(|(k, tag)| (k, ShapeValue::Leaf(tag))).collect())
            }
            PropTypeEntry::Unknown(_) => ShapeValue::Leaf(TypeTag::Any),
        }
    }
}

fn resolve_call(prop: &str, callee: &str, arg: Option<&CallArg>) -> Result<PropTypeEntry, ShapeError> {
    // TODO: `instance_of` and `array_of` land in the fallback below; give them
    // their own entries once the binder can use them.
    let entry = match callee.parse::<TypeTag>() {
        Ok(TypeTag::OneOf) => match arg {
            Some(CallArg::Values(values)) => PropTypeEntry::OneOf(values.iter().cloned().collect()),
            _ => PropTypeEntry::Unknown(Degraded::MalformedArgs(TypeTag::OneOf)),
        },
        Ok(TypeTag::Shape) => match arg {
            Some(CallArg::Fields(fields)) => PropTypeEntry::Shape(scalar_fields(prop, fields)?),
            _ => PropTypeEntry::Unknown(Degraded::MalformedArgs(TypeTag::Shape)),
        },
        _ => PropTypeEntry::Unknown(Degraded::UnrecognizedCallee(callee.to_string())),
    };
    Ok(entry)
}

fn scalar_fields(
    prop: &str,
    fields: &IndexMap<String, PropTypeDecl>,
) -> Result<IndexMap<String, TypeTag>, ShapeError> {
    let mut out = IndexMap::with_capacity(fields.len());
    for (field, decl) in fields {
        let tag = match decl {
            PropTypeDecl::Tag(tag) => *tag,
            PropTypeDecl::Unrecognized(s) => {
                tracing::debug!(prop, field = field.as_str(), tag = s.as_str(), "unrecognized shape field type; using any");
                TypeTag::Any
            }
            PropTypeDecl::Descriptor(_) => {
                return Err(ShapeError::UnsupportedShapeDeclaration {
                    prop: prop.to_string(),
                    field: field.clone(),
                });
            }
        };
        out.insert(field.clone(), tag);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decl(v: serde_json::Value) -> PropTypeDecl {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn decodes_each_wire_form() {
        assert_eq!(decl(json!("bool_isRequired")), PropTypeDecl::Tag(TypeTag::BoolRequired));
        assert_eq!(decl(json!("custom")), PropTypeDecl::Unrecognized("custom".into()));
        assert_eq!(
            decl(json!({"kind": "conditional"})),
            PropTypeDecl::Descriptor(Descriptor::Conditional)
        );
        assert_eq!(
            decl(json!({"kind": "abstract_unknown"})),
            PropTypeDecl::Descriptor(Descriptor::AbstractUnknown)
        );
        match decl(json!({"kind": "call", "callee": "shape", "args": [{"x": "string"}]})) {
            PropTypeDecl::Descriptor(Descriptor::Call { callee, args }) => {
                assert_eq!(callee, "shape");
                assert!(matches!(&args[0], CallArg::Fields(f) if f["x"] == PropTypeDecl::Tag(TypeTag::String)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn one_of_deduplicates_literals() {
        let d = decl(json!({"kind": "call", "callee": "one_of", "args": [["a", "b", "a", 2]]}));
        let PropTypeEntry::OneOf(lits) = PropTypeEntry::resolve("size", &d).unwrap() else {
            panic!("expected one_of entry");
        };
        assert_eq!(lits.len(), 3);
    }

    #[test]
    fn nested_shape_field_is_rejected() {
        let d = decl(json!({
            "kind": "call",
            "callee": "shape",
            "args": [{"x": "string", "inner": {"kind": "call", "callee": "shape", "args": [{}]}}]
        }));
        let err = PropTypeEntry::resolve("style", &d).unwrap_err();
        assert_eq!(
            err,
            ShapeError::UnsupportedShapeDeclaration { prop: "style".into(), field: "inner".into() }
        );
    }

    #[test]
    fn unknown_forms_degrade() {
        let cases = [
            (json!({"kind": "conditional"}), Degraded::Conditional),
            (json!({"kind": "abstract_unknown"}), Degraded::AbstractUnknown),
            (json!("custom"), Degraded::UnrecognizedTag("custom".into())),
            (
                json!({"kind": "call", "callee": "instance_of", "args": []}),
                Degraded::UnrecognizedCallee("instance_of".into()),
            ),
            (
                json!({"kind": "call", "callee": "one_of", "args": [{"a": "string"}]}),
                Degraded::MalformedArgs(TypeTag::OneOf),
            ),
            (json!({"kind": "call", "callee": "shape"}), Degraded::MalformedArgs(TypeTag::Shape)),
        ];
        for (v, reason) in cases {
            let entry = PropTypeEntry::resolve("p", &decl(v)).unwrap();
            assert_eq!(entry, PropTypeEntry::Unknown(reason));
            assert_eq!(entry.into_shape_value(), ShapeValue::Leaf(TypeTag::Any));
        }
    }
}
