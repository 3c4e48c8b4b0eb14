// Strongly-typed shape IR. No serde_json::Value here.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Declared or inferred kind of one property.
///
/// Required variants are distinct tags; the binder branches on them directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "any_isRequired")]
    AnyRequired,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "object_isRequired")]
    ObjectRequired,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "array_isRequired")]
    ArrayRequired,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "string_isRequired")]
    StringRequired,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "number_isRequired")]
    NumberRequired,
    #[serde(rename = "node")]
    Node,
    #[serde(rename = "element")]
    Element,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "bool_isRequired")]
    BoolRequired,
    #[serde(rename = "func")]
    Func,
    #[serde(rename = "func_isRequired")]
    FuncRequired,
    #[serde(rename = "symbol")]
    Symbol,
    #[serde(rename = "one_of")]
    OneOf,
    #[serde(rename = "instance_of")]
    InstanceOf,
    #[serde(rename = "shape")]
    Shape,
}

impl TypeTag {
    pub const ALL: [TypeTag; 20] = [
        TypeTag::Any,
        TypeTag::AnyRequired,
        TypeTag::Object,
        TypeTag::ObjectRequired,
        TypeTag::Array,
        TypeTag::ArrayRequired,
        TypeTag::String,
        TypeTag::StringRequired,
        TypeTag::Number,
        TypeTag::NumberRequired,
        TypeTag::Node,
        TypeTag::Element,
        TypeTag::Bool,
        TypeTag::BoolRequired,
        TypeTag::Func,
        TypeTag::FuncRequired,
        TypeTag::Symbol,
        TypeTag::OneOf,
        TypeTag::InstanceOf,
        TypeTag::Shape,
    ];

    /// Wire name, as written in propType dumps and emitted literals.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::AnyRequired => "any_isRequired",
            TypeTag::Object => "object",
            TypeTag::ObjectRequired => "object_isRequired",
            TypeTag::Array => "array",
            TypeTag::ArrayRequired => "array_isRequired",
            TypeTag::String => "string",
            TypeTag::StringRequired => "string_isRequired",
            TypeTag::Number => "number",
            TypeTag::NumberRequired => "number_isRequired",
            TypeTag::Node => "node",
            TypeTag::Element => "element",
            TypeTag::Bool => "bool",
            TypeTag::BoolRequired => "bool_isRequired",
            TypeTag::Func => "func",
            TypeTag::FuncRequired => "func_isRequired",
            TypeTag::Symbol => "symbol",
            TypeTag::OneOf => "one_of",
            TypeTag::InstanceOf => "instance_of",
            TypeTag::Shape => "shape",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type tag `{0}`")]
pub struct UnknownTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SHAPE
// ————————————————————————————————————————————————————————————————————————————

/// Canonical nested description of the properties a component reads.
///
/// Serializes to its plain-data form: a JSON object whose leaves are tag
/// strings. Equality ignores key order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    fields: IndexMap<String, ShapeValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeValue {
    Leaf(TypeTag),
    Nested(Shape),
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. An overwritten key keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: ShapeValue) -> Option<ShapeValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ShapeValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ShapeValue> {
        self.fields.iter()
    }

    /// Number of leaves reachable from this shape.
    pub fn leaf_count(&self) -> usize {
        self.fields
            .values()
            .map(|v| match v {
                ShapeValue::Leaf(_) => 1,
                ShapeValue::Nested(s) => s.leaf_count(),
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = (&'a String, &'a ShapeValue);
    type IntoIter = indexmap::map::Iter<'a, String, ShapeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, ShapeValue)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, ShapeValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<TypeTag> for ShapeValue {
    fn from(tag: TypeTag) -> Self {
        ShapeValue::Leaf(tag)
    }
}

impl From<Shape> for ShapeValue {
    fn from(shape: Shape) -> Self {
        ShapeValue::Nested(shape)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LITERALS
// ————————————————————————————————————————————————————————————————————————————

/// One allowed value of a `one_of` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Num(OrderedFloat<f64>),
    Str(String),
}

impl Literal {
    /// The literal as a property key, matching JS `String(value)`.
    pub fn key(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Num(n) => crate::ast::format_number(n.0),
            Literal::Str(s) => s.clone(),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_wire_names_round_trip() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.as_str().parse::<TypeTag>().unwrap(), tag);
            let v = serde_json::to_value(tag).unwrap();
            assert_eq!(v, json!(tag.as_str()));
            assert_eq!(serde_json::from_value::<TypeTag>(v).unwrap(), tag);
        }
        assert!("strings".parse::<TypeTag>().is_err());
    }

    #[test]
    fn required_tags_are_distinct() {
        assert_ne!(TypeTag::String, TypeTag::StringRequired);
        let required = TypeTag::ALL.iter().filter(|t| t.as_str().ends_with("_isRequired")).count();
        assert_eq!(required, 7);
    }

    #[test]
    fn shape_plain_data_form() {
        let shape: Shape = [
            ("a", ShapeValue::Nested([("x", ShapeValue::Leaf(TypeTag::StringRequired))].into_iter().collect())),
            ("b", ShapeValue::Leaf(TypeTag::NumberRequired)),
        ]
        .into_iter()
        .collect();
        let v = serde_json::to_value(&shape).unwrap();
        assert_eq!(v, json!({"a": {"x": "string_isRequired"}, "b": "number_isRequired"}));
        let back: Shape = serde_json::from_value(v).unwrap();
        assert_eq!(back, shape);
        assert_eq!(shape.leaf_count(), 2);
    }

    #[test]
    fn shape_equality_ignores_order() {
        let a: Shape = [("x", ShapeValue::Leaf(TypeTag::Any)), ("y", ShapeValue::Leaf(TypeTag::Bool))]
            .into_iter()
            .collect();
        let b: Shape = [("y", ShapeValue::Leaf(TypeTag::Bool)), ("x", ShapeValue::Leaf(TypeTag::Any))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn literal_keys_follow_js_string_conversion() {
        let lits: Vec<Literal> = serde_json::from_value(json!(["a", 1, 1.5, true, null])).unwrap();
        let keys: Vec<String> = lits.iter().map(Literal::key).collect();
        assert_eq!(keys, vec!["a", "1", "1.5", "true", "null"]);
    }
}
