//! One component's static-analysis dump, as the compiler hands it over.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::abstract_value::PlaceholderFactory;
use crate::ast::{Expr, ObjectExpr};
use crate::bind::{BindError, BindSummary, bind_abstract_props};
use crate::inference::{AccessorMap, PropTypeMap, ShapeBuilder, ShapeError, accessors_from_paths};
use crate::ir::Shape;
use crate::path_de::{self, DecodeError};

pub const DEFAULT_PREFIX: &str = "props";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFacts {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub accessors: Option<Accessors>,
    #[serde(default)]
    pub prop_types: Option<PropTypeMap>,
    #[serde(default)]
    pub deep_accessors: bool,
    /// Binding root; `props` when absent.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Props literal to bind abstract values into.
    #[serde(default)]
    pub target: Option<Value>,
}

/// Observed reads, either as a tree or as dotted paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Accessors {
    Tree(AccessorMap),
    Paths(Vec<String>),
}

impl Accessors {
    pub fn to_map(&self) -> Cow<'_, AccessorMap> {
        match self {
            Accessors::Tree(map) => Cow::Borrowed(map),
            Accessors::Paths(paths) => Cow::Owned(accessors_from_paths(paths)),
        }
    }
}

/// One component's shape in plain-data form. Listed in input order, so
/// components sharing a name (or having none) stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeEntry<'a> {
    pub name: &'a str,
    pub shape: Option<Shape>,
}

/// Bound props literal of one component.
#[derive(Debug, Clone)]
pub struct BoundProps {
    pub literal: ObjectExpr,
    pub summary: BindSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl ComponentFacts {
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    /// Build this component's shape. `deep_accessors` overrides the dump's flag.
    pub fn shape(&self, deep_accessors: Option<bool>) -> Result<Option<Shape>, ShapeError> {
        let accessors = self.accessors.as_ref().map(Accessors::to_map);
        ShapeBuilder::new()
            .deep_accessors(deep_accessors.unwrap_or(self.deep_accessors))
            .build(accessors.as_deref(), self.prop_types.as_ref())
    }

    /// The props literal to bind into; an empty literal when the dump has none.
    pub fn target_literal(&self) -> Result<ObjectExpr, BindError> {
        match self.target.as_ref().map(Expr::from_json) {
            None => Ok(ObjectExpr::default()),
            Some(Expr::Object(o)) => Ok(o),
            Some(other) => Err(BindError::NotAnObject {
                path: self.prefix().to_string(),
                found: other.kind_name(),
            }),
        }
    }

    /// Build the shape and bind it onto the target literal with a fresh
    /// factory. Without a shape the literal comes back untouched.
    pub fn bind(&self, deep_accessors: Option<bool>, prefix: Option<&str>) -> Result<BoundProps, FactsError> {
        let mut literal = self.target_literal()?;
        let prefix = prefix.unwrap_or_else(|| self.prefix());
        let summary = match self.shape(deep_accessors)? {
            Some(shape) => {
                let mut factory = PlaceholderFactory::new();
                bind_abstract_props(&mut literal, &shape, prefix, &mut factory)?
            }
            None => BindSummary::default(),
        };
        Ok(BoundProps { literal, summary })
    }

    pub fn shape_entry(&self, deep_accessors: Option<bool>) -> Result<ShapeEntry<'_>, ShapeError> {
        Ok(ShapeEntry { name: &self.name, shape: self.shape(deep_accessors)? })
    }

    /// `// <name>` header followed by the shape literal, `null` without a shape.
    pub fn shape_listing(&self, deep_accessors: Option<bool>) -> Result<String, ShapeError> {
        let literal = match self.shape(deep_accessors)? {
            Some(shape) => crate::lower::lower_shape(&shape).to_string(),
            None => "null".to_string(),
        };
        Ok(format!("// {}\n{literal}\n", self.name))
    }

    /// `// <name>` header followed by the bound props literal.
    pub fn bind_listing(&self, deep_accessors: Option<bool>, prefix: Option<&str>) -> Result<String, FactsError> {
        let bound = self.bind(deep_accessors, prefix)?;
        Ok(format!("// {}\n{}\n", self.name, bound.literal))
    }
}

/// Decode a facts document: one component or an array of them.
pub fn load_facts(src: &str, pointer: Option<&str>) -> Result<Vec<ComponentFacts>, DecodeError> {
    let doc: Value = path_de::from_str_with_path(src)?;
    match path_de::select(doc, pointer)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| path_de::from_value_with_path(item).map_err(|e| e.within(&format!("[{i}]"))))
            .collect(),
        other => Ok(vec![path_de::from_value_with_path(other)?]),
    }
}
