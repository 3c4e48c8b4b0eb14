//! Prop-shape inference.
//!
//! Merge the property reads observed in a component body with its declared
//! propTypes into one canonical [`Shape`]:
//! - reads that are not declared become `any` (or, with deep accessors, a
//!   nested shape of their own reads, into which the declarations are merged
//!   again);
//! - declarations override reads of the same name;
//! - anything we cannot know statically degrades to `any` instead of failing.
//!
//! Declarations are validated before any merging, so a bad `shape()` aborts
//! the build without a half-built result.
pub mod accessors;
pub mod prop_types;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ir::{Shape, ShapeValue, TypeTag};

pub use accessors::{AccessorMap, AccessorNode, accessors_from_paths};
pub use prop_types::{CallArg, Degraded, Descriptor, PropTypeDecl, PropTypeEntry, PropTypeMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("prop `{prop}` declares a nested shape at field `{field}`; only scalar shape fields are supported")]
    UnsupportedShapeDeclaration { prop: String, field: String },
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBuilder {
    deep_accessors: bool,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand undeclared reads into nested shapes of their own reads.
    pub fn deep_accessors(mut self, on: bool) -> Self {
        self.deep_accessors = on;
        self
    }

    /// `Ok(None)` when there is nothing to model: no reads and no declarations.
    pub fn build(
        &self,
        accessors: Option<&AccessorMap>,
        prop_types: Option<&PropTypeMap>,
    ) -> Result<Option<Shape>, ShapeError> {
        let accessors = accessors.filter(|m| !m.is_empty());
        let prop_types = prop_types.filter(|m| !m.is_empty());
        if accessors.is_none() && prop_types.is_none() {
            trace!("no accessors or propTypes; no shape");
            return Ok(None);
        }

        // 1) validate every declaration up front
        let declared = prop_types
            .into_iter()
            .flatten()
            .map(|(name, decl)| PropTypeEntry::resolve(name, decl).map(|entry| (name.as_str(), entry)))
            .collect::<Result<IndexMap<_, _>, ShapeError>>()?;
        for (name, entry) in &declared {
            if let PropTypeEntry::Unknown(reason) = entry {
                debug!(prop = *name, %reason, "propType degraded to any");
            }
        }

        let shape = self.merge(accessors, &declared);
        debug!(props = shape.len(), leaves = shape.leaf_count(), "built prop shape");
        Ok(Some(shape))
    }

    /// One level: undeclared reads first, then declarations overwrite. Deep
    /// expansion merges the same declarations into every nested level.
    fn merge(&self, accessors: Option<&AccessorMap>, declared: &IndexMap<&str, PropTypeEntry>) -> Shape {
        let mut shape = Shape::new();

        // 2) undeclared reads
        for (name, node) in accessors.into_iter().flatten() {
            if declared.contains_key(name.as_str()) {
                continue;
            }
            let value = match node.children() {
                Some(children) if self.deep_accessors => ShapeValue::Nested(self.merge(Some(children), declared)),
                _ => ShapeValue::Leaf(TypeTag::Any),
            };
            shape.insert(name.as_str(), value);
        }

        // 3) declarations win
        for (name, entry) in declared {
            shape.insert(*name, entry.clone().into_shape_value());
        }
        shape
    }
}

/// Build the shape for one component. See [`ShapeBuilder::build`].
pub fn build(
    accessors: Option<&AccessorMap>,
    prop_types: Option<&PropTypeMap>,
    deep_accessors: bool,
) -> Result<Option<Shape>, ShapeError> {
    ShapeBuilder::new().deep_accessors(deep_accessors).build(accessors, prop_types)
}

// ------------------------------- Tests ------------------------------------ //
