//! Bind abstract placeholders into a component's props literal.
//!
//! Every leaf named by the shape is replaced with an abstract value whose name
//! is its dotted path from the binding root (`props.user.name`), so the
//! evaluator can report issues against a source property path. Containers
//! for nested shapes are walked, never replaced; properties the literal does
//! not define yet are added.
use tracing::{debug, trace};

use crate::abstract_value::{AbstractValue, AbstractValueFactory};
use crate::ast::{Expr, ObjectExpr, Property};
use crate::ir::{Shape, ShapeValue, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("expected an object literal at `{path}`, found {found}")]
    NotAnObject { path: String, found: &'static str },
    #[error("abstract value name `{name}` was already used in this pass")]
    DuplicateName { name: String },
}

/// What a binding pass minted, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindSummary {
    pub names: Vec<String>,
}

impl BindSummary {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Replace the leaves of `target` named by `shape` with abstract values from
/// `factory`, rooted at `prefix`.
///
/// On error `target` may be partially bound; callers fall back to the
/// unoptimized path for that component.
pub fn bind_abstract_props<F>(
    target: &mut ObjectExpr,
    shape: &Shape,
    prefix: &str,
    factory: &mut F,
) -> Result<BindSummary, BindError>
where
    F: AbstractValueFactory + ?Sized,
{
    let mut summary = BindSummary::default();
    bind_object(target, shape, prefix, factory, &mut summary)?;
    debug!(prefix, bound = summary.len(), "bound abstract props");
    Ok(summary)
}

fn bind_object<F>(
    target: &mut ObjectExpr,
    shape: &Shape,
    prefix: &str,
    factory: &mut F,
    summary: &mut BindSummary,
) -> Result<(), BindError>
where
    F: AbstractValueFactory + ?Sized,
{
    for (key, value) in shape {
        let path = format!("{prefix}.{key}");
        let index = match target.position(key) {
            Some(index) => index,
            None => {
                // undeclared in the literal: define it, then bind as usual
                trace!(path = path.as_str(), "defining missing property");
                let empty = match value {
                    ShapeValue::Nested(_) => Expr::object(Vec::new()),
                    ShapeValue::Leaf(_) => Expr::null(),
                };
                target.properties.push(Property::new(key, empty));
                target.properties.len() - 1
            }
        };
        let property = &mut target.properties[index];
        match value {
            ShapeValue::Nested(inner) => {
                let found = property.value.kind_name();
                let Some(child) = property.value.as_object_mut() else {
                    return Err(BindError::NotAnObject { path, found });
                };
                bind_object(child, inner, &path, factory, summary)?;
            }
            ShapeValue::Leaf(tag) => {
                let abstract_value = placeholder_for(*tag, &path, factory)?;
                trace!(path = path.as_str(), kind = abstract_value.kind.as_str(), "bind");
                property.value = Expr::Abstract(abstract_value);
                summary.names.push(path);
            }
        }
    }
    Ok(())
}

/// Only required tags get a typed placeholder; an optional prop may be
/// missing at runtime, so it stays unknown.
fn placeholder_for<F>(tag: TypeTag, name: &str, factory: &mut F) -> Result<AbstractValue, BindError>
where
    F: AbstractValueFactory + ?Sized,
{
    match tag {
        TypeTag::ArrayRequired => factory.array(name),
        TypeTag::ObjectRequired => factory.object(name),
        TypeTag::NumberRequired => factory.number(name),
        TypeTag::StringRequired => factory.string(name),
        TypeTag::FuncRequired => factory.function(name),
        TypeTag::BoolRequired => factory.boolean(name),
        _ => factory.unknown(name),
    }
}

// ------------------------------- Tests ------------------------------------ //
