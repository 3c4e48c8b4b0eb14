//! Shape → object-literal AST, for splicing into emitted code.
use serde_json::{Map, Value};

use crate::ast::{Expr, Property};
use crate::ir::{Shape, ShapeValue};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// The shape was built wrong upstream; there is no literal to emit.
    #[error("no literal form for a {kind} leaf at `{path}`")]
    UnrecognizedLiteralKind { path: String, kind: &'static str },
}

/// One property per key, stored order, nesting preserved. Tags lower to their
/// wire string.
pub fn lower_shape(shape: &Shape) -> Expr {
    Expr::object(
        shape
            .iter()
            .map(|(name, value)| Property::new(name, lower_value(value)))
            .collect(),
    )
}

fn lower_value(value: &ShapeValue) -> Expr {
    match value {
        ShapeValue::Leaf(tag) => Expr::str(tag.as_str()),
        ShapeValue::Nested(shape) => lower_shape(shape),
    }
}

/// Lower any shape-compatible plain-data tree: objects nest, strings, numbers
/// and booleans become literals. Arrays and nulls are rejected.
pub fn lower_plain(value: &Value) -> Result<Expr, LowerError> {
    match value {
        Value::Object(map) => lower_plain_object(map, ""),
        other => Err(LowerError::UnrecognizedLiteralKind {
            path: String::new(),
            kind: json_kind(other),
        }),
    }
}

fn lower_plain_object(map: &Map<String, Value>, path: &str) -> Result<Expr, LowerError> {
    let mut properties = Vec::with_capacity(map.len());
    for (name, value) in map {
        let here = if path.is_empty() { name.clone() } else { format!("{path}.{name}") };
        let expr = match value {
            Value::Object(inner) => lower_plain_object(inner, &here)?,
            Value::String(s) => Expr::str(s.as_str()),
            Value::Bool(b) => Expr::bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Expr::num(f),
                None => return Err(LowerError::UnrecognizedLiteralKind { path: here, kind: "number" }),
            },
            other => {
                return Err(LowerError::UnrecognizedLiteralKind { path: here, kind: json_kind(other) });
            }
        };
        properties.push(Property::new(name, expr));
    }
    Ok(Expr::object(properties))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PropKey;
    use crate::ir::TypeTag;
    use serde_json::json;

    #[test]
    fn lowers_tags_to_string_literals() {
        let shape: Shape = [
            ("name", ShapeValue::Leaf(TypeTag::StringRequired)),
            ("age", ShapeValue::Leaf(TypeTag::NumberRequired)),
        ]
        .into_iter()
        .collect();
        let expr = lower_shape(&shape);
        let obj = expr.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.properties[0].key, PropKey::Ident("name".into()));
        assert_eq!(obj.properties[0].value, Expr::Str("string_isRequired".into()));
        assert_eq!(obj.properties[1].key, PropKey::Ident("age".into()));
        assert_eq!(obj.properties[1].value, Expr::Str("number_isRequired".into()));
    }

    #[test]
    fn nesting_depth_is_preserved() {
        let shape: Shape = serde_json::from_value(json!({
            "style": {"color": "string", "font": {"size": "number"}},
            "data-id": "any"
        }))
        .unwrap();
        let expr = lower_shape(&shape);
        let obj = expr.as_object().unwrap();
        let font = obj.get("style").unwrap().value.as_object().unwrap().get("font").unwrap();
        assert_eq!(
            font.value.as_object().unwrap().get("size").unwrap().value,
            Expr::Str("number".into())
        );
        assert_eq!(obj.get("data-id").unwrap().key, PropKey::Str("data-id".into()));
        assert_eq!(
            expr.to_string(),
            "{\n  style: {\n    color: \"string\",\n    font: {\n      size: \"number\"\n    }\n  },\n  \"data-id\": \"any\"\n}"
        );
    }

    #[test]
    fn plain_form_matches_shape_lowering() {
        let shape: Shape = serde_json::from_value(json!({"a": {"x": "bool"}, "b": "func_isRequired"})).unwrap();
        let plain = serde_json::to_value(&shape).unwrap();
        assert_eq!(lower_plain(&plain).unwrap(), lower_shape(&shape));
    }

    #[test]
    fn plain_scalars_keep_their_kind() {
        let expr = lower_plain(&json!({"n": 2, "on": true, "s": "x"})).unwrap();
        let obj = expr.as_object().unwrap();
        assert_eq!(obj.get("n").unwrap().value, Expr::Num(2.0));
        assert_eq!(obj.get("on").unwrap().value, Expr::Bool(true));
        assert_eq!(obj.get("s").unwrap().value, Expr::Str("x".into()));
    }

    #[test]
    fn unrecognized_leaves_are_errors() {
        let err = lower_plain(&json!({"a": {"b": [1, 2]}})).unwrap_err();
        assert_eq!(err, LowerError::UnrecognizedLiteralKind { path: "a.b".into(), kind: "array" });
        let err = lower_plain(&json!({"a": null})).unwrap_err();
        assert_eq!(err, LowerError::UnrecognizedLiteralKind { path: "a".into(), kind: "null" });
        let err = lower_plain(&json!("string")).unwrap_err();
        assert_eq!(err, LowerError::UnrecognizedLiteralKind { path: "".into(), kind: "string" });
    }
}
