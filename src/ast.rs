//! Minimal JS expression AST.
//!
//! Just enough structure to splice literal values into emitted code and to
//! hold abstract placeholders in a component's props literal. Printing goes
//! through `Display`.
use std::fmt::{self, Write as _};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::abstract_value::{AbstractKind, AbstractValue};

static IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

pub fn is_identifier(name: &str) -> bool {
    IDENT.is_match(name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Object(ObjectExpr),
    Array(Vec<Expr>),
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Abstract(AbstractValue),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectExpr {
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropKey,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKey {
    Ident(String),
    Str(String),
}

impl PropKey {
    /// Identifier key when `name` is a valid identifier, string key otherwise.
    pub fn from_name(name: &str) -> Self {
        if is_identifier(name) {
            PropKey::Ident(name.to_string())
        } else {
            PropKey::Str(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PropKey::Ident(s) | PropKey::Str(s) => s,
        }
    }
}

impl Property {
    pub fn new(name: &str, value: Expr) -> Self {
        Self { key: PropKey::from_name(name), value }
    }
}

impl ObjectExpr {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// With duplicate keys the last one wins, as it does at runtime.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().rfind(|p| p.key.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().rposition(|p| p.key.name() == name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Expr {
    pub fn object(properties: Vec<Property>) -> Self {
        Expr::Object(ObjectExpr::new(properties))
    }
    pub fn str(s: impl Into<String>) -> Self {
        Expr::Str(s.into())
    }
    pub fn num(n: f64) -> Self {
        Expr::Num(n)
    }
    pub fn bool(b: bool) -> Self {
        Expr::Bool(b)
    }
    pub fn null() -> Self {
        Expr::Null
    }

    pub fn as_object(&self) -> Option<&ObjectExpr> {
        match self {
            Expr::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectExpr> {
        match self {
            Expr::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_abstract(&self) -> Option<&AbstractValue> {
        match self {
            Expr::Abstract(v) => Some(v),
            _ => None,
        }
    }

    /// Short kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Object(_) => "object",
            Expr::Array(_) => "array",
            Expr::Str(_) => "string",
            Expr::Num(_) => "number",
            Expr::Bool(_) => "boolean",
            Expr::Null => "null",
            Expr::Abstract(_) => "abstract",
        }
    }

    /// Literal expression for a JSON value. Objects keep their key order.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => Expr::Null,
            Value::Bool(b) => Expr::Bool(*b),
            Value::Number(n) => Expr::Num(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Expr::Str(s.clone()),
            Value::Array(xs) => Expr::Array(xs.iter().map(Expr::from_json).collect()),
            Value::Object(m) => Expr::object(
                m.iter().map(|(k, v)| Property::new(k, Expr::from_json(v))).collect(),
            ),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PRINTER
// ————————————————————————————————————————————————————————————————————————————

/// Number as JS would print it: integral values without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn quote(s: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(s).unwrap_or_default()
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) -> fmt::Result {
    match expr {
        Expr::Object(o) => write_object(out, o, depth),
        Expr::Array(xs) => {
            out.push('[');
            for (i, x) in xs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, x, depth)?;
            }
            out.push(']');
            Ok(())
        }
        Expr::Str(s) => {
            out.push_str(&quote(s));
            Ok(())
        }
        Expr::Num(n) => {
            out.push_str(&format_number(*n));
            Ok(())
        }
        Expr::Bool(b) => write!(out, "{b}"),
        Expr::Null => {
            out.push_str("null");
            Ok(())
        }
        Expr::Abstract(v) => match v.kind {
            AbstractKind::Unknown => write!(out, "__abstract(undefined, {})", quote(&v.name)),
            kind => write!(out, "__abstract({}, {})", quote(kind.as_str()), quote(&v.name)),
        },
    }
}

fn write_object(out: &mut String, o: &ObjectExpr, depth: usize) -> fmt::Result {
    if o.properties.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    let pad = "  ".repeat(depth + 1);
    out.push_str("{\n");
    for (i, p) in o.properties.iter().enumerate() {
        out.push_str(&pad);
        match &p.key {
            PropKey::Ident(name) => out.push_str(name),
            PropKey::Str(name) => out.push_str(&quote(name)),
        }
        out.push_str(": ");
        write_expr(out, &p.value, depth + 1)?;
        if i + 1 < o.properties.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_expr(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

impl fmt::Display for ObjectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_object(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_pick_identifier_or_string_form() {
        assert_eq!(PropKey::from_name("onClick"), PropKey::Ident("onClick".into()));
        assert_eq!(PropKey::from_name("$ref_2"), PropKey::Ident("$ref_2".into()));
        assert_eq!(PropKey::from_name("data-id"), PropKey::Str("data-id".into()));
        assert_eq!(PropKey::from_name("1"), PropKey::Str("1".into()));
        assert_eq!(PropKey::from_name(""), PropKey::Str("".into()));
    }

    #[test]
    fn lookup_ignores_key_form() {
        let o = ObjectExpr::new(vec![
            Property::new("a", Expr::num(1.0)),
            Property::new("b-c", Expr::bool(true)),
        ]);
        assert_eq!(o.get("b-c").map(|p| &p.value), Some(&Expr::Bool(true)));
        assert!(o.get("missing").is_none());
    }

    #[test]
    fn duplicate_keys_resolve_to_the_last() {
        let o = ObjectExpr::new(vec![
            Property::new("a", Expr::num(1.0)),
            Property::new("b", Expr::null()),
            Property::new("a", Expr::num(2.0)),
        ]);
        assert_eq!(o.position("a"), Some(2));
        assert_eq!(o.get("a").map(|p| &p.value), Some(&Expr::Num(2.0)));
    }

    #[test]
    fn prints_nested_literal() {
        let e = Expr::from_json(&json!({
            "name": "x\"y",
            "n": 3,
            "f": 1.5,
            "on": false,
            "none": null,
            "list": [1, "a"],
            "inner": {"data-id": {}}
        }));
        let expected = r#"{
  name: "x\"y",
  n: 3,
  f: 1.5,
  on: false,
  none: null,
  list: [1, "a"],
  inner: {
    "data-id": {}
  }
}"#;
        assert_eq!(e.to_string(), expected);
    }

    #[test]
    fn prints_abstract_placeholders() {
        let e = Expr::object(vec![
            Property::new("a", Expr::Abstract(AbstractValue::new(AbstractKind::String, "props.a"))),
            Property::new("b", Expr::Abstract(AbstractValue::new(AbstractKind::Unknown, "props.b"))),
        ]);
        assert_eq!(
            e.to_string(),
            "{\n  a: __abstract(\"string\", \"props.a\"),\n  b: __abstract(undefined, \"props.b\")\n}"
        );
    }

    #[test]
    fn numbers_print_like_js() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
