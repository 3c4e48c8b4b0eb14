//! Abstract placeholder values handed to the symbolic evaluator.
use indexmap::IndexSet;

use crate::bind::BindError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstractKind {
    Array,
    Object,
    Number,
    String,
    Function,
    Boolean,
    Unknown,
}

impl AbstractKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AbstractKind::Array => "array",
            AbstractKind::Object => "object",
            AbstractKind::Number => "number",
            AbstractKind::String => "string",
            AbstractKind::Function => "function",
            AbstractKind::Boolean => "boolean",
            AbstractKind::Unknown => "unknown",
        }
    }
}

/// Handle for one symbolic input. `name` is the dotted access path the
/// evaluator reports issues against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbstractValue {
    pub kind: AbstractKind,
    pub name: String,
}

impl AbstractValue {
    pub fn new(kind: AbstractKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

/// Constructors the binder needs from an evaluator.
pub trait AbstractValueFactory {
    fn array(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn object(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn number(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn string(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn function(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn boolean(&mut self, name: &str) -> Result<AbstractValue, BindError>;
    fn unknown(&mut self, name: &str) -> Result<AbstractValue, BindError>;
}

/// Default factory. Mints plain handles and refuses to reuse a name within
/// one pass; create a fresh one per binding pass.
#[derive(Debug, Default)]
pub struct PlaceholderFactory {
    minted: IndexSet<String>,
}

impl PlaceholderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, kind: AbstractKind, name: &str) -> Result<AbstractValue, BindError> {
        if !self.minted.insert(name.to_string()) {
            return Err(BindError::DuplicateName { name: name.to_string() });
        }
        tracing::trace!(name, kind = kind.as_str(), "minted abstract value");
        Ok(AbstractValue::new(kind, name))
    }
}

impl AbstractValueFactory for PlaceholderFactory {
    fn array(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Array, name)
    }
    fn object(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Object, name)
    }
    fn number(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Number, name)
    }
    fn string(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::String, name)
    }
    fn function(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Function, name)
    }
    fn boolean(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Boolean, name)
    }
    fn unknown(&mut self, name: &str) -> Result<AbstractValue, BindError> {
        self.mint(AbstractKind::Unknown, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_refuses_duplicate_names() {
        let mut f = PlaceholderFactory::new();
        let v = f.string("props.a").unwrap();
        assert_eq!(v, AbstractValue::new(AbstractKind::String, "props.a"));
        assert!(matches!(
            f.number("props.a"),
            Err(BindError::DuplicateName { name }) if name == "props.a"
        ));
        assert_eq!(
            f.unknown("props.b").unwrap(),
            AbstractValue::new(AbstractKind::Unknown, "props.b")
        );
    }
}
