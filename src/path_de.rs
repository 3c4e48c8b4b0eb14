use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },
    #[error("JSON pointer `{0}` selects nothing")]
    Pointer(String),
}

impl DecodeError {
    /// Re-root the error path under `prefix` (e.g. an array index).
    pub fn within(self, prefix: &str) -> Self {
        match self {
            DecodeError::Decode { path, message } => {
                let path = if path == "." { prefix.to_string() } else { format!("{prefix}.{path}") };
                DecodeError::Decode { path, message }
            }
            other => other,
        }
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| DecodeError::Decode {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| DecodeError::Decode {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Select a sub-node by JSON Pointer (`/data/components`). `None` selects the root.
pub fn select(value: Value, pointer: Option<&str>) -> Result<Value, DecodeError> {
    match pointer {
        None => Ok(value),
        Some(p) => value
            .pointer(p)
            .cloned()
            .ok_or_else(|| DecodeError::Pointer(p.to_string())),
    }
}
