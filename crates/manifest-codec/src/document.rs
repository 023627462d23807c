// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Decoding and encoding of whole manifest documents.
//!
//! Text is first parsed into a generic value so that syntax errors are told
//! apart from field errors, then the target type is extracted with
//! `serde_path_to_error` to report which field was rejected.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::env::{with_env, EnvSource};

/// Document syntax a manifest is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => write!(f, "YAML"),
            DocumentFormat::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document is not valid {format}: {message}")]
    Syntax { format: DocumentFormat, message: String },

    #[error("invalid value for `{path}`: {message}")]
    Field { path: String, message: String },

    #[error("failed to encode {format} document: {message}")]
    Encode { format: DocumentFormat, message: String },
}

impl DocumentError {
    /// Dotted path of the rejected field, for field errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            DocumentError::Field { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn field_error<E: fmt::Display>(err: serde_path_to_error::Error<E>) -> DocumentError {
    DocumentError::Field {
        path: err.path().to_string(),
        message: err.inner().to_string(),
    }
}

/// Decodes a YAML document. Environment references resolve against the
/// environment in effect on this thread.
pub fn from_yaml_str<T: DeserializeOwned>(text: &str) -> Result<T, DocumentError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|err| DocumentError::Syntax {
        format: DocumentFormat::Yaml,
        message: err.to_string(),
    })?;
    serde_path_to_error::deserialize(value).map_err(field_error)
}

/// Like [`from_yaml_str`], resolving environment references against `env`.
pub fn from_yaml_str_with_env<T, E>(text: &str, env: E) -> Result<T, DocumentError>
where
    T: DeserializeOwned,
    E: EnvSource + 'static,
{
    with_env(env, || from_yaml_str(text))
}

pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|err| DocumentError::Syntax {
        format: DocumentFormat::Json,
        message: err.to_string(),
    })?;
    serde_path_to_error::deserialize(value).map_err(field_error)
}

pub fn to_yaml_string<T: Serialize + ?Sized>(value: &T) -> Result<String, DocumentError> {
    serde_yaml::to_string(value).map_err(|err| DocumentError::Encode {
        format: DocumentFormat::Yaml,
        message: err.to_string(),
    })
}

/// Pretty-printed JSON.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(value).map_err(|err| DocumentError::Encode {
        format: DocumentFormat::Json,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::*;
    use crate::PortPair;

    #[derive(Debug, Deserialize)]
    struct Forwards {
        forward: Vec<PortPair>,
    }

    #[test]
    fn syntax_errors_are_not_field_errors() {
        let err = from_yaml_str::<Forwards>("forward: [8080:80").unwrap_err();
        assert!(matches!(err, DocumentError::Syntax { format: DocumentFormat::Yaml, .. }), "{err}");

        let err = from_json_str::<Forwards>("{\"forward\": ").unwrap_err();
        assert!(matches!(err, DocumentError::Syntax { format: DocumentFormat::Json, .. }), "{err}");
    }

    #[test]
    fn field_errors_carry_the_path() {
        let err = from_yaml_str::<Forwards>("forward: ['8080:80', 'abc:80']").unwrap_err();
        assert_eq!(err.path(), Some("forward[1]"));
        assert!(err.to_string().contains(r#"cannot convert local port "abc""#), "{err}");
    }

    #[test]
    fn scoped_environment_applies_to_document() {
        #[derive(Debug, Deserialize)]
        struct Env {
            environment: Vec<crate::NamedValue>,
        }

        let env = BTreeMap::from([("EDITOR".to_string(), "vim".to_string())]);
        let doc: Env = from_yaml_str_with_env("environment: [EDITOR=$EDITOR]", env).unwrap();
        assert_eq!(doc.environment[0].value(), "vim");
    }
}
