use thiserror::Error;

use crate::validation::ErrorList;

/// Errors raised while turning a raw provider config into a schema type
#[derive(Debug, Error)]
pub enum DecodeError {
  #[error("provider config is empty")]
  Empty,

  #[error("provider config is not a valid JSON or YAML document: {0}")]
  Syntax(String),

  #[error("provider config must be an object")]
  NotAnObject,

  #[error("no kind \"{kind}\" is registered for version \"{api_version}\"")]
  UnsupportedVersion { api_version: String, kind: &'static str },

  #[error("expected kind \"{expected}\" but found \"{found}\"")]
  KindMismatch { expected: &'static str, found: String },

  #[error(transparent)]
  Schema(serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
  /// The provider config found at `location` could not be decoded
  #[error("failed to decode provider config at {location}: {source}")]
  Decode {
    location: String,
    #[source]
    source: DecodeError,
  },

  #[error("failed to render template {name}: {reason}")]
  Template { name: String, reason: String },

  #[error("wrong object type {0}")]
  TypeMismatch(String),

  /// One or more fields hold values outside of their accepted domain
  #[error("{0}")]
  Invalid(ErrorList),
}

impl Error {
  pub(crate) fn template<E: std::fmt::Display>(name: &str, err: E) -> Self {
    Error::Template {
      name: name.to_owned(),
      reason: err.to_string(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
