use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{config::Kind, error::DecodeError};

/// Decodes raw provider configs into versioned schema types
pub trait Decoder {
  fn decode<T>(&self, raw: &[u8]) -> Result<T, DecodeError>
  where
    T: Kind + DeserializeOwned;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMeta {
  #[serde(default)]
  api_version: Option<String>,
  #[serde(default)]
  kind: Option<String>,
}

/// Decoder for JSON and YAML documents that checks `apiVersion` and `kind` against the target type
///
/// Missing type information is accepted and the target type is assumed. Unknown fields are ignored,
/// but values of the wrong type are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemeDecoder;

impl SchemeDecoder {
  pub fn new() -> Self {
    SchemeDecoder
  }
}

impl Decoder for SchemeDecoder {
  fn decode<T>(&self, raw: &[u8]) -> Result<T, DecodeError>
  where
    T: Kind + DeserializeOwned,
  {
    let document = parse_document(raw)?;
    if !document.is_object() {
      return Err(DecodeError::NotAnObject);
    }

    let meta = TypeMeta::deserialize(&document).map_err(DecodeError::Schema)?;

    if let Some(api_version) = meta.api_version.as_deref().filter(|v| !v.is_empty()) {
      if !T::API_VERSIONS.contains(&api_version) {
        return Err(DecodeError::UnsupportedVersion {
          api_version: api_version.to_owned(),
          kind: T::KIND,
        });
      }
    }

    if let Some(kind) = meta.kind.as_deref().filter(|k| !k.is_empty()) {
      if kind != T::KIND {
        return Err(DecodeError::KindMismatch {
          expected: T::KIND,
          found: kind.to_owned(),
        });
      }
    }

    debug!("Decoding {} ({:?})", T::KIND, meta.api_version);
    serde_json::from_value(document).map_err(DecodeError::Schema)
  }
}

/// JSON is tried first since it is what the API server stores; anything else is parsed as YAML
fn parse_document(raw: &[u8]) -> Result<JsonValue, DecodeError> {
  let text = std::str::from_utf8(raw).map_err(|e| DecodeError::Syntax(e.to_string()))?;
  if text.trim().is_empty() {
    return Err(DecodeError::Empty);
  }

  match serde_json::from_str(text) {
    Ok(value) => Ok(value),
    Err(_) => serde_yaml::from_str(text).map_err(|e| DecodeError::Syntax(e.to_string())),
  }
}
