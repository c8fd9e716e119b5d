//! Minimal models of the Gardener resources that carry a Garden Linux provider config
//!
//! Only the fields read by the admission validator and the generator are modeled; everything else in
//! a manifest is ignored when deserializing.
use std::any::Any;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// An API object that can be handed to an admission validator
pub trait Object: Any {
  fn kind(&self) -> &str;
  fn as_any(&self) -> &dyn Any;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
  #[serde(default)]
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,
}

/// RawExtension holds an embedded provider config as raw bytes
///
/// In a manifest the config is an inline object; keeping the bytes lets a malformed config reach the
/// decoder, which is where it is rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawExtension {
  pub raw: Vec<u8>,
}

impl RawExtension {
  pub fn from_bytes<B: Into<Vec<u8>>>(raw: B) -> Self {
    RawExtension { raw: raw.into() }
  }

  pub fn from_object<T: Serialize>(obj: &T) -> serde_json::Result<Self> {
    Ok(RawExtension {
      raw: serde_json::to_vec(obj)?,
    })
  }
}

impl Serialize for RawExtension {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let value: JsonValue = serde_json::from_slice(&self.raw).map_err(serde::ser::Error::custom)?;
    value.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for RawExtension {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    let raw = serde_json::to_vec(&value).map_err(serde::de::Error::custom)?;
    Ok(RawExtension { raw })
  }
}

/// Shoot represents a Shoot cluster created and managed by Gardener
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shoot {
  #[serde(default)]
  pub metadata: ObjectMeta,
  pub spec: ShootSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootSpec {
  pub provider: Provider,
}

/// Provider contains provider-specific information that are handed-over to the provider-specific
/// extension controller
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
  #[serde(rename = "type", default)]
  pub type_: String,

  #[serde(default)]
  pub workers: Vec<Worker>,
}

/// Worker is the base definition of a worker group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
  #[serde(default)]
  pub name: String,

  #[serde(default)]
  pub machine: Machine,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
  #[serde(rename = "type", default)]
  pub type_: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<ShootMachineImage>,
}

/// ShootMachineImage defines the name and the version of the shoot's machine image
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootMachineImage {
  #[serde(default)]
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provider_config: Option<RawExtension>,
}

impl Object for Shoot {
  fn kind(&self) -> &str {
    "Shoot"
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// OperatingSystemConfig is the extension resource the generator renders node files for
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemConfig {
  #[serde(default)]
  pub metadata: ObjectMeta,
  pub spec: OperatingSystemConfigSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemConfigSpec {
  #[serde(rename = "type", default)]
  pub type_: String,

  /// Purpose describes how the result of this OperatingSystemConfig is used, `provision` or `reconcile`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub purpose: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provider_config: Option<RawExtension>,
}

impl Object for OperatingSystemConfig {
  fn kind(&self) -> &str {
    "OperatingSystemConfig"
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
