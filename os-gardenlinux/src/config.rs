use std::fmt;

use serde::{Deserialize, Serialize};

/// API group of the Garden Linux provider configuration
pub const GROUP_NAME: &str = "gardenlinux.os.extensions.gardener.cloud";

/// `apiVersion` of the `v1alpha1` schema
pub const V1ALPHA1: &str = "gardenlinux.os.extensions.gardener.cloud/v1alpha1";

/// A versioned schema type that can be decoded from a raw provider config
///
/// `API_VERSIONS` lists every `apiVersion` the type can be decoded from, current version first
pub trait Kind {
  const KIND: &'static str;
  const API_VERSIONS: &'static [&'static str];
}

/// LinuxSecurityModule is the Linux security module enabled on the node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinuxSecurityModule {
  AppArmor,
  SeLinux,
  /// Any value outside of the accepted domain, kept verbatim so it can be reported
  Unknown(String),
}

impl LinuxSecurityModule {
  pub fn as_str(&self) -> &str {
    match self {
      Self::AppArmor => "AppArmor",
      Self::SeLinux => "SELinux",
      Self::Unknown(value) => value,
    }
  }
}

/// NetFilterBackend is the packet filter implementation configured on the node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetFilterBackend {
  IpTables,
  NfTables,
  Unknown(String),
}

impl NetFilterBackend {
  pub fn as_str(&self) -> &str {
    match self {
      Self::IpTables => "iptables",
      Self::NfTables => "nftables",
      Self::Unknown(value) => value,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.as_str().is_empty()
  }
}

/// The backend used when a configuration does not name one
impl Default for NetFilterBackend {
  fn default() -> Self {
    Self::IpTables
  }
}

/// CgroupVersion is the cgroup hierarchy the node boots with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CgroupVersion {
  V1,
  V2,
  Unknown(String),
}

impl CgroupVersion {
  pub fn as_str(&self) -> &str {
    match self {
      Self::V1 => "v1",
      Self::V2 => "v2",
      Self::Unknown(value) => value,
    }
  }
}

macro_rules! string_enum {
  ($name:ident { $($literal:literal => $variant:ident),+ $(,)? }) => {
    impl From<String> for $name {
      fn from(value: String) -> Self {
        match value.as_str() {
          $($literal => Self::$variant,)+
          _ => Self::Unknown(value),
        }
      }
    }

    impl From<&str> for $name {
      fn from(value: &str) -> Self {
        Self::from(value.to_owned())
      }
    }

    impl From<$name> for String {
      fn from(value: $name) -> Self {
        value.as_str().to_owned()
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }
  };
}

string_enum!(LinuxSecurityModule { "AppArmor" => AppArmor, "SELinux" => SeLinux });
string_enum!(NetFilterBackend { "iptables" => IpTables, "nftables" => NfTables });
string_enum!(CgroupVersion { "v1" => V1, "v2" => V2 });

/// OperatingSystemConfiguration allows to specify configuration for the Garden Linux operating system
///
/// A missing field decodes to `None`; only the validator decides whether that is acceptable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemConfiguration {
  /// APIVersion defines the versioned schema of this representation of an object
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api_version: Option<String>,

  /// Kind is a string value representing the REST resource this object represents
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,

  /// LinuxSecurityModule allows to configure the Linux security module, either AppArmor or SELinux
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linux_security_module: Option<LinuxSecurityModule>,

  /// NetFilterBackend allows to configure the netfilter backend, either iptables or nftables
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub net_filter_backend: Option<NetFilterBackend>,

  /// CgroupVersion allows to configure the cgroup version, either v1 or v2
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cgroup_version: Option<CgroupVersion>,
}

impl Default for OperatingSystemConfiguration {
  fn default() -> Self {
    OperatingSystemConfiguration {
      api_version: Some(V1ALPHA1.to_owned()),
      kind: Some(Self::KIND.to_owned()),
      linux_security_module: Some(LinuxSecurityModule::AppArmor),
      net_filter_backend: Some(NetFilterBackend::default()),
      cgroup_version: Some(CgroupVersion::V1),
    }
  }
}

impl Kind for OperatingSystemConfiguration {
  const KIND: &'static str = "OperatingSystemConfiguration";
  const API_VERSIONS: &'static [&'static str] = &[V1ALPHA1];
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  #[rstest]
  #[case("AppArmor", LinuxSecurityModule::AppArmor)]
  #[case("SELinux", LinuxSecurityModule::SeLinux)]
  #[case("selinux", LinuxSecurityModule::Unknown("selinux".to_owned()))]
  #[case("", LinuxSecurityModule::Unknown(String::new()))]
  fn linux_security_module_from_str_test(#[case] value: &str, #[case] expected: LinuxSecurityModule) {
    let lsm = LinuxSecurityModule::from(value);
    assert_eq!(expected, lsm);
    assert_eq!(value, lsm.as_str());
  }

  #[rstest]
  #[case("iptables", NetFilterBackend::IpTables)]
  #[case("nftables", NetFilterBackend::NfTables)]
  #[case("ebpf", NetFilterBackend::Unknown("ebpf".to_owned()))]
  fn net_filter_backend_from_str_test(#[case] value: &str, #[case] expected: NetFilterBackend) {
    assert_eq!(expected, NetFilterBackend::from(value));
  }

  #[rstest]
  #[case("v1", CgroupVersion::V1)]
  #[case("v2", CgroupVersion::V2)]
  #[case("v1337", CgroupVersion::Unknown("v1337".to_owned()))]
  fn cgroup_version_from_str_test(#[case] value: &str, #[case] expected: CgroupVersion) {
    assert_eq!(expected, CgroupVersion::from(value));
  }

  #[test]
  fn it_serializes_default_configuration() {
    let config = OperatingSystemConfiguration::default();
    let serialized = serde_json::to_value(&config).unwrap();

    assert_eq!(
      serialized,
      serde_json::json!({
        "apiVersion": "gardenlinux.os.extensions.gardener.cloud/v1alpha1",
        "kind": "OperatingSystemConfiguration",
        "linuxSecurityModule": "AppArmor",
        "netFilterBackend": "iptables",
        "cgroupVersion": "v1"
      })
    );
  }

  #[test]
  fn it_keeps_unknown_values_verbatim() {
    let config: OperatingSystemConfiguration =
      serde_json::from_str(r#"{"linuxSecurityModule": "foo", "netFilterBackend": ""}"#).unwrap();

    assert_eq!(
      config.linux_security_module,
      Some(LinuxSecurityModule::Unknown("foo".to_owned()))
    );
    assert!(config.net_filter_backend.unwrap().is_empty());
    assert_eq!(config.cgroup_version, None);
  }
}
