use std::fmt;

use crate::config::{CgroupVersion, LinuxSecurityModule, NetFilterBackend, OperatingSystemConfiguration};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
  Field(String),
  Index(usize),
  Key(String),
}

/// FieldPath locates a field within a resource, e.g. `spec.provider.workers[pool-a].machine`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
  segments: Vec<Segment>,
}

impl FieldPath {
  pub fn new(root: &str) -> Self {
    FieldPath {
      segments: vec![Segment::Field(root.to_owned())],
    }
  }

  pub fn child(&self, name: &str) -> Self {
    self.with(Segment::Field(name.to_owned()))
  }

  pub fn index(&self, index: usize) -> Self {
    self.with(Segment::Index(index))
  }

  pub fn key(&self, key: &str) -> Self {
    self.with(Segment::Key(key.to_owned()))
  }

  fn with(&self, segment: Segment) -> Self {
    let mut segments = self.segments.clone();
    segments.push(segment);
    FieldPath { segments }
  }
}

impl fmt::Display for FieldPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in self.segments.iter().enumerate() {
      match segment {
        Segment::Field(name) if i == 0 => write!(f, "{name}")?,
        Segment::Field(name) => write!(f, ".{name}")?,
        Segment::Index(index) => write!(f, "[{index}]")?,
        Segment::Key(key) => write!(f, "[{key}]")?,
      }
    }
    Ok(())
  }
}

/// FieldError reports a field whose value lies outside of its accepted domain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
  pub field: FieldPath,
  pub bad_value: String,
  pub detail: String,
}

impl FieldError {
  pub fn invalid(field: FieldPath, bad_value: &str, detail: String) -> Self {
    FieldError {
      field,
      bad_value: bad_value.to_owned(),
      detail,
    }
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: Invalid value: {:?}: {}", self.field, self.bad_value, self.detail)
  }
}

/// ErrorList collects every field error of one admission request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
  pub fn new() -> Self {
    ErrorList(Vec::new())
  }

  pub fn push(&mut self, err: FieldError) {
    self.0.push(err)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
    self.0.iter()
  }

  /// An empty list is success; anything else becomes a single aggregate error
  pub fn into_result(self) -> crate::Result<()> {
    match self.is_empty() {
      true => Ok(()),
      false => Err(crate::Error::Invalid(self)),
    }
  }
}

impl Extend<FieldError> for ErrorList {
  fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
    self.0.extend(iter)
  }
}

impl IntoIterator for ErrorList {
  type Item = FieldError;
  type IntoIter = std::vec::IntoIter<FieldError>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl fmt::Display for ErrorList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0.as_slice() {
      [single] => write!(f, "{single}"),
      errs => {
        let joined = errs.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        write!(f, "[{joined}]")
      }
    }
  }
}

/// Validates an OperatingSystemConfiguration found at `path`
///
/// Every field is checked, so a configuration with three bad fields yields three errors.
pub fn validate_operating_system_configuration(config: &OperatingSystemConfiguration, path: &FieldPath) -> ErrorList {
  let mut all_errs = ErrorList::new();

  all_errs.extend(validate_linux_security_module(
    config.linux_security_module.as_ref(),
    &path.child("linuxSecurityModule"),
  ));
  all_errs.extend(validate_net_filter_backend(
    config.net_filter_backend.as_ref(),
    &path.child("netFilterBackend"),
  ));
  all_errs.extend(validate_cgroup_version(
    config.cgroup_version.as_ref(),
    &path.child("cgroupVersion"),
  ));

  all_errs
}

fn validate_linux_security_module(lsm: Option<&LinuxSecurityModule>, path: &FieldPath) -> Option<FieldError> {
  match lsm {
    Some(LinuxSecurityModule::AppArmor | LinuxSecurityModule::SeLinux) => None,
    other => Some(FieldError::invalid(
      path.clone(),
      other.map(LinuxSecurityModule::as_str).unwrap_or_default(),
      format!(
        "must be either {} or {}",
        LinuxSecurityModule::AppArmor,
        LinuxSecurityModule::SeLinux
      ),
    )),
  }
}

// Empty is rejected here even though rendering falls back to iptables
fn validate_net_filter_backend(backend: Option<&NetFilterBackend>, path: &FieldPath) -> Option<FieldError> {
  match backend {
    Some(NetFilterBackend::IpTables | NetFilterBackend::NfTables) => None,
    other => Some(FieldError::invalid(
      path.clone(),
      other.map(NetFilterBackend::as_str).unwrap_or_default(),
      format!(
        "must be either {} or {}",
        NetFilterBackend::IpTables,
        NetFilterBackend::NfTables
      ),
    )),
  }
}

fn validate_cgroup_version(version: Option<&CgroupVersion>, path: &FieldPath) -> Option<FieldError> {
  match version {
    Some(CgroupVersion::V1 | CgroupVersion::V2) => None,
    other => Some(FieldError::invalid(
      path.clone(),
      other.map(CgroupVersion::as_str).unwrap_or_default(),
      format!("must be either {} or {}", CgroupVersion::V1, CgroupVersion::V2),
    )),
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  fn path() -> FieldPath {
    FieldPath::new("providerConfig")
  }

  fn fields(errs: &ErrorList) -> Vec<String> {
    errs.iter().map(|e| e.field.to_string()).collect()
  }

  #[test]
  fn it_renders_field_paths() {
    let path = FieldPath::new("spec")
      .child("provider")
      .child("workers")
      .key("pool-a")
      .child("volumes")
      .index(2);
    assert_eq!(path.to_string(), "spec.provider.workers[pool-a].volumes[2]");
  }

  #[test]
  fn it_accepts_the_default_configuration() {
    let errs = validate_operating_system_configuration(&OperatingSystemConfiguration::default(), &path());
    assert!(errs.is_empty());
    assert!(errs.into_result().is_ok());
  }

  #[rstest]
  #[case("AppArmor")]
  #[case("SELinux")]
  fn linux_security_module_valid_test(#[case] value: &str) {
    let config = OperatingSystemConfiguration {
      linux_security_module: Some(value.into()),
      ..Default::default()
    };
    assert!(validate_operating_system_configuration(&config, &path()).is_empty());
  }

  #[rstest]
  #[case("iptables")]
  #[case("nftables")]
  fn net_filter_backend_valid_test(#[case] value: &str) {
    let config = OperatingSystemConfiguration {
      net_filter_backend: Some(value.into()),
      ..Default::default()
    };
    assert!(validate_operating_system_configuration(&config, &path()).is_empty());
  }

  #[rstest]
  #[case("v1")]
  #[case("v2")]
  fn cgroup_version_valid_test(#[case] value: &str) {
    let config = OperatingSystemConfiguration {
      cgroup_version: Some(value.into()),
      ..Default::default()
    };
    assert!(validate_operating_system_configuration(&config, &path()).is_empty());
  }

  #[rstest]
  #[case(Some("foo"))]
  #[case(Some("apparmor"))]
  #[case(Some(""))]
  #[case(None)]
  fn linux_security_module_invalid_test(#[case] value: Option<&str>) {
    let config = OperatingSystemConfiguration {
      linux_security_module: value.map(Into::into),
      ..Default::default()
    };

    let errs = validate_operating_system_configuration(&config, &path());
    assert_eq!(fields(&errs), vec!["providerConfig.linuxSecurityModule"]);
    assert_eq!(errs.iter().next().unwrap().bad_value, value.unwrap_or_default());
  }

  #[rstest]
  #[case(Some("bar"))]
  #[case(Some("IPTABLES"))]
  #[case(Some(""))]
  #[case(None)]
  fn net_filter_backend_invalid_test(#[case] value: Option<&str>) {
    let config = OperatingSystemConfiguration {
      net_filter_backend: value.map(Into::into),
      ..Default::default()
    };

    let errs = validate_operating_system_configuration(&config, &path());
    assert_eq!(fields(&errs), vec!["providerConfig.netFilterBackend"]);
  }

  #[rstest]
  #[case(Some("v1337"))]
  #[case(Some("2"))]
  #[case(Some(""))]
  #[case(None)]
  fn cgroup_version_invalid_test(#[case] value: Option<&str>) {
    let config = OperatingSystemConfiguration {
      cgroup_version: value.map(Into::into),
      ..Default::default()
    };

    let errs = validate_operating_system_configuration(&config, &path());
    assert_eq!(fields(&errs), vec!["providerConfig.cgroupVersion"]);
  }

  #[test]
  fn it_reports_every_invalid_field_in_order() {
    let config = OperatingSystemConfiguration {
      linux_security_module: Some("foo".into()),
      net_filter_backend: Some("bar".into()),
      cgroup_version: Some("v1337".into()),
      ..Default::default()
    };

    let errs = validate_operating_system_configuration(&config, &path());
    assert_eq!(errs.len(), 3);
    assert_eq!(
      fields(&errs),
      vec![
        "providerConfig.linuxSecurityModule",
        "providerConfig.netFilterBackend",
        "providerConfig.cgroupVersion",
      ]
    );
    assert_eq!(
      errs.to_string(),
      "[providerConfig.linuxSecurityModule: Invalid value: \"foo\": must be either AppArmor or SELinux, \
       providerConfig.netFilterBackend: Invalid value: \"bar\": must be either iptables or nftables, \
       providerConfig.cgroupVersion: Invalid value: \"v1337\": must be either v1 or v2]"
    );
  }

  #[test]
  fn it_reports_missing_fields_as_empty() {
    let config = OperatingSystemConfiguration {
      api_version: None,
      kind: None,
      linux_security_module: None,
      net_filter_backend: None,
      cgroup_version: None,
    };

    let errs = validate_operating_system_configuration(&config, &path());
    assert_eq!(errs.len(), 3);
    assert!(errs.iter().all(|e| e.bad_value.is_empty()));
  }

  #[test]
  fn it_formats_a_single_error_without_brackets() {
    let config = OperatingSystemConfiguration {
      cgroup_version: Some("v3".into()),
      ..Default::default()
    };

    let err = validate_operating_system_configuration(&config, &path())
      .into_result()
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "providerConfig.cgroupVersion: Invalid value: \"v3\": must be either v1 or v2"
    );
  }
}
